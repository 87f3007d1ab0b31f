use swayipc::{Node, NodeType};

/// Sway node types relevant to window lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Output,
    Workspace,
    Con,
    FloatingCon,
    Dockarea,
    Other,
}

impl From<&NodeType> for NodeKind {
    fn from(node_type: &NodeType) -> Self {
        #[allow(unreachable_patterns)]
        match node_type {
            NodeType::Root => NodeKind::Root,
            NodeType::Output => NodeKind::Output,
            NodeType::Workspace => NodeKind::Workspace,
            NodeType::Con => NodeKind::Con,
            NodeType::FloatingCon => NodeKind::FloatingCon,
            NodeType::Dockarea => NodeKind::Dockarea,
            _ => NodeKind::Other,
        }
    }
}

/// The subset of a Sway layout tree node needed for MRU cycling.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub id: i64,
    pub name: Option<String>,
    pub kind: NodeKind,
    pub focused: bool,
    /// Wayland application id
    pub app_id: Option<String>,
    /// X11 window handle (XWayland clients)
    pub window: Option<i64>,
    pub nodes: Vec<TreeNode>,
    pub floating_nodes: Vec<TreeNode>,
}

impl TreeNode {
    /// Whether this node is a real, focusable window rather than a split
    /// or workspace container.
    ///
    /// The node type is not checked, so floating windows (`floating_con`)
    /// are tracked and cycled like tiled ones.
    pub fn is_eligible(&self) -> bool {
        self.app_id.is_some() || self.window.is_some()
    }
}

impl From<&Node> for TreeNode {
    fn from(node: &Node) -> Self {
        TreeNode {
            id: node.id,
            name: node.name.clone(),
            kind: NodeKind::from(&node.node_type),
            focused: node.focused,
            app_id: node.app_id.clone(),
            window: node.window,
            nodes: node.nodes.iter().map(TreeNode::from).collect(),
            floating_nodes: node.floating_nodes.iter().map(TreeNode::from).collect(),
        }
    }
}

/// Every node in the subtree rooted at `root`, including `root` itself.
///
/// Walks with an explicit stack so deeply nested layouts cannot overflow.
/// Nodes come out in pre-order: a node, its tiled children, then its
/// floating children.
#[must_use]
pub fn flatten(root: &TreeNode) -> Vec<&TreeNode> {
    let mut out = Vec::new();
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        out.push(node);
        // Pushed in reverse so the first tiled child is popped next
        stack.extend(node.floating_nodes.iter().rev());
        stack.extend(node.nodes.iter().rev());
    }

    out
}

/// Locate the workspace called `workspace_name` and collect its windows.
///
/// Returns `(None, [])` when no name is given or no workspace matches.
#[must_use]
pub fn find_focused_workspace_and_windows<'a>(
    tree: &'a TreeNode,
    workspace_name: Option<&str>,
) -> (Option<i64>, Vec<&'a TreeNode>) {
    let Some(name) = workspace_name else {
        return (None, Vec::new());
    };

    let workspace = flatten(tree)
        .into_iter()
        .find(|node| node.kind == NodeKind::Workspace && node.name.as_deref() == Some(name));

    match workspace {
        Some(workspace) => {
            let windows = flatten(workspace)
                .into_iter()
                .filter(|node| node.is_eligible())
                .collect();
            (Some(workspace.id), windows)
        }
        None => (None, Vec::new()),
    }
}

/// Id of the node Sway reports as focused, which may be a container.
#[must_use]
pub fn find_focused_node_id(tree: &TreeNode) -> Option<i64> {
    flatten(tree)
        .into_iter()
        .find(|node| node.focused)
        .map(|node| node.id)
}
