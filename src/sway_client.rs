//! Sway IPC abstraction for testability.
//!
//! This module provides a trait over the request/reply calls the cycle
//! command makes, so the cycling logic can run against a mock in tests.

use anyhow::{Context, Result};
use swayipc::{Connection, Workspace};
use tracing::debug;

use crate::tree::TreeNode;

/// What the cycle command needs to know about a workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceSummary {
    pub name: String,
    pub focused: bool,
}

impl From<&Workspace> for WorkspaceSummary {
    fn from(workspace: &Workspace) -> Self {
        WorkspaceSummary {
            name: workspace.name.clone(),
            focused: workspace.focused,
        }
    }
}

/// Trait for Sway IPC operations.
pub trait SwayClient {
    /// Get the full window tree from Sway
    fn get_tree(&mut self) -> Result<TreeNode>;

    /// Get the list of workspaces
    fn get_workspaces(&mut self) -> Result<Vec<WorkspaceSummary>>;

    /// Focus a window by its container ID.
    ///
    /// Fire-and-forget: Sway decides whether focus actually moves.
    fn focus_window(&mut self, window_id: i64);
}

/// Real implementation using swayipc
pub struct RealSwayClient {
    connection: Connection,
}

impl RealSwayClient {
    /// Create a new connection to Sway
    pub fn new() -> Result<Self> {
        let connection = Connection::new().context("Failed to connect to Sway IPC socket")?;
        Ok(RealSwayClient { connection })
    }
}

impl SwayClient for RealSwayClient {
    fn get_tree(&mut self) -> Result<TreeNode> {
        let root = self.connection.get_tree().context("get_tree request failed")?;
        Ok(TreeNode::from(&root))
    }

    fn get_workspaces(&mut self) -> Result<Vec<WorkspaceSummary>> {
        let workspaces = self
            .connection
            .get_workspaces()
            .context("get_workspaces request failed")?;
        Ok(workspaces.iter().map(WorkspaceSummary::from).collect())
    }

    fn focus_window(&mut self, window_id: i64) {
        let command = format!("[con_id={}] focus", window_id);
        match self.connection.run_command(&command) {
            Ok(outcomes) => {
                for outcome in outcomes {
                    if let Err(e) = outcome {
                        debug!(window_id, error = %e, "Sway rejected focus command");
                    }
                }
            }
            Err(e) => debug!(window_id, error = %e, "Failed to send focus command"),
        }
    }
}

/// Name of the focused workspace, if Sway reports one
pub fn focused_workspace_name(workspaces: &[WorkspaceSummary]) -> Option<&str> {
    workspaces
        .iter()
        .find(|w| w.focused)
        .map(|w| w.name.as_str())
}
