//! One-shot MRU cycling on the focused workspace.
//!
//! The ring is the recency list restricted to the workspace's windows,
//! followed by any windows the daemon has not seen yet in tree order. The
//! target is the neighbour of the focused window in that ring.

use anyhow::Result;
use std::collections::HashSet;
use tracing::{debug, info};

use crate::config::Direction;
use crate::mru::RecencyList;
use crate::pause::PauseSignal;
use crate::state_store::StateStore;
use crate::sway_client::{focused_workspace_name, SwayClient};
use crate::tree::{find_focused_node_id, find_focused_workspace_and_windows, TreeNode};

/// Build the cycling ring for one invocation.
#[must_use]
pub fn build_ring(mru: &RecencyList, windows: &[&TreeNode]) -> Vec<i64> {
    let on_workspace: HashSet<i64> = windows.iter().map(|w| w.id).collect();

    let mut ring: Vec<i64> = mru
        .ids()
        .iter()
        .copied()
        .filter(|id| on_workspace.contains(id))
        .collect();

    let mut tracked: HashSet<i64> = ring.iter().copied().collect();
    for window in windows {
        if tracked.insert(window.id) {
            ring.push(window.id);
        }
    }

    ring
}

/// Pick the window to focus.
///
/// Falls back to the head of the ring when the focused node is not in it,
/// e.g. when a split container holds focus.
#[must_use]
pub fn select_target(ring: &[i64], focused: Option<i64>, direction: Direction) -> Option<i64> {
    if ring.is_empty() {
        return None;
    }

    let len = ring.len();
    let current = focused.and_then(|id| ring.iter().position(|&w| w == id));
    let target_index = match current {
        None => 0,
        Some(index) => match direction {
            Direction::Next => (index + 1) % len,
            Direction::Prev => (index + len - 1) % len,
        },
    };

    ring.get(target_index).copied()
}

/// Move focus one step through the MRU ring of the focused workspace.
///
/// Returns the window that was focused, or `None` if there was nothing to do.
/// Only Sway query failures are errors.
pub fn run_cycle<C: SwayClient>(
    client: &mut C,
    store: &StateStore,
    pause: &PauseSignal,
    direction: Direction,
) -> Result<Option<i64>> {
    let mru = store.load();

    let tree = client.get_tree()?;
    let workspaces = client.get_workspaces()?;
    let workspace_name = focused_workspace_name(&workspaces);

    let (workspace_id, windows) = find_focused_workspace_and_windows(&tree, workspace_name);
    if workspace_id.is_none() || windows.is_empty() {
        debug!(workspace = ?workspace_name, "No windows to cycle through");
        return Ok(None);
    }

    let ring = build_ring(&mru, &windows);
    let focused = find_focused_node_id(&tree);
    let Some(target) = select_target(&ring, focused, direction) else {
        return Ok(None);
    };

    debug!(?ring, ?focused, %direction, target, "Computed cycle target");

    pause.raise();
    client.focus_window(target);
    info!(target, "Focused window");

    Ok(Some(target))
}
