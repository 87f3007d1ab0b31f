//! Most-recently-used window cycling for Sway.
//!
//! `sway-mru-daemon` follows focus events and keeps a recency list on disk.
//! `sway-mru-cycle` reads that list and moves focus one step through the
//! windows of the current workspace in MRU order.

pub mod backoff;
pub mod config;
pub mod cycle;
pub mod daemon;
pub mod mru;
pub mod paths;
pub mod pause;
pub mod state_store;
pub mod sway_client;
pub mod tree;
