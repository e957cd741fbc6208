//! Store handle for promptsync's state workspace.
//!
//! A store is a directory owning the instructions database and its audit
//! log. All version-history and cooldown state is scoped to a store.

use std::path::PathBuf;

/// Handle to a promptsync state workspace.
///
/// The root directory holds `instructions.db` plus the broker's
/// `instructions.events.jsonl` audit log.
#[derive(Debug, Clone)]
pub struct Store {
    /// Absolute path to the store root directory.
    pub root: PathBuf,
}

impl Store {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}
