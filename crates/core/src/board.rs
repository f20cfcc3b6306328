//! Point-in-time aggregation of a registry snapshot.

use serde::Serialize;

use crate::job::{JobRecord, RegistrySnapshot};

/// Aggregate progress computed from one snapshot.
///
/// `completed` counts terminal records, whether they succeeded or failed.
/// This is what renderers receive each tick; it carries copies only.
#[derive(Debug, Clone, Serialize)]
pub struct BoardView {
    pub total: usize,
    pub completed: usize,
    pub jobs: Vec<JobRecord>,
}

impl BoardView {
    /// Build a view from a snapshot. Safe on an empty snapshot.
    pub fn from_snapshot(snapshot: RegistrySnapshot) -> Self {
        let total = snapshot.len();
        let completed = snapshot.iter().filter(|r| r.state.is_terminal()).count();
        Self {
            total,
            completed,
            jobs: snapshot,
        }
    }

    /// Overall-done condition: a non-empty batch with every job terminal.
    pub fn is_done(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}
