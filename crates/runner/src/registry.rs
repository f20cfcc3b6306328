//! Synchronized job-state registry.
//!
//! The registry is the only shared mutable state in the system. All
//! writes funnel through its methods, each record has exactly one writer
//! (its monitor), and readers get full copies — a snapshot never exposes
//! a record mid-mutation.

use std::collections::HashMap;

use tokio::sync::RwLock;
use vtbatch_core::job::{JobRecord, JobState, RegistrySnapshot};
use vtbatch_core::types::JobId;

/// Errors raised by the registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Registering the same job id twice is a programming error; the
    /// coordinator treats it as fatal for the batch.
    #[error("job {0} is already registered")]
    DuplicateJob(JobId),
}

#[derive(Default)]
struct Inner {
    records: HashMap<JobId, JobRecord>,
    /// Registration order, for stable snapshots.
    order: Vec<JobId>,
}

/// Synchronized map from job id to its mutable status record.
#[derive(Default)]
pub struct JobRegistry {
    inner: RwLock<Inner>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a record in `Submitted` state.
    pub async fn register(&self, id: JobId, source_name: &str) -> Result<(), RegistryError> {
        let mut inner = self.inner.write().await;
        if inner.records.contains_key(&id) {
            return Err(RegistryError::DuplicateJob(id));
        }
        inner.order.push(id.clone());
        inner
            .records
            .insert(id.clone(), JobRecord::submitted(id, source_name));
        Ok(())
    }

    /// Apply a monotonic state transition.
    ///
    /// Writes that would leave a terminal state or regress are logged at
    /// `warn` and dropped, as are writes for unknown ids.
    pub async fn update(
        &self,
        id: &str,
        state: JobState,
        message: impl Into<String>,
        result_path: Option<String>,
    ) {
        let mut inner = self.inner.write().await;
        let Some(record) = inner.records.get_mut(id) else {
            tracing::warn!(job_id = %id, "Status update for unknown job dropped");
            return;
        };
        if !record.state.can_advance_to(state) {
            tracing::warn!(
                job_id = %id,
                from = %record.state,
                to = %state,
                "Illegal state transition dropped",
            );
            return;
        }
        record.advance(state, message, result_path);
    }

    /// Message-only advisory update, used for transient poll failures.
    ///
    /// Leaves the state untouched; dropped for terminal or unknown jobs.
    pub async fn annotate(&self, id: &str, message: impl Into<String>) {
        let mut inner = self.inner.write().await;
        let Some(record) = inner.records.get_mut(id) else {
            tracing::warn!(job_id = %id, "Annotation for unknown job dropped");
            return;
        };
        if record.state.is_terminal() {
            tracing::warn!(job_id = %id, state = %record.state, "Annotation on terminal job dropped");
            return;
        }
        record.set_message(message);
    }

    /// Copy out every record, in registration order.
    pub async fn snapshot(&self) -> RegistrySnapshot {
        let inner = self.inner.read().await;
        inner
            .order
            .iter()
            .filter_map(|id| inner.records.get(id).cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn register_creates_a_submitted_record() {
        let registry = JobRegistry::new();
        registry.register("t1".to_string(), "a.mp4").await.expect("first registration");

        let snapshot = registry.snapshot().await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, "t1");
        assert_eq!(snapshot[0].source_name, "a.mp4");
        assert_eq!(snapshot[0].state, JobState::Submitted);
    }

    #[tokio::test]
    async fn duplicate_registration_is_an_error() {
        let registry = JobRegistry::new();
        registry.register("t1".to_string(), "a.mp4").await.expect("first registration");

        let err = registry.register("t1".to_string(), "b.mp4").await;
        assert_matches!(err, Err(RegistryError::DuplicateJob(id)) if id == "t1");
    }

    #[tokio::test]
    async fn snapshot_preserves_registration_order() {
        let registry = JobRegistry::new();
        for id in ["t3", "t1", "t2"] {
            registry.register(id.to_string(), "x.mp4").await.expect("registration");
        }

        let ids: Vec<_> = registry.snapshot().await.into_iter().map(|r| r.id).collect();
        assert_eq!(ids, ["t3", "t1", "t2"]);
    }

    #[tokio::test]
    async fn update_advances_state_and_message() {
        let registry = JobRegistry::new();
        registry.register("t1".to_string(), "a.mp4").await.expect("registration");

        registry.update("t1", JobState::Polling, "transcribing", None).await;

        let record = registry.snapshot().await.remove(0);
        assert_eq!(record.state, JobState::Polling);
        assert_eq!(record.message, "transcribing");
    }

    #[tokio::test]
    async fn terminal_state_rejects_further_updates() {
        let registry = JobRegistry::new();
        registry.register("t1".to_string(), "a.mp4").await.expect("registration");

        registry
            .update("t1", JobState::Failed, "no audio track", None)
            .await;
        registry.update("t1", JobState::Polling, "late update", None).await;

        let record = registry.snapshot().await.remove(0);
        assert_eq!(record.state, JobState::Failed);
        assert_eq!(record.message, "no audio track");
    }

    #[tokio::test]
    async fn regression_is_dropped() {
        let registry = JobRegistry::new();
        registry.register("t1".to_string(), "a.mp4").await.expect("registration");

        registry.update("t1", JobState::Polling, "working", None).await;
        registry.update("t1", JobState::Submitted, "rewind", None).await;

        let record = registry.snapshot().await.remove(0);
        assert_eq!(record.state, JobState::Polling);
        assert_eq!(record.message, "working");
    }

    #[tokio::test]
    async fn annotate_changes_the_message_only() {
        let registry = JobRegistry::new();
        registry.register("t1".to_string(), "a.mp4").await.expect("registration");

        registry.annotate("t1", "retrying: connection refused").await;

        let record = registry.snapshot().await.remove(0);
        assert_eq!(record.state, JobState::Submitted);
        assert_eq!(record.message, "retrying: connection refused");
    }

    #[tokio::test]
    async fn annotate_on_a_terminal_job_is_dropped() {
        let registry = JobRegistry::new();
        registry.register("t1".to_string(), "a.mp4").await.expect("registration");
        registry
            .update("t1", JobState::Completed, "/out/a.mp4", Some("/out/a.mp4".to_string()))
            .await;

        registry.annotate("t1", "late advisory").await;

        let record = registry.snapshot().await.remove(0);
        assert_eq!(record.message, "/out/a.mp4");
    }

    #[tokio::test]
    async fn update_for_unknown_job_is_dropped() {
        let registry = JobRegistry::new();
        registry.update("ghost", JobState::Polling, "x", None).await;
        assert!(registry.snapshot().await.is_empty());
    }
}
