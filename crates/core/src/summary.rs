//! Final batch summary and terminal-outcome classification.

use serde::Serialize;

use crate::job::{JobRecord, JobState, RegistrySnapshot};
use crate::types::JobId;

/// How a single job ended up, as reported in the final summary.
///
/// `Abandoned` is a summary-level classification applied when shutdown
/// preempted a job before it reached a terminal state; it is never stored
/// in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum JobOutcome {
    Completed { result_path: Option<String> },
    Failed { message: String },
    Abandoned { last_state: JobState, message: String },
}

impl JobOutcome {
    /// Classify a record as observed at the end of the run.
    pub fn classify(record: &JobRecord) -> Self {
        match record.state {
            JobState::Completed => JobOutcome::Completed {
                result_path: record.result_path.clone(),
            },
            JobState::Failed => JobOutcome::Failed {
                message: record.message.clone(),
            },
            state => JobOutcome::Abandoned {
                last_state: state,
                message: record.message.clone(),
            },
        }
    }
}

/// One line of the final summary.
#[derive(Debug, Clone, Serialize)]
pub struct JobReport {
    pub id: JobId,
    pub source_name: String,
    #[serde(flatten)]
    pub outcome: JobOutcome,
}

/// End-of-run accounting for the whole batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    /// Items discovered by the scan, accepted or not.
    pub discovered: usize,
    /// Submissions the backend accepted.
    pub accepted: usize,
    /// Submissions that failed in transit or were rejected.
    pub submit_failures: usize,
    /// Per-job classification, in registration order.
    pub jobs: Vec<JobReport>,
}

impl BatchSummary {
    /// Assemble the summary from the final registry snapshot.
    pub fn from_snapshot(
        discovered: usize,
        submit_failures: usize,
        snapshot: &RegistrySnapshot,
    ) -> Self {
        let jobs = snapshot
            .iter()
            .map(|record| JobReport {
                id: record.id.clone(),
                source_name: record.source_name.clone(),
                outcome: JobOutcome::classify(record),
            })
            .collect::<Vec<_>>();
        Self {
            discovered,
            accepted: jobs.len(),
            submit_failures,
            jobs,
        }
    }
}
