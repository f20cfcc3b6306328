//! The per-job data model: what gets submitted and what gets tracked.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::{JobId, Timestamp};

/// Immutable description of one unit of work to submit.
///
/// Created once per discovered file and never mutated. The translation
/// parameter set is uniform per run and lives with the client, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSpec {
    /// Path of the source video handed to the backend.
    pub source: PathBuf,
}

impl JobSpec {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Display name used on the board and in the summary (file name
    /// without its directory).
    pub fn source_name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.display().to_string())
    }
}

/// Lifecycle state of a tracked job.
///
/// States only advance (`Submitted` → `Polling` → terminal) and never
/// regress. Skipping `Polling` is allowed when the very first poll already
/// reports a terminal result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// Accepted by the backend, no status observed yet.
    Submitted,
    /// The backend reported in-progress at least once.
    Polling,
    /// The backend reported success. Terminal.
    Completed,
    /// The backend reported a fatal failure. Terminal.
    Failed,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed)
    }

    /// Whether moving from `self` to `next` is a legal advancement.
    ///
    /// Terminal states accept no transition at all; otherwise the target
    /// must not rank below the current state.
    pub fn can_advance_to(self, next: JobState) -> bool {
        !self.is_terminal() && next.rank() >= self.rank()
    }

    fn rank(self) -> u8 {
        match self {
            JobState::Submitted => 0,
            JobState::Polling => 1,
            JobState::Completed | JobState::Failed => 2,
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobState::Submitted => "submitted",
            JobState::Polling => "polling",
            JobState::Completed => "completed",
            JobState::Failed => "failed",
        };
        f.pad(name)
    }
}

/// Mutable per-job status tracked by the registry.
///
/// Created when a submission is accepted. Written only by the job's own
/// monitor (through the registry); everyone else sees copies.
#[derive(Debug, Clone, Serialize)]
pub struct JobRecord {
    /// Backend-issued job identifier.
    pub id: JobId,
    /// Display name of the source file.
    pub source_name: String,
    pub state: JobState,
    /// Last human-readable status text.
    pub message: String,
    /// Output location, set only on completion and only when the backend
    /// reported one.
    pub result_path: Option<String>,
    /// When this record last changed (UTC).
    pub updated_at: Timestamp,
}

impl JobRecord {
    /// Fresh record for a just-accepted job.
    pub fn submitted(id: JobId, source_name: impl Into<String>) -> Self {
        Self {
            id,
            source_name: source_name.into(),
            state: JobState::Submitted,
            message: "submitted".to_string(),
            result_path: None,
            updated_at: chrono::Utc::now(),
        }
    }

    /// Apply an advancement in place, refreshing the timestamp.
    ///
    /// Callers are expected to have checked [`JobState::can_advance_to`]
    /// first; this method does not re-validate.
    pub fn advance(
        &mut self,
        state: JobState,
        message: impl Into<String>,
        result_path: Option<String>,
    ) {
        self.state = state;
        self.message = message.into();
        if result_path.is_some() {
            self.result_path = result_path;
        }
        self.updated_at = chrono::Utc::now();
    }

    /// Replace the message only, leaving the state untouched.
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
        self.updated_at = chrono::Utc::now();
    }
}

/// A consistent, copied view of the registry at one instant, in
/// registration order.
pub type RegistrySnapshot = Vec<JobRecord>;
