//! Wire types for the backend's submit and status endpoints.
//!
//! The backend answers every request with a `{code, ...}` JSON envelope.
//! This module deserializes the envelopes and converts the numeric codes
//! into tagged outcome variants exactly once; everything downstream works
//! with the variants, never with raw codes.

use serde::Deserialize;

/// `code` meaning success on both endpoints.
const CODE_OK: i64 = 0;

/// `code` on the status endpoint meaning the job failed for good.
const CODE_FATAL: i64 = 3;

/// Raw response from `POST /trans_video`.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    pub code: i64,
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
}

/// Raw response from `POST /task_status`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    pub code: i64,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub data: Option<StatusData>,
}

/// `data` payload attached to a completed status response.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusData {
    #[serde(default)]
    pub absolute_path: Option<String>,
}

/// Submission result after interpreting the response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The backend accepted the job and issued an identifier.
    Accepted(String),
    /// The backend parsed the request but refused it.
    Rejected(String),
}

/// Poll result after interpreting the response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusOutcome {
    /// The job finished; the backend may report where the output landed.
    Completed(Option<String>),
    /// The backend gave up on the job.
    Failed(String),
    /// Still working; the message is the backend's progress text.
    InProgress(String),
}

impl SubmitResponse {
    /// Collapse the envelope into an outcome.
    ///
    /// A success code without a task id is treated as a rejection: there
    /// is nothing to monitor.
    pub fn into_outcome(self) -> SubmitOutcome {
        if self.code == CODE_OK {
            match self.task_id {
                Some(id) => SubmitOutcome::Accepted(id),
                None => SubmitOutcome::Rejected("backend returned no task id".to_string()),
            }
        } else {
            SubmitOutcome::Rejected(self.msg.unwrap_or_else(|| "unknown error".to_string()))
        }
    }
}

impl StatusResponse {
    /// Collapse the envelope into an outcome.
    pub fn into_outcome(self) -> StatusOutcome {
        match self.code {
            CODE_OK => StatusOutcome::Completed(self.data.and_then(|d| d.absolute_path)),
            CODE_FATAL => {
                StatusOutcome::Failed(self.msg.unwrap_or_else(|| "unknown error".to_string()))
            }
            _ => StatusOutcome::InProgress(self.msg.unwrap_or_else(|| "in progress".to_string())),
        }
    }
}
