//! The trait seam between the orchestrator and the backend service.

use async_trait::async_trait;
use vtbatch_core::job::JobSpec;
use vtbatch_core::types::JobId;

use crate::api::{PollError, SubmitError, TransVideoApi};
use crate::protocol::StatusOutcome;

/// One backend job service: submit a job, poll a job.
///
/// The runner is written against this trait so its loops can be driven by
/// scripted implementations in tests.
#[async_trait]
pub trait Backend: Send + Sync + 'static {
    /// Submit one job; returns the backend-issued identifier.
    async fn submit(&self, spec: &JobSpec) -> Result<JobId, SubmitError>;

    /// Ask the backend how a job is doing.
    async fn poll_status(&self, job_id: &str) -> Result<StatusOutcome, PollError>;
}

#[async_trait]
impl Backend for TransVideoApi {
    async fn submit(&self, spec: &JobSpec) -> Result<JobId, SubmitError> {
        TransVideoApi::submit(self, spec).await
    }

    async fn poll_status(&self, job_id: &str) -> Result<StatusOutcome, PollError> {
        TransVideoApi::poll_status(self, job_id).await
    }
}
