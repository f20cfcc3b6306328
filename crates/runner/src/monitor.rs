//! Per-job status polling.
//!
//! Each accepted job gets one monitor task that owns all writes to that
//! job's record. The loop polls until the backend reports a terminal
//! result, backing off on transient failures, and exits early (without
//! touching the record) when the batch is cancelled.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use vtbatch_client::backend::Backend;
use vtbatch_client::protocol::StatusOutcome;
use vtbatch_core::job::JobState;
use vtbatch_core::text::{clip_status, MAX_STATUS_LEN};

use crate::registry::JobRegistry;

/// Message stored when a completed job carries no output path.
pub const PATH_NOT_FOUND: &str = "path not found";

/// Tunable intervals for one monitor loop.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Delay between polls while the job reports progress.
    pub poll_interval: Duration,
    /// Delay after a transient poll failure.
    pub backoff_interval: Duration,
    /// Consecutive transient failures tolerated before the job is marked
    /// failed. `None` retries forever.
    pub max_transient_failures: Option<u32>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            backoff_interval: Duration::from_secs(5),
            max_transient_failures: None,
        }
    }
}

/// Poll one job until it reaches a terminal state or the token fires.
///
/// Cancellation is checked at the top of every iteration; an in-flight
/// request or sleep always finishes first, and a cancelled exit leaves
/// the last observed state in place.
pub async fn run_monitor(
    backend: Arc<dyn Backend>,
    registry: Arc<JobRegistry>,
    job_id: String,
    config: MonitorConfig,
    cancel: CancellationToken,
) {
    let mut transient_failures = 0u32;

    loop {
        if cancel.is_cancelled() {
            tracing::debug!(job_id = %job_id, "Monitor cancelled, leaving last observed state");
            return;
        }

        match backend.poll_status(&job_id).await {
            Ok(StatusOutcome::Completed(path)) => {
                let message = path.clone().unwrap_or_else(|| PATH_NOT_FOUND.to_string());
                registry
                    .update(&job_id, JobState::Completed, message, path)
                    .await;
                tracing::info!(job_id = %job_id, "Job completed");
                return;
            }
            Ok(StatusOutcome::Failed(message)) => {
                tracing::warn!(job_id = %job_id, error = %message, "Job failed on the backend");
                registry.update(&job_id, JobState::Failed, message, None).await;
                return;
            }
            Ok(StatusOutcome::InProgress(message)) => {
                transient_failures = 0;
                registry
                    .update(
                        &job_id,
                        JobState::Polling,
                        clip_status(&message, MAX_STATUS_LEN),
                        None,
                    )
                    .await;
                tokio::time::sleep(config.poll_interval).await;
            }
            Err(e) => {
                transient_failures += 1;
                if let Some(max) = config.max_transient_failures {
                    if transient_failures > max {
                        tracing::error!(
                            job_id = %job_id,
                            failures = transient_failures,
                            "Giving up after repeated transient poll errors",
                        );
                        registry
                            .update(
                                &job_id,
                                JobState::Failed,
                                format!("gave up after {transient_failures} transient errors: {e}"),
                                None,
                            )
                            .await;
                        return;
                    }
                }
                tracing::warn!(job_id = %job_id, error = %e, "Transient poll failure, backing off");
                registry.annotate(&job_id, format!("retrying: {e}")).await;
                tokio::time::sleep(config.backoff_interval).await;
            }
        }
    }
}
