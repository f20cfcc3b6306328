//! REST client for the video-translation backend.
//!
//! Wraps the backend HTTP API (job submission, status polling) using
//! [`reqwest`]. Both calls make exactly one attempt; retry policy belongs
//! to the caller.

use std::time::Duration;

use serde::Serialize;
use vtbatch_core::job::JobSpec;
use vtbatch_core::types::JobId;

use crate::params::TranslateParams;
use crate::protocol::{StatusOutcome, StatusResponse, SubmitOutcome, SubmitResponse};

/// Connection configuration for the backend service.
///
/// Built once at startup and passed into the client constructor;
/// immutable afterward.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base HTTP URL, e.g. `http://127.0.0.1:9011`.
    pub base_url: String,
    /// Per-request timeout applied to every round trip.
    pub request_timeout: Duration,
}

impl BackendConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            base_url: format!("http://{host}:{port}"),
            request_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Errors from one submission attempt.
///
/// Submission is never retried; the coordinator logs the error and skips
/// the item.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// The HTTP round trip failed (connect, timeout, non-2xx status,
    /// undecodable body).
    #[error("submit request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend parsed the request but refused the job.
    #[error("backend rejected job: {0}")]
    Rejected(String),
}

/// Errors from one status poll.
///
/// Every variant is transient: the monitor backs off and retries.
#[derive(Debug, thiserror::Error)]
pub enum PollError {
    /// The HTTP round trip failed (connect, timeout, non-2xx status).
    #[error("status request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body did not match the status envelope.
    #[error("unparseable status response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Submit request body: the source path next to the flattened parameter
/// set, matching what the backend's `/trans_video` endpoint expects.
#[derive(Serialize)]
struct SubmitBody<'a> {
    name: &'a str,
    #[serde(flatten)]
    params: &'a TranslateParams,
}

#[derive(Serialize)]
struct StatusBody<'a> {
    task_id: &'a str,
}

/// HTTP client for one backend instance.
pub struct TransVideoApi {
    client: reqwest::Client,
    base_url: String,
    params: TranslateParams,
}

impl TransVideoApi {
    /// Build a client from connection configuration and the run's fixed
    /// parameter set.
    pub fn new(config: &BackendConfig, params: TranslateParams) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            params,
        })
    }

    /// Reuse an existing [`reqwest::Client`] (connection pooling).
    pub fn with_client(client: reqwest::Client, base_url: String, params: TranslateParams) -> Self {
        Self {
            client,
            base_url,
            params,
        }
    }

    /// Submit one job for translation. Exactly one attempt.
    ///
    /// Sends `POST /trans_video` with the source path and the parameter
    /// set. Returns the backend-issued task id on acceptance.
    pub async fn submit(&self, spec: &JobSpec) -> Result<JobId, SubmitError> {
        let name = spec.source.to_string_lossy();
        let body = SubmitBody {
            name: &name,
            params: &self.params,
        };

        let response = self
            .client
            .post(format!("{}/trans_video", self.base_url))
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let parsed: SubmitResponse = response.json().await?;
        match parsed.into_outcome() {
            SubmitOutcome::Accepted(task_id) => {
                tracing::info!(source = %name, task_id = %task_id, "Submission accepted");
                Ok(task_id)
            }
            SubmitOutcome::Rejected(msg) => Err(SubmitError::Rejected(msg)),
        }
    }

    /// Ask the backend how a job is doing. Exactly one attempt.
    ///
    /// Sends `POST /task_status` with the task id.
    pub async fn poll_status(&self, job_id: &str) -> Result<StatusOutcome, PollError> {
        let response = self
            .client
            .post(format!("{}/task_status", self.base_url))
            .json(&StatusBody { task_id: job_id })
            .send()
            .await?
            .error_for_status()?;

        let text = response.text().await?;
        let parsed: StatusResponse = serde_json::from_str(&text)?;
        Ok(parsed.into_outcome())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_body_flattens_the_params_next_to_the_name() {
        let params = TranslateParams::default();
        let body = SubmitBody {
            name: "/videos/a.mp4",
            params: &params,
        };

        let value = serde_json::to_value(&body).expect("body should serialize");
        assert_eq!(value["name"], "/videos/a.mp4");
        assert_eq!(value["model_name"], "tiny");
        assert_eq!(value["target_language"], "en");
        assert!(value.get("params").is_none(), "params must be flattened");
    }

    #[test]
    fn backend_config_builds_the_base_url() {
        let config = BackendConfig::new("127.0.0.1", 9011);
        assert_eq!(config.base_url, "http://127.0.0.1:9011");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn request_timeout_is_overridable() {
        let config = BackendConfig::new("10.0.0.2", 9011)
            .with_request_timeout(Duration::from_secs(5));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }
}
