//! Batch orchestration: bounded submission, monitor supervision, board
//! lifecycle, cancellation, and the final summary.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use vtbatch_client::backend::Backend;
use vtbatch_core::job::JobSpec;
use vtbatch_core::pool::submission_concurrency;
use vtbatch_core::summary::BatchSummary;

use crate::board::{run_board, BoardConfig, BoardExit, Renderer};
use crate::monitor::{run_monitor, MonitorConfig};
use crate::registry::{JobRegistry, RegistryError};

/// Board ticks granted to in-flight monitor loops after cancellation
/// before the coordinator detaches them and returns.
const GRACE_TICKS: u32 = 2;

/// Drives one batch end to end: feeds specs through the submission pool,
/// supervises the per-job monitors and the board, and assembles the final
/// summary.
pub struct Coordinator {
    backend: Arc<dyn Backend>,
    registry: Arc<JobRegistry>,
    renderer: Arc<dyn Renderer>,
    monitor_config: MonitorConfig,
    board_config: BoardConfig,
}

impl Coordinator {
    pub fn new(
        backend: Arc<dyn Backend>,
        renderer: Arc<dyn Renderer>,
        monitor_config: MonitorConfig,
        board_config: BoardConfig,
    ) -> Self {
        Self {
            backend,
            registry: Arc::new(JobRegistry::new()),
            renderer,
            monitor_config,
            board_config,
        }
    }

    /// Handle to the registry, for tests and ad hoc inspection.
    pub fn registry(&self) -> Arc<JobRegistry> {
        Arc::clone(&self.registry)
    }

    /// Run the whole batch to completion or cancellation.
    ///
    /// Blocks until every job is terminal or the token fires; a cancelled
    /// run waits a bounded grace period for monitors to notice, then
    /// returns with the unfinished jobs classified as abandoned.
    pub async fn run(
        &self,
        specs: Vec<JobSpec>,
        cancel: CancellationToken,
    ) -> Result<BatchSummary, RegistryError> {
        let discovered = specs.len();
        if discovered == 0 {
            return Ok(BatchSummary::from_snapshot(0, 0, &Vec::new()));
        }

        let (monitors, submit_failures) = self.submit_all(specs, &cancel).await?;
        let accepted = monitors.len();

        if accepted == 0 {
            tracing::error!(discovered, submit_failures, "No submission was accepted");
            return Ok(BatchSummary::from_snapshot(
                discovered,
                submit_failures,
                &self.registry.snapshot().await,
            ));
        }

        tracing::info!(
            discovered,
            accepted,
            submit_failures,
            "Submission phase complete, starting board",
        );

        let board = tokio::spawn(run_board(
            Arc::clone(&self.registry),
            Arc::clone(&self.renderer),
            self.board_config.clone(),
            cancel.clone(),
        ));

        match board.await {
            Ok(BoardExit::AllDone) => {
                // Every job is terminal, so each monitor is exiting on its
                // own; these joins are immediate.
                for handle in monitors {
                    let _ = handle.await;
                }
            }
            Ok(BoardExit::Cancelled) | Err(_) => {
                cancel.cancel();
                self.drain_monitors(monitors).await;
            }
        }

        Ok(BatchSummary::from_snapshot(
            discovered,
            submit_failures,
            &self.registry.snapshot().await,
        ))
    }

    /// Feed every spec through the bounded submission pool.
    ///
    /// Returns the monitor handles for accepted jobs plus the failure
    /// count. At most `submission_concurrency(n)` submit requests are in
    /// flight at once.
    async fn submit_all(
        &self,
        specs: Vec<JobSpec>,
        cancel: &CancellationToken,
    ) -> Result<(Vec<JoinHandle<()>>, usize), RegistryError> {
        let workers = submission_concurrency(specs.len());
        let semaphore = Arc::new(Semaphore::new(workers));
        tracing::info!(items = specs.len(), workers, "Submitting batch");

        let mut submissions = Vec::with_capacity(specs.len());
        for spec in specs {
            let semaphore = Arc::clone(&semaphore);
            let backend = Arc::clone(&self.backend);
            submissions.push(tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("submission semaphore is never closed");
                let result = backend.submit(&spec).await;
                (spec, result)
            }));
        }

        let mut monitors = Vec::new();
        let mut failures = 0usize;
        for submission in submissions {
            match submission.await {
                Ok((spec, Ok(job_id))) => {
                    self.registry
                        .register(job_id.clone(), &spec.source_name())
                        .await?;
                    monitors.push(tokio::spawn(run_monitor(
                        Arc::clone(&self.backend),
                        Arc::clone(&self.registry),
                        job_id,
                        self.monitor_config.clone(),
                        cancel.clone(),
                    )));
                }
                Ok((spec, Err(e))) => {
                    failures += 1;
                    tracing::warn!(
                        source = %spec.source_name(),
                        error = %e,
                        "Submission failed, skipping item",
                    );
                }
                Err(e) => {
                    failures += 1;
                    tracing::error!(error = %e, "Submission task aborted");
                }
            }
        }

        Ok((monitors, failures))
    }

    /// Wait for cancelled monitors under one shared deadline.
    ///
    /// A monitor mid-request or mid-sleep gets until the deadline to
    /// notice the token; stragglers are detached, never aborted.
    async fn drain_monitors(&self, monitors: Vec<JoinHandle<()>>) {
        let grace = self.board_config.tick * GRACE_TICKS;
        let deadline = tokio::time::Instant::now() + grace;

        let mut detached = 0usize;
        for handle in monitors {
            if tokio::time::timeout_at(deadline, handle).await.is_err() {
                detached += 1;
            }
        }
        if detached > 0 {
            tracing::warn!(detached, "Monitors still running after the grace period, detaching");
        }
    }
}
