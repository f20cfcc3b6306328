//! Live aggregation board.
//!
//! One task per batch snapshots the registry on a fixed tick, hands the
//! aggregate view to a renderer, and stops once every job is terminal or
//! the batch is cancelled. Rendering technology stays behind the
//! [`Renderer`] trait; the board only computes views.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use vtbatch_core::board::BoardView;

use crate::registry::JobRegistry;

/// How the board loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardExit {
    /// Every job in a non-empty registry reached a terminal state.
    AllDone,
    /// The batch was cancelled before completion.
    Cancelled,
}

/// Tick configuration for the board.
#[derive(Debug, Clone)]
pub struct BoardConfig {
    pub tick: Duration,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(1),
        }
    }
}

/// Receives one aggregate view per board tick.
pub trait Renderer: Send + Sync {
    fn render(&self, view: &BoardView);
}

/// Renderer that emits one structured log line per tick.
pub struct LogRenderer;

impl Renderer for LogRenderer {
    fn render(&self, view: &BoardView) {
        tracing::info!(completed = view.completed, total = view.total, "Batch progress");
    }
}

/// Tick until every job is terminal or the token fires.
///
/// The cancellation check happens before every tick. An empty registry
/// renders an empty view and keeps ticking; "done" requires at least one
/// job.
pub async fn run_board(
    registry: Arc<JobRegistry>,
    renderer: Arc<dyn Renderer>,
    config: BoardConfig,
    cancel: CancellationToken,
) -> BoardExit {
    loop {
        if cancel.is_cancelled() {
            return BoardExit::Cancelled;
        }

        let view = BoardView::from_snapshot(registry.snapshot().await);
        renderer.render(&view);

        if view.is_done() {
            tracing::info!(total = view.total, "All jobs terminal, stopping board");
            return BoardExit::AllDone;
        }

        tokio::select! {
            _ = cancel.cancelled() => return BoardExit::Cancelled,
            _ = tokio::time::sleep(config.tick) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use vtbatch_core::job::JobState;

    /// Test renderer that records every view it is handed.
    struct CaptureRenderer {
        views: Mutex<Vec<BoardView>>,
    }

    impl CaptureRenderer {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                views: Mutex::new(Vec::new()),
            })
        }

        fn captured(&self) -> Vec<BoardView> {
            self.views.lock().unwrap().clone()
        }
    }

    impl Renderer for CaptureRenderer {
        fn render(&self, view: &BoardView) {
            self.views.lock().unwrap().push(view.clone());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn exits_all_done_once_every_job_is_terminal() {
        let registry = Arc::new(JobRegistry::new());
        registry.register("t1".to_string(), "a.mp4").await.expect("registration");
        registry
            .update("t1", JobState::Completed, "/out/a.mp4", Some("/out/a.mp4".to_string()))
            .await;

        let renderer = CaptureRenderer::new();
        let exit = run_board(
            registry,
            renderer.clone(),
            BoardConfig::default(),
            CancellationToken::new(),
        )
        .await;

        assert_eq!(exit, BoardExit::AllDone);
        let views = renderer.captured();
        assert_eq!(views.len(), 1);
        assert!(views[0].is_done());
    }

    #[tokio::test(start_paused = true)]
    async fn empty_registry_ticks_without_failing() {
        let registry = Arc::new(JobRegistry::new());
        let renderer = CaptureRenderer::new();
        let cancel = CancellationToken::new();

        let board = tokio::spawn(run_board(
            Arc::clone(&registry),
            renderer.clone(),
            BoardConfig::default(),
            cancel.clone(),
        ));

        tokio::time::sleep(Duration::from_millis(3500)).await;
        cancel.cancel();
        let exit = board.await.expect("board should exit");

        assert_eq!(exit, BoardExit::Cancelled);
        let views = renderer.captured();
        assert!(views.len() >= 3, "expected several empty ticks, got {}", views.len());
        assert!(views.iter().all(|v| v.total == 0 && !v.is_done()));
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_interrupts_the_tick_sleep() {
        let registry = Arc::new(JobRegistry::new());
        registry.register("t1".to_string(), "a.mp4").await.expect("registration");

        let cancel = CancellationToken::new();
        let board = tokio::spawn(run_board(
            Arc::clone(&registry),
            Arc::new(LogRenderer),
            BoardConfig {
                tick: Duration::from_secs(60),
            },
            cancel.clone(),
        ));

        tokio::time::sleep(Duration::from_secs(1)).await;
        cancel.cancel();
        let exit = board.await.expect("board should exit");
        assert_eq!(exit, BoardExit::Cancelled);
    }
}
