use std::path::Path;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vtbatch_cli::config::AppConfig;
use vtbatch_cli::render::ConsoleRenderer;
use vtbatch_cli::scan;
use vtbatch_client::api::{BackendConfig, TransVideoApi};
use vtbatch_client::params::TranslateParams;
use vtbatch_core::summary::{BatchSummary, JobOutcome};
use vtbatch_runner::board::BoardConfig;
use vtbatch_runner::coordinator::Coordinator;
use vtbatch_runner::monitor::MonitorConfig;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vtbatch=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = config.port,
        dir = %config.video_dir,
        "Loaded configuration",
    );

    let specs = match scan::find_video_files(Path::new(&config.video_dir)) {
        Ok(specs) => specs,
        Err(e) => {
            tracing::error!(error = %e, "Scan failed");
            std::process::exit(1);
        }
    };

    if specs.is_empty() {
        tracing::error!(dir = %config.video_dir, "No video files found");
        std::process::exit(1);
    }

    tracing::info!(count = specs.len(), "Discovered video files");
    for spec in &specs {
        tracing::info!(source = %spec.source_name(), "Queued for submission");
    }

    let params = TranslateParams::default()
        .with_target_language(&config.target_language)
        .with_model_name(&config.model_name)
        .with_voice_role(&config.voice_role);

    let backend_config = BackendConfig::new(&config.host, config.port)
        .with_request_timeout(config.request_timeout);
    let api = TransVideoApi::new(&backend_config, params).expect("Failed to build HTTP client");

    let monitor_config = MonitorConfig {
        max_transient_failures: config.max_transient_failures,
        ..MonitorConfig::default()
    };

    let coordinator = Coordinator::new(
        Arc::new(api),
        Arc::new(ConsoleRenderer::new()),
        monitor_config,
        BoardConfig::default(),
    );

    let cancel = CancellationToken::new();
    let watcher_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received Ctrl-C, cancelling batch");
            watcher_token.cancel();
        }
    });

    let summary = match coordinator.run(specs, cancel).await {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!(error = %e, "Batch aborted");
            std::process::exit(1);
        }
    };

    print_summary(&summary);

    if summary.accepted == 0 {
        std::process::exit(1);
    }
}

fn print_summary(summary: &BatchSummary) {
    println!();
    println!(
        "Processed {}/{} submissions ({} failed to submit)",
        summary.accepted, summary.discovered, summary.submit_failures,
    );
    for job in &summary.jobs {
        match &job.outcome {
            JobOutcome::Completed { result_path } => {
                println!(
                    "  \u{2713} {} \u{2192} {}",
                    job.source_name,
                    result_path.as_deref().unwrap_or("path not found"),
                );
            }
            JobOutcome::Failed { message } => {
                println!("  \u{2717} {} \u{2192} {}", job.source_name, message);
            }
            JobOutcome::Abandoned { last_state, message } => {
                println!(
                    "  - {} \u{2192} abandoned while {} ({})",
                    job.source_name, last_state, message,
                );
            }
        }
    }
}
