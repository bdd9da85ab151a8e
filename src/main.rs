//! News Sentiment Monitor: Binary Entrypoint
//! Loads config, installs logging, then runs a collection cycle immediately and
//! every `interval_minutes` until Ctrl-C / SIGTERM.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use news_sentiment_monitor::scheduler::{self, IntervalTicker};
use news_sentiment_monitor::{AppConfig, CycleProcessor};

/// Compact logs on stderr plus a plain-text copy appended to `log_file`,
/// which is the operator's persistent record of every failure.
fn init_tracing(log_file: &Path) -> Result<()> {
    if let Some(dir) = log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating log dir {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("opening log file {}", log_file.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "ctrl-c handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env in local/dev (SMTP_PASSWORD, RUST_LOG, NEWS_MONITOR_CONFIG).
    let _ = dotenvy::dotenv();

    let cfg = AppConfig::load_default().context("loading configuration")?;
    init_tracing(&cfg.log_file)?;

    tracing::info!(
        sources = cfg.news_sources.len(),
        interval_minutes = cfg.interval_minutes,
        threshold = cfg.alert_sentiment_threshold,
        csv = %cfg.csv_file.display(),
        "starting news aggregator & sentiment analyzer"
    );

    let processor = CycleProcessor::from_config(&cfg).context("building pipeline")?;
    let mut ticker = IntervalTicker::new(cfg.interval());

    let cycles = scheduler::run(&processor, &mut ticker, shutdown_signal()).await;
    tracing::info!(cycles, "stopped");
    Ok(())
}
