//! # Cycle engine
//! One collection cycle: fetch every source → score → persist → chart → alert.
//!
//! The engine owns no I/O of its own; every side effect goes through a trait
//! object so tests can swap in recorders:
//! - [`HeadlineSource`] for fetching,
//! - [`Scorer`] for sentiment,
//! - [`CsvLog`] for the observation log,
//! - [`TrendRenderer`] for the chart,
//! - [`AlertDispatcher`] for the alert.
//!
//! Failure policy per step:
//! - a failing source is logged and skipped (see [`crate::ingest::fetch_all`]),
//! - zero headlines → [`CycleOutcome::Skipped`], nothing written,
//! - a log append error aborts the cycle with [`CycleError::Persistence`],
//! - a log re-read error skips the chart, still runs the alert step, then
//!   surfaces as [`CycleError::History`],
//! - chart and alert errors are logged and the cycle still completes.

use anyhow::Result;
use metrics::{counter, describe_counter, describe_gauge, gauge};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::{AppConfig, SourceDescriptor};
use crate::history::{CsvLog, Observation, PersistenceError};
use crate::ingest::http::HttpFetcher;
use crate::ingest::types::{HeadlineSource, SourceFailure};
use crate::ingest::{fetch_all, FetchReport};
use crate::notify::{alert_body, AlertDispatcher, EmailDispatcher, ALERT_SUBJECT};
use crate::sentiment::{Scorer, SentimentAnalyzer};
use crate::trend::{PngTrendRenderer, RenderOutcome, TrendRenderer};

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("news_cycles_total", "Collection cycles started.");
        describe_counter!(
            "news_cycles_skipped_total",
            "Cycles that fetched zero headlines."
        );
        describe_counter!("news_alerts_sent_total", "Alerts dispatched successfully.");
        describe_counter!("news_alerts_failed_total", "Alerts whose dispatch failed.");
        describe_gauge!(
            "news_cycle_average_sentiment",
            "Average sentiment of the last completed cycle."
        );
    });
}

/// What happened to the alert step of a completed cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertStatus {
    /// Average was at or above the threshold.
    NotNeeded,
    Sent,
    /// Dispatch was attempted and failed (already logged).
    Failed,
}

#[derive(Debug, Clone)]
pub struct CycleResult {
    pub observations: Vec<Observation>,
    pub average_sentiment: f64,
    /// Sources that produced nothing because they failed this cycle.
    pub failures: Vec<(String, SourceFailure)>,
    pub alert: AlertStatus,
}

#[derive(Debug, Clone)]
pub enum CycleOutcome {
    Completed(CycleResult),
    /// No source yielded a headline; no log write, chart or alert.
    Skipped,
}

#[derive(Debug, Error)]
pub enum CycleError {
    #[error("observation log: {0}")]
    Persistence(#[from] PersistenceError),

    /// History could not be re-read; the chart was skipped but the alert step ran.
    #[error("observation log unreadable (alert {alert:?}): {source}")]
    History {
        #[source]
        source: PersistenceError,
        alert: AlertStatus,
    },
}

/// Arithmetic mean; `None` for an empty input.
pub fn mean<I: IntoIterator<Item = f64>>(scores: I) -> Option<f64> {
    let (sum, n) = scores
        .into_iter()
        .fold((0.0f64, 0usize), |(s, n), x| (s + x, n + 1));
    (n > 0).then(|| sum / n as f64)
}

pub struct CycleProcessor {
    sources: Vec<SourceDescriptor>,
    threshold: f64,
    log: CsvLog,
    fetcher: Arc<dyn HeadlineSource>,
    scorer: Arc<dyn Scorer>,
    renderer: Arc<dyn TrendRenderer>,
    dispatcher: Arc<dyn AlertDispatcher>,
}

impl CycleProcessor {
    /// Wire a processor from explicit components (tests, embedding).
    pub fn new(
        cfg: &AppConfig,
        fetcher: Arc<dyn HeadlineSource>,
        scorer: Arc<dyn Scorer>,
        renderer: Arc<dyn TrendRenderer>,
        dispatcher: Arc<dyn AlertDispatcher>,
    ) -> Self {
        Self {
            sources: cfg.news_sources.clone(),
            threshold: cfg.alert_sentiment_threshold,
            log: CsvLog::new(&cfg.csv_file),
            fetcher,
            scorer,
            renderer,
            dispatcher,
        }
    }

    /// Production wiring: HTTP + CSS fetcher, lexicon scorer, PNG chart, SMTP alerts.
    pub fn from_config(cfg: &AppConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(cfg.request_timeout())?;
        let dispatcher = EmailDispatcher::from_config(&cfg.email, cfg.request_timeout().saturating_mul(3))?;
        let renderer = PngTrendRenderer::new(cfg.plot_path(), cfg.alert_sentiment_threshold);
        Ok(Self::new(
            cfg,
            Arc::new(fetcher),
            Arc::new(SentimentAnalyzer::new()),
            Arc::new(renderer),
            Arc::new(dispatcher),
        ))
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn log(&self) -> &CsvLog {
        &self.log
    }

    pub async fn run_cycle(&self) -> Result<CycleOutcome, CycleError> {
        ensure_metrics_described();
        counter!("news_cycles_total").increment(1);

        let FetchReport {
            headlines,
            failures,
        } = fetch_all(&self.sources, self.fetcher.as_ref()).await;

        if headlines.is_empty() {
            warn!(
                sources = self.sources.len(),
                failed = failures.len(),
                "no headlines fetched in this cycle"
            );
            counter!("news_cycles_skipped_total").increment(1);
            return Ok(CycleOutcome::Skipped);
        }

        let observations: Vec<Observation> = headlines
            .into_iter()
            .map(|h| {
                let score = self.scorer.score(&h.text);
                Observation::now(h.source, h.text, score)
            })
            .collect();

        // Unweighted per-cycle mean; sources with more headlines weigh more.
        let average = mean(observations.iter().map(|o| o.sentiment)).unwrap_or_default();
        info!(
            average,
            headlines = observations.len(),
            "average sentiment score"
        );
        gauge!("news_cycle_average_sentiment").set(average);

        self.log.append(&observations)?;

        let history = match self.log.read_all() {
            Ok(history) => history,
            Err(e) => {
                error!(error = %e, "error reading observation log, skipping sentiment plot");
                let alert = self.alert_if_needed(average).await;
                return Err(CycleError::History { source: e, alert });
            }
        };

        match self.renderer.render(&history) {
            Ok(RenderOutcome::Rendered(path)) => {
                debug!(path = %path.display(), rows = history.len(), "trend rendered")
            }
            Ok(RenderOutcome::Skipped) => debug!("trend skipped: empty history"),
            Err(e) => error!(error = %e, "error creating sentiment plot"),
        }

        let alert = self.alert_if_needed(average).await;

        Ok(CycleOutcome::Completed(CycleResult {
            observations,
            average_sentiment: average,
            failures,
            alert,
        }))
    }

    async fn alert_if_needed(&self, average: f64) -> AlertStatus {
        if average < self.threshold {
            match self
                .dispatcher
                .dispatch(ALERT_SUBJECT, &alert_body(average))
                .await
            {
                Ok(()) => {
                    counter!("news_alerts_sent_total").increment(1);
                    info!(average, threshold = self.threshold, "alert sent");
                    AlertStatus::Sent
                }
                Err(e) => {
                    counter!("news_alerts_failed_total").increment(1);
                    error!(error = %e, "error sending alert");
                    AlertStatus::Failed
                }
            }
        } else {
            AlertStatus::NotNeeded
        }
    }
}
