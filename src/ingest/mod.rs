// src/ingest/mod.rs
pub mod extract;
pub mod http;
pub mod types;

use crate::config::SourceDescriptor;
use crate::ingest::types::{Headline, HeadlineSource, SourceFailure};
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series show up once a recorder is installed).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("news_fetch_total", "Source fetch attempts.");
        describe_counter!(
            "news_fetch_failures_total",
            "Source fetches that failed (HTTP status, transport, selector)."
        );
        describe_counter!(
            "news_headlines_total",
            "Headlines extracted across all sources."
        );
    });
}

/// Everything one sweep over the configured sources produced.
#[derive(Debug, Default)]
pub struct FetchReport {
    /// Headlines in source order, then document order within a source.
    pub headlines: Vec<Headline>,
    /// `(source name, failure)` for every source that produced nothing.
    pub failures: Vec<(String, SourceFailure)>,
}

/// Fetch every source once, sequentially, in configured order.
/// A failing source is logged and skipped; it never stops the sweep.
pub async fn fetch_all(sources: &[SourceDescriptor], fetcher: &dyn HeadlineSource) -> FetchReport {
    ensure_metrics_described();

    let mut report = FetchReport::default();
    for src in sources {
        counter!("news_fetch_total").increment(1);
        match fetcher.fetch(src).await {
            Ok(mut headlines) => {
                tracing::info!(
                    target: "ingest",
                    source = %src.name,
                    count = headlines.len(),
                    "fetched headlines"
                );
                counter!("news_headlines_total").increment(headlines.len() as u64);
                report.headlines.append(&mut headlines);
            }
            Err(e) => {
                tracing::warn!(
                    target: "ingest",
                    source = %src.name,
                    url = %src.url,
                    reason = e.reason(),
                    error = %e,
                    "source fetch failed"
                );
                counter!("news_fetch_failures_total").increment(1);
                report.failures.push((src.name.clone(), e));
            }
        }
    }
    report
}
