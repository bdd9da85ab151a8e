// tests/trend_artifact.rs
mod common;

use common::{config, RecordingDispatcher, ScriptedSource};
use news_sentiment_monitor::sentiment::SentimentAnalyzer;
use news_sentiment_monitor::trend::PngTrendRenderer;
use news_sentiment_monitor::{CycleOutcome, CycleProcessor};
use std::sync::Arc;

#[tokio::test]
async fn cycles_write_one_chart_at_fixed_path() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path(), &["A", "B"], -0.5);
    let plot = cfg.plot_path();

    let processor = CycleProcessor::new(
        &cfg,
        Arc::new(
            ScriptedSource::new()
                .ok("A", &["Markets rally", "Economy collapses"])
                .ok("B", &["Stocks surge"]),
        ),
        Arc::new(SentimentAnalyzer::new()),
        Arc::new(PngTrendRenderer::new(&plot, cfg.alert_sentiment_threshold).with_size(400, 240)),
        Arc::new(RecordingDispatcher::default()),
    );

    for _ in 0..2 {
        assert!(matches!(
            processor.run_cycle().await.unwrap(),
            CycleOutcome::Completed(_)
        ));
    }

    assert!(plot.ends_with("plots/sentiment_trend.png"));
    assert!(std::fs::read(&plot).unwrap().starts_with(b"\x89PNG"));
    assert_eq!(std::fs::read_dir(plot.parent().unwrap()).unwrap().count(), 1);
}

#[tokio::test]
async fn skipped_cycle_produces_no_chart() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path(), &["A"], -0.5);
    let plot = cfg.plot_path();

    let processor = CycleProcessor::new(
        &cfg,
        Arc::new(ScriptedSource::new().ok("A", &[])),
        Arc::new(SentimentAnalyzer::new()),
        Arc::new(PngTrendRenderer::new(&plot, cfg.alert_sentiment_threshold)),
        Arc::new(RecordingDispatcher::default()),
    );

    assert!(matches!(
        processor.run_cycle().await.unwrap(),
        CycleOutcome::Skipped
    ));
    assert!(!plot.exists());
    assert!(!cfg.plot_folder.exists());
}
