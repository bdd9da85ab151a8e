//! Sends one test alert through the configured SMTP settings and exits.
//! Handy for checking credentials without waiting for a negative cycle.

use anyhow::{Context, Result};
use news_sentiment_monitor::notify::{AlertDispatcher, EmailDispatcher, ALERT_SUBJECT};
use news_sentiment_monitor::AppConfig;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_target(false).init();

    let cfg = AppConfig::load_default().context("loading configuration")?;
    let dispatcher = EmailDispatcher::from_config(&cfg.email, cfg.request_timeout() * 3)?;

    let body = format!(
        "Test alert from news-sentiment-monitor. Real alerts fire when a cycle's average \
         sentiment drops below {:.3}.",
        cfg.alert_sentiment_threshold
    );
    dispatcher
        .dispatch(&format!("[test] {ALERT_SUBJECT}"), &body)
        .await
        .context("sending test alert")?;

    println!("alert-probe: sent to {}", cfg.email.receiver);
    Ok(())
}
