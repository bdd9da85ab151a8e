pub mod email;

use thiserror::Error;

pub use email::EmailDispatcher;

/// Fixed subject line of every sentiment alert.
pub const ALERT_SUBJECT: &str = "Alert: Negative News Sentiment Detected!";

/// Plain-text body carrying the cycle average.
pub fn alert_body(average: f64) -> String {
    format!("Average sentiment score is {average:.3}. Immediate attention may be required.")
}

#[derive(Debug, Error)]
pub enum DispatchFailure {
    #[error("building alert message: {0}")]
    Build(String),

    #[error("alert transport: {0}")]
    Transport(String),
}

/// Sends one notification per call. Failures are returned, never panicked on.
#[async_trait::async_trait]
pub trait AlertDispatcher: Send + Sync {
    async fn dispatch(&self, subject: &str, body: &str) -> Result<(), DispatchFailure>;
}
