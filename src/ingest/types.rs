// src/ingest/types.rs
use thiserror::Error;

use crate::config::SourceDescriptor;

/// One headline as scraped, before scoring.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Headline {
    pub source: String, // SourceDescriptor::name
    pub text: String,   // trimmed, whitespace-collapsed
}

impl Headline {
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            text: text.into(),
        }
    }
}

/// Why a single source produced nothing this cycle. Never aborts the cycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceFailure {
    #[error("HTTP status {code}")]
    HttpStatus { code: u16 },

    #[error("transport error: {detail}")]
    Transport { detail: String },

    #[error("invalid headline selector {selector:?}: {detail}")]
    Selector { selector: String, detail: String },
}

impl SourceFailure {
    /// Short machine-friendly tag for logs.
    pub fn reason(&self) -> &'static str {
        match self {
            SourceFailure::HttpStatus { .. } => "http_status",
            SourceFailure::Transport { .. } => "transport",
            SourceFailure::Selector { .. } => "selector",
        }
    }
}

#[async_trait::async_trait]
pub trait HeadlineSource: Send + Sync {
    async fn fetch(&self, source: &SourceDescriptor) -> Result<Vec<Headline>, SourceFailure>;
}
