// src/ingest/http.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::extract::extract_fragments;
use super::types::{Headline, HeadlineSource, SourceFailure};
use crate::config::SourceDescriptor;

const USER_AGENT: &str = concat!("news-sentiment-monitor/", env!("CARGO_PKG_VERSION"));

/// Plain GET + CSS-selector scrape, one request per source, no retries.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// `timeout` bounds the whole request (connect + headers + body).
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("build http client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HeadlineSource for HttpFetcher {
    async fn fetch(&self, source: &SourceDescriptor) -> Result<Vec<Headline>, SourceFailure> {
        let resp = self
            .client
            .get(&source.url)
            .send()
            .await
            .map_err(transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SourceFailure::HttpStatus {
                code: status.as_u16(),
            });
        }

        let body = resp.text().await.map_err(transport)?;
        let fragments = extract_fragments(&body, &source.headline_selector)?;

        Ok(fragments
            .into_iter()
            .map(|text| Headline::new(source.name.clone(), text))
            .collect())
    }
}

/// Flatten the reqwest error chain so "operation timed out" etc. survive into logs.
fn transport(e: reqwest::Error) -> SourceFailure {
    let mut detail = e.to_string();
    let mut cur = std::error::Error::source(&e);
    while let Some(inner) = cur {
        detail.push_str(": ");
        detail.push_str(&inner.to_string());
        cur = inner.source();
    }
    SourceFailure::Transport { detail }
}
