// tests/common/mod.rs: in-memory stand-ins for the pipeline seams.
#![allow(dead_code)]

use async_trait::async_trait;
use news_sentiment_monitor::config::{AppConfig, EmailConfig, SourceDescriptor};
use news_sentiment_monitor::history::Observation;
use news_sentiment_monitor::ingest::types::{Headline, HeadlineSource, SourceFailure};
use news_sentiment_monitor::notify::{AlertDispatcher, DispatchFailure};
use news_sentiment_monitor::sentiment::Scorer;
use news_sentiment_monitor::trend::{RenderError, RenderOutcome, TrendRenderer};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub fn source(name: &str) -> SourceDescriptor {
    SourceDescriptor {
        name: name.into(),
        url: format!("https://{}.test/", name.to_lowercase()),
        headline_selector: "h2".into(),
    }
}

pub fn config(dir: &Path, names: &[&str], threshold: f64) -> AppConfig {
    AppConfig {
        news_sources: names.iter().map(|n| source(n)).collect(),
        email: EmailConfig {
            sender: "bot@example.com".into(),
            receiver: "ops@example.com".into(),
            smtp_server: "smtp.example.com".into(),
            port: 465,
            password: "x".into(),
        },
        csv_file: dir.join("headlines.csv"),
        plot_folder: dir.join("plots"),
        alert_sentiment_threshold: threshold,
        interval_minutes: 30,
        request_timeout_secs: 10,
        log_file: dir.join("news_aggregator.log"),
    }
}

/// Per-source canned answers; unknown sources yield nothing.
#[derive(Default)]
pub struct ScriptedSource {
    answers: HashMap<String, Result<Vec<String>, SourceFailure>>,
    pub calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ok(mut self, name: &str, headlines: &[&str]) -> Self {
        self.answers.insert(
            name.into(),
            Ok(headlines.iter().map(|s| s.to_string()).collect()),
        );
        self
    }

    pub fn fail(mut self, name: &str, failure: SourceFailure) -> Self {
        self.answers.insert(name.into(), Err(failure));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HeadlineSource for ScriptedSource {
    async fn fetch(&self, s: &SourceDescriptor) -> Result<Vec<Headline>, SourceFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.answers.get(&s.name) {
            Some(Ok(v)) => Ok(v.iter().map(|t| Headline::new(s.name.clone(), t.clone())).collect()),
            Some(Err(e)) => Err(e.clone()),
            None => Ok(vec![]),
        }
    }
}

/// Looks scores up by exact text; anything else is neutral.
#[derive(Default)]
pub struct FixedScorer(pub HashMap<String, f64>);

impl FixedScorer {
    pub fn with(pairs: &[(&str, f64)]) -> Self {
        Self(pairs.iter().map(|(t, s)| (t.to_string(), *s)).collect())
    }
}

impl Scorer for FixedScorer {
    fn score(&self, text: &str) -> f64 {
        self.0.get(text).copied().unwrap_or(0.0)
    }
}

/// Records the history length of every render call.
#[derive(Default)]
pub struct RecordingRenderer {
    pub calls: Mutex<Vec<usize>>,
}

impl RecordingRenderer {
    pub fn calls(&self) -> Vec<usize> {
        self.calls.lock().unwrap().clone()
    }
}

impl TrendRenderer for RecordingRenderer {
    fn render(&self, history: &[Observation]) -> Result<RenderOutcome, RenderError> {
        self.calls.lock().unwrap().push(history.len());
        if history.is_empty() {
            Ok(RenderOutcome::Skipped)
        } else {
            Ok(RenderOutcome::Rendered("memory://trend".into()))
        }
    }
}

/// Records `(subject, body)` of every dispatch; optionally fails each one.
#[derive(Default)]
pub struct RecordingDispatcher {
    pub sent: Mutex<Vec<(String, String)>>,
    pub fail: bool,
}

impl RecordingDispatcher {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl AlertDispatcher for RecordingDispatcher {
    async fn dispatch(&self, subject: &str, body: &str) -> Result<(), DispatchFailure> {
        self.sent
            .lock()
            .unwrap()
            .push((subject.to_string(), body.to_string()));
        if self.fail {
            Err(DispatchFailure::Transport("connection refused".into()))
        } else {
            Ok(())
        }
    }
}
