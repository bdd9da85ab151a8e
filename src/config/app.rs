// src/config/app.rs
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};
use thiserror::Error;

/// Env var that points at the config file; beats the `./config.*` fallbacks.
pub const ENV_CONFIG_PATH: &str = "NEWS_MONITOR_CONFIG";
/// Env var consulted when `email.password` is the literal `"ENV"`.
pub const ENV_SMTP_PASSWORD: &str = "SMTP_PASSWORD";

fn default_csv_file() -> PathBuf {
    PathBuf::from("headlines.csv")
}
fn default_plot_folder() -> PathBuf {
    PathBuf::from("plots")
}
fn default_threshold() -> f64 {
    -0.5
}
fn default_interval_minutes() -> u64 {
    30
}
fn default_request_timeout_secs() -> u64 {
    10
}
fn default_log_file() -> PathBuf {
    PathBuf::from("news_aggregator.log")
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no config file found (set $NEWS_MONITOR_CONFIG or create config.json / config.toml)")]
    NotFound,

    #[error("reading config from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("parsing TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("missing SMTP_PASSWORD env var (email.password is \"ENV\")")]
    MissingPassword,

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// One configured news page. `name` is the identity used in logs and the CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    pub name: String,
    pub url: String,
    /// CSS selector whose matches are the headlines.
    pub headline_selector: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub sender: String,
    pub receiver: String,
    pub smtp_server: String,
    pub port: u16,
    /// "ENV" means: read from SMTP_PASSWORD
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub news_sources: Vec<SourceDescriptor>,
    pub email: EmailConfig,
    #[serde(default = "default_csv_file")]
    pub csv_file: PathBuf,
    #[serde(default = "default_plot_folder")]
    pub plot_folder: PathBuf,
    #[serde(default = "default_threshold")]
    pub alert_sentiment_threshold: f64,
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

impl AppConfig {
    /// Load from an explicit path. `.toml` is parsed as TOML, anything else as JSON.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        Self::parse(&data, &ext)
    }

    /// Load using env var + fallbacks:
    /// 1) $NEWS_MONITOR_CONFIG
    /// 2) ./config.json
    /// 3) ./config.toml
    pub fn load_default() -> Result<Self, ConfigError> {
        if let Ok(p) = env::var(ENV_CONFIG_PATH) {
            return Self::load_from_file(PathBuf::from(p));
        }
        for candidate in ["config.json", "config.toml"] {
            let p = PathBuf::from(candidate);
            if p.exists() {
                return Self::load_from_file(&p);
            }
        }
        Err(ConfigError::NotFound)
    }

    pub fn parse(s: &str, hint_ext: &str) -> Result<Self, ConfigError> {
        let mut cfg: AppConfig = if hint_ext == "toml" {
            toml::from_str(s)?
        } else {
            serde_json::from_str(s)?
        };

        // Resolve password if "ENV"
        if cfg.email.password.trim().eq_ignore_ascii_case("env") {
            cfg.email.password =
                env::var(ENV_SMTP_PASSWORD).map_err(|_| ConfigError::MissingPassword)?;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.news_sources.is_empty() {
            return Err(ConfigError::Invalid("news_sources is empty".into()));
        }
        let mut seen = HashSet::new();
        for s in &self.news_sources {
            if s.name.trim().is_empty() || s.url.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "source {:?} needs a non-empty name and url",
                    s.name
                )));
            }
            if s.headline_selector.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "source {} has an empty headline_selector",
                    s.name
                )));
            }
            if !seen.insert(s.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate source name {}",
                    s.name
                )));
            }
        }
        if !self.alert_sentiment_threshold.is_finite() {
            return Err(ConfigError::Invalid(
                "alert_sentiment_threshold must be a finite number".into(),
            ));
        }
        if self.interval_minutes == 0 {
            return Err(ConfigError::Invalid("interval_minutes must be > 0".into()));
        }
        if self.interval_minutes.checked_mul(60).is_none() {
            return Err(ConfigError::Invalid(format!(
                "interval_minutes {} is too large",
                self.interval_minutes
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be > 0".into(),
            ));
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes.saturating_mul(60))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Fixed location of the rendered chart.
    pub fn plot_path(&self) -> PathBuf {
        self.plot_folder.join("sentiment_trend.png")
    }
}
