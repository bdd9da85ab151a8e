//! history.rs: append-only CSV log of scored headlines.
//!
//! Layout (UTF-8, comma separated, header written once):
//! `Timestamp,Source,Headline,Sentiment Score`, timestamp as `%Y-%m-%d %H:%M:%S`.

use chrono::{Local, NaiveDateTime, Timelike};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const HEADER: [&str; 4] = ["Timestamp", "Source", "Headline", "Sentiment Score"];

#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub timestamp: NaiveDateTime, // local wall clock, whole seconds
    pub source: String,
    pub headline: String,
    pub sentiment: f64,
}

impl Observation {
    /// Stamp with the current local time.
    pub fn now(source: impl Into<String>, headline: impl Into<String>, sentiment: f64) -> Self {
        Self {
            timestamp: now_local_secs(),
            source: source.into(),
            headline: headline.into(),
            sentiment,
        }
    }
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("i/o on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("csv on {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("malformed record in {path} at line {line}: {reason}")]
    Malformed {
        path: PathBuf,
        line: u64,
        reason: String,
    },
}

/// The observation log. Only ever appended to; the handle lives for one call.
#[derive(Debug, Clone)]
pub struct CsvLog {
    path: PathBuf,
}

impl CsvLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a batch after any existing rows. Header goes in only when the file
    /// is new (or empty).
    pub fn append(&self, batch: &[Observation]) -> Result<(), PersistenceError> {
        if batch.is_empty() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io(e))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io(e))?;
        let needs_header = file.metadata().map_err(|e| self.io(e))?.len() == 0;

        let mut w = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if needs_header {
            w.write_record(HEADER).map_err(|e| self.csv(e))?;
        }
        for o in batch {
            w.write_record([
                o.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                o.source.clone(),
                o.headline.clone(),
                o.sentiment.to_string(),
            ])
            .map_err(|e| self.csv(e))?;
        }
        w.flush().map_err(|e| self.io(e))?;
        Ok(())
    }

    /// Every observation in file (= append) order. A missing file is an empty
    /// history; anything unparsable is an error, never skipped.
    pub fn read_all(&self) -> Result<Vec<Observation>, PersistenceError> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io(e)),
        };

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let headers = rdr.headers().map_err(|e| self.csv(e))?.clone();
        if headers.is_empty() {
            return Ok(Vec::new());
        }
        if !headers.iter().map(str::trim).eq(HEADER.iter().copied()) {
            return Err(self.malformed(1, format!("unexpected header {headers:?}")));
        }

        let mut out = Vec::new();
        for rec in rdr.records() {
            let rec = rec.map_err(|e| self.csv(e))?;
            let line = rec.position().map(|p| p.line()).unwrap_or(0);

            if rec.len() != HEADER.len() {
                return Err(self.malformed(
                    line,
                    format!("expected {} fields, got {}", HEADER.len(), rec.len()),
                ));
            }

            let timestamp = NaiveDateTime::parse_from_str(rec[0].trim(), TIMESTAMP_FORMAT)
                .map_err(|e| self.malformed(line, format!("timestamp {:?}: {e}", &rec[0])))?;
            let sentiment: f64 = rec[3]
                .trim()
                .parse()
                .map_err(|e| self.malformed(line, format!("score {:?}: {e}", &rec[3])))?;

            out.push(Observation {
                timestamp,
                source: rec[1].to_string(),
                headline: rec[2].to_string(),
                sentiment,
            });
        }
        Ok(out)
    }

    fn io(&self, source: io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn csv(&self, source: csv::Error) -> PersistenceError {
        PersistenceError::Csv {
            path: self.path.clone(),
            source,
        }
    }

    fn malformed(&self, line: u64, reason: String) -> PersistenceError {
        PersistenceError::Malformed {
            path: self.path.clone(),
            line,
            reason,
        }
    }
}

/// Current local time with sub-second precision dropped.
pub fn now_local_secs() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}
