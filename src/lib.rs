// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod config;
pub mod engine;
pub mod history;
pub mod ingest;
pub mod notify;
pub mod scheduler;
pub mod sentiment;
pub mod trend;

// ---- Re-exports for stable public API ----
pub use crate::config::{AppConfig, SourceDescriptor};
pub use crate::engine::{AlertStatus, CycleError, CycleOutcome, CycleProcessor, CycleResult};
pub use crate::history::{CsvLog, Observation};
