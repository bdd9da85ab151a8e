// src/scheduler.rs
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{self, Interval, MissedTickBehavior};

use crate::engine::{CycleOutcome, CycleProcessor};

/// Source of "run a cycle now" signals. `false` means no more ticks will come.
#[async_trait::async_trait]
pub trait Ticker: Send {
    async fn tick(&mut self) -> bool;
}

/// Wall-clock ticker: fires immediately, then every `period`.
/// A cycle that overruns just delays the next tick; missed ticks are not replayed.
pub struct IntervalTicker {
    inner: Interval,
}

impl IntervalTicker {
    pub fn new(period: Duration) -> Self {
        let mut inner = time::interval(period);
        inner.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { inner }
    }
}

#[async_trait::async_trait]
impl Ticker for IntervalTicker {
    async fn tick(&mut self) -> bool {
        self.inner.tick().await;
        true
    }
}

/// Hand-driven ticker; each `advance()` on the handle releases one cycle.
/// Dropping every handle ends the loop once queued ticks are used up.
pub struct ManualTicker {
    rx: mpsc::UnboundedReceiver<()>,
}

#[derive(Clone)]
pub struct ManualTickerHandle {
    tx: mpsc::UnboundedSender<()>,
}

impl ManualTickerHandle {
    pub fn advance(&self) {
        let _ = self.tx.send(());
    }
}

pub fn manual_ticker() -> (ManualTickerHandle, ManualTicker) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ManualTickerHandle { tx }, ManualTicker { rx })
}

#[async_trait::async_trait]
impl Ticker for ManualTicker {
    async fn tick(&mut self) -> bool {
        self.rx.recv().await.is_some()
    }
}

/// Run one cycle per tick until `shutdown` resolves or the ticker is exhausted.
/// Cycles never overlap; shutdown is honoured between cycles. Returns the
/// number of cycles run.
pub async fn run<T, F>(processor: &CycleProcessor, ticker: &mut T, shutdown: F) -> u64
where
    T: Ticker + ?Sized,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut cycles: u64 = 0;

    loop {
        let ticked = tokio::select! {
            biased;
            _ = &mut shutdown => {
                tracing::info!(target: "scheduler", cycles, "shutdown requested, stopping");
                break;
            }
            t = ticker.tick() => t,
        };
        if !ticked {
            tracing::info!(target: "scheduler", cycles, "ticker exhausted, stopping");
            break;
        }

        cycles += 1;
        tracing::info!(
            target: "scheduler",
            cycle = cycles,
            "starting news aggregation and sentiment analysis cycle"
        );
        match processor.run_cycle().await {
            Ok(CycleOutcome::Completed(r)) => tracing::info!(
                target: "scheduler",
                cycle = cycles,
                observations = r.observations.len(),
                failed_sources = r.failures.len(),
                average = r.average_sentiment,
                alert = ?r.alert,
                "cycle complete"
            ),
            Ok(CycleOutcome::Skipped) => {
                tracing::info!(target: "scheduler", cycle = cycles, "cycle skipped")
            }
            Err(e) => tracing::error!(
                target: "scheduler",
                cycle = cycles,
                error = %e,
                "cycle failed; will retry on next tick"
            ),
        }
    }
    cycles
}
