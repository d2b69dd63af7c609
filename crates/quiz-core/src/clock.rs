//! Elapsed-time clock for a quiz attempt.
//!
//! The clock is a plain counter advanced once per second by a Tokio task.
//! Stopping aborts that task before returning, and the task re-checks the
//! running flag before each increment, so no tick lands after `stop()`.
//! There is no reset: a new attempt gets a new clock.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

/// Interval between ticks.
const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Default)]
struct Counter {
    elapsed: AtomicU64,
    running: AtomicBool,
}

/// Point-in-time view of a clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClockState {
    pub elapsed_seconds: u64,
    pub is_running: bool,
}

/// Free-running elapsed-seconds counter.
#[derive(Debug, Default)]
pub struct Clock {
    counter: Arc<Counter>,
    ticker: Option<JoinHandle<()>>,
}

impl Clock {
    /// Creates a stopped clock at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts ticking. Does nothing if already running.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(&mut self) {
        if self.ticker.is_some() {
            return;
        }

        self.counter.running.store(true, Ordering::SeqCst);
        let counter = Arc::clone(&self.counter);
        self.ticker = Some(tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + TICK, TICK);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                if !counter.running.load(Ordering::SeqCst) {
                    break;
                }
                counter.elapsed.fetch_add(1, Ordering::SeqCst);
            }
        }));
        tracing::debug!(elapsed = self.elapsed_seconds(), "clock started");
    }

    /// Stops ticking. Safe to call any number of times.
    pub fn stop(&mut self) {
        self.counter.running.store(false, Ordering::SeqCst);
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
            tracing::debug!(elapsed = self.elapsed_seconds(), "clock stopped");
        }
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.counter.elapsed.load(Ordering::SeqCst)
    }

    pub const fn is_running(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn state(&self) -> ClockState {
        ClockState {
            elapsed_seconds: self.elapsed_seconds(),
            is_running: self.is_running(),
        }
    }
}

impl Drop for Clock {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Formats seconds as `MM:SS`. Minutes are not capped at 59.
pub fn format_elapsed(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
