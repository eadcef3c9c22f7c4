//! Progress reporting
//!
//! The harvester reports two steps (walking the page chain, then verifying
//! items) through a `ProgressSink`. Each step is announced with `begin_step`,
//! gets a total via `set_total`, advances with `tick` and ends with `finish`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Receiver of progress updates
///
/// Sinks are shared between concurrently running verification units, so
/// every method takes `&self`.
pub trait ProgressSink: Send + Sync {
    /// Starts a new step, resetting the position
    fn begin_step(&self, label: &str);

    /// Sets the expected number of ticks for the current step
    fn set_total(&self, total: u64);

    /// Advances the current step by one
    fn tick(&self);

    /// Marks the current step as done
    fn finish(&self);
}

/// Discards all progress updates
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn begin_step(&self, _label: &str) {}
    fn set_total(&self, _total: u64) {}
    fn tick(&self) {}
    fn finish(&self) {}
}

/// Reports progress through `tracing`
///
/// Logs every `every`-th tick (and the last one) so large collections do not
/// flood the log.
#[derive(Debug)]
pub struct LogProgress {
    label: Mutex<String>,
    total: AtomicU64,
    position: AtomicU64,
    every: u64,
}

impl LogProgress {
    pub fn new() -> Self {
        Self::with_interval(10)
    }

    pub fn with_interval(every: u64) -> Self {
        Self {
            label: Mutex::new(String::new()),
            total: AtomicU64::new(0),
            position: AtomicU64::new(0),
            every: every.max(1),
        }
    }

    /// Current position within the step
    pub fn position(&self) -> u64 {
        self.position.load(Ordering::SeqCst)
    }

    fn label(&self) -> String {
        self.label
            .lock()
            .map(|label| label.clone())
            .unwrap_or_default()
    }
}

impl Default for LogProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for LogProgress {
    fn begin_step(&self, label: &str) {
        if let Ok(mut current) = self.label.lock() {
            *current = label.to_string();
        }
        self.total.store(0, Ordering::SeqCst);
        self.position.store(0, Ordering::SeqCst);
        tracing::info!("{}...", label);
    }

    fn set_total(&self, total: u64) {
        self.total.store(total, Ordering::SeqCst);
    }

    fn tick(&self) {
        let position = self.position.fetch_add(1, Ordering::SeqCst) + 1;
        let total = self.total.load(Ordering::SeqCst);

        if position % self.every == 0 || position == total {
            let percentage = if total > 0 {
                (position as f64 / total as f64) * 100.0
            } else {
                0.0
            };
            tracing::info!(
                "{}: {}/{} ({:.1}%)",
                self.label(),
                position,
                total,
                percentage
            );
        }
    }

    fn finish(&self) {
        tracing::info!("{}: done ({} steps)", self.label(), self.position());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_progress_counts_ticks() {
        let progress = LogProgress::with_interval(2);
        progress.begin_step("Fetching pages");
        progress.set_total(3);
        progress.tick();
        progress.tick();
        progress.tick();
        assert_eq!(progress.position(), 3);
        progress.finish();
    }

    #[test]
    fn test_begin_step_resets_position() {
        let progress = LogProgress::new();
        progress.begin_step("one");
        progress.tick();
        progress.begin_step("two");
        assert_eq!(progress.position(), 0);
        assert_eq!(progress.label(), "two");
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let progress = LogProgress::with_interval(0);
        progress.set_total(1);
        progress.tick();
        assert_eq!(progress.position(), 1);
    }
}
