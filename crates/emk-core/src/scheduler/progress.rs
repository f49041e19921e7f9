//! Progress reporting for batch downloads (items done, rate, ETA).
//!
//! The scheduler sends a snapshot after every finished item; the CLI decides
//! how often to print.

/// Snapshot of batch progress (CLI-friendly).
#[derive(Debug, Clone, Default)]
pub struct ProgressStats {
    /// Items finished so far, whatever their outcome.
    pub done: usize,
    pub total: usize,
    pub successes: usize,
    pub skipped: usize,
    pub not_found: usize,
    pub failures: usize,
    /// Elapsed time since the batch started (seconds).
    pub elapsed_secs: f64,
}

impl ProgressStats {
    /// Items per second (0 if elapsed is 0).
    pub fn items_per_sec(&self) -> f64 {
        if self.elapsed_secs <= 0.0 {
            return 0.0;
        }
        self.done as f64 / self.elapsed_secs
    }

    /// Estimated seconds remaining (None if rate is 0).
    pub fn eta_secs(&self) -> Option<f64> {
        let remaining = self.total.saturating_sub(self.done);
        if remaining == 0 {
            return Some(0.0);
        }
        let rate = self.items_per_sec();
        if rate <= 0.0 {
            return None;
        }
        Some(remaining as f64 / rate)
    }

    /// Fraction complete in [0.0, 1.0].
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        (self.done as f64 / self.total as f64).min(1.0)
    }

    pub fn is_complete(&self) -> bool {
        self.done >= self.total
    }
}
