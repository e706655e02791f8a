use super::interface::SyncPolicy;

/// Flushes on counter-value intervals, with a divergence bound.
///
/// The default strategy: flush whenever the issued value is a multiple of
/// `interval`, or whenever the local counter has run `max_divergence` or
/// more ahead of the persisted value (a safety bound that caps how much of
/// the sequence a crash can lose when interval flushes keep failing).
///
/// With the default `interval = 10`, up to 9 issued values are not yet
/// durable at any moment; on the divergence path the bound is
/// `max_divergence - 1`. That loss window is the deliberate price for
/// keeping the issue path off the network.
#[derive(Debug, Clone)]
pub struct IntervalSyncPolicy {
    interval: i64,
    max_divergence: i64,
}

impl IntervalSyncPolicy {
    /// Flush every `interval` values, and always once the local counter is
    /// `max_divergence` ahead of durable state.
    ///
    /// # Panics
    /// Panics when either parameter is less than 1.
    pub fn new(interval: i64, max_divergence: i64) -> Self {
        assert!(interval >= 1, "interval must be at least 1");
        assert!(max_divergence >= 1, "max_divergence must be at least 1");
        Self {
            interval,
            max_divergence,
        }
    }
}

impl Default for IntervalSyncPolicy {
    fn default() -> Self {
        Self::new(10, 50)
    }
}

impl SyncPolicy for IntervalSyncPolicy {
    fn should_flush(&self, local: i64, persisted: i64) -> bool {
        local % self.interval == 0 || local - persisted >= self.max_divergence
    }
}
