//! Bounded exponential backoff with jitter.
//!
//! One [`Backoff`] instance tracks the retry budget of a single operation
//! (or of a connect loop). Delays grow geometrically from
//! [`RetryConfig::base_delay`], are capped at [`RetryConfig::max_delay`],
//! and are jittered into `[delay/2, delay]` so that a fleet of instances
//! recovering from the same outage does not retry in lockstep.

use crate::config::RetryConfig;
use core::time::Duration;
use rand::Rng;

/// The retry schedule for one operation.
pub struct Backoff {
    config: RetryConfig,
    attempt: u32,
}

impl Backoff {
    /// Starts a fresh schedule with a full attempt budget.
    pub fn new(config: RetryConfig) -> Self {
        Self { config, attempt: 0 }
    }

    /// Number of retries handed out so far.
    pub fn attempts(&self) -> u32 {
        self.attempt
    }

    /// Returns the delay to sleep before the next retry, or `None` once the
    /// attempt budget is spent.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.attempt >= self.config.max_attempts {
            return None;
        }
        let delay = self.raw_delay(self.attempt);
        self.attempt += 1;
        Some(jittered(delay))
    }

    /// The deterministic (un-jittered) delay for a zero-based retry index.
    fn raw_delay(&self, attempt: u32) -> Duration {
        let base = self.config.base_delay.as_millis() as f64;
        let grown = base * self.config.multiplier.powi(attempt as i32);
        let capped = grown.min(self.config.max_delay.as_millis() as f64);
        Duration::from_millis(capped as u64)
    }
}

/// Maps a delay uniformly into `[delay/2, delay]`.
fn jittered(delay: Duration) -> Duration {
    let millis = delay.as_millis() as u64;
    if millis < 2 {
        return delay;
    }
    let low = millis / 2;
    Duration::from_millis(rand::rng().random_range(low..=millis))
}
