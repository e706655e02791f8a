//! Runtime configuration for the coordination layer.
//!
//! All values carry defaults suitable for a local ZooKeeper deployment and
//! can be overridden field by field. With the `serde` feature enabled, both
//! structs deserialize from partial documents, so an application only needs
//! to spell out the fields it changes.

use core::time::Duration;

/// Connection, namespace, and retry settings for the coordination service.
///
/// One instance of this config describes one coordination session. It is
/// consumed by the session backend (endpoint and timeouts) and by the
/// [`CoordinationClient`] (base path and retry parameters).
///
/// [`CoordinationClient`]: crate::CoordinationClient
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CoordinationConfig {
    /// Coordination service endpoint, `host:port`.
    pub endpoint: String,

    /// Session lease duration negotiated with the coordination service.
    ///
    /// When the lease expires the session is lost and every operation fails
    /// until a new session is established.
    pub session_timeout: Duration,

    /// Maximum time to wait for the initial connection to come up.
    pub connection_timeout: Duration,

    /// Root node under which one child node per sequence key is kept.
    pub base_path: String,

    /// Backoff schedule applied to transient coordination failures.
    pub retry: RetryConfig,
}

impl Default for CoordinationConfig {
    fn default() -> Self {
        Self {
            endpoint: String::from("localhost:2181"),
            session_timeout: Duration::from_secs(60),
            connection_timeout: Duration::from_secs(15),
            base_path: String::from("/sequences"),
            retry: RetryConfig::default(),
        }
    }
}

/// Bounded exponential backoff parameters.
///
/// A failed operation is attempted once and then retried at most
/// `max_attempts` times. The delay before retry `n` (zero-based) is
/// `base_delay * multiplier^n`, capped at `max_delay` and jittered downward
/// to keep a fleet of instances from retrying in lockstep.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RetryConfig {
    /// Delay before the first retry.
    pub base_delay: Duration,

    /// Growth factor applied per retry.
    pub multiplier: f64,

    /// Number of retries after the initial attempt.
    pub max_attempts: u32,

    /// Upper bound on any single delay.
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_secs(1),
            multiplier: 2.0,
            max_attempts: 3,
            max_delay: Duration::from_secs(30),
        }
    }
}
