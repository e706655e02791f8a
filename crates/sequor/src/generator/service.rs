//! Per-key sequence orchestration.
//!
//! [`SequenceGenerator`] implements the public contract: issue the next
//! value, read the current one, reset, delete, list, and report health.
//! It resolves each key to a cached [`CounterSlot`], bootstrapping cold
//! keys from the coordination service, and defers durability to the
//! configured [`SyncPolicy`].
//!
//! ## Durability stance
//!
//! The issue path never fails because of a flush: when the policy triggers
//! a flush and that flush cannot reach the coordination service, the error
//! is logged, counted on [`SequenceGenerator::flush_failures`], and
//! swallowed, and the freshly issued value is returned anyway. Bootstrap,
//! reset, and delete are correctness-critical and surface their failures.
//!
//! ## Known cross-instance limitation
//!
//! Instances coordinate only through the durable nodes. Two instances that
//! bootstrap the same key before either has flushed will issue overlapping
//! value ranges; the same window exists after a crash that loses unflushed
//! values. Deployments that need globally distinct values must flush
//! eagerly or partition keys per instance.

use crate::cache::{CounterCache, CounterSlot};
use crate::config::CoordinationConfig;
use crate::coordination::{CoordinationClient, Session};
use crate::error::{Error, Result};
use crate::generator::Health;
use crate::policy::{IntervalSyncPolicy, SyncPolicy};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

/// Distributed per-key sequence generator.
///
/// One instance per process, built over the process's single coordination
/// session. All methods take `&self`; wrap the generator in an [`Arc`] to
/// share it across tasks.
pub struct SequenceGenerator<S> {
    client: CoordinationClient<S>,
    cache: CounterCache,
    policy: Box<dyn SyncPolicy>,
    flush_failures: AtomicU64,
}

impl<S: Session> SequenceGenerator<S> {
    /// Brings the generator up over a connected session.
    ///
    /// Creates the configured base path when it does not exist yet. Failure
    /// here is fatal by design: a process that cannot reach the
    /// coordination service must not begin issuing values.
    pub async fn start(session: S, config: CoordinationConfig) -> Result<Self> {
        let client = CoordinationClient::new(session, config);
        client.ensure_path(client.base_path()).await?;
        info!(
            base_path = client.base_path(),
            "sequence generator initialized"
        );
        Ok(Self {
            client,
            cache: CounterCache::new(),
            policy: Box::new(IntervalSyncPolicy::default()),
            flush_failures: AtomicU64::new(0),
        })
    }

    /// Replaces the default flush policy.
    pub fn with_policy(mut self, policy: impl SyncPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    /// The configuration the generator runs with.
    pub fn config(&self) -> &CoordinationConfig {
        self.client.config()
    }

    /// Issues the next value for a key.
    ///
    /// The first call for a key bootstraps it from the coordination service
    /// (creating the counter node at 0 when absent). Subsequent calls are
    /// a single atomic increment; within one process, concurrent callers
    /// always receive distinct consecutive values.
    ///
    /// # Errors
    /// - [`Error::InvalidKey`] for an unusable key.
    /// - [`Error::Unavailable`] / [`Error::Corrupt`] when bootstrap cannot
    ///   establish counter integrity. Flush failures after the increment do
    ///   not error; see the module docs.
    pub async fn generate_next(&self, key: &str) -> Result<i64> {
        validate_key(key)?;
        let slot = self.resolve_slot(key).await?;
        let next = slot.increment();

        if self.policy.should_flush(next, slot.persisted()) {
            self.flush(key, &slot, next).await;
        }

        debug!(key, value = next, "issued sequence value");
        Ok(next)
    }

    /// The current value of a key, without issuing one.
    ///
    /// Served from the local cache when this process has the key cached;
    /// otherwise performs a read-only bootstrap against the coordination
    /// service. A never-seen key reads as 0 and leaves its counter node
    /// behind, initialized to `"0"`, exactly like the issue path's
    /// bootstrap. No cache entry is installed.
    pub async fn current_value(&self, key: &str) -> Result<i64> {
        validate_key(key)?;
        if let Some(slot) = self.cache.get(key) {
            return Ok(slot.local());
        }
        self.client.read_or_init(&self.client.key_path(key)).await
    }

    /// Forces a key to an exact value, in durable storage and in the local
    /// cache. The sequence may move backward.
    ///
    /// The durable write happens first and its failure surfaces; the cache
    /// is only touched once the value is safe.
    pub async fn reset(&self, key: &str, value: i64) -> Result<()> {
        validate_key(key)?;
        self.client
            .write_value(&self.client.key_path(key), value)
            .await?;
        self.cache.reset(key, value);
        info!(key, value, "sequence reset");
        Ok(())
    }

    /// Removes a key: durable node first (failure surfaces), then the
    /// cache entry. The next access re-bootstraps from 0.
    pub async fn delete(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        self.client.delete_node(&self.client.key_path(key)).await?;
        self.cache.remove(key);
        info!(key, "sequence deleted");
        Ok(())
    }

    /// All keys currently known to the coordination service, across every
    /// instance, not just those this process has cached.
    pub async fn list_keys(&self) -> Result<BTreeSet<String>> {
        self.client.list_children(self.client.base_path()).await
    }

    /// Every known key with its current value.
    ///
    /// A key whose value cannot be read at this moment maps to `None`
    /// instead of failing the whole listing.
    pub async fn snapshot(&self) -> Result<BTreeMap<String, Option<i64>>> {
        let mut values = BTreeMap::new();
        for key in self.list_keys().await? {
            let value = match self.current_value(&key).await {
                Ok(value) => Some(value),
                Err(err) => {
                    warn!(key = %key, error = %err, "skipping unreadable sequence in snapshot");
                    None
                }
            };
            values.insert(key, value);
        }
        Ok(values)
    }

    /// Probes the coordination service by listing keys.
    pub async fn health(&self) -> Health {
        match self.list_keys().await {
            Ok(keys) => Health {
                connected: true,
                total_keys: keys.len(),
            },
            Err(err) => {
                debug!(error = %err, "health probe failed");
                Health {
                    connected: false,
                    total_keys: 0,
                }
            }
        }
    }

    /// `true` when the coordination service is reachable. Never errors.
    pub async fn health_check(&self) -> bool {
        self.health().await.connected
    }

    /// Number of flush attempts that failed and were swallowed since
    /// startup. A growing count means issued values are running ahead of
    /// durable state.
    pub fn flush_failures(&self) -> u64 {
        self.flush_failures.load(Ordering::Relaxed)
    }

    /// Tears the generator down, releasing the coordination session.
    ///
    /// Dropping the generator has the same effect; this form exists so
    /// shutdown paths can make the teardown explicit and ordered.
    pub fn shutdown(self) {
        info!("sequence generator shut down, coordination session released");
    }

    /// The cached slot for a key, bootstrapped from durable state on first
    /// access. When several tasks bootstrap the same key at once, the
    /// first installed slot wins and all tasks share it.
    async fn resolve_slot(&self, key: &str) -> Result<Arc<CounterSlot>> {
        if let Some(slot) = self.cache.get(key) {
            return Ok(slot);
        }
        let value = self.client.read_or_init(&self.client.key_path(key)).await?;
        Ok(self.cache.install(key, value))
    }

    /// Best-effort flush of a freshly issued value. Failures are recorded
    /// and swallowed; the caller's value is already committed locally.
    async fn flush(&self, key: &str, slot: &CounterSlot, value: i64) {
        match self
            .client
            .write_value(&self.client.key_path(key), value)
            .await
        {
            Ok(()) => {
                slot.note_persisted(value);
                debug!(key, value, "flushed sequence value");
            }
            Err(err) => {
                self.flush_failures.fetch_add(1, Ordering::Relaxed);
                warn!(
                    key,
                    value,
                    error = %err,
                    "flush failed, continuing on the in-process counter"
                );
            }
        }
    }
}

/// Rejects keys that cannot name a counter node.
///
/// Keys are case-sensitive and never normalized; a key containing `/`
/// would silently address a nested node and is rejected outright.
fn validate_key(key: &str) -> Result<()> {
    if key.trim().is_empty() {
        return Err(Error::invalid_key("key must not be empty or blank"));
    }
    if key.contains('/') {
        return Err(Error::invalid_key("key must not contain '/'"));
    }
    Ok(())
}
