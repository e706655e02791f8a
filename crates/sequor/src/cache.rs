//! In-process counter state.
//!
//! One [`CounterSlot`] per sequence key holds the locally issued value and
//! the last value known to be durably persisted. Slots are handed out as
//! `Arc`s so the hot path increments without holding the map lock; the map
//! lock is only taken to resolve, install, or evict a slot, never across
//! keys' operations.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Lock-free per-key counter state.
///
/// Invariant: `local() >= persisted()` at all times, except transiently
/// around [`CounterSlot::reset`], which sets both equal.
#[derive(Debug)]
pub struct CounterSlot {
    local: AtomicI64,
    persisted: AtomicI64,
}

impl CounterSlot {
    /// A slot bootstrapped from a durable value: local and persisted start
    /// out equal.
    pub fn new(value: i64) -> Self {
        Self {
            local: AtomicI64::new(value),
            persisted: AtomicI64::new(value),
        }
    }

    /// The most recently issued local value.
    pub fn local(&self) -> i64 {
        self.local.load(Ordering::Relaxed)
    }

    /// The last value known to have reached the coordination service.
    pub fn persisted(&self) -> i64 {
        self.persisted.load(Ordering::Relaxed)
    }

    /// Issues the next value. Safe under arbitrary concurrent callers:
    /// every caller observes a distinct value.
    pub fn increment(&self) -> i64 {
        // Relaxed suffices: only the atomicity of the counter word matters.
        self.local.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Records a successful flush. Keeps the maximum, so a slow flush
    /// completing late cannot move the durable watermark backward.
    pub fn note_persisted(&self, value: i64) {
        self.persisted.fetch_max(value, Ordering::AcqRel);
    }

    /// Overwrites both values, possibly moving the sequence backward.
    pub fn reset(&self, value: i64) {
        self.local.store(value, Ordering::SeqCst);
        self.persisted.store(value, Ordering::SeqCst);
    }
}

/// Concurrency-safe mapping from sequence key to its [`CounterSlot`].
#[derive(Debug, Default)]
pub struct CounterCache {
    slots: RwLock<HashMap<String, Arc<CounterSlot>>>,
}

impl CounterCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The slot for a key, if one has been installed.
    pub fn get(&self, key: &str) -> Option<Arc<CounterSlot>> {
        self.slots.read().get(key).cloned()
    }

    /// Installs a freshly bootstrapped slot, unless another task got there
    /// first; the earlier slot wins so that no issued value is forgotten.
    pub fn install(&self, key: &str, value: i64) -> Arc<CounterSlot> {
        let mut slots = self.slots.write();
        Arc::clone(
            slots
                .entry(key.to_owned())
                .or_insert_with(|| Arc::new(CounterSlot::new(value))),
        )
    }

    /// Forces a key to an exact value, creating the slot if needed. The
    /// overwrite happens in place so concurrent holders of the slot observe
    /// it too.
    pub fn reset(&self, key: &str, value: i64) -> Arc<CounterSlot> {
        let mut slots = self.slots.write();
        let slot = slots
            .entry(key.to_owned())
            .or_insert_with(|| Arc::new(CounterSlot::new(value)));
        slot.reset(value);
        Arc::clone(slot)
    }

    /// Evicts a key. The next access re-bootstraps from durable state.
    pub fn remove(&self, key: &str) {
        self.slots.write().remove(key);
    }

    /// Number of keys currently cached in this process.
    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }
}
