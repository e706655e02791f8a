//! Shared fixtures for the crate's tests: a retry schedule with
//! millisecond delays and a fault-injecting [`Session`] wrapper.

use crate::config::{CoordinationConfig, RetryConfig};
use crate::coordination::{MemorySession, Session, SessionError};
use async_trait::async_trait;
use core::time::Duration;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// The default config with the retry schedule shrunk to milliseconds.
pub(crate) fn test_config() -> CoordinationConfig {
    CoordinationConfig {
        retry: RetryConfig {
            base_delay: Duration::from_millis(1),
            multiplier: 2.0,
            max_attempts: 2,
            max_delay: Duration::from_millis(4),
        },
        ..CoordinationConfig::default()
    }
}

#[derive(Default)]
struct Faults {
    fail_next: AtomicU32,
    fail_writes: AtomicBool,
    fail_deletes: AtomicBool,
    fail_children: AtomicBool,
    create_calls: AtomicU32,
    read_calls: AtomicU32,
    write_calls: AtomicU32,
}

/// A [`MemorySession`] wrapper that injects transient failures and counts
/// primitive calls. Clones share both the tree and the fault state, so a
/// test can keep one handle while the code under test owns another.
#[derive(Clone)]
pub(crate) struct FaultSession {
    inner: MemorySession,
    faults: Arc<Faults>,
}

impl FaultSession {
    pub(crate) fn new(inner: MemorySession) -> Self {
        Self {
            inner,
            faults: Arc::new(Faults::default()),
        }
    }

    /// Fails the next `n` primitive calls (of any kind) transiently.
    pub(crate) fn fail_next(&self, n: u32) {
        self.faults.fail_next.store(n, Ordering::SeqCst);
    }

    pub(crate) fn set_fail_writes(&self, fail: bool) {
        self.faults.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn set_fail_deletes(&self, fail: bool) {
        self.faults.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn set_fail_children(&self, fail: bool) {
        self.faults.fail_children.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn create_calls(&self) -> u32 {
        self.faults.create_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn read_calls(&self) -> u32 {
        self.faults.read_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn write_calls(&self) -> u32 {
        self.faults.write_calls.load(Ordering::SeqCst)
    }

    fn gate(&self) -> Result<(), SessionError> {
        let burned = self
            .faults
            .fail_next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if burned {
            Err(SessionError::unavailable("injected transient failure"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Session for FaultSession {
    async fn create(&self, path: &str, data: &[u8]) -> Result<(), SessionError> {
        self.faults.create_calls.fetch_add(1, Ordering::SeqCst);
        self.gate()?;
        self.inner.create(path, data).await
    }

    async fn read(&self, path: &str) -> Result<Vec<u8>, SessionError> {
        self.faults.read_calls.fetch_add(1, Ordering::SeqCst);
        self.gate()?;
        self.inner.read(path).await
    }

    async fn write(&self, path: &str, data: &[u8]) -> Result<(), SessionError> {
        self.faults.write_calls.fetch_add(1, Ordering::SeqCst);
        self.gate()?;
        if self.faults.fail_writes.load(Ordering::SeqCst) {
            return Err(SessionError::unavailable("injected write failure"));
        }
        self.inner.write(path, data).await
    }

    async fn delete(&self, path: &str) -> Result<(), SessionError> {
        self.gate()?;
        if self.faults.fail_deletes.load(Ordering::SeqCst) {
            return Err(SessionError::unavailable("injected delete failure"));
        }
        self.inner.delete(path).await
    }

    async fn children(&self, path: &str) -> Result<Vec<String>, SessionError> {
        self.gate()?;
        if self.faults.fail_children.load(Ordering::SeqCst) {
            return Err(SessionError::unavailable("injected listing failure"));
        }
        self.inner.children(path).await
    }

    async fn exists(&self, path: &str) -> Result<bool, SessionError> {
        self.gate()?;
        self.inner.exists(path).await
    }
}
