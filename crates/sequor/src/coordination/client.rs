//! Typed counter-node access with bounded retry.
//!
//! [`CoordinationClient`] is the only layer that touches [`Session`]
//! primitives directly. It owns node path construction, the decimal payload
//! codec, upsert and bootstrap composition, and the retry loop applied to
//! every primitive call. Transient failures are retried on the configured
//! [`Backoff`] schedule and surface as [`Error::Unavailable`] once the
//! budget is spent; structural results (missing node, duplicate create) are
//! never retried.

use super::retry::Backoff;
use super::session::{Session, SessionError};
use crate::config::CoordinationConfig;
use crate::error::{Error, Result};
use std::collections::BTreeSet;
use std::future::Future;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Retrying, typed access to the per-key counter nodes.
///
/// One client wraps the single shared session of a process. All methods
/// take `&self` and are safe to call from any number of tasks.
pub struct CoordinationClient<S> {
    session: S,
    config: CoordinationConfig,
}

impl<S: Session> CoordinationClient<S> {
    /// Wraps a connected session.
    ///
    /// A trailing `/` on the configured base path is dropped so that key
    /// paths always come out as `{base_path}/{key}`.
    pub fn new(session: S, mut config: CoordinationConfig) -> Self {
        while config.base_path.len() > 1 && config.base_path.ends_with('/') {
            config.base_path.pop();
        }
        Self { session, config }
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &CoordinationConfig {
        &self.config
    }

    /// The namespace node under which counter nodes live.
    pub fn base_path(&self) -> &str {
        &self.config.base_path
    }

    /// The node path for a sequence key.
    pub fn key_path(&self, key: &str) -> String {
        format!("{}/{}", self.config.base_path, key)
    }

    /// Idempotent create-with-parents. Present nodes are left untouched.
    pub async fn ensure_path(&self, path: &str) -> Result<()> {
        let mut prefix = String::with_capacity(path.len());
        for segment in path.split('/').filter(|segment| !segment.is_empty()) {
            prefix.push('/');
            prefix.push_str(segment);
            let present = self
                .with_retry("exists", &prefix, || self.session.exists(&prefix))
                .await
                .map_err(|err| Error::unavailable("exists", &prefix, err))?;
            if present {
                continue;
            }
            match self
                .with_retry("create", &prefix, || self.session.create(&prefix, b""))
                .await
            {
                Ok(()) => debug!(path = %prefix, "created namespace node"),
                // Another instance created it between the check and the create.
                Err(SessionError::AlreadyExists) => {}
                Err(err) => return Err(Error::unavailable("create", &prefix, err)),
            }
        }
        Ok(())
    }

    /// Reads a counter node, or `None` when it does not exist.
    ///
    /// A payload that does not decode as a decimal integer surfaces as
    /// [`Error::Corrupt`]; it is never coerced to a value.
    pub async fn read_value(&self, path: &str) -> Result<Option<i64>> {
        let bytes = match self.with_retry("read", path, || self.session.read(path)).await {
            Ok(bytes) => bytes,
            Err(SessionError::NotFound) => return Ok(None),
            Err(err) => return Err(Error::unavailable("read", path, err)),
        };
        match decode(&bytes) {
            Some(value) => Ok(Some(value)),
            None => Err(Error::Corrupt {
                path: path.to_owned(),
                payload: String::from_utf8_lossy(&bytes).into_owned(),
            }),
        }
    }

    /// Bootstrap read: returns the persisted value, creating the node at
    /// `0` when it does not exist yet.
    ///
    /// When the create loses a race against another instance, the winner's
    /// value is read back and returned instead of `0`.
    pub async fn read_or_init(&self, path: &str) -> Result<i64> {
        if let Some(value) = self.read_value(path).await? {
            return Ok(value);
        }
        match self
            .with_retry("create", path, || self.session.create(path, b"0"))
            .await
        {
            Ok(()) => {
                debug!(path, "initialized counter node at 0");
                Ok(0)
            }
            Err(SessionError::AlreadyExists) => Ok(self.read_value(path).await?.unwrap_or(0)),
            Err(err) => Err(Error::unavailable("create", path, err)),
        }
    }

    /// Unconditional upsert of a counter value.
    ///
    /// No expected-version guard is used: concurrent writers race and the
    /// last write wins.
    pub async fn write_value(&self, path: &str, value: i64) -> Result<()> {
        let payload = value.to_string();
        let data = payload.as_bytes();

        let present = self
            .with_retry("exists", path, || self.session.exists(path))
            .await
            .map_err(|err| Error::unavailable("exists", path, err))?;
        if present {
            match self
                .with_retry("write", path, || self.session.write(path, data))
                .await
            {
                Ok(()) => return Ok(()),
                // Deleted under us; fall through to the create branch.
                Err(SessionError::NotFound) => {}
                Err(err) => return Err(Error::unavailable("write", path, err)),
            }
        }
        match self
            .with_retry("create", path, || self.session.create(path, data))
            .await
        {
            Ok(()) => Ok(()),
            Err(SessionError::AlreadyExists) => self
                .with_retry("write", path, || self.session.write(path, data))
                .await
                .map_err(|err| Error::unavailable("write", path, err)),
            Err(err) => Err(Error::unavailable("create", path, err)),
        }
    }

    /// Deletes a counter node; a missing node is a no-op.
    pub async fn delete_node(&self, path: &str) -> Result<()> {
        match self
            .with_retry("delete", path, || self.session.delete(path))
            .await
        {
            Ok(()) => Ok(()),
            Err(SessionError::NotFound) => Ok(()),
            Err(err) => Err(Error::unavailable("delete", path, err)),
        }
    }

    /// Authoritative listing of the keys under a namespace node.
    ///
    /// Comes from the coordination service, not from any local cache, so it
    /// includes keys this process has never touched. A missing namespace
    /// node reads as an empty set.
    pub async fn list_children(&self, path: &str) -> Result<BTreeSet<String>> {
        match self
            .with_retry("children", path, || self.session.children(path))
            .await
        {
            Ok(children) => Ok(children.into_iter().collect()),
            Err(SessionError::NotFound) => Ok(BTreeSet::new()),
            Err(err) => Err(Error::unavailable("children", path, err)),
        }
    }

    /// Runs one session primitive under the configured retry schedule.
    ///
    /// Only transient errors consume the backoff budget; structural errors
    /// return immediately so callers can branch on them.
    async fn with_retry<T, F, Fut>(
        &self,
        op: &'static str,
        path: &str,
        mut call: F,
    ) -> core::result::Result<T, SessionError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = core::result::Result<T, SessionError>>,
    {
        let mut backoff = Backoff::new(self.config.retry.clone());
        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() => match backoff.next_delay() {
                    Some(delay) => {
                        warn!(
                            op,
                            path,
                            retry = backoff.attempts(),
                            delay_ms = delay.as_millis() as u64,
                            error = %err,
                            "transient coordination failure, backing off"
                        );
                        sleep(delay).await;
                    }
                    None => return Err(err),
                },
                Err(err) => return Err(err),
            }
        }
    }
}

fn decode(bytes: &[u8]) -> Option<i64> {
    core::str::from_utf8(bytes)
        .ok()
        .and_then(|text| text.trim().parse().ok())
}
