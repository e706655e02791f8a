//! ZooKeeper binding for the [`Session`] contract.
//!
//! [`ZkSession`] wraps one `zookeeper-client` session and maps its error
//! codes into the backend-neutral [`SessionError`] taxonomy: `NoNode` and
//! `NodeExists` are structural results the client layer branches on, and
//! everything else reads as a transient outage that the client layer
//! retries. Retry of individual operations stays above this crate; only
//! session establishment retries here, because a process without a session
//! must not come up at all.

use async_trait::async_trait;
use sequor::{Backoff, CoordinationConfig, SequenceGenerator, Session, SessionError};
use tokio::time::sleep;
use tracing::{error, info, warn};
use zookeeper_client as zk;

/// A connected ZooKeeper session.
///
/// One instance serves all sequence keys of a process. Dropping it closes
/// the session.
pub struct ZkSession {
    client: zk::Client,
}

impl ZkSession {
    /// Establishes a session, retrying on the configured backoff schedule.
    ///
    /// Gives up once the retry budget is spent; the caller is expected to
    /// treat that as fatal and refuse to start serving.
    pub async fn connect(config: &CoordinationConfig) -> Result<Self, SessionError> {
        let mut backoff = Backoff::new(config.retry.clone());
        loop {
            match Self::try_connect(config).await {
                Ok(client) => {
                    info!(endpoint = %config.endpoint, "coordination session established");
                    return Ok(Self { client });
                }
                Err(err) => match backoff.next_delay() {
                    Some(delay) => {
                        warn!(
                            endpoint = %config.endpoint,
                            retry = backoff.attempts(),
                            delay_ms = delay.as_millis() as u64,
                            error = %err,
                            "coordination session not established yet, backing off"
                        );
                        sleep(delay).await;
                    }
                    None => {
                        error!(endpoint = %config.endpoint, error = %err, "giving up on coordination session");
                        return Err(SessionError::unavailable(format!(
                            "could not establish session to {}: {err}",
                            config.endpoint
                        )));
                    }
                },
            }
        }
    }

    async fn try_connect(config: &CoordinationConfig) -> Result<zk::Client, zk::Error> {
        zk::Client::connector()
            .session_timeout(config.session_timeout)
            .connection_timeout(config.connection_timeout)
            .connect(&config.endpoint)
            .await
    }
}

fn map_err(err: zk::Error) -> SessionError {
    match err {
        zk::Error::NoNode => SessionError::NotFound,
        zk::Error::NodeExists => SessionError::AlreadyExists,
        other => SessionError::unavailable(other.to_string()),
    }
}

#[async_trait]
impl Session for ZkSession {
    async fn create(&self, path: &str, data: &[u8]) -> Result<(), SessionError> {
        self.client
            .create(
                path,
                data,
                &zk::CreateMode::Persistent.with_acls(zk::Acls::anyone_all()),
            )
            .await
            .map(|_| ())
            .map_err(map_err)
    }

    async fn read(&self, path: &str) -> Result<Vec<u8>, SessionError> {
        self.client
            .get_data(path)
            .await
            .map(|(data, _stat)| data)
            .map_err(map_err)
    }

    async fn write(&self, path: &str, data: &[u8]) -> Result<(), SessionError> {
        self.client
            .set_data(path, data, None)
            .await
            .map(|_| ())
            .map_err(map_err)
    }

    async fn delete(&self, path: &str) -> Result<(), SessionError> {
        self.client.delete(path, None).await.map_err(map_err)
    }

    async fn children(&self, path: &str) -> Result<Vec<String>, SessionError> {
        self.client.list_children(path).await.map_err(map_err)
    }

    async fn exists(&self, path: &str) -> Result<bool, SessionError> {
        self.client
            .check_stat(path)
            .await
            .map(|stat| stat.is_some())
            .map_err(map_err)
    }
}

/// Connects to ZooKeeper and brings a [`SequenceGenerator`] up over the
/// session in one step.
///
/// # Errors
/// [`sequor::Error::Unavailable`] when no session can be established or
/// the base path cannot be prepared. Both are startup-fatal conditions.
pub async fn start(
    config: CoordinationConfig,
) -> Result<SequenceGenerator<ZkSession>, sequor::Error> {
    let session = ZkSession::connect(&config)
        .await
        .map_err(|err| sequor::Error::Unavailable {
            op: "connect",
            path: config.endpoint.clone(),
            source: err,
        })?;
    SequenceGenerator::start(session, config).await
}
