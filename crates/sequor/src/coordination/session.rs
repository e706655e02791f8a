use async_trait::async_trait;

/// Failure modes of a raw session operation.
///
/// Backends map their native error codes into these three cases;
/// everything above the session boundary reasons only in these terms.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The addressed node (or its parent, for `create`) does not exist.
    #[error("node not found")]
    NotFound,

    /// A node already exists at the addressed path.
    #[error("node already exists")]
    AlreadyExists,

    /// The session is lost, the request timed out, or the service is
    /// otherwise unreachable. The only retryable case.
    #[error("session unavailable: {context}")]
    Unavailable { context: String },
}

impl SessionError {
    /// Builds an [`SessionError::Unavailable`] with the given context.
    pub fn unavailable(context: impl Into<String>) -> Self {
        Self::Unavailable {
            context: context.into(),
        }
    }

    /// Whether retrying the failed operation can possibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

/// A connected session to a coordination service.
///
/// The contract mirrors a hierarchical node store with strongly consistent
/// reads and writes: nodes form a tree of `/`-separated paths, a node can
/// only be created under an existing parent, and node payloads are opaque
/// bytes. One session instance is shared by all sequence keys of a process
/// and must therefore be usable from any number of tasks concurrently.
///
/// Implementations do not retry; retry and backoff are layered on by
/// [`CoordinationClient`]. There is deliberately no conditional-write
/// primitive here: `write` is an unconditional overwrite, and whether an
/// expected-version guard should be added is an open question tracked in
/// DESIGN.md.
///
/// [`CoordinationClient`]: crate::CoordinationClient
#[async_trait]
pub trait Session: Send + Sync + 'static {
    /// Creates a node with the given payload.
    ///
    /// # Errors
    /// - [`SessionError::AlreadyExists`] when the node is present.
    /// - [`SessionError::NotFound`] when the parent node is missing.
    async fn create(&self, path: &str, data: &[u8]) -> Result<(), SessionError>;

    /// Returns the payload of a node.
    ///
    /// # Errors
    /// - [`SessionError::NotFound`] when the node is missing.
    async fn read(&self, path: &str) -> Result<Vec<u8>, SessionError>;

    /// Overwrites the payload of an existing node.
    ///
    /// # Errors
    /// - [`SessionError::NotFound`] when the node is missing.
    async fn write(&self, path: &str, data: &[u8]) -> Result<(), SessionError>;

    /// Deletes a node.
    ///
    /// # Errors
    /// - [`SessionError::NotFound`] when the node is missing.
    async fn delete(&self, path: &str) -> Result<(), SessionError>;

    /// Lists the names (not full paths) of the direct children of a node.
    ///
    /// # Errors
    /// - [`SessionError::NotFound`] when the node is missing.
    async fn children(&self, path: &str) -> Result<Vec<String>, SessionError>;

    /// Whether a node exists.
    async fn exists(&self, path: &str) -> Result<bool, SessionError>;
}
