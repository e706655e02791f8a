//! In-process session backend.
//!
//! [`MemorySession`] keeps the node tree in a shared map and enforces the
//! same structural rules a real coordination service would: a node can only
//! be created under an existing parent, creates fail on duplicates, and
//! reads, writes, and deletes fail on missing nodes. Clones share the same
//! tree, which lets several generator instances (or a test and the
//! generator under test) observe one store the way separate processes would
//! share one coordination service.
//!
//! Differences from a networked backend: there are no sessions to lose and
//! no timeouts, so no operation ever fails transiently, and deleting a node
//! that still has children is not rejected.

use super::session::{Session, SessionError};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// A concurrency-safe, in-process node store implementing [`Session`].
#[derive(Clone, Default)]
pub struct MemorySession {
    nodes: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemorySession {
    /// Creates an empty store. The root node `/` always exists.
    pub fn new() -> Self {
        Self::default()
    }

    fn validate(path: &str) -> Result<(), SessionError> {
        if path.len() < 2 || !path.starts_with('/') || path.ends_with('/') {
            return Err(SessionError::unavailable(format!(
                "malformed node path {path:?}"
            )));
        }
        Ok(())
    }

    fn parent_exists(nodes: &HashMap<String, Vec<u8>>, path: &str) -> bool {
        match path.rsplit_once('/') {
            // "/a" has the implicit root as parent.
            Some(("", _)) => true,
            Some((parent, _)) => nodes.contains_key(parent),
            None => false,
        }
    }
}

#[async_trait]
impl Session for MemorySession {
    async fn create(&self, path: &str, data: &[u8]) -> Result<(), SessionError> {
        Self::validate(path)?;
        let mut nodes = self.nodes.write();
        if nodes.contains_key(path) {
            return Err(SessionError::AlreadyExists);
        }
        if !Self::parent_exists(&nodes, path) {
            return Err(SessionError::NotFound);
        }
        nodes.insert(path.to_owned(), data.to_vec());
        Ok(())
    }

    async fn read(&self, path: &str) -> Result<Vec<u8>, SessionError> {
        Self::validate(path)?;
        self.nodes
            .read()
            .get(path)
            .cloned()
            .ok_or(SessionError::NotFound)
    }

    async fn write(&self, path: &str, data: &[u8]) -> Result<(), SessionError> {
        Self::validate(path)?;
        let mut nodes = self.nodes.write();
        match nodes.get_mut(path) {
            Some(payload) => {
                *payload = data.to_vec();
                Ok(())
            }
            None => Err(SessionError::NotFound),
        }
    }

    async fn delete(&self, path: &str) -> Result<(), SessionError> {
        Self::validate(path)?;
        self.nodes
            .write()
            .remove(path)
            .map(|_| ())
            .ok_or(SessionError::NotFound)
    }

    async fn children(&self, path: &str) -> Result<Vec<String>, SessionError> {
        Self::validate(path)?;
        let nodes = self.nodes.read();
        if !nodes.contains_key(path) {
            return Err(SessionError::NotFound);
        }
        let prefix = format!("{path}/");
        let children = nodes
            .keys()
            .filter_map(|key| key.strip_prefix(prefix.as_str()))
            .filter(|rest| !rest.contains('/'))
            .map(str::to_owned)
            .collect();
        Ok(children)
    }

    async fn exists(&self, path: &str) -> Result<bool, SessionError> {
        Self::validate(path)?;
        Ok(self.nodes.read().contains_key(path))
    }
}
