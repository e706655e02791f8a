//! Error types for the sequence service.
//!
//! This module defines the central `Error` enum, which captures every
//! reportable failure of the public sequence operations. Session-level
//! failures are mapped into this taxonomy at the [`CoordinationClient`]
//! boundary so that callers never see backend-specific error codes.
//!
//! ## Error Cases
//! - `InvalidKey`: the caller passed an unusable sequence key. Rejected
//!   before any coordination call is made.
//! - `Unavailable`: the coordination service could not be reached, the
//!   session was lost, or the bounded retry budget was exhausted.
//! - `Corrupt`: a counter node exists but its payload does not decode as an
//!   integer. Never silently treated as zero.
//!
//! [`CoordinationClient`]: crate::CoordinationClient

use crate::coordination::SessionError;

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for sequence operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The sequence key was empty, blank, or contained a path separator.
    #[error("invalid sequence key: {reason}")]
    InvalidKey { reason: String },

    /// The coordination service did not answer within the retry budget.
    ///
    /// `op` names the failed primitive (`"read"`, `"create"`, ...) and
    /// `path` the node it targeted.
    #[error("coordination service unavailable ({op} {path})")]
    Unavailable {
        op: &'static str,
        path: String,
        #[source]
        source: SessionError,
    },

    /// A counter node holds a payload that is not a decimal integer.
    #[error("corrupt counter node at {path}: {payload:?}")]
    Corrupt { path: String, payload: String },
}

impl Error {
    pub(crate) fn invalid_key(reason: impl Into<String>) -> Self {
        Self::InvalidKey {
            reason: reason.into(),
        }
    }

    pub(crate) fn unavailable(op: &'static str, path: &str, source: SessionError) -> Self {
        Self::Unavailable {
            op,
            path: path.to_owned(),
            source,
        }
    }
}
