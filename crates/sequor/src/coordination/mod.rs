//! Durable counter storage on a coordination service.
//!
//! This module owns everything that talks to the coordination service:
//!
//! - [`Session`] - the minimal async contract a backend has to satisfy.
//! - [`MemorySession`] - an in-process backend with the same node semantics,
//!   used by tests and embedded deployments.
//! - [`CoordinationClient`] - path handling, the decimal payload codec, and
//!   bounded retry with exponential backoff on top of a session.
//! - [`Backoff`] - the retry schedule shared with backend connect loops.

mod client;
mod memory;
mod retry;
mod session;

pub use client::*;
pub use memory::*;
pub use retry::*;
pub use session::*;
