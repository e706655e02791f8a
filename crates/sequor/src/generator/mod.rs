//! The sequence orchestrator.
//!
//! Composes the counter cache, the flush policy, and the coordination
//! client into the public per-key sequence contract, plus the admin and
//! health surface layered on top of it.
//!
//! ## Structure
//!
//! - `service` - [`SequenceGenerator`], the orchestrator itself.
//! - `health` - the [`Health`] report returned by the health surface.

mod health;
mod service;

pub use health::*;
pub use service::*;
