#![doc = include_str!("../README.md")]

mod session;

pub use crate::session::*;
// Public re-export so downstream crates can access `sequor` via
// `sequor_zk::sequor`
pub use sequor;
