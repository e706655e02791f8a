#![doc = include_str!("../README.md")]

mod cache;
mod config;
mod coordination;
mod error;
mod generator;
mod policy;
#[cfg(test)]
mod test_support;

pub use crate::cache::*;
pub use crate::config::*;
pub use crate::coordination::*;
pub use crate::error::*;
pub use crate::generator::*;
pub use crate::policy::*;
