//! Common infrastructure shared by the keyport crates
//!
//! This crate provides:
//! - Structured errors with ordered cause chains
//! - Backtrace capture (feature `full-backtrace`)
//! - `env_logger` based logging that never prints key material

pub mod error;

pub use error::*;
