//! Core error types and definitions

use std::sync::Arc;
use thiserror::Error;

/// Structured error with an ordered chain of causes
///
/// An `Error` is one stage of a failure: its kind, an optional message
/// describing what that stage was trying to do, an optional primitive
/// source (e.g. the `rsa` crate rejecting a modulus) and the errors it wraps.
/// Cloning is cheap; the chain is shared.
#[derive(Debug, Clone)]
pub struct Error {
    /// The actual error
    pub(super) inner: Arc<ErrorInner>,
}

#[derive(Debug)]
pub(super) struct ErrorInner {
    /// The error kind
    pub kind: ErrorKind,
    /// Human readable description of the failing stage
    pub context: Option<String>,
    /// Error raised by an underlying primitive
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
    /// Wrapped errors, in the order they were produced
    pub causes: Vec<Error>,
    /// Backtrace captured at error creation
    #[cfg(feature = "full-backtrace")]
    pub backtrace: backtrace::Backtrace,
}

/// Different kinds of errors that can occur
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// Unsupported cipher, unsupported format or missing key input
    #[error("Configuration error")]
    Configuration,

    /// Missing or mistyped field, malformed SSH line, unsupported curve
    #[error("Validation error")]
    Validation,

    /// The platform primitive rejected the input as a key of the claimed kind
    #[error("Conversion error")]
    Conversion,

    /// Key generation or encryption failed
    #[error("Cryptographic error")]
    Crypto,

    /// Internal error
    #[error("Internal error")]
    Internal,

    /// Other error with custom message
    #[error("{0}")]
    Other(String),
}

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;
