//! Extension traits for attaching context to results and options

use super::types::{Error, ErrorKind, Result};
use std::fmt;

/// Context helpers for `Result<T, Error>`
pub trait ResultExt<T> {
    /// Wrap the error, if any, with a stage message
    ///
    /// # Errors
    /// Returns the wrapped error when `self` is `Err`.
    fn context<C: fmt::Display>(self, context: C) -> Result<T>;

    /// Like [`ResultExt::context`] but builds the message lazily
    ///
    /// # Errors
    /// Returns the wrapped error when `self` is `Err`.
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C;
}

impl<T> ResultExt<T> for Result<T> {
    fn context<C: fmt::Display>(self, context: C) -> Result<T> {
        self.map_err(|e| e.context(context))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C,
    {
        self.map_err(|e| e.context(f()))
    }
}

/// Turn a missing value into a structured error
pub trait OptionExt<T> {
    /// Convert `None` into an error of `kind` carrying `context`
    ///
    /// # Errors
    /// Returns the error when `self` is `None`.
    fn ok_or_error<C: fmt::Display>(self, kind: ErrorKind, context: C) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_error<C: fmt::Display>(self, kind: ErrorKind, context: C) -> Result<T> {
        self.ok_or_else(|| Error::new(kind).context(context))
    }
}
