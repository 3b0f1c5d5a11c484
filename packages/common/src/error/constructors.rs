//! Error constructors and methods

use super::types::{Error, ErrorInner, ErrorKind};
use std::fmt;
use std::sync::Arc;

impl Error {
    fn build(
        kind: ErrorKind,
        context: Option<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        causes: Vec<Error>,
    ) -> Self {
        Self {
            inner: Arc::new(ErrorInner {
                kind,
                context,
                source,
                causes,
                #[cfg(feature = "full-backtrace")]
                backtrace: backtrace::Backtrace::new_unresolved(),
            }),
        }
    }

    /// Create a new error with the given kind
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self::build(kind, None, None, Vec::new())
    }

    /// Create an error with a source error
    #[must_use]
    pub fn with_source<E>(kind: ErrorKind, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::build(kind, None, Some(Box::new(source)), Vec::new())
    }

    /// Combine several independent failures under one message
    ///
    /// The causes keep their order; `errors()` lists them before the
    /// combining error itself.
    #[must_use]
    pub fn wrap<C: fmt::Display>(kind: ErrorKind, context: C, causes: Vec<Error>) -> Self {
        Self::build(kind, Some(context.to_string()), None, causes)
    }

    /// Add context to this error
    ///
    /// A bare error (no message, no source, no causes) simply receives the
    /// message. Anything else is wrapped as the single cause of a new outer
    /// error of the same kind, so the full chain is preserved.
    #[must_use]
    pub fn context<C: fmt::Display>(self, context: C) -> Self {
        let inner = &self.inner;
        if inner.context.is_none() && inner.source.is_none() && inner.causes.is_empty() {
            return Self::build(inner.kind.clone(), Some(context.to_string()), None, Vec::new());
        }
        let kind = inner.kind.clone();
        Self::build(kind, Some(context.to_string()), None, vec![self])
    }

    /// Get the error kind
    #[must_use]
    pub fn kind(&self) -> &ErrorKind {
        &self.inner.kind
    }

    /// Get the error context if any
    #[must_use]
    pub fn get_context(&self) -> Option<&str> {
        self.inner.context.as_deref()
    }

    /// Errors directly wrapped by this one
    #[must_use]
    pub fn causes(&self) -> &[Error] {
        &self.inner.causes
    }

    /// Primitive error attached to this stage, if any
    #[must_use]
    pub fn primitive(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.inner.source.as_deref()
    }

    /// Flatten the chain into an ordered list, most specific first
    ///
    /// Causes are visited depth-first in order, each followed by the error
    /// that wrapped it, so the last element is always `self`.
    #[must_use]
    pub fn errors(&self) -> Vec<&Error> {
        let mut out = Vec::new();
        self.collect_into(&mut out);
        out
    }

    fn collect_into<'a>(&'a self, out: &mut Vec<&'a Error>) {
        for cause in &self.inner.causes {
            cause.collect_into(out);
        }
        out.push(self);
    }

    /// Messages of every stage of the chain, most specific first
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.errors().into_iter().map(Error::stage_message).collect()
    }

    /// Whether any stage of the chain has the given kind
    #[must_use]
    pub fn has_kind(&self, kind: &ErrorKind) -> bool {
        self.errors().iter().any(|e| e.kind() == kind)
    }

    /// Render this stage only, without its causes
    #[must_use]
    pub fn stage_message(&self) -> String {
        let mut msg = match &self.inner.context {
            Some(context) => context.clone(),
            None => self.inner.kind.to_string(),
        };
        if let Some(source) = &self.inner.source {
            msg.push_str(&format!(": {source}"));
        }
        msg
    }

    /// Get the backtrace
    #[cfg(feature = "full-backtrace")]
    #[must_use]
    pub fn backtrace(&self) -> &backtrace::Backtrace {
        &self.inner.backtrace
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration() -> Self {
        Self::new(ErrorKind::Configuration)
    }

    /// Create a validation error
    #[must_use]
    pub fn validation() -> Self {
        Self::new(ErrorKind::Validation)
    }

    /// Create a conversion error
    #[must_use]
    pub fn conversion() -> Self {
        Self::new(ErrorKind::Conversion)
    }

    /// Create a crypto error
    #[must_use]
    pub fn crypto() -> Self {
        Self::new(ErrorKind::Crypto)
    }

    /// Create an internal error
    #[must_use]
    pub fn internal() -> Self {
        Self::new(ErrorKind::Internal)
    }

    /// Create a custom error with message
    #[must_use]
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Self::new(ErrorKind::Other(msg.into()))
    }
}
