//! Display and trait implementations for Error

use super::types::Error;
use std::fmt;

impl Error {
    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(f, "{}", self.stage_message())?;
        for cause in &self.inner.causes {
            write!(f, "\n{:width$}Caused by: ", "", width = depth * 2)?;
            cause.fmt_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        if let Some(cause) = self.inner.causes.first() {
            return Some(cause as &(dyn std::error::Error + 'static));
        }
        self.inner
            .source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}
