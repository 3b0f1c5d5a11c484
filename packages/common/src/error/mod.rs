//! Error handling with context propagation
//!
//! Provides the error model used by every conversion entry point:
//! - Error kinds matching the failure class (configuration, validation, conversion)
//! - Wrapping with stage-specific messages while preserving the original chain
//! - Several independent causes under one error (e.g. "neither RSA nor EC")
//! - Backtrace capture for debugging

pub mod constructors;
pub mod display;
pub mod extensions;
pub mod logging;
pub mod macros;
pub mod types;

pub use extensions::{OptionExt, ResultExt};
pub use logging::LoggingTransformer;
pub use types::{Error, ErrorKind, Result};
