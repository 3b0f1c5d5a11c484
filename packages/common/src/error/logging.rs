//! Logging for conversion and generation
//!
//! Output goes through the `log` facade to `env_logger`. Key text is never
//! written; call sites log a [`LoggingTransformer::key_fingerprint`] instead.

use log::{debug, error, info, warn};
use sha2::{Digest, Sha256};
use std::sync::Once;
use std::time::Duration;

static INIT_LOGGER: Once = Once::new();

/// Logging entry points used across the keyport crates
pub struct LoggingTransformer;

impl LoggingTransformer {
    /// Install the process-wide logger; later calls are no-ops
    ///
    /// Levels come from `RUST_LOG`:
    /// - `RUST_LOG=debug` - Every conversion hop
    /// - `RUST_LOG=info` - Generation events
    /// - `RUST_LOG=keyport=debug` - Module-specific levels
    pub fn init() {
        INIT_LOGGER.call_once(|| {
            env_logger::Builder::from_default_env()
                .format_timestamp_micros()
                .init();

            info!("Structured logging initialized");
        });
    }

    /// Install a test-captured logger, tolerating an existing one
    pub fn init_test() {
        let _ = env_logger::Builder::from_default_env()
            .is_test(true)
            .try_init();
    }

    /// Record a failed primitive operation
    ///
    /// Logs the error type only; primitive error messages may echo input.
    pub fn log_crypto_error(operation: &str, error: &dyn std::error::Error) {
        error!(
            "Cryptographic operation failed: {} (error_type: {})",
            operation,
            std::any::type_name_of_val(error)
        );
    }

    /// Log a conversion between two key formats
    pub fn log_conversion(from: &str, to: &str, success: bool) {
        if success {
            debug!("Key conversion {from} -> {to} succeeded");
        } else {
            warn!("Key conversion {from} -> {to} failed");
        }
    }

    /// Record how long an operation took
    pub fn log_performance_metric(operation: &str, duration: Duration, success: bool) {
        let duration_ms = duration.as_millis();
        if success {
            info!("Performance: {operation} completed in {duration_ms}ms");
        } else {
            warn!("Performance: {operation} failed after {duration_ms}ms");
        }
    }

    /// Short, non-reversible identifier for key material
    ///
    /// SHA-256 of the input, first 12 hex characters, prefixed with `#`.
    #[must_use]
    pub fn key_fingerprint(material: &str) -> String {
        let hash = Sha256::digest(material.as_bytes());
        let hex_hash = format!("{hash:x}");
        format!("#{}", &hex_hash[..12])
    }
}
