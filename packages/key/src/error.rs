//! Error handling for the conversion engine
//!
//! Conversion entry points return [`Result`] from `keyport_common`, whose
//! [`Error`] keeps the ordered chain of failing stages. Failures reported by
//! the platform primitives are captured in [`KeyError`] and attached as the
//! source of the innermost stage.

use thiserror::Error;

pub use keyport_common::error::{Error, ErrorKind, OptionExt, Result, ResultExt};

/// Failures raised by the underlying crypto and encoding primitives
#[derive(Debug, Error)]
pub enum KeyError {
    /// RSA key building or generation failed
    #[error("RSA key error: {0}")]
    Rsa(#[from] rsa::Error),

    /// PKCS#1 encoding or decoding failed
    #[error("PKCS#1 error: {0}")]
    Pkcs1(#[from] rsa::pkcs1::Error),

    /// PKCS#8 encoding, decoding or encryption failed
    #[error("PKCS#8 error: {0}")]
    Pkcs8(#[from] pkcs8::Error),

    /// SubjectPublicKeyInfo encoding or decoding failed
    #[error("SubjectPublicKeyInfo error: {0}")]
    Spki(#[from] pkcs8::spki::Error),

    /// Curve point or scalar rejected
    #[error("Elliptic curve error: {0}")]
    Curve(#[from] p256::elliptic_curve::Error),

    /// Base64 body could not be decoded
    #[error("Base64 decoding error: {0}")]
    Base64(#[from] base64::DecodeError),
}

impl KeyError {
    /// Attach this failure to a structured error of the given kind
    pub(crate) fn into_error(self, kind: ErrorKind) -> Error {
        Error::with_source(kind, self)
    }

    /// Attach this failure to a conversion error
    pub(crate) fn conversion(self) -> Error {
        self.into_error(ErrorKind::Conversion)
    }
}

impl From<KeyError> for Error {
    fn from(e: KeyError) -> Self {
        e.conversion()
    }
}
