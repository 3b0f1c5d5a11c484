//! Key pair generation
//!
//! Produces a fresh PEM pair for one cipher: PKCS#1 public and PKCS#8 private
//! for RSA, SubjectPublicKeyInfo public and PKCS#8 private for EC. When a
//! passphrase is set the private half is written as an encrypted PKCS#8
//! document (PBES2 with AES-256-CBC).

use crate::codec::{ec, rsa};
use crate::error::{Error, ErrorKind, KeyError, Result};
use crate::types::{Cipher, Curve, KeyHalves};
use keyport_common::LoggingTransformer;
use std::time::Instant;
use zeroize::Zeroizing;

/// Everything needed to generate one pair
#[derive(Clone)]
pub(crate) struct GenerationRequest {
    pub cipher: Cipher,
    pub length: usize,
    pub curve: Curve,
    pub passphrase: Option<Zeroizing<String>>,
}

/// Generate a PEM pair, blocking the calling thread
pub(crate) fn generate_pem_pair(request: &GenerationRequest) -> Result<KeyHalves<String>> {
    let started = Instant::now();
    tracing::debug!(
        cipher = %request.cipher,
        length = request.length,
        curve = %request.curve,
        encrypted = request.passphrase.is_some(),
        "generating key pair"
    );

    let passphrase = request.passphrase.as_ref().map(|p| p.as_bytes());
    let generated: std::result::Result<KeyHalves<String>, KeyError> = match request.cipher {
        Cipher::Rsa => rsa::generate(request.length, passphrase),
        Cipher::Ec => ec::generate(request.curve, passphrase),
    };

    let operation = format!("{} key pair generation", request.cipher.label());
    LoggingTransformer::log_performance_metric(&operation, started.elapsed(), generated.is_ok());
    generated.map_err(|e| {
        LoggingTransformer::log_crypto_error(&operation, &e);
        Error::with_source(ErrorKind::Crypto, e)
    })
}
