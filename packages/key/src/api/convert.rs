//! Routing between formats
//!
//! Each function converts one key from one representation to another,
//! choosing the codec by cipher and hopping through JWK when there is no
//! direct path. Every hop adds its own stage message to the error chain.

use crate::codec::{ec, rsa, ssh};
use crate::error::{Error, ErrorKind, Result, ResultExt};
use crate::jwk::Jwk;
use crate::types::KeyRole;
use keyport_common::LoggingTransformer;

/// Whether a text carries a private PEM block (`BEGIN ... PRIVATE` on one line)
#[must_use]
pub fn contains_private_pem(text: &str) -> bool {
    text.lines()
        .any(|line| line.find("BEGIN").is_some_and(|at| line[at..].contains("PRIVATE")))
}

/// PEM to JWK, trying RSA first and EC second
///
/// `role` overrides detection from the `PRIVATE` marker.
///
/// # Errors
/// Returns a conversion error carrying both the RSA and the EC failure when
/// neither codec accepts the PEM.
pub fn pem_to_jwk(pem: &str, role: Option<KeyRole>, passphrase: Option<&str>) -> Result<Jwk> {
    let role = role.unwrap_or_else(|| KeyRole::detect(pem));
    tracing::debug!(key = %LoggingTransformer::key_fingerprint(pem), %role, "converting PEM to JWK");

    let rsa_failure = match rsa::pem_to_jwk(pem, role, passphrase) {
        Ok(jwk) => return Ok(jwk),
        Err(e) => e,
    };
    let ec_failure = match ec::pem_to_jwk(pem, role, passphrase) {
        Ok(jwk) => return Ok(jwk),
        Err(e) => e,
    };
    Err(Error::wrap(
        ErrorKind::Conversion,
        format!(
            "Failed to convert {role} key from PEM to JWK format. The PEM key is not recognized as a valid RSA or ECDSA key."
        ),
        vec![rsa_failure, ec_failure],
    ))
}

/// PEM to SSH through JWK
///
/// A private PEM is returned unchanged: there is no private SSH format here.
///
/// # Errors
/// Returns the PEM to JWK failure or the SSH encoding failure, wrapped.
pub fn pem_to_ssh(
    pem: &str,
    role: Option<KeyRole>,
    passphrase: Option<&str>,
    comment: Option<&str>,
) -> Result<String> {
    const STAGE: &str = "Failed to convert key from PEM to SSH format";
    let role = role.unwrap_or_else(|| KeyRole::detect(pem));
    if role.is_private() {
        tracing::debug!("private PEM requested as SSH, returning it unchanged");
        return Ok(pem.to_string());
    }
    let jwk = pem_to_jwk(pem, Some(role), passphrase).context(STAGE)?;
    ssh::public_jwk_to_ssh(&jwk, comment).context(STAGE)
}

/// JWK to PEM, by the EC codec when `crv` or `kty=EC` is present
///
/// # Errors
/// Returns the codec failure.
pub fn jwk_to_pem(jwk: &Jwk) -> Result<String> {
    tracing::debug!(
        kty = jwk.kty.as_deref().unwrap_or(""),
        private = jwk.is_private(),
        "converting JWK to PEM"
    );
    if jwk.is_ec() {
        ec::jwk_to_pem(jwk)
    } else {
        rsa::jwk_to_pem(jwk)
    }
}

/// JWK to SSH
///
/// A private JWK yields its private PEM, mirroring [`pem_to_ssh`].
///
/// # Errors
/// Returns the codec failure, wrapped with the cipher's stage message.
pub fn jwk_to_ssh(jwk: &Jwk, comment: Option<&str>) -> Result<String> {
    let label = if jwk.crv.is_some() { "ECDSA" } else { "RSA" };
    let stage = format!("Failed to convert {label} key from JWK to SSH format");
    if jwk.d.is_some() {
        return jwk_to_pem(jwk).context(stage);
    }
    ssh::public_jwk_to_ssh(jwk, comment).context(stage)
}

/// SSH to JWK
///
/// Text that actually holds a private PEM block is read as PEM.
///
/// # Errors
/// Returns the parse failure, wrapped.
pub fn ssh_to_jwk(text: &str, passphrase: Option<&str>) -> Result<Jwk> {
    const STAGE: &str = "Failed to convert key from SSH to JWK format";
    if contains_private_pem(text) {
        return pem_to_jwk(text, Some(KeyRole::Private), passphrase).context(STAGE);
    }
    ssh::public_ssh_to_jwk(text).context(STAGE)
}

/// SSH to PEM through JWK
///
/// Text that actually holds a private PEM block is returned unchanged.
///
/// # Errors
/// Returns the failing hop, wrapped.
pub fn ssh_to_pem(text: &str, passphrase: Option<&str>) -> Result<String> {
    const STAGE: &str = "Failed to convert key from SSH to PEM format";
    if contains_private_pem(text) {
        return Ok(text.to_string());
    }
    let jwk = ssh_to_jwk(text, passphrase).context(STAGE)?;
    jwk_to_pem(&jwk).context(STAGE)
}
