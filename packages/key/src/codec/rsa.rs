//! RSA codec: PEM to JWK and back
//!
//! Accepted input: PKCS#8 (plain or encrypted) and PKCS#1 private keys,
//! PKCS#1 and SubjectPublicKeyInfo public keys. Output is PKCS#8 for private
//! keys and PKCS#1 for public keys, matching what generation produces.

use super::numeric::{clean_jwk, encode_base64url, normalize_jwk, Encoding};
use crate::error::{Error, KeyError, Result};
use crate::jwk::{Field, Jwk, Param};
use crate::types::{KeyHalves, KeyRole};
use keyport_common::LoggingTransformer;
use pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, LineEnding};
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey, EncodeRsaPublicKey};
use rsa::traits::{PrivateKeyParts, PublicKeyParts};
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};

/// JWK `kty` for RSA keys
pub const KTY: &str = "RSA";

/// Extract RSA parameters from a PEM key
///
/// A private PEM read with [`KeyRole::Public`] yields its public half.
/// Encrypted PKCS#8 requires `passphrase`.
///
/// # Errors
/// Returns a conversion error when the PEM is not a well-formed RSA key of
/// the requested role.
pub fn pem_to_jwk(pem: &str, role: KeyRole, passphrase: Option<&str>) -> Result<Jwk> {
    decode_pem(pem, role, passphrase).map_err(|e| {
        e.context(format!("Failed to convert RSA {role} key from PEM to JWK format"))
    })
}

fn decode_pem(pem: &str, role: KeyRole, passphrase: Option<&str>) -> Result<Jwk> {
    if KeyRole::detect(pem).is_private() {
        let key = decode_private(pem, passphrase)?;
        if role.is_private() {
            return private_jwk(&key);
        }
        return Ok(public_jwk(&key.to_public_key()));
    }
    if role.is_private() {
        return Err(Error::conversion().context("The PEM key does not hold private parameters"));
    }
    let key = if pem.contains("BEGIN RSA PUBLIC KEY") {
        RsaPublicKey::from_pkcs1_pem(pem).map_err(KeyError::from)?
    } else {
        RsaPublicKey::from_public_key_pem(pem).map_err(KeyError::from)?
    };
    Ok(public_jwk(&key))
}

fn decode_private(pem: &str, passphrase: Option<&str>) -> Result<RsaPrivateKey> {
    let decoded = if pem.contains("BEGIN ENCRYPTED PRIVATE KEY") {
        let Some(passphrase) = passphrase else {
            return Err(Error::conversion()
                .context("The PEM key is encrypted and no passphrase was supplied"));
        };
        RsaPrivateKey::from_pkcs8_encrypted_pem(pem, passphrase).map_err(KeyError::from)
    } else if pem.contains("BEGIN RSA PRIVATE KEY") {
        RsaPrivateKey::from_pkcs1_pem(pem).map_err(KeyError::from)
    } else {
        RsaPrivateKey::from_pkcs8_pem(pem).map_err(KeyError::from)
    };
    decoded.map_err(|e| {
        LoggingTransformer::log_crypto_error("rsa private key decode", &e);
        e.conversion()
    })
}

fn public_jwk(key: &RsaPublicKey) -> Jwk {
    let mut jwk = Jwk::with_kty(KTY);
    jwk.n = Some(encoded(key.n()));
    jwk.e = Some(encoded(key.e()));
    jwk
}

fn private_jwk(key: &RsaPrivateKey) -> Result<Jwk> {
    let primes = key.primes();
    let (Some(p), Some(q)) = (primes.first(), primes.get(1)) else {
        return Err(Error::conversion().context("The RSA key does not carry its prime factors"));
    };
    let (Some(dp), Some(dq), Some(qi)) = (key.dp(), key.dq(), key.crt_coefficient()) else {
        return Err(Error::conversion().context("The RSA key does not carry its CRT parameters"));
    };

    let mut jwk = public_jwk(&key.to_public_key());
    jwk.d = Some(encoded(key.d()));
    jwk.p = Some(encoded(p));
    jwk.q = Some(encoded(q));
    jwk.dp = Some(encoded(dp));
    jwk.dq = Some(encoded(dq));
    jwk.qi = Some(encoded(&qi));
    Ok(clean_jwk(jwk))
}

fn encoded(value: &BigUint) -> Param {
    Param::Encoded(encode_base64url(&value.to_bytes_be()))
}

/// Rebuild a PEM key from RSA JWK parameters
///
/// Without `d` the result is a PKCS#1 public key built from `n` and `e`.
/// With `d` the key is rebuilt by the platform key builder, recovering `p`
/// and `q` when they are absent, and written as PKCS#8.
///
/// # Errors
/// Returns a validation error when `n`/`e` (or `modulus`/`exponent`) are
/// missing, or a conversion error when the parameters do not form a key.
pub fn jwk_to_pem(jwk: &Jwk) -> Result<String> {
    let role = if jwk.is_private() { KeyRole::Private } else { KeyRole::Public };
    encode_pem(jwk, role).map_err(|e| {
        e.context(format!("Failed to convert RSA {role} key from JWK to PEM format"))
    })
}

fn encode_pem(jwk: &Jwk, role: KeyRole) -> Result<String> {
    let jwk = normalize_jwk(jwk, Encoding::Raw)?;
    let n = BigUint::from_bytes_be(&jwk.require(Field::N)?);
    let e = BigUint::from_bytes_be(&jwk.require(Field::E)?);

    if !role.is_private() {
        let key = RsaPublicKey::new(n, e).map_err(KeyError::from)?;
        return Ok(key.to_pkcs1_pem(LineEnding::LF).map_err(KeyError::from)?);
    }

    let d = BigUint::from_bytes_be(&jwk.require(Field::D)?);
    let primes = match (jwk.bytes(Field::P)?, jwk.bytes(Field::Q)?) {
        (Some(p), Some(q)) if !p.is_empty() && !q.is_empty() => {
            vec![BigUint::from_bytes_be(&p), BigUint::from_bytes_be(&q)]
        }
        _ => Vec::new(),
    };
    let key = RsaPrivateKey::from_components(n, e, d, primes).map_err(KeyError::from)?;
    key.validate().map_err(KeyError::from)?;
    let pem = key.to_pkcs8_pem(LineEnding::LF).map_err(KeyError::from)?;
    Ok(pem.to_string())
}

/// Generate an RSA pair: PKCS#1 public PEM and PKCS#8 private PEM
///
/// The private half is encrypted (PBES2, AES-256-CBC) when a passphrase is
/// given.
pub(crate) fn generate(
    bits: usize,
    passphrase: Option<&[u8]>,
) -> std::result::Result<KeyHalves<String>, KeyError> {
    let mut rng = rand::rngs::OsRng;
    let private = RsaPrivateKey::new(&mut rng, bits)?;
    let public = private.to_public_key().to_pkcs1_pem(LineEnding::LF)?;
    let private = match passphrase {
        Some(passphrase) => private.to_pkcs8_encrypted_pem(&mut rng, passphrase, LineEnding::LF)?,
        None => private.to_pkcs8_pem(LineEnding::LF)?,
    };
    Ok(KeyHalves {
        public,
        private: private.to_string(),
    })
}
