//! EC codec: PEM to JWK and back for the JWK-capable curves
//!
//! Each curve gets the same set of primitives, stamped out by `curve_ops!`
//! over its RustCrypto crate. PEM input may be PKCS#8 (plain or encrypted)
//! or SEC1 for private keys and SubjectPublicKeyInfo for public keys.

use super::numeric::{clean_jwk, encode_base64url, left_pad, normalize_jwk, Encoding};
use crate::error::{Error, ErrorKind, KeyError, Result};
use crate::jwk::{Field, Jwk, Param};
use crate::types::{Curve, KeyHalves, KeyRole};

/// JWK `kty` for EC keys
pub const KTY: &str = "EC";

type Outcome<T> = std::result::Result<T, KeyError>;

/// Raw curve parameters: affine coordinates and optional scalar
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EcParts {
    pub x: Vec<u8>,
    pub y: Vec<u8>,
    pub d: Option<Vec<u8>>,
}

macro_rules! curve_ops {
    ($module:ident, $krate:ident) => {
        mod $module {
            use super::{EcParts, Outcome};
            use crate::error::KeyError;
            use crate::types::KeyHalves;
            use $krate::elliptic_curve::sec1::ToEncodedPoint;
            use $krate::{PublicKey, SecretKey};
            use pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding};

            fn parts(public: &PublicKey, d: Option<Vec<u8>>) -> Outcome<EcParts> {
                let point = public.to_encoded_point(false);
                match (point.x(), point.y()) {
                    (Some(x), Some(y)) => Ok(EcParts {
                        x: x.to_vec(),
                        y: y.to_vec(),
                        d,
                    }),
                    _ => Err(KeyError::Curve($krate::elliptic_curve::Error)),
                }
            }

            fn secret(pem: &str, passphrase: Option<&str>) -> Outcome<SecretKey> {
                if pem.contains("BEGIN EC PRIVATE KEY") {
                    return Ok(SecretKey::from_sec1_pem(pem)?);
                }
                match passphrase {
                    Some(passphrase) if pem.contains("BEGIN ENCRYPTED PRIVATE KEY") => {
                        Ok(SecretKey::from_pkcs8_encrypted_pem(pem, passphrase)?)
                    }
                    _ => Ok(SecretKey::from_pkcs8_pem(pem)?),
                }
            }

            pub(super) fn decode_private(pem: &str, passphrase: Option<&str>) -> Outcome<EcParts> {
                let secret = secret(pem, passphrase)?;
                parts(&secret.public_key(), Some(secret.to_bytes().to_vec()))
            }

            pub(super) fn decode_public(pem: &str, passphrase: Option<&str>) -> Outcome<EcParts> {
                if pem.contains("PRIVATE") {
                    return parts(&secret(pem, passphrase)?.public_key(), None);
                }
                parts(&PublicKey::from_public_key_pem(pem)?, None)
            }

            /// Returns the PEM and the parameters actually encoded
            pub(super) fn encode(parts_in: &EcParts) -> Outcome<(String, EcParts)> {
                match &parts_in.d {
                    Some(d) => {
                        let secret = SecretKey::from_slice(d)?;
                        let pem = secret.to_pkcs8_pem(LineEnding::LF)?.to_string();
                        Ok((pem, parts(&secret.public_key(), Some(d.clone()))?))
                    }
                    None => {
                        let mut sec1 = Vec::with_capacity(1 + parts_in.x.len() + parts_in.y.len());
                        sec1.push(0x04);
                        sec1.extend_from_slice(&parts_in.x);
                        sec1.extend_from_slice(&parts_in.y);
                        let public = PublicKey::from_sec1_bytes(&sec1)?;
                        let pem = public.to_public_key_pem(LineEnding::LF)?;
                        Ok((pem, parts(&public, None)?))
                    }
                }
            }

            pub(super) fn generate(passphrase: Option<&[u8]>) -> Outcome<KeyHalves<String>> {
                let mut rng = rand::rngs::OsRng;
                let secret = SecretKey::random(&mut rng);
                let public = secret.public_key().to_public_key_pem(LineEnding::LF)?;
                let private = match passphrase {
                    Some(passphrase) => {
                        secret.to_pkcs8_encrypted_pem(&mut rng, passphrase, LineEnding::LF)?
                    }
                    None => secret.to_pkcs8_pem(LineEnding::LF)?,
                };
                Ok(KeyHalves {
                    public,
                    private: private.to_string(),
                })
            }
        }
    };
}

curve_ops!(nistp256, p256);
curve_ops!(nistp384, p384);
curve_ops!(nistp521, p521);

fn decode_on(curve: Curve, pem: &str, role: KeyRole, passphrase: Option<&str>) -> Outcome<EcParts> {
    match (curve, role) {
        (Curve::P256, KeyRole::Private) => nistp256::decode_private(pem, passphrase),
        (Curve::P256, KeyRole::Public) => nistp256::decode_public(pem, passphrase),
        (Curve::P384, KeyRole::Private) => nistp384::decode_private(pem, passphrase),
        (Curve::P384, KeyRole::Public) => nistp384::decode_public(pem, passphrase),
        (Curve::P521, KeyRole::Private) => nistp521::decode_private(pem, passphrase),
        (Curve::P521, KeyRole::Public) => nistp521::decode_public(pem, passphrase),
    }
}

fn encode_on(curve: Curve, parts: &EcParts) -> Outcome<(String, EcParts)> {
    match curve {
        Curve::P256 => nistp256::encode(parts),
        Curve::P384 => nistp384::encode(parts),
        Curve::P521 => nistp521::encode(parts),
    }
}

/// Generate a pair on `curve`: SPKI public PEM and PKCS#8 private PEM
pub(crate) fn generate(curve: Curve, passphrase: Option<&[u8]>) -> Outcome<KeyHalves<String>> {
    match curve {
        Curve::P256 => nistp256::generate(passphrase),
        Curve::P384 => nistp384::generate(passphrase),
        Curve::P521 => nistp521::generate(passphrase),
    }
}

fn unsupported_curve(name: &str) -> Error {
    Error::validation().context(format!(
        "'crv' {name} is not supported. Supported curves: 'P-256' or 'P-384'"
    ))
}

/// Resolve a JWK `crv` to a JWK-capable curve
///
/// # Errors
/// Returns a validation error for unknown curves and for curves that do not
/// round-trip through JWK.
pub fn jwk_curve(crv: Option<&str>) -> Result<Curve> {
    let Some(name) = crv else {
        return Err(Error::validation().context("Missing required 'crv'"));
    };
    match Curve::from_name(name) {
        Some(curve) if curve.supports_jwk() => Ok(curve),
        _ => Err(unsupported_curve(name)),
    }
}

/// Extract curve parameters from a PEM key
///
/// The curve is detected by trying each known curve in turn. Keys on curves
/// that cannot round-trip through JWK are rejected.
///
/// # Errors
/// Returns a conversion error when the PEM is not an EC key of the requested
/// role, or a validation error when its curve is unsupported.
pub fn pem_to_jwk(pem: &str, role: KeyRole, passphrase: Option<&str>) -> Result<Jwk> {
    decode_pem(pem, role, passphrase).map_err(|e| {
        e.context(format!("Failed to convert ECDSA {role} key from PEM to JWK format"))
    })
}

fn decode_pem(pem: &str, role: KeyRole, passphrase: Option<&str>) -> Result<Jwk> {
    if role.is_private() && !KeyRole::detect(pem).is_private() {
        return Err(Error::conversion().context("The PEM key does not hold private parameters"));
    }
    if pem.contains("BEGIN ENCRYPTED PRIVATE KEY") && passphrase.is_none() {
        return Err(Error::conversion()
            .context("The PEM key is encrypted and no passphrase was supplied"));
    }

    let mut failures = Vec::with_capacity(Curve::ALL.len());
    for curve in Curve::ALL {
        match decode_on(curve, pem, role, passphrase) {
            Ok(_) if !curve.supports_jwk() => return Err(unsupported_curve(curve.jwk_name())),
            Ok(parts) => return Ok(parts_to_jwk(curve, parts)),
            Err(e) => failures.push(
                e.conversion()
                    .context(format!("Not a {} key", curve.jwk_name())),
            ),
        }
    }
    Err(Error::wrap(
        ErrorKind::Conversion,
        "The PEM key is not a well-formed EC key",
        failures,
    ))
}

fn parts_to_jwk(curve: Curve, parts: EcParts) -> Jwk {
    let mut jwk = Jwk::with_kty(KTY);
    jwk.crv = Some(curve.jwk_name().to_string());
    jwk.x = Some(Param::Encoded(encode_base64url(&parts.x)));
    jwk.y = Some(Param::Encoded(encode_base64url(&parts.y)));
    jwk.d = parts.d.map(|d| Param::Encoded(encode_base64url(&d)));
    clean_jwk(jwk)
}

/// Rebuild a PEM key from EC JWK parameters
///
/// A private JWK needs only `d`; when `x`/`y` are present they must match the
/// point derived from `d`.
///
/// # Errors
/// Returns a validation error for an unsupported curve, missing or malformed
/// coordinates, or a conversion error when the point is not on the curve.
pub fn jwk_to_pem(jwk: &Jwk) -> Result<String> {
    let role = if jwk.is_private() { KeyRole::Private } else { KeyRole::Public };
    encode_pem(jwk, role).map_err(|e| {
        e.context(format!("Failed to convert ECDSA {role} key from JWK to PEM format"))
    })
}

fn encode_pem(jwk: &Jwk, role: KeyRole) -> Result<String> {
    let curve = jwk_curve(jwk.crv.as_deref())?;
    let width = curve.field_bytes();
    let jwk = normalize_jwk(jwk, Encoding::Raw)?;

    if role.is_private() {
        let d = left_pad(&jwk.require(Field::D)?, width)?;
        let x = jwk.bytes(Field::X)?.filter(|x| !x.is_empty());
        let y = jwk.bytes(Field::Y)?.filter(|y| !y.is_empty());
        let claimed = EcParts {
            x: x.map(|x| left_pad(&x, width)).transpose()?.unwrap_or_default(),
            y: y.map(|y| left_pad(&y, width)).transpose()?.unwrap_or_default(),
            d: Some(d),
        };
        let (pem, derived) = encode_on(curve, &claimed)?;
        let x_matches = claimed.x.is_empty() || claimed.x == derived.x;
        let y_matches = claimed.y.is_empty() || claimed.y == derived.y;
        if !(x_matches && y_matches) {
            return Err(Error::validation()
                .context("'x' and 'y' do not match the public point derived from 'd'"));
        }
        return Ok(pem);
    }

    let parts = EcParts {
        x: left_pad(&jwk.require(Field::X)?, width)?,
        y: left_pad(&jwk.require(Field::Y)?, width)?,
        d: None,
    };
    let (pem, _) = encode_on(curve, &parts)?;
    Ok(pem)
}
