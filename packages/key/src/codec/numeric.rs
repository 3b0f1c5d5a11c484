//! Numeric codec
//!
//! Big integers travel through JWK as unpadded base64url of their unsigned
//! big-endian bytes. This module converts between that text, raw bytes and
//! small machine integers, and runs the normalisation passes applied to
//! every JWK entering or leaving a codec.

use crate::error::{Error, ErrorKind, KeyError, Result};
use crate::jwk::{Field, Jwk, Param};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

/// Alias pairs `(canonical, alias)` filled in both directions by [`normalize_jwk`]
pub const ALIASES: [(Field, Field); 5] = [
    (Field::Qi, Field::Coeff),
    (Field::Dp, Field::Dmp1),
    (Field::Dq, Field::Dmq1),
    (Field::N, Field::Modulus),
    (Field::E, Field::Exponent),
];

/// Representation numeric members are converted to by [`normalize_jwk`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// base64url text, as written to JSON
    Base64Url,
    /// Raw big-endian bytes, as consumed by the primitives
    Raw,
}

/// Unpadded base64url of `bytes`
#[must_use]
pub fn encode_base64url(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode base64url text
///
/// Padding and the standard `+`/`/` alphabet are accepted as well, since
/// keys produced by older tooling mix both.
///
/// # Errors
/// Returns a validation error when the text is not base64.
pub fn decode_base64url(text: &str) -> Result<Vec<u8>> {
    let normalized: String = text
        .trim()
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();
    URL_SAFE_NO_PAD
        .decode(normalized.as_bytes())
        .map_err(|e| KeyError::from(e).into_error(ErrorKind::Validation))
}

/// base64url of the minimal big-endian representation of `value`
///
/// `65537` encodes to `AQAB`; zero encodes as a single zero byte.
#[must_use]
pub fn number_to_base64url(value: u64) -> String {
    let bytes = value.to_be_bytes();
    encode_base64url(strip_leading_zeros(&bytes))
}

/// Integer value of base64url big-endian bytes
///
/// # Errors
/// Returns a validation error for invalid or empty text, or a value wider
/// than 64 bits.
pub fn base64url_to_number(text: &str) -> Result<u64> {
    let bytes = decode_base64url(text)?;
    let digits = hex::encode(strip_leading_zeros(&bytes));
    if bytes.is_empty() || digits.len() > 16 {
        return Err(Error::validation().context(format!(
            "'{text}' does not encode an unsigned 64-bit integer"
        )));
    }
    u64::from_str_radix(&digits, 16)
        .map_err(|e| Error::validation().context(format!("'{text}' is not a number: {e}")))
}

/// Drop redundant leading zero bytes, keeping at least one byte
#[must_use]
pub fn strip_leading_zeros(bytes: &[u8]) -> &[u8] {
    let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    if first == bytes.len() {
        &bytes[bytes.len().saturating_sub(1)..]
    } else {
        &bytes[first..]
    }
}

/// Left-pad `bytes` with zeros to exactly `width` bytes
///
/// Redundant leading zeros are dropped first.
///
/// # Errors
/// Returns a validation error when the value does not fit in `width` bytes.
pub fn left_pad(bytes: &[u8], width: usize) -> Result<Vec<u8>> {
    let value = strip_leading_zeros(bytes);
    if value.len() > width {
        return Err(Error::validation().context(format!(
            "Value of {} bytes does not fit in {width} bytes",
            value.len()
        )));
    }
    let mut out = vec![0u8; width - value.len()];
    out.extend_from_slice(value);
    Ok(out)
}

/// Convert every numeric member to `encoding` and fill alias pairs
///
/// After normalisation `qi`/`coeff`, `dp`/`dmp1`, `dq`/`dmq1`, `n`/`modulus`
/// and `e`/`exponent` each hold the same value whenever either side was set,
/// so codecs can read whichever naming convention they prefer.
///
/// # Errors
/// Returns a validation error naming the member when converting to
/// [`Encoding::Raw`] meets invalid base64url.
pub fn normalize_jwk(jwk: &Jwk, encoding: Encoding) -> Result<Jwk> {
    let mut out = jwk.clone();
    for field in Field::ALL {
        let slot = out.slot(field);
        if let Some(param) = slot.take() {
            *slot = Some(match encoding {
                Encoding::Base64Url => Param::Encoded(param.to_encoded()),
                Encoding::Raw => Param::Raw(param.to_bytes().map_err(|e| {
                    e.context(format!("'{}' is not a valid base64url value", field.name()))
                })?),
            });
        }
    }
    for (canonical, alias) in ALIASES {
        let filled = present(out.get(canonical)).or_else(|| present(out.get(alias)));
        if let Some(value) = filled {
            if present(out.get(canonical)).is_none() {
                *out.slot(canonical) = Some(value.clone());
            }
            if present(out.get(alias)).is_none() {
                *out.slot(alias) = Some(value);
            }
        }
    }
    Ok(out)
}

/// Strip alias members and empty members from an output JWK
#[must_use]
pub fn clean_jwk(jwk: Jwk) -> Jwk {
    let mut out = jwk;
    for (_, alias) in ALIASES {
        *out.slot(alias) = None;
    }
    for field in Field::ALL {
        let slot = out.slot(field);
        if slot.as_ref().is_some_and(Param::is_empty) {
            *slot = None;
        }
    }
    if out.kty.as_deref().is_some_and(str::is_empty) {
        out.kty = None;
    }
    if out.crv.as_deref().is_some_and(str::is_empty) {
        out.crv = None;
    }
    out
}

fn present(param: Option<&Param>) -> Option<Param> {
    param.filter(|p| !p.is_empty()).cloned()
}
