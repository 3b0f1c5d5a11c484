//! OpenSSH public key codec
//!
//! An SSH public key line is `<type> <base64 body> [comment]`. The body is a
//! sequence of fields, each a 4-byte big-endian length followed by that many
//! bytes (RFC 4253 section 6.6):
//!
//! * RSA: `"ssh-rsa"`, `e`, `n`, with integers as two's-complement mpints
//! * EC: `"ecdsa-sha2-nistpXXX"`, `"nistpXXX"`, `0x04 || X || Y`

use super::ec::{self, KTY as EC_KTY};
use super::numeric::{
    clean_jwk, encode_base64url, left_pad, normalize_jwk, strip_leading_zeros, Encoding,
};
use super::rsa::KTY as RSA_KTY;
use crate::error::{Error, ErrorKind, KeyError, Result};
use crate::jwk::{Field, Jwk, Param};
use crate::types::Curve;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// SSH key type of RSA keys
pub const SSH_RSA: &str = "ssh-rsa";

/// Pack fields into an SSH wire body
///
/// # Errors
/// Returns a validation error when a field exceeds the 32-bit length prefix.
pub fn encode_wire(fields: &[&[u8]]) -> Result<Vec<u8>> {
    let mut body = Vec::with_capacity(fields.iter().map(|f| f.len() + 4).sum());
    for field in fields {
        let len = u32::try_from(field.len()).map_err(|_| {
            Error::validation().context(format!("Field of {} bytes is too long", field.len()))
        })?;
        body.extend_from_slice(&len.to_be_bytes());
        body.extend_from_slice(field);
    }
    Ok(body)
}

/// Unpack an SSH wire body into its fields
///
/// Zero-length fields are skipped and one leading `0x00` byte is stripped
/// from each field, undoing mpint sign padding.
///
/// # Errors
/// Returns a validation error when a length prefix is truncated or runs past
/// the end of the body.
pub fn decode_wire(body: &[u8]) -> Result<Vec<Vec<u8>>> {
    let mut fields = Vec::new();
    let mut rest = body;
    while !rest.is_empty() {
        let Some((prefix, tail)) = rest.split_first_chunk::<4>() else {
            return Err(Error::validation().context(format!(
                "Malformed SSH key body. Truncated length prefix at byte {}",
                body.len() - rest.len()
            )));
        };
        let len = u32::from_be_bytes(*prefix) as usize;
        if len > tail.len() {
            return Err(Error::validation().context(format!(
                "Malformed SSH key body. Field of {len} bytes exceeds the {} bytes remaining",
                tail.len()
            )));
        }
        let (field, next) = tail.split_at(len);
        rest = next;
        if field.is_empty() {
            continue;
        }
        fields.push(field.strip_prefix(&[0x00]).unwrap_or(field).to_vec());
    }
    Ok(fields)
}

/// Unsigned big-endian bytes as an SSH mpint body
fn mpint(bytes: &[u8]) -> Vec<u8> {
    let value = strip_leading_zeros(bytes);
    let mut out = Vec::with_capacity(value.len() + 1);
    if value.first().is_some_and(|b| b & 0x80 != 0) {
        out.push(0x00);
    }
    out.extend_from_slice(value);
    out
}

fn line(key_type: &str, body: &[u8], comment: Option<&str>) -> String {
    let encoded = STANDARD.encode(body);
    match comment.map(str::trim).filter(|c| !c.is_empty()) {
        Some(comment) => format!("{key_type} {encoded} {comment}"),
        None => format!("{key_type} {encoded}"),
    }
}

/// Write a public JWK as an SSH public key line
///
/// The cipher is decided by `crv`: absent means RSA, present means EC.
///
/// # Errors
/// Returns a validation error when `kty` and `crv` are both missing, a
/// required member is missing or mistyped, or the curve is not P-256/P-384.
pub fn public_jwk_to_ssh(jwk: &Jwk, comment: Option<&str>) -> Result<String> {
    let encoded = if jwk.kty.is_none() && jwk.crv.is_none() {
        Err(Error::validation().context(
            "Invalid JWK format. Missing 'kty' or 'crv' property. Failed to determine the key's cipher.",
        ))
    } else if jwk.crv.is_none() {
        rsa_to_ssh(jwk, comment)
            .map_err(|e| e.context("Failed to convert public RSA key from JWK to SSH format"))
    } else {
        ec_to_ssh(jwk, comment)
            .map_err(|e| e.context("Failed to convert public ECDSA key from JWK to SSH format"))
    };
    encoded.map_err(|e| e.context("Failed to convert public key from JWK to SSH format"))
}

fn rsa_to_ssh(jwk: &Jwk, comment: Option<&str>) -> Result<String> {
    let jwk = normalize_jwk(jwk, Encoding::Raw)?;
    let e = mpint(&jwk.require(Field::E)?);
    let n = mpint(&jwk.require(Field::N)?);
    let body = encode_wire(&[SSH_RSA.as_bytes(), &e, &n])?;
    Ok(line(SSH_RSA, &body, comment))
}

fn ec_to_ssh(jwk: &Jwk, comment: Option<&str>) -> Result<String> {
    let curve = ec::jwk_curve(jwk.crv.as_deref())?;
    let Some((key_type, curve_id)) = curve.info().ssh else {
        return Err(Error::validation().context(format!(
            "'crv' {} is not supported. Supported curves: 'P-256' or 'P-384'",
            curve.jwk_name()
        )));
    };
    let width = curve.field_bytes();
    let jwk = normalize_jwk(jwk, Encoding::Raw)?;

    let mut point = Vec::with_capacity(1 + 2 * width);
    point.push(0x04);
    point.extend(left_pad(&jwk.require(Field::X)?, width)?);
    point.extend(left_pad(&jwk.require(Field::Y)?, width)?);

    let body = encode_wire(&[key_type.as_bytes(), curve_id.as_bytes(), &point])?;
    Ok(line(key_type, &body, comment))
}

/// Parse an SSH public key line into a public JWK
///
/// The key type is matched case-insensitively on `rsa`, `p256` and `p384`.
///
/// # Errors
/// Returns a validation error for a malformed line or body, or an
/// unsupported key type.
pub fn public_ssh_to_jwk(ssh: &str) -> Result<Jwk> {
    parse_line(ssh).map_err(|e| e.context("Failed to convert public key from SSH to JWK format"))
}

fn parse_line(ssh: &str) -> Result<Jwk> {
    let mut words = ssh.split_whitespace();
    let (Some(key_type), Some(encoded)) = (words.next(), words.next()) else {
        return Err(Error::validation()
            .context("Malformed SSH key line. Expected '<type> <base64 body> [comment]'"));
    };

    let lowered = key_type.to_ascii_lowercase();
    let curve = if lowered.contains("rsa") {
        None
    } else if lowered.contains("p256") {
        Some(Curve::P256)
    } else if lowered.contains("p384") {
        Some(Curve::P384)
    } else {
        return Err(Error::validation().context(format!(
            "Type {key_type} is not supported. Supported types: 'ssh-rsa', 'ecdsa-sha2-nistp256' and 'ecdsa-sha2-nistp384'."
        )));
    };

    let body = STANDARD
        .decode(encoded)
        .map_err(|e| KeyError::from(e).into_error(ErrorKind::Validation))?;
    let fields = decode_wire(&body)?;
    let field = |index: usize| {
        fields.get(index).ok_or_else(|| {
            Error::validation().context(format!(
                "Malformed SSH key body. Expected 3 fields, found {}",
                fields.len()
            ))
        })
    };

    let Some(curve) = curve else {
        let mut jwk = Jwk::with_kty(RSA_KTY);
        jwk.e = Some(Param::Encoded(encode_base64url(field(1)?)));
        jwk.n = Some(Param::Encoded(encode_base64url(field(2)?)));
        return Ok(clean_jwk(jwk));
    };

    let width = curve.field_bytes();
    let point = field(2)?;
    if point.len() != 1 + 2 * width || point[0] != 0x04 {
        return Err(Error::validation().context(format!(
            "Malformed SSH key body. Expected an uncompressed {} point of {} bytes",
            curve.jwk_name(),
            1 + 2 * width
        )));
    }
    let (x, y) = point[1..].split_at(width);
    let mut jwk = Jwk::with_kty(EC_KTY);
    jwk.crv = Some(curve.jwk_name().to_string());
    jwk.x = Some(Param::Encoded(encode_base64url(x)));
    jwk.y = Some(Param::Encoded(encode_base64url(y)));
    Ok(clean_jwk(jwk))
}
