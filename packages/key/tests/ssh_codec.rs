//! Tests for the OpenSSH public key wire codec

#![allow(clippy::unwrap_used, clippy::expect_used)]

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hex_literal::hex;
use keyport::codec::numeric::encode_base64url;
use keyport::codec::ssh::{decode_wire, encode_wire, public_jwk_to_ssh, public_ssh_to_jwk};
use keyport::{ErrorKind, Jwk, LoggingTransformer, Param};
use serde_json::json;

/// "ssh-rsa", e = 65537, n = 0x8001 (sign byte added)
const RSA_BODY: [u8; 25] = hex!(
    "00000007 7373682d727361"
    "00000003 010001"
    "00000003 008001"
);

fn rsa_jwk() -> Jwk {
    Jwk::from_value(json!({ "kty": "RSA", "e": "AQAB", "n": "gAE" })).unwrap()
}

#[test]
fn test_rsa_jwk_to_ssh_wire_layout() {
    LoggingTransformer::init_test();

    let line = public_jwk_to_ssh(&rsa_jwk(), None).unwrap();
    assert_eq!(line, format!("ssh-rsa {}", STANDARD.encode(RSA_BODY)));
}

#[test]
fn test_comment_is_appended() {
    let line = public_jwk_to_ssh(&rsa_jwk(), Some("deploy@build")).unwrap();
    assert!(line.starts_with("ssh-rsa "));
    assert!(line.ends_with(" deploy@build"));
    assert_eq!(line.split_whitespace().count(), 3);
}

#[test]
fn test_rsa_ssh_to_jwk_strips_sign_byte() {
    let line = format!("ssh-rsa {} someone@host", STANDARD.encode(RSA_BODY));
    let jwk = public_ssh_to_jwk(&line).unwrap();

    assert_eq!(jwk.kty.as_deref(), Some("RSA"));
    assert_eq!(jwk.e, Some(Param::Encoded("AQAB".into())));
    assert_eq!(jwk.n, Some(Param::Encoded("gAE".into())));
    assert_eq!(jwk.crv, None);
}

#[test]
fn test_ec_point_is_padded_to_field_width() {
    let mut x = [0x11u8; 32];
    x[0] = 0x00;
    let y = [0x22u8; 32];
    let jwk = Jwk::from_value(json!({
        "kty": "EC",
        "crv": "P-256",
        "x": encode_base64url(&x[1..]),
        "y": encode_base64url(&y),
    }))
    .unwrap();

    let line = public_jwk_to_ssh(&jwk, None).unwrap();
    let (key_type, body) = line.split_once(' ').unwrap();
    assert_eq!(key_type, "ecdsa-sha2-nistp256");

    let fields = decode_wire(&STANDARD.decode(body).unwrap()).unwrap();
    assert_eq!(fields[0], b"ecdsa-sha2-nistp256");
    assert_eq!(fields[1], b"nistp256");
    assert_eq!(fields[2].len(), 65);
    assert_eq!(fields[2][0], 0x04);
    assert_eq!(&fields[2][1..33], &x);
    assert_eq!(&fields[2][33..], &y);

    let parsed = public_ssh_to_jwk(&line).unwrap();
    assert_eq!(parsed.crv.as_deref(), Some("P-256"));
    assert_eq!(parsed.x, Some(Param::Encoded(encode_base64url(&x))));
    assert_eq!(parsed.y, Some(Param::Encoded(encode_base64url(&y))));
}

#[test]
fn test_p384_uses_its_own_identifiers() {
    let jwk = Jwk::from_value(json!({
        "kty": "EC",
        "crv": "secp384r1",
        "x": encode_base64url(&[0x33; 48]),
        "y": encode_base64url(&[0x44; 48]),
    }))
    .unwrap();

    let line = public_jwk_to_ssh(&jwk, None).unwrap();
    assert!(line.starts_with("ecdsa-sha2-nistp384 "));
    let parsed = public_ssh_to_jwk(&line).unwrap();
    assert_eq!(parsed.crv.as_deref(), Some("P-384"));
}

#[test]
fn test_wire_decoder_skips_empty_fields() {
    let fields = decode_wire(&hex!("00000000 00000002 0102 00000001 00")).unwrap();
    assert_eq!(fields, vec![vec![0x01, 0x02], vec![]]);
}

#[test]
fn test_wire_encoder_prefixes_lengths() {
    let body = encode_wire(&[b"ab".as_slice(), b"".as_slice()]).unwrap();
    assert_eq!(body, hex!("00000002 6162 00000000"));
}

#[test]
fn test_malformed_wire_bodies_are_errors() {
    assert!(decode_wire(&hex!("000000")).is_err());
    assert!(decode_wire(&hex!("00000005 0102")).is_err());

    let line = format!("ssh-rsa {}", STANDARD.encode(hex!("00000007 7373682d727361")));
    let error = public_ssh_to_jwk(&line).unwrap_err();
    assert_eq!(error.kind(), &ErrorKind::Validation);
}

#[test]
fn test_unsupported_ssh_type_names_supported_types() {
    let error = public_ssh_to_jwk("ssh-dss AAAAB3NzaC1kc3MAAACBAP").unwrap_err();

    assert_eq!(error.kind(), &ErrorKind::Validation);
    let rendered = error.to_string();
    assert!(rendered.contains("Type ssh-dss is not supported"));
    assert!(rendered.contains("'ssh-rsa', 'ecdsa-sha2-nistp256' and 'ecdsa-sha2-nistp384'"));
    assert_eq!(
        error.get_context(),
        Some("Failed to convert public key from SSH to JWK format")
    );
}

#[test]
fn test_missing_cipher_is_rejected() {
    let jwk = Jwk::from_value(json!({ "n": "gAE", "e": "AQAB" })).unwrap();
    let error = public_jwk_to_ssh(&jwk, None).unwrap_err();
    assert!(error
        .to_string()
        .contains("Missing 'kty' or 'crv' property. Failed to determine the key's cipher."));
}

#[test]
fn test_missing_members_are_named() {
    let jwk = Jwk::from_value(json!({ "kty": "RSA", "n": "gAE" })).unwrap();
    let error = public_jwk_to_ssh(&jwk, None).unwrap_err();
    let messages = error.messages();
    assert_eq!(messages[0], "Missing required 'e'");
    assert_eq!(messages[1], "Failed to convert public RSA key from JWK to SSH format");
    assert_eq!(messages[2], "Failed to convert public key from JWK to SSH format");
}

#[test]
fn test_unsupported_curve_is_rejected() {
    let jwk = Jwk::from_value(json!({
        "kty": "EC",
        "crv": "P-521",
        "x": encode_base64url(&[1; 66]),
        "y": encode_base64url(&[2; 66]),
    }))
    .unwrap();
    let error = public_jwk_to_ssh(&jwk, None).unwrap_err();
    assert!(error
        .to_string()
        .contains("'crv' P-521 is not supported. Supported curves: 'P-256' or 'P-384'"));
}
