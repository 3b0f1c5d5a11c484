//! Tests for the cipher, curve and format capability tables

use keyport::{Cipher, Curve, Jwk, KeyFormat, KeyMaterial, RSA_KEY_LENGTHS};

#[test]
fn test_curve_table() {
    let jwk: Vec<Curve> = Curve::jwk_capable().collect();
    assert_eq!(jwk, vec![Curve::P256, Curve::P384]);

    assert!(Curve::P256.supports_ssh());
    assert!(Curve::P384.supports_ssh());
    assert!(!Curve::P521.supports_ssh());
    assert!(!Curve::P521.supports_jwk());

    assert_eq!(Curve::P384.native_name(), "secp384r1");
    assert_eq!(Curve::P521.jwk_name(), "P-521");
    assert_eq!(Curve::P521.field_bytes(), 66);
    assert_eq!(Curve::DEFAULT, Curve::P256);
    assert_eq!(Curve::from_name("prime256v1"), Some(Curve::P256));
    assert_eq!(Curve::from_name("p-384"), Some(Curve::P384));
    assert_eq!(Curve::from_name("secp256k1"), None);
}

#[test]
fn test_cipher_and_format_tables() {
    assert_eq!(Cipher::ALL, [Cipher::Rsa, Cipher::Ec]);
    let names: Vec<&str> = Cipher::ALL.iter().map(|c| c.name()).collect();
    assert_eq!(names, ["rsa", "ec"]);

    let formats: Vec<String> = KeyFormat::ALL.iter().map(ToString::to_string).collect();
    assert_eq!(formats, ["pem", "jwk", "ssh"]);
    assert_eq!(RSA_KEY_LENGTHS, [512, 1024, 2048, 4096]);
}

#[test]
fn test_key_material_accessors() {
    let pem = KeyMaterial::Pem("-----BEGIN PUBLIC KEY-----".to_string());
    assert_eq!(pem.as_text(), Some("-----BEGIN PUBLIC KEY-----"));
    assert!(pem.as_jwk().is_none());
    assert_eq!(pem.format(), KeyFormat::Pem);

    let jwk = KeyMaterial::Jwk(Jwk::with_kty("EC"));
    assert_eq!(jwk.as_jwk().and_then(|j| j.kty.as_deref()), Some("EC"));
    assert!(jwk.as_text().is_none());
    assert_eq!(jwk.format(), KeyFormat::Jwk);
}
