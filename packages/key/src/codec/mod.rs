//! Format codecs
//!
//! Leaf-first: [`numeric`] handles JWK integers and normalisation, [`rsa`]
//! and [`ec`] translate PEM to JWK and back, [`ssh`] packs public JWKs into
//! OpenSSH lines and parses them again. Every codec is a pure function over
//! its input.

pub mod ec;
pub mod numeric;
pub mod rsa;
pub mod ssh;

pub use numeric::{base64url_to_number, clean_jwk, normalize_jwk, number_to_base64url, Encoding};
pub use ssh::{public_jwk_to_ssh, public_ssh_to_jwk};
