//! Shared key types and capability tables

use crate::error::{Error, Result};
use crate::jwk::Jwk;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// RSA modulus lengths offered to callers
pub const RSA_KEY_LENGTHS: [usize; 4] = [512, 1024, 2048, 4096];

/// RSA modulus length used when none is configured
pub const DEFAULT_RSA_KEY_LENGTH: usize = 2048;

/// Smallest RSA modulus accepted for generation
pub const MIN_RSA_KEY_LENGTH: usize = 512;

/// Largest RSA modulus accepted for generation
pub const MAX_RSA_KEY_LENGTH: usize = 4096;

/// Asymmetric cipher family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Cipher {
    /// RSA
    #[default]
    Rsa,
    /// Elliptic curve (ECDSA)
    Ec,
}

impl Cipher {
    /// Every supported cipher
    pub const ALL: [Cipher; 2] = [Cipher::Rsa, Cipher::Ec];

    /// Lowercase name, as accepted by [`FromStr`]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Cipher::Rsa => "rsa",
            Cipher::Ec => "ec",
        }
    }

    /// Name used in error messages
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Cipher::Rsa => "RSA",
            Cipher::Ec => "ECDSA",
        }
    }
}

impl fmt::Display for Cipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Cipher {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rsa" => Ok(Cipher::Rsa),
            "ec" => Ok(Cipher::Ec),
            _ => Err(Error::configuration().context(format!(
                "Cipher '{s}' is not supported. Supported ciphers are: rsa and ec."
            ))),
        }
    }
}

impl TryFrom<String> for Cipher {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Cipher> for String {
    fn from(value: Cipher) -> Self {
        value.name().to_string()
    }
}

/// Whether a key carries secret parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyRole {
    /// Public half
    Public,
    /// Private half
    Private,
}

impl KeyRole {
    /// Infer the role of a PEM blob from its `PRIVATE` marker
    #[must_use]
    pub fn detect(pem: &str) -> Self {
        if pem.contains("PRIVATE") {
            KeyRole::Private
        } else {
            KeyRole::Public
        }
    }

    /// `true` for [`KeyRole::Private`]
    #[must_use]
    pub const fn is_private(self) -> bool {
        matches!(self, KeyRole::Private)
    }
}

impl fmt::Display for KeyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            KeyRole::Public => "public",
            KeyRole::Private => "private",
        })
    }
}

/// Key representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyFormat {
    /// Textual ASN.1 DER (`-----BEGIN ...-----`)
    Pem,
    /// JSON Web Key
    Jwk,
    /// OpenSSH public key line
    Ssh,
}

impl KeyFormat {
    /// Every supported format
    pub const ALL: [KeyFormat; 3] = [KeyFormat::Pem, KeyFormat::Jwk, KeyFormat::Ssh];

    /// Uppercase name used in messages
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            KeyFormat::Pem => "PEM",
            KeyFormat::Jwk => "JWK",
            KeyFormat::Ssh => "SSH",
        }
    }
}

impl fmt::Display for KeyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            KeyFormat::Pem => "pem",
            KeyFormat::Jwk => "jwk",
            KeyFormat::Ssh => "ssh",
        })
    }
}

impl FromStr for KeyFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pem" => Ok(KeyFormat::Pem),
            "jwk" => Ok(KeyFormat::Jwk),
            "ssh" => Ok(KeyFormat::Ssh),
            _ => Err(Error::configuration()
                .context(format!("File format '{s}' is not supported"))),
        }
    }
}

/// Capabilities of one named curve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurveInfo {
    /// Platform name, e.g. `prime256v1`
    pub native_name: &'static str,
    /// JWK `crv` value, e.g. `P-256`
    pub jwk_name: &'static str,
    /// Width of one coordinate or scalar, in bytes
    pub field_bytes: usize,
    /// OpenSSH key type and curve identifier, when SSH export is supported
    pub ssh: Option<(&'static str, &'static str)>,
    /// Lossless PEM/JWK round trip
    pub jwk: bool,
}

const P256_INFO: CurveInfo = CurveInfo {
    native_name: "prime256v1",
    jwk_name: "P-256",
    field_bytes: 32,
    ssh: Some(("ecdsa-sha2-nistp256", "nistp256")),
    jwk: true,
};

const P384_INFO: CurveInfo = CurveInfo {
    native_name: "secp384r1",
    jwk_name: "P-384",
    field_bytes: 48,
    ssh: Some(("ecdsa-sha2-nistp384", "nistp384")),
    jwk: true,
};

const P521_INFO: CurveInfo = CurveInfo {
    native_name: "secp521r1",
    jwk_name: "P-521",
    field_bytes: 66,
    ssh: None,
    jwk: false,
};

/// Named elliptic curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Curve {
    /// NIST P-256 / prime256v1
    #[default]
    P256,
    /// NIST P-384 / secp384r1
    P384,
    /// NIST P-521 / secp521r1 (PEM only)
    P521,
}

impl Curve {
    /// Every curve the platform can generate
    pub const ALL: [Curve; 3] = [Curve::P256, Curve::P384, Curve::P521];

    /// Curve used when none is configured
    pub const DEFAULT: Curve = Curve::P256;

    /// Capability record for this curve
    #[must_use]
    pub const fn info(self) -> &'static CurveInfo {
        match self {
            Curve::P256 => &P256_INFO,
            Curve::P384 => &P384_INFO,
            Curve::P521 => &P521_INFO,
        }
    }

    /// Platform name, e.g. `secp384r1`
    #[must_use]
    pub const fn native_name(self) -> &'static str {
        self.info().native_name
    }

    /// JWK `crv` value, e.g. `P-384`
    #[must_use]
    pub const fn jwk_name(self) -> &'static str {
        self.info().jwk_name
    }

    /// Coordinate width in bytes
    #[must_use]
    pub const fn field_bytes(self) -> usize {
        self.info().field_bytes
    }

    /// Whether PEM keys on this curve round-trip through JWK
    #[must_use]
    pub const fn supports_jwk(self) -> bool {
        self.info().jwk
    }

    /// Whether public keys on this curve can be written as SSH lines
    #[must_use]
    pub const fn supports_ssh(self) -> bool {
        self.info().ssh.is_some()
    }

    /// Curves that round-trip through JWK and SSH
    pub fn jwk_capable() -> impl Iterator<Item = Curve> {
        Self::ALL.into_iter().filter(|c| c.supports_jwk())
    }

    /// Look a curve up by platform or JWK name, case-insensitively
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| {
            c.native_name().eq_ignore_ascii_case(name) || c.jwk_name().eq_ignore_ascii_case(name)
        })
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.native_name())
    }
}

impl FromStr for Curve {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s.trim()).ok_or_else(|| {
            let names: Vec<&str> = Self::ALL.iter().map(|c| c.native_name()).collect();
            Error::configuration().context(format!(
                "Curve '{s}' is not supported. Supported curves are: {}",
                names.join(", ")
            ))
        })
    }
}

impl TryFrom<String> for Curve {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Curve> for String {
    fn from(value: Curve) -> Self {
        value.native_name().to_string()
    }
}

/// Public and private halves of one key, in the same representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyHalves<T> {
    /// Public half
    pub public: T,
    /// Private half
    pub private: T,
}

impl<T> KeyHalves<T> {
    /// Apply `f` to both halves
    pub fn map<U, F: FnMut(T) -> U>(self, mut f: F) -> KeyHalves<U> {
        KeyHalves {
            public: f(self.public),
            private: f(self.private),
        }
    }
}

/// A key in one of the three representations
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum KeyMaterial {
    /// PEM text
    Pem(String),
    /// JSON Web Key
    Jwk(Jwk),
    /// OpenSSH public key line (or private PEM, see [`crate::Key::to_ssh`])
    Ssh(String),
}

impl KeyMaterial {
    /// Format of this value
    #[must_use]
    pub fn format(&self) -> KeyFormat {
        match self {
            KeyMaterial::Pem(_) => KeyFormat::Pem,
            KeyMaterial::Jwk(_) => KeyFormat::Jwk,
            KeyMaterial::Ssh(_) => KeyFormat::Ssh,
        }
    }

    /// Textual value for PEM and SSH
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            KeyMaterial::Pem(s) | KeyMaterial::Ssh(s) => Some(s),
            KeyMaterial::Jwk(_) => None,
        }
    }

    /// JWK value
    #[must_use]
    pub fn as_jwk(&self) -> Option<&Jwk> {
        match self {
            KeyMaterial::Jwk(jwk) => Some(jwk),
            _ => None,
        }
    }
}
