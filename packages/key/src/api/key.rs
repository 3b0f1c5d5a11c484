//! Existing key wrapper
//!
//! [`Key`] holds one key in the representation it was given and converts it
//! on demand. Conversions are recomputed on every call.

use super::convert;
use crate::error::{Error, Result, ResultExt};
use crate::jwk::Jwk;
use crate::types::{KeyFormat, KeyMaterial, KeyRole};
use keyport_common::LoggingTransformer;
use serde::Deserialize;
use std::fmt;
use zeroize::Zeroizing;

/// Construction input for [`Key`]
///
/// At least one of `jwk`, `pem` or `ssh` is required; when several are set
/// the first of that order wins.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct KeyConfig {
    /// Key as a JSON Web Key
    pub jwk: Option<Jwk>,
    /// Key as PEM text
    pub pem: Option<String>,
    /// Key as an OpenSSH public key line
    pub ssh: Option<String>,
    /// Role of a PEM key, overriding detection from its `PRIVATE` marker
    pub role: Option<KeyRole>,
    /// Passphrase of an encrypted PKCS#8 private key
    pub passphrase: Option<Zeroizing<String>>,
    /// Comment appended to produced SSH lines
    pub comment: Option<String>,
}

impl fmt::Debug for KeyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyConfig")
            .field("jwk", &self.jwk.as_ref().map(|_| "<jwk>"))
            .field("pem", &self.pem.as_deref().map(LoggingTransformer::key_fingerprint))
            .field("ssh", &self.ssh.as_deref().map(LoggingTransformer::key_fingerprint))
            .field("role", &self.role)
            .field("passphrase", &self.passphrase.as_ref().map(|_| "<redacted>"))
            .field("comment", &self.comment)
            .finish()
    }
}

/// One existing asymmetric key
#[derive(Clone)]
pub struct Key {
    source: KeyMaterial,
    role: Option<KeyRole>,
    passphrase: Option<Zeroizing<String>>,
    comment: Option<String>,
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key")
            .field("format", &self.source.format())
            .field("role", &self.role)
            .field("encrypted", &self.passphrase.is_some())
            .finish_non_exhaustive()
    }
}

impl Key {
    /// Create a key from its configuration
    ///
    /// # Errors
    /// Returns a configuration error when none of `jwk`, `pem` or `ssh` is set.
    pub fn new(config: KeyConfig) -> Result<Self> {
        let KeyConfig {
            jwk,
            pem,
            ssh,
            role,
            passphrase,
            comment,
        } = config;
        let source = match (jwk, pem, ssh) {
            (Some(jwk), _, _) => KeyMaterial::Jwk(jwk),
            (None, Some(pem), _) => KeyMaterial::Pem(pem),
            (None, None, Some(ssh)) => KeyMaterial::Ssh(ssh),
            (None, None, None) => {
                return Err(Error::configuration().context(
                    "Failed to create new Key instance. Missing required key. At least one of those three properties is required: jwk, pem or ssh",
                ))
            }
        };
        Ok(Self {
            source,
            role,
            passphrase,
            comment,
        })
    }

    /// Key given as PEM
    #[must_use]
    pub fn from_pem(pem: impl Into<String>) -> Self {
        Self::from_material(KeyMaterial::Pem(pem.into()))
    }

    /// Key given as a JWK
    #[must_use]
    pub fn from_jwk(jwk: Jwk) -> Self {
        Self::from_material(KeyMaterial::Jwk(jwk))
    }

    /// Key given as an SSH public key line
    #[must_use]
    pub fn from_ssh(ssh: impl Into<String>) -> Self {
        Self::from_material(KeyMaterial::Ssh(ssh.into()))
    }

    fn from_material(source: KeyMaterial) -> Self {
        Self {
            source,
            role: None,
            passphrase: None,
            comment: None,
        }
    }

    /// Declare the role of a PEM key instead of detecting it
    #[must_use]
    pub fn with_role(mut self, role: KeyRole) -> Self {
        self.role = Some(role);
        self
    }

    /// Passphrase for an encrypted PKCS#8 private key
    #[must_use]
    pub fn with_passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.passphrase = Some(Zeroizing::new(passphrase.into()));
        self
    }

    /// Comment appended to produced SSH lines
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Format the key was given in
    #[must_use]
    pub fn format(&self) -> KeyFormat {
        self.source.format()
    }

    /// The key as given
    #[must_use]
    pub fn source(&self) -> &KeyMaterial {
        &self.source
    }

    /// Convert to `format`
    ///
    /// The same format returns the stored value unchanged. A private key
    /// requested as SSH comes back as private PEM, since no private SSH
    /// format is produced.
    ///
    /// # Errors
    /// Returns the chain of failing stages, outermost
    /// "Failed to convert asymmetric key in <format> format".
    pub fn to(&self, format: KeyFormat) -> Result<KeyMaterial> {
        let converted = self.route(format);
        LoggingTransformer::log_conversion(
            self.source.format().label(),
            format.label(),
            converted.is_ok(),
        );
        converted.with_context(|| format!("Failed to convert asymmetric key in {format} format"))
    }

    /// Convert to PEM
    ///
    /// # Errors
    /// See [`Key::to`].
    pub fn to_pem(&self) -> Result<String> {
        self.to(KeyFormat::Pem).map(into_text)
    }

    /// Convert to JWK
    ///
    /// # Errors
    /// See [`Key::to`].
    pub fn to_jwk(&self) -> Result<Jwk> {
        match self.to(KeyFormat::Jwk)? {
            KeyMaterial::Jwk(jwk) => Ok(jwk),
            other => Err(Error::internal()
                .context(format!("Expected a JWK, produced {} instead", other.format()))),
        }
    }

    /// Convert to an SSH public key line (private keys yield private PEM)
    ///
    /// # Errors
    /// See [`Key::to`].
    pub fn to_ssh(&self) -> Result<String> {
        self.to(KeyFormat::Ssh).map(into_text)
    }

    fn route(&self, format: KeyFormat) -> Result<KeyMaterial> {
        let passphrase = self.passphrase.as_deref().map(String::as_str);
        let comment = self.comment.as_deref();
        Ok(match (&self.source, format) {
            (KeyMaterial::Pem(pem), KeyFormat::Pem) => KeyMaterial::Pem(pem.clone()),
            (KeyMaterial::Pem(pem), KeyFormat::Jwk) => {
                KeyMaterial::Jwk(convert::pem_to_jwk(pem, self.role, passphrase)?)
            }
            (KeyMaterial::Pem(pem), KeyFormat::Ssh) => {
                KeyMaterial::Ssh(convert::pem_to_ssh(pem, self.role, passphrase, comment)?)
            }
            (KeyMaterial::Jwk(jwk), KeyFormat::Pem) => KeyMaterial::Pem(convert::jwk_to_pem(jwk)?),
            (KeyMaterial::Jwk(jwk), KeyFormat::Jwk) => KeyMaterial::Jwk(jwk.clone()),
            (KeyMaterial::Jwk(jwk), KeyFormat::Ssh) => {
                KeyMaterial::Ssh(convert::jwk_to_ssh(jwk, comment)?)
            }
            (KeyMaterial::Ssh(ssh), KeyFormat::Pem) => {
                KeyMaterial::Pem(convert::ssh_to_pem(ssh, passphrase)?)
            }
            (KeyMaterial::Ssh(ssh), KeyFormat::Jwk) => {
                KeyMaterial::Jwk(convert::ssh_to_jwk(ssh, passphrase)?)
            }
            (KeyMaterial::Ssh(ssh), KeyFormat::Ssh) => KeyMaterial::Ssh(ssh.clone()),
        })
    }
}

fn into_text(material: KeyMaterial) -> String {
    match material {
        KeyMaterial::Pem(text) | KeyMaterial::Ssh(text) => text,
        KeyMaterial::Jwk(jwk) => jwk.to_value().to_string(),
    }
}
