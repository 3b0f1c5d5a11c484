//! Freshly generated key pair
//!
//! Construction validates the configuration, then starts generation once on
//! the Tokio blocking pool. Every conversion awaits the same memoised result.
//!
//! ```rust,ignore
//! use keyport::prelude::*;
//!
//! let keypair = Keypair::builder().cipher("ec").curve("P-384").build()?;
//! let jwk = keypair.to_jwk().await?;
//! ```

use crate::codec::{ec, rsa, ssh};
use crate::error::{Error, Result, ResultExt};
use crate::futures::{share, GenerationFuture, SharedGeneration};
use crate::generation::GenerationRequest;
use crate::jwk::Jwk;
use crate::types::{
    Cipher, Curve, KeyFormat, KeyHalves, KeyMaterial, KeyRole, DEFAULT_RSA_KEY_LENGTH,
    MAX_RSA_KEY_LENGTH, MIN_RSA_KEY_LENGTH,
};
use keyport_common::ensure;
use serde::Deserialize;
use std::fmt;
use zeroize::Zeroizing;

const CONSTRUCTION_FAILED: &str = "Failed to create new Keypair instance";

/// Generation options
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct KeypairConfig {
    /// Cipher family, `rsa` by default
    pub cipher: Cipher,
    /// RSA modulus length in bits, 2048 by default
    pub length: usize,
    /// EC curve, `prime256v1` by default
    pub curve: Curve,
    /// Encrypts the private PEM (PKCS#8, AES-256-CBC) when set
    pub passphrase: Option<Zeroizing<String>>,
    /// Comment appended to the public SSH line
    pub comment: Option<String>,
}

impl Default for KeypairConfig {
    fn default() -> Self {
        Self {
            cipher: Cipher::default(),
            length: DEFAULT_RSA_KEY_LENGTH,
            curve: Curve::DEFAULT,
            passphrase: None,
            comment: None,
        }
    }
}

impl fmt::Debug for KeypairConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeypairConfig")
            .field("cipher", &self.cipher)
            .field("length", &self.length)
            .field("curve", &self.curve)
            .field("passphrase", &self.passphrase.as_ref().map(|_| "<redacted>"))
            .field("comment", &self.comment)
            .finish()
    }
}

impl KeypairConfig {
    /// Check the options that generation cannot recover from
    ///
    /// # Errors
    /// Returns a configuration error for an RSA length outside 512..=4096
    /// bits or not a multiple of 8.
    pub fn validate(&self) -> Result<()> {
        if self.cipher == Cipher::Rsa {
            let length = self.length;
            ensure!(
                (MIN_RSA_KEY_LENGTH..=MAX_RSA_KEY_LENGTH).contains(&length),
                configuration,
                "RSA key length {length} is out of range. Supported lengths are {MIN_RSA_KEY_LENGTH} to {MAX_RSA_KEY_LENGTH} bits."
            );
            ensure!(
                length % 8 == 0,
                configuration,
                "RSA key length {length} is not a multiple of 8"
            );
        }
        Ok(())
    }
}

/// Fluent construction of a [`Keypair`] from option names
#[derive(Default, Clone)]
#[must_use]
pub struct KeypairBuilder {
    cipher: Option<String>,
    length: Option<usize>,
    curve: Option<String>,
    passphrase: Option<Zeroizing<String>>,
    comment: Option<String>,
}

impl fmt::Debug for KeypairBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeypairBuilder")
            .field("cipher", &self.cipher)
            .field("length", &self.length)
            .field("curve", &self.curve)
            .field("passphrase", &self.passphrase.as_ref().map(|_| "<redacted>"))
            .field("comment", &self.comment)
            .finish()
    }
}

impl KeypairBuilder {
    /// Cipher name: `rsa` or `ec`, case-insensitive
    pub fn cipher(mut self, cipher: impl Into<String>) -> Self {
        self.cipher = Some(cipher.into());
        self
    }

    /// RSA modulus length in bits
    pub fn length(mut self, bits: usize) -> Self {
        self.length = Some(bits);
        self
    }

    /// Curve by platform or JWK name
    pub fn curve(mut self, curve: impl Into<String>) -> Self {
        self.curve = Some(curve.into());
        self
    }

    /// Encrypt the private PEM with this passphrase
    pub fn passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.passphrase = Some(Zeroizing::new(passphrase.into()));
        self
    }

    /// Comment appended to the public SSH line
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Resolve option names into a [`KeypairConfig`]
    ///
    /// # Errors
    /// Returns a configuration error for an unknown cipher or curve name.
    pub fn config(self) -> Result<KeypairConfig> {
        let defaults = KeypairConfig::default();
        let cipher = match self.cipher {
            Some(name) => name.parse::<Cipher>().context(CONSTRUCTION_FAILED)?,
            None => defaults.cipher,
        };
        let curve = match self.curve {
            Some(name) => name.parse::<Curve>().context(CONSTRUCTION_FAILED)?,
            None => defaults.curve,
        };
        Ok(KeypairConfig {
            cipher,
            length: self.length.unwrap_or(defaults.length),
            curve,
            passphrase: self.passphrase,
            comment: self.comment,
        })
    }

    /// Validate the options and start generation
    ///
    /// # Errors
    /// See [`KeypairBuilder::config`] and [`Keypair::new`].
    pub fn build(self) -> Result<Keypair> {
        Keypair::new(self.config()?)
    }
}

/// A generated public/private key pair
///
/// Cloning is cheap; clones share the same generation.
#[derive(Clone)]
pub struct Keypair {
    config: KeypairConfig,
    generation: SharedGeneration,
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Keypair {
    /// Start building a keypair from option names
    pub fn builder() -> KeypairBuilder {
        KeypairBuilder::default()
    }

    /// Validate `config` and start generation in the background
    ///
    /// # Errors
    /// Returns a configuration error for invalid options or when called
    /// outside a Tokio runtime. Nothing is generated in either case.
    pub fn new(config: KeypairConfig) -> Result<Self> {
        config.validate().context(CONSTRUCTION_FAILED)?;
        let request = GenerationRequest {
            cipher: config.cipher,
            length: config.length,
            curve: config.curve,
            passphrase: config.passphrase.clone(),
        };
        let generation = GenerationFuture::spawn(request).context(CONSTRUCTION_FAILED)?;
        Ok(Self {
            config,
            generation: share(generation),
        })
    }

    /// Options this pair was generated with
    #[must_use]
    pub fn config(&self) -> &KeypairConfig {
        &self.config
    }

    /// Cipher family of this pair
    #[must_use]
    pub fn cipher(&self) -> Cipher {
        self.config.cipher
    }

    /// Both halves in `format`
    ///
    /// # Errors
    /// Returns the generation failure or the conversion failure, outermost
    /// "Failed to create asymmetric <cipher> keys in <format> format".
    pub async fn to(&self, format: KeyFormat) -> Result<KeyHalves<KeyMaterial>> {
        match format {
            KeyFormat::Pem => Ok(self.to_pem().await?.map(KeyMaterial::Pem)),
            KeyFormat::Jwk => Ok(self.to_jwk().await?.map(KeyMaterial::Jwk)),
            KeyFormat::Ssh => {
                let halves = self.to_ssh().await?;
                Ok(KeyHalves {
                    public: KeyMaterial::Ssh(halves.public),
                    private: KeyMaterial::Pem(halves.private),
                })
            }
        }
    }

    /// Both halves as generated: public PKCS#1 (RSA) or SPKI (EC), private
    /// PKCS#8, encrypted when a passphrase is set
    ///
    /// # Errors
    /// Returns the generation failure.
    pub async fn to_pem(&self) -> Result<KeyHalves<String>> {
        self.generated()
            .await
            .with_context(|| self.stage(KeyFormat::Pem))
    }

    /// Both halves as JWK
    ///
    /// An encrypted private half is decrypted with the configured passphrase.
    ///
    /// # Errors
    /// Returns the generation failure or the PEM to JWK failure.
    pub async fn to_jwk(&self) -> Result<KeyHalves<Jwk>> {
        let converted = match self.generated().await {
            Ok(pem) => self.pem_pair_to_jwk(&pem),
            Err(e) => Err(e),
        };
        converted.with_context(|| self.stage(KeyFormat::Jwk))
    }

    /// Public half as an SSH line, private half as PEM
    ///
    /// # Errors
    /// Returns the generation failure or the PEM to SSH failure.
    pub async fn to_ssh(&self) -> Result<KeyHalves<String>> {
        let converted = match self.generated().await {
            Ok(pem) => self.pem_pair_to_ssh(pem),
            Err(e) => Err(e),
        };
        converted.with_context(|| self.stage(KeyFormat::Ssh))
    }

    async fn generated(&self) -> Result<KeyHalves<String>> {
        self.generation.clone().await
    }

    fn stage(&self, format: KeyFormat) -> String {
        format!(
            "Failed to create asymmetric {} keys in {format} format",
            self.config.cipher
        )
    }

    fn public_jwk(&self, pem: &str) -> Result<Jwk> {
        match self.config.cipher {
            Cipher::Rsa => rsa::pem_to_jwk(pem, KeyRole::Public, None),
            Cipher::Ec => ec::pem_to_jwk(pem, KeyRole::Public, None),
        }
    }

    fn pem_pair_to_jwk(&self, pem: &KeyHalves<String>) -> Result<KeyHalves<Jwk>> {
        let label = self.config.cipher.label();
        let passphrase = self.config.passphrase.as_deref().map(String::as_str);
        let private = match self.config.cipher {
            Cipher::Rsa => rsa::pem_to_jwk(&pem.private, KeyRole::Private, passphrase),
            Cipher::Ec => ec::pem_to_jwk(&pem.private, KeyRole::Private, passphrase),
        };
        let converted = private.and_then(|private| {
            Ok(KeyHalves {
                public: self.public_jwk(&pem.public)?,
                private,
            })
        });
        converted.with_context(|| format!("Failed to convert {label} keypair from PEM to JWK"))
    }

    fn pem_pair_to_ssh(&self, pem: KeyHalves<String>) -> Result<KeyHalves<String>> {
        let label = self.config.cipher.label();
        let public = self
            .public_jwk(&pem.public)
            .and_then(|jwk| ssh::public_jwk_to_ssh(&jwk, self.config.comment.as_deref()))
            .with_context(|| format!("Failed to convert {label} keypair from PEM to SSH"))?;
        Ok(KeyHalves {
            public,
            private: pem.private,
        })
    }
}

impl TryFrom<KeypairConfig> for Keypair {
    type Error = Error;

    fn try_from(config: KeypairConfig) -> Result<Self> {
        Self::new(config)
    }
}
