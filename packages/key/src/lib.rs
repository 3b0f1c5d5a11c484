//! # Keyport
//!
//! Converts RSA and elliptic-curve keys between PEM, JWK and OpenSSH public
//! key lines.
//!
//! ## Features
//!
//! - **Key**: wrap one existing key and convert it on demand
//! - **Keypair**: generate a fresh pair once, in the background, and read it
//!   in any format
//! - **Codecs**: base64url integers, RSA and EC PEM/JWK, RFC 4253 wire format
//! - **Structured errors**: every hop adds its stage to an ordered chain
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use keyport::prelude::*;
//!
//! # #[tokio::main]
//! # async fn main() -> keyport::Result<()> {
//! let keypair = Keypair::builder().cipher("rsa").length(2048).build()?;
//! let pem = keypair.to_pem().await?;
//!
//! let ssh = Key::from_pem(pem.public).to_ssh()?;
//! let jwk = Key::from_ssh(ssh).to_jwk()?;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod api;
pub mod codec;
pub mod error;
pub mod futures;
mod generation;
pub mod jwk;
pub mod types;

// Re-export core types
pub use error::{Error, ErrorKind, KeyError, Result};
pub use jwk::{Field, Jwk, Param};
pub use types::{
    Cipher, Curve, CurveInfo, KeyFormat, KeyHalves, KeyMaterial, KeyRole, DEFAULT_RSA_KEY_LENGTH,
    MAX_RSA_KEY_LENGTH, MIN_RSA_KEY_LENGTH, RSA_KEY_LENGTHS,
};

// Re-export the main API
pub use api::{Key, KeyConfig, Keypair, KeypairBuilder, KeypairConfig};

// Logging entry points from keyport_common
pub use keyport_common::LoggingTransformer;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Cipher, Curve, Jwk, Key, KeyConfig, KeyFormat, KeyHalves, KeyMaterial, KeyRole, Keypair,
        KeypairConfig, Result,
    };
}
