//! Conversion facades: an existing [`Key`] and a generated [`Keypair`]

pub mod convert;
mod key;
mod keypair;

pub use key::{Key, KeyConfig};
pub use keypair::{Keypair, KeypairBuilder, KeypairConfig};
