//! Pluggable digest functions

mod crypto;
mod identity;
mod traits;

pub use crypto::{Blake3, Sha256};
pub use identity::{FnDigest, Identity};
pub use traits::{DigestEncoding, DigestFunction};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Built-in digest functions, selectable by name
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Blake3,
    Sha256,
    Identity,
}

impl HashAlgorithm {
    /// Instantiate the digest function
    pub fn hasher(&self) -> Box<dyn DigestFunction> {
        match self {
            HashAlgorithm::Blake3 => Box::new(Blake3),
            HashAlgorithm::Sha256 => Box::new(Sha256),
            HashAlgorithm::Identity => Box::new(Identity),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Blake3 => "blake3",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Identity => "identity",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
