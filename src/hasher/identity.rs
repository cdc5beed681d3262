//! Non-cryptographic digest functions for diagrams and tests

use super::{DigestEncoding, DigestFunction};
use crate::model::Digest;
use crate::Result;
use std::fmt;

/// The identity function: the digest of `data` is `data` itself
///
/// Parent digests become the concatenation of their leaves, which makes
/// rendered trees readable (`AB`, `CD`, `ABCD`, ...).
#[derive(Clone, Copy, Debug, Default)]
pub struct Identity;

impl DigestFunction for Identity {
    fn digest(&self, data: &[u8]) -> Result<Digest> {
        Ok(Digest::from_bytes(data))
    }

    fn name(&self) -> &str {
        "identity"
    }

    fn encoding(&self) -> DigestEncoding {
        DigestEncoding::Text
    }
}

/// Adapts a caller closure into a [`DigestFunction`]
///
/// The closure must be deterministic. Errors it returns are propagated
/// unchanged to the caller of the build.
pub struct FnDigest<F> {
    name: String,
    encoding: DigestEncoding,
    func: F,
}

impl<F> FnDigest<F>
where
    F: Fn(&[u8]) -> Result<Digest> + Send + Sync,
{
    /// Wrap `func` under the given name, rendered as hex
    pub fn new(name: impl Into<String>, func: F) -> Self {
        FnDigest {
            name: name.into(),
            encoding: DigestEncoding::Binary,
            func,
        }
    }

    /// Override the rendering hint
    pub fn with_encoding(mut self, encoding: DigestEncoding) -> Self {
        self.encoding = encoding;
        self
    }
}

impl<F> DigestFunction for FnDigest<F>
where
    F: Fn(&[u8]) -> Result<Digest> + Send + Sync,
{
    fn digest(&self, data: &[u8]) -> Result<Digest> {
        (self.func)(data)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn encoding(&self) -> DigestEncoding {
        self.encoding
    }
}

impl<F> fmt::Debug for FnDigest<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnDigest")
            .field("name", &self.name)
            .field("encoding", &self.encoding)
            .finish()
    }
}
