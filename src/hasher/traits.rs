//! Digest function trait definition

use crate::model::Digest;
use crate::Result;
use serde::{Deserialize, Serialize};

/// How a digest should be rendered as text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestEncoding {
    /// Opaque bytes, shown as lowercase hex
    #[default]
    Binary,
    /// Printable bytes, shown verbatim
    Text,
}

/// A one-way function over byte sequences
///
/// Implementations must be deterministic and keep no state between calls:
/// the tree builder invokes them once per leaf and once per internal node,
/// and identical input must always yield identical output.
///
/// Implementations can use:
/// - Cryptographic hashes (BLAKE3, SHA-256)
/// - The identity function, for readable diagrams
/// - Arbitrary caller closures via [`FnDigest`](super::FnDigest)
pub trait DigestFunction: Send + Sync {
    /// Compute the digest of `data`
    fn digest(&self, data: &[u8]) -> Result<Digest>;

    /// Identifier used in logs, config and exports
    fn name(&self) -> &str;

    /// Rendering hint for the visualizer
    fn encoding(&self) -> DigestEncoding {
        DigestEncoding::Binary
    }

    /// Digest of `left ++ right`
    fn combine(&self, left: &Digest, right: &Digest) -> Result<Digest> {
        self.digest(&left.concat(right))
    }
}

impl<T: DigestFunction + ?Sized> DigestFunction for Box<T> {
    fn digest(&self, data: &[u8]) -> Result<Digest> {
        (**self).digest(data)
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn encoding(&self) -> DigestEncoding {
        (**self).encoding()
    }

    fn combine(&self, left: &Digest, right: &Digest) -> Result<Digest> {
        (**self).combine(left, right)
    }
}

impl<T: DigestFunction + ?Sized> DigestFunction for &T {
    fn digest(&self, data: &[u8]) -> Result<Digest> {
        (**self).digest(data)
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn encoding(&self) -> DigestEncoding {
        (**self).encoding()
    }

    fn combine(&self, left: &Digest, right: &Digest) -> Result<Digest> {
        (**self).combine(left, right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::{Blake3, HashAlgorithm};
    use crate::tree::compute_root;

    /// Domain-separates internal nodes from leaves
    struct Tagged;

    impl DigestFunction for Tagged {
        fn digest(&self, data: &[u8]) -> Result<Digest> {
            Blake3.digest(data)
        }

        fn name(&self) -> &str {
            "tagged"
        }

        fn combine(&self, left: &Digest, right: &Digest) -> Result<Digest> {
            let mut data = vec![0x01];
            data.extend_from_slice(left.as_bytes());
            data.extend_from_slice(right.as_bytes());
            self.digest(&data)
        }
    }

    #[test]
    fn test_wrappers_forward_combine() {
        let items = ["A", "B", "C"];
        let direct = compute_root(&items, &Tagged).unwrap();

        let boxed: Box<dyn DigestFunction> = Box::new(Tagged);
        let via_box = compute_root(&items, &boxed).unwrap();
        let via_ref = compute_root(&items, &&Tagged).unwrap();

        assert_eq!(direct, via_box);
        assert_eq!(direct, via_ref);
        assert_ne!(direct, compute_root(&items, &Blake3).unwrap());
    }

    #[test]
    fn test_boxed_builtin_matches_direct() {
        let items = ["A", "B", "C", "D", "E"];
        let boxed = HashAlgorithm::Blake3.hasher();
        assert_eq!(
            compute_root(&items, &boxed).unwrap(),
            compute_root(&items, &Blake3).unwrap()
        );
    }
}
