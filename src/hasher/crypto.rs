//! Cryptographic digest functions

use super::DigestFunction;
use crate::model::Digest;
use crate::Result;
use sha2::Sha256 as Sha256Hasher;

/// BLAKE3, 32-byte output. The default digest function.
#[derive(Clone, Copy, Debug, Default)]
pub struct Blake3;

impl DigestFunction for Blake3 {
    fn digest(&self, data: &[u8]) -> Result<Digest> {
        Ok(Digest::from(*blake3::hash(data).as_bytes()))
    }

    fn name(&self) -> &str {
        "blake3"
    }
}

/// SHA-256, 32-byte output
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha256;

impl DigestFunction for Sha256 {
    fn digest(&self, data: &[u8]) -> Result<Digest> {
        use sha2::Digest as _;

        let mut hasher = Sha256Hasher::new();
        hasher.update(data);
        let out: [u8; 32] = hasher.finalize().into();
        Ok(Digest::from(out))
    }

    fn name(&self) -> &str {
        "sha256"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blake3_deterministic() {
        let h1 = Blake3.digest(b"hello").unwrap();
        let h2 = Blake3.digest(b"hello").unwrap();
        let h3 = Blake3.digest(b"world").unwrap();

        assert_eq!(h1, h2);
        assert_ne!(h1, h3);
        assert_eq!(h1.len(), 32);
    }

    #[test]
    fn test_sha256_known_vector() {
        let h = Sha256.digest(b"abc").unwrap();
        assert_eq!(
            h.to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_combine_hashes_concatenation() {
        let a = Blake3.digest(b"A").unwrap();
        let b = Blake3.digest(b"B").unwrap();
        let combined = Blake3.combine(&a, &b).unwrap();
        assert_eq!(combined, Blake3.digest(&a.concat(&b)).unwrap());
        assert_ne!(combined, Blake3.combine(&b, &a).unwrap());
    }
}
