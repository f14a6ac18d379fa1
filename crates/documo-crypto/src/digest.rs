//! Content digests.

use sha2::{Digest, Sha256};

/// SHA-256 digest of raw bytes as lowercase hex.
///
/// Used for plaintext integrity across the upload path, never for
/// encryption.
pub fn sha256_hex(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digest() {
        // sha256("abc")
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_deterministic_and_discriminating() {
        assert_eq!(sha256_hex(b"same"), sha256_hex(b"same"));
        assert_ne!(sha256_hex(b"one"), sha256_hex(b"two"));
    }

    #[test]
    fn test_lowercase_hex() {
        let digest = sha256_hex(b"case check");
        assert!(digest.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        assert_eq!(digest.len(), 64);
    }
}
