//! AES-256-GCM document encryption.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{CryptoError, CryptoResult};

/// Key size in bytes (AES-256).
pub const KEY_SIZE: usize = 32;

/// Nonce size in bytes (96-bit GCM nonce).
pub const NONCE_SIZE: usize = 12;

/// A document's symmetric encryption key (DEK).
///
/// Key bytes are wiped from memory on drop. Export/import uses base64, the
/// encoding the key travels in when attached to a document record.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DocumentKey([u8; KEY_SIZE]);

impl DocumentKey {
    /// Generate a fresh random 256-bit key.
    pub fn generate() -> Self {
        let key = Aes256Gcm::generate_key(OsRng);
        let mut bytes = [0u8; KEY_SIZE];
        bytes.copy_from_slice(&key);
        DocumentKey(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        if bytes.len() != KEY_SIZE {
            return Err(CryptoError::Key(format!(
                "expected {} bytes, got {}",
                KEY_SIZE,
                bytes.len()
            )));
        }
        let mut key = [0u8; KEY_SIZE];
        key.copy_from_slice(bytes);
        Ok(DocumentKey(key))
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(self.0)
    }

    pub fn from_base64(encoded: &str) -> CryptoResult<Self> {
        let bytes = BASE64
            .decode(encoded)
            .map_err(|e| CryptoError::Key(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    fn cipher(&self) -> Aes256Gcm {
        Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.0))
    }
}

impl std::fmt::Debug for DocumentKey {
    // Never print key bytes.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DocumentKey(..)")
    }
}

/// Encrypt plaintext under `key` with a fresh random nonce.
///
/// Returns `nonce || ciphertext`. Two calls with the same inputs produce
/// different envelopes.
pub fn encrypt(plaintext: &[u8], key: &DocumentKey) -> CryptoResult<Vec<u8>> {
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let ciphertext = key
        .cipher()
        .encrypt(&nonce, plaintext)
        .map_err(|_| CryptoError::Encrypt)?;

    let mut envelope = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    envelope.extend_from_slice(&nonce);
    envelope.extend_from_slice(&ciphertext);
    Ok(envelope)
}

/// Decrypt an envelope produced by [`encrypt`].
///
/// The first [`NONCE_SIZE`] bytes are the nonce, the remainder the
/// ciphertext. Fails with [`CryptoError::Integrity`] when the tag does not
/// verify.
pub fn decrypt(envelope: &[u8], key: &DocumentKey) -> CryptoResult<Vec<u8>> {
    if envelope.len() < NONCE_SIZE {
        return Err(CryptoError::Envelope(envelope.len()));
    }
    let (nonce, ciphertext) = envelope.split_at(NONCE_SIZE);
    key.cipher()
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CryptoError::Integrity)
}
