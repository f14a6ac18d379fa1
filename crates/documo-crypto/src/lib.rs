//! Encryption primitives for document content.
//!
//! Every document is encrypted under its own 256-bit AES-GCM key (DEK)
//! before the bytes reach blob storage. The wire format is a 12-byte random
//! nonce prepended to the ciphertext; the nonce is not secret and must
//! round-trip exactly through `encrypt`/`decrypt`. Content integrity across
//! the upload path is tracked separately as a SHA-256 digest of the
//! plaintext.

mod cipher;
mod digest;
mod error;

pub use cipher::{decrypt, encrypt, DocumentKey, KEY_SIZE, NONCE_SIZE};
pub use digest::sha256_hex;
pub use error::{CryptoError, CryptoResult};
