use thiserror::Error;

/// Errors from the encryption layer.
///
/// `Integrity` is deliberately distinct from the shape errors: it means the
/// bytes arrived but the authentication tag did not verify (tampering or a
/// wrong key), so retrying with the same key is pointless.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Authentication tag verification failed during decryption.
    #[error("ciphertext authentication failed")]
    Integrity,

    /// The envelope is too short to contain a nonce.
    #[error("envelope too short: {0} bytes")]
    Envelope(usize),

    /// Key material has the wrong shape or encoding.
    #[error("invalid key material: {0}")]
    Key(String),

    /// The cipher refused the plaintext (length overflow).
    #[error("encryption failed")]
    Encrypt,
}

pub type CryptoResult<T> = Result<T, CryptoError>;
