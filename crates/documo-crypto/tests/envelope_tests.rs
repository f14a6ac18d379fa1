//! Envelope format and AEAD behavior.

use documo_crypto::{decrypt, encrypt, sha256_hex, CryptoError, DocumentKey, NONCE_SIZE};

#[test]
fn round_trip_restores_plaintext() {
    let key = DocumentKey::generate();
    for plaintext in [&b""[..], &b"x"[..], &[0u8; 4096][..]] {
        let envelope = encrypt(plaintext, &key).unwrap();
        assert_eq!(decrypt(&envelope, &key).unwrap(), plaintext);
    }
}

#[test]
fn fresh_nonce_per_call() {
    let key = DocumentKey::generate();
    let a = encrypt(b"same plaintext", &key).unwrap();
    let b = encrypt(b"same plaintext", &key).unwrap();
    assert_ne!(a, b);
    assert_ne!(a[..NONCE_SIZE], b[..NONCE_SIZE]);
}

#[test]
fn envelope_layout_is_nonce_then_ciphertext() {
    let key = DocumentKey::generate();
    let plaintext = b"layout probe";
    let envelope = encrypt(plaintext, &key).unwrap();
    // nonce + ciphertext + 16-byte GCM tag
    assert_eq!(envelope.len(), NONCE_SIZE + plaintext.len() + 16);
}

#[test]
fn bit_flip_anywhere_in_ciphertext_fails_integrity() {
    let key = DocumentKey::generate();
    let envelope = encrypt(b"tamper target", &key).unwrap();

    for position in [NONCE_SIZE, envelope.len() / 2, envelope.len() - 1] {
        let mut tampered = envelope.clone();
        tampered[position] ^= 0x01;
        assert!(
            matches!(decrypt(&tampered, &key), Err(CryptoError::Integrity)),
            "flip at byte {} must fail authentication",
            position
        );
    }
}

#[test]
fn wrong_key_fails_integrity() {
    let envelope = encrypt(b"secret", &DocumentKey::generate()).unwrap();
    let other = DocumentKey::generate();
    assert!(matches!(
        decrypt(&envelope, &other),
        Err(CryptoError::Integrity)
    ));
}

#[test]
fn exported_key_decrypts_after_import() {
    let key = DocumentKey::generate();
    let envelope = encrypt(b"travels with the document", &key).unwrap();

    let imported = DocumentKey::from_base64(&key.to_base64()).unwrap();
    assert_eq!(
        decrypt(&envelope, &imported).unwrap(),
        b"travels with the document"
    );
}

#[test]
fn digest_is_stable_across_encryption() {
    // The recorded hash is of the plaintext; encrypting must not affect it.
    let key = DocumentKey::generate();
    let plaintext = b"hash me";
    let before = sha256_hex(plaintext);
    let envelope = encrypt(plaintext, &key).unwrap();
    let after = sha256_hex(&decrypt(&envelope, &key).unwrap());
    assert_eq!(before, after);
}
