//! Decrypted-view session behavior.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use documo_core::models::Document;
use documo_crypto::{encrypt, sha256_hex, DocumentKey};
use documo_processing::DecryptedViewSession;
use documo_storage::{MemoryStorage, Storage};

const TIMEOUT: Duration = Duration::from_secs(5);

async fn stored_document(storage: &MemoryStorage, plaintext: &[u8]) -> (Document, DocumentKey) {
    let request_id = Uuid::new_v4();
    let id = Uuid::new_v4();
    let key = DocumentKey::generate();
    let envelope = encrypt(plaintext, &key).unwrap();

    let (storage_key, url) = storage
        .upload(
            request_id,
            &format!("{}.enc", id),
            "application/octet-stream",
            envelope,
        )
        .await
        .unwrap();

    let now = Utc::now();
    let document = Document {
        id,
        request_id,
        type_id: "identity_card".to_string(),
        file_name: "card.jpg".to_string(),
        mime_type: "image/jpeg".to_string(),
        original_size: plaintext.len() as i64,
        storage_key,
        url,
        hash: sha256_hex(plaintext),
        dek: Some(key.to_base64()),
        validation_errors: vec![],
        uploaded_at: now,
        validated_at: Some(now),
        invalidated_at: None,
        error_at: None,
        error_message: None,
        updated_at: now,
    };
    (document, key)
}

#[tokio::test]
async fn decrypt_produces_typed_readable_handle() {
    let storage = MemoryStorage::new();
    let (document, _) = stored_document(&storage, b"plain jpeg bytes").await;

    let mut session = DecryptedViewSession::new(document, Arc::new(storage), TIMEOUT);
    session.decrypt().await;

    assert!(session.error().is_none());
    let handle = session.handle().expect("handle should be resolved");
    assert_eq!(handle.mime_type(), "image/jpeg");
    assert_eq!(handle.len(), 16);
    assert_eq!(handle.read().await.unwrap(), b"plain jpeg bytes");
}

#[tokio::test]
async fn decrypt_is_a_noop_once_resolved() {
    let storage = MemoryStorage::new();
    let (document, _) = stored_document(&storage, b"stable").await;

    let mut session = DecryptedViewSession::new(document, Arc::new(storage), TIMEOUT);
    session.decrypt().await;
    let first_path = session.handle().unwrap().path().to_path_buf();

    session.decrypt().await;
    assert_eq!(session.handle().unwrap().path(), first_path);
}

#[tokio::test]
async fn missing_key_material_fails_fast() {
    let storage = MemoryStorage::new();
    let (mut document, _) = stored_document(&storage, b"content").await;
    document.dek = None;

    let mut session = DecryptedViewSession::new(document, Arc::new(storage), TIMEOUT);
    session.decrypt().await;

    assert!(session.handle().is_none());
    assert_eq!(session.error(), Some("Document has no key material"));
}

#[tokio::test]
async fn missing_content_fails_fast() {
    let storage = MemoryStorage::new();
    let (mut document, _) = stored_document(&storage, b"content").await;
    document.storage_key = String::new();
    document.url = String::new();

    let mut session = DecryptedViewSession::new(document, Arc::new(storage), TIMEOUT);
    session.decrypt().await;

    assert_eq!(session.error(), Some("Document has no uploaded content"));
}

#[tokio::test]
async fn tampered_blob_reports_generic_error() {
    let storage = MemoryStorage::new();
    let (document, _) = stored_document(&storage, b"integrity matters").await;

    let mut blob = storage.get_blob(&document.storage_key).unwrap();
    let last = blob.len() - 1;
    blob[last] ^= 0x01;
    storage.set_blob(&document.storage_key, blob);

    let mut session = DecryptedViewSession::new(document, Arc::new(storage), TIMEOUT);
    session.decrypt().await;

    assert!(session.handle().is_none());
    // No cryptographic internals in the user-facing message.
    assert_eq!(session.error(), Some("Document could not be decrypted"));
}

#[tokio::test]
async fn ensure_auto_triggers_once_but_not_after_failure() {
    let storage = MemoryStorage::new();
    let (document, _) = stored_document(&storage, b"auto").await;

    let mut session =
        DecryptedViewSession::new(document.clone(), Arc::new(storage.clone()), TIMEOUT);
    session.ensure().await;
    assert!(session.handle().is_some());

    // Break the blob, rebind, and fail once.
    storage.set_blob(&document.storage_key, vec![0u8; 4]);
    session.watch(document.clone());
    session.ensure().await;
    assert!(session.error().is_some());

    // ensure() never re-fires past a terminal error.
    let error = session.error().map(str::to_string);
    session.ensure().await;
    assert_eq!(session.error().map(str::to_string), error);
    assert!(session.handle().is_none());
}

#[tokio::test]
async fn revoke_releases_the_temp_file() {
    let storage = MemoryStorage::new();
    let (document, _) = stored_document(&storage, b"scarce resource").await;

    let mut session = DecryptedViewSession::new(document, Arc::new(storage), TIMEOUT);
    session.decrypt().await;
    let path = session.handle().unwrap().path().to_path_buf();
    assert!(path.exists());

    session.revoke();
    assert!(session.handle().is_none());
    assert!(!path.exists());
}

#[tokio::test]
async fn rebinding_releases_the_previous_handle() {
    let storage = MemoryStorage::new();
    let (first, _) = stored_document(&storage, b"first").await;
    let (second, _) = stored_document(&storage, b"second").await;

    let mut session = DecryptedViewSession::new(first, Arc::new(storage), TIMEOUT);
    session.decrypt().await;
    let first_path = session.handle().unwrap().path().to_path_buf();

    session.watch(second);
    assert!(!first_path.exists());
    assert!(session.handle().is_none());

    session.decrypt().await;
    assert_eq!(session.handle().unwrap().read().await.unwrap(), b"second");
}

#[tokio::test]
async fn retry_after_error_can_succeed() {
    let storage = MemoryStorage::new();
    let (document, _) = stored_document(&storage, b"eventually fine").await;

    // Corrupt, fail, then restore and retry explicitly.
    let good_blob = storage.get_blob(&document.storage_key).unwrap();
    storage.set_blob(&document.storage_key, vec![1u8; 8]);

    let mut session = DecryptedViewSession::new(document.clone(), Arc::new(storage.clone()), TIMEOUT);
    session.decrypt().await;
    assert!(session.error().is_some());

    storage.set_blob(&document.storage_key, good_blob);
    session.revoke();
    session.decrypt().await;

    assert!(session.error().is_none());
    assert_eq!(
        session.handle().unwrap().read().await.unwrap(),
        b"eventually fine"
    );
}
