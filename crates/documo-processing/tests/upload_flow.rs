//! End-to-end upload flow over in-memory stores and storage.

use std::sync::{Arc, Mutex};
use uuid::Uuid;

use chrono::Utc;
use documo_core::models::{DocumentRequest, DocumentStatus, DocumentType, Folder};
use documo_core::AppError;
use documo_crypto::{decrypt, sha256_hex, DocumentKey};
use documo_db::InMemoryStores;
use documo_infra::mailer::RecordingMailer;
use documo_infra::{LifecycleConfig, LifecycleService};
use documo_processing::{UploadEvent, UploadFile, UploadPipeline, UploadRequest};
use documo_storage::MemoryStorage;

struct Harness {
    stores: InMemoryStores,
    storage: MemoryStorage,
    mailer: RecordingMailer,
    lifecycle: Arc<LifecycleService>,
    pipeline: UploadPipeline,
}

fn harness() -> Harness {
    let stores = InMemoryStores::new();
    let storage = MemoryStorage::new();
    let mailer = RecordingMailer::new();
    let lifecycle = Arc::new(LifecycleService::new(
        Arc::new(stores.clone()),
        Arc::new(stores.clone()),
        Arc::new(mailer.clone()),
        LifecycleConfig {
            public_base_url: "https://docs.example.com".to_string(),
            share_link_ttl_days: 7,
        },
    ));
    let pipeline = UploadPipeline::new(
        Arc::new(stores.clone()),
        Arc::new(stores.clone()),
        Arc::new(storage.clone()),
        lifecycle.clone(),
    );
    Harness {
        stores,
        storage,
        mailer,
        lifecycle,
        pipeline,
    }
}

fn identity_card_type() -> DocumentType {
    DocumentType {
        id: "identity_card".to_string(),
        label: "Identity card".to_string(),
        accepted_mime_types: vec!["image/jpeg".to_string(), "application/pdf".to_string()],
        max_size: 4096,
    }
}

fn seed_request(h: &Harness, folder_id: Option<Uuid>, type_ids: &[&str]) -> DocumentRequest {
    let now = Utc::now();
    let request = DocumentRequest {
        id: Uuid::new_v4(),
        folder_id,
        email: "claimant@example.com".to_string(),
        requested_type_ids: type_ids.iter().map(|s| s.to_string()).collect(),
        expires_at: None,
        accepted_at: None,
        rejected_at: None,
        completed_at: None,
        created_at: now,
        updated_at: now,
    };
    h.stores.seed_request(request.clone());
    request
}

fn seed_folder(h: &Harness, type_ids: &[&str]) -> Folder {
    let now = Utc::now();
    let folder = Folder {
        id: Uuid::new_v4(),
        name: "Onboarding".to_string(),
        requested_type_ids: type_ids.iter().map(|s| s.to_string()).collect(),
        completed_at: None,
        created_at: now,
        updated_at: now,
    };
    h.stores.seed_folder(folder.clone());
    folder
}

fn jpeg_upload(request_id: Uuid, data: Vec<u8>) -> UploadRequest {
    UploadRequest {
        request_id,
        type_id: "identity_card".to_string(),
        file: UploadFile {
            file_name: "card.jpg".to_string(),
            mime_type: "image/jpeg".to_string(),
            data,
        },
        key: None,
        recorded_hash: None,
    }
}

// Scenario A: one required type, valid upload completes request and folder.
#[tokio::test]
async fn valid_upload_completes_request_and_folder() {
    let h = harness();
    h.stores.seed_document_type(identity_card_type());
    let folder = seed_folder(&h, &["identity_card"]);
    let request = seed_request(&h, Some(folder.id), &["identity_card"]);

    let document = h
        .pipeline
        .upload(jpeg_upload(request.id, vec![7u8; 128]), None)
        .await
        .unwrap();

    assert_eq!(document.status(), DocumentStatus::Valid);
    assert!(h.stores.request(request.id).unwrap().completed_at.is_some());
    assert!(h.stores.folder(folder.id).unwrap().completed_at.is_some());
}

// Scenario B: invalidation after completion reopens everything and notifies.
#[tokio::test]
async fn invalidation_after_completion_reopens_and_notifies() {
    let h = harness();
    h.stores.seed_document_type(identity_card_type());
    let folder = seed_folder(&h, &["identity_card"]);
    let request = seed_request(&h, Some(folder.id), &["identity_card"]);

    let document = h
        .pipeline
        .upload(jpeg_upload(request.id, vec![7u8; 128]), None)
        .await
        .unwrap();

    h.lifecycle
        .invalidate(document.id, "Document illisible")
        .await
        .unwrap();

    let document = h.stores.document(document.id).unwrap();
    assert_eq!(document.status(), DocumentStatus::Invalid);
    assert!(h.stores.request(request.id).unwrap().completed_at.is_none());
    assert!(h.stores.folder(folder.id).unwrap().completed_at.is_none());
    assert_eq!(h.stores.share_link_count(request.id), 1);

    let sent = h.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].reason, "Document illisible");
}

// Scenario C: wrong type and oversized with a matching hash reports exactly
// two errors.
#[tokio::test]
async fn wrong_type_and_oversized_report_both_errors() {
    let h = harness();
    h.stores.seed_document_type(identity_card_type());
    let request = seed_request(&h, None, &["identity_card"]);

    let data = vec![0u8; 8192];
    let recorded = sha256_hex(&data);
    let upload = UploadRequest {
        request_id: request.id,
        type_id: "identity_card".to_string(),
        file: UploadFile {
            file_name: "notes.txt".to_string(),
            mime_type: "text/plain".to_string(),
            data,
        },
        key: None,
        recorded_hash: Some(recorded),
    };

    let err = h.pipeline.upload(upload, None).await.unwrap_err();
    let AppError::Validation(errors) = err else {
        panic!("expected validation failure, got {:?}", err);
    };
    assert_eq!(errors.len(), 2);
    assert!(errors[0].contains("Invalid file type"));
    assert!(errors[1].contains("File too large"));

    // Upload failure mints no share link; only invalidation does.
    assert_eq!(h.stores.share_link_count(request.id), 0);
}

#[tokio::test]
async fn failed_validation_is_recorded_on_the_document() {
    let h = harness();
    h.stores.seed_document_type(identity_card_type());
    let request = seed_request(&h, None, &["identity_card"]);

    let upload = UploadRequest {
        request_id: request.id,
        type_id: "identity_card".to_string(),
        file: UploadFile {
            file_name: "huge.jpg".to_string(),
            mime_type: "image/jpeg".to_string(),
            data: vec![0u8; 8192],
        },
        key: None,
        recorded_hash: None,
    };

    let err = h.pipeline.upload(upload, None).await.unwrap_err();
    let AppError::Validation(raised) = err else {
        panic!("expected validation failure");
    };

    let documents = documo_db::DocumentStore::list_for_request(&h.stores, request.id)
        .await
        .unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].status(), DocumentStatus::Invalid);
    assert_eq!(documents[0].validation_errors, raised);
    assert!(h.stores.request(request.id).unwrap().completed_at.is_none());
}

#[tokio::test]
async fn stored_blob_is_ciphertext_and_decrypts_with_document_key() {
    let h = harness();
    h.stores.seed_document_type(identity_card_type());
    let request = seed_request(&h, None, &["identity_card"]);

    let plaintext = b"jpeg bytes, allegedly".to_vec();
    let document = h
        .pipeline
        .upload(jpeg_upload(request.id, plaintext.clone()), None)
        .await
        .unwrap();

    let blob = h.storage.get_blob(&document.storage_key).unwrap();
    assert_ne!(blob, plaintext);
    assert!(blob.len() > plaintext.len());

    let key = DocumentKey::from_base64(document.dek.as_deref().unwrap()).unwrap();
    assert_eq!(decrypt(&blob, &key).unwrap(), plaintext);
    assert_eq!(document.hash, sha256_hex(&plaintext));
}

#[tokio::test]
async fn caller_supplied_key_is_used() {
    let h = harness();
    h.stores.seed_document_type(identity_card_type());
    let request = seed_request(&h, None, &["identity_card"]);

    let key = DocumentKey::generate();
    let upload = UploadRequest {
        key: Some(key.clone()),
        ..jpeg_upload(request.id, vec![1u8; 64])
    };

    let document = h.pipeline.upload(upload, None).await.unwrap();
    assert_eq!(document.dek.as_deref(), Some(key.to_base64().as_str()));
}

#[tokio::test]
async fn progress_reports_stages_in_order() {
    let h = harness();
    h.stores.seed_document_type(identity_card_type());
    let request = seed_request(&h, None, &["identity_card"]);

    let events: Arc<Mutex<Vec<UploadEvent>>> = Arc::new(Mutex::new(Vec::new()));
    let sink_events = events.clone();
    let sink = move |event: UploadEvent| {
        sink_events.lock().unwrap().push(event);
    };

    h.pipeline
        .upload(
            jpeg_upload(request.id, vec![7u8; 128]),
            Some(&sink as &(dyn Fn(UploadEvent) + Send + Sync)),
        )
        .await
        .unwrap();

    let events = events.lock().unwrap();
    assert_eq!(
        *events,
        vec![
            UploadEvent::Stage(DocumentStatus::Uploading),
            UploadEvent::Transfer(0),
            UploadEvent::Transfer(100),
            UploadEvent::Stage(DocumentStatus::Validating),
            UploadEvent::Stage(DocumentStatus::Valid),
        ]
    );
}

#[tokio::test]
async fn concurrent_uploads_do_not_interfere() {
    let h = harness();
    h.stores.seed_document_type(identity_card_type());
    let request_a = seed_request(&h, None, &["identity_card"]);
    let request_b = seed_request(&h, None, &["identity_card"]);

    let (a, b) = tokio::join!(
        h.pipeline.upload(jpeg_upload(request_a.id, vec![1u8; 64]), None),
        h.pipeline.upload(jpeg_upload(request_b.id, vec![2u8; 64]), None),
    );
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_ne!(a.id, b.id);
    assert_ne!(a.dek, b.dek);
    assert!(h.stores.request(request_a.id).unwrap().completed_at.is_some());
    assert!(h.stores.request(request_b.id).unwrap().completed_at.is_some());
}

#[tokio::test]
async fn unknown_document_type_is_rejected_before_storage() {
    let h = harness();
    let request = seed_request(&h, None, &["identity_card"]);

    let upload = UploadRequest {
        type_id: "passport".to_string(),
        ..jpeg_upload(request.id, vec![1u8; 64])
    };

    assert!(matches!(
        h.pipeline.upload(upload, None).await,
        Err(AppError::NotFound(_))
    ));
    assert_eq!(h.storage.blob_count(), 0);
}

#[tokio::test]
async fn reupload_with_matching_recorded_hash_passes_integrity() {
    let h = harness();
    h.stores.seed_document_type(identity_card_type());
    let request = seed_request(&h, None, &["identity_card"]);

    let data = vec![9u8; 256];
    let recorded = sha256_hex(&data);
    let upload = UploadRequest {
        recorded_hash: Some(recorded),
        ..jpeg_upload(request.id, data)
    };

    let document = h.pipeline.upload(upload, None).await.unwrap();
    assert_eq!(document.status(), DocumentStatus::Valid);
}
