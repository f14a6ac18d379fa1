use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use documo_core::models::{Document, DocumentStatus};
use documo_core::AppError;
use documo_crypto::{encrypt, sha256_hex, DocumentKey};
use documo_db::{DocumentStore, DocumentTypeStore};
use documo_infra::LifecycleService;
use documo_storage::Storage;

use super::progress::{emit, ProgressSink, UploadEvent};
use super::types::UploadFile;
use crate::validator::validate_document;

/// One upload to run through the pipeline.
///
/// `key` lets a caller reuse a key it already holds; otherwise a fresh DEK
/// is generated. `recorded_hash` is supplied when the upload replaces a
/// previously submitted document and its digest must match.
pub struct UploadRequest {
    pub request_id: Uuid,
    pub type_id: String,
    pub file: UploadFile,
    pub key: Option<DocumentKey>,
    pub recorded_hash: Option<String>,
}

/// Drives one document from plaintext to a persisted, validated record.
///
/// Stages run strictly in order: hash → encrypt → store → persist →
/// validate → finalize. Plaintext never reaches storage or the document
/// record; only the envelope and the plaintext's digest do. Concurrent
/// uploads are independent, sharing nothing but the store handles.
#[derive(Clone)]
pub struct UploadPipeline {
    documents: Arc<dyn DocumentStore>,
    document_types: Arc<dyn DocumentTypeStore>,
    storage: Arc<dyn Storage>,
    lifecycle: Arc<LifecycleService>,
}

impl UploadPipeline {
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        document_types: Arc<dyn DocumentTypeStore>,
        storage: Arc<dyn Storage>,
        lifecycle: Arc<LifecycleService>,
    ) -> Self {
        Self {
            documents,
            document_types,
            storage,
            lifecycle,
        }
    }

    #[tracing::instrument(skip(self, upload, on_progress), fields(request_id = %upload.request_id, type_id = %upload.type_id))]
    pub async fn upload(
        &self,
        upload: UploadRequest,
        on_progress: Option<ProgressSink<'_>>,
    ) -> Result<Document, AppError> {
        emit(on_progress, UploadEvent::Stage(DocumentStatus::Uploading));

        let rules = self
            .document_types
            .get(&upload.type_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Unknown document type '{}'", upload.type_id))
            })?;

        let document_id = Uuid::new_v4();
        let hash = sha256_hex(&upload.file.data);
        let key = upload.key.unwrap_or_else(DocumentKey::generate);

        let envelope = encrypt(&upload.file.data, &key)
            .map_err(|e| AppError::Internal(format!("Encryption failed: {}", e)))?;

        emit(on_progress, UploadEvent::Transfer(0));

        let blob_name = format!("{}.enc", document_id);
        let (storage_key, url) = self
            .storage
            .upload(
                upload.request_id,
                &blob_name,
                "application/octet-stream",
                envelope,
            )
            .await
            .map_err(|e| AppError::Transient(format!("Blob upload failed: {}", e)))?;

        let now = Utc::now();
        let document = Document {
            id: document_id,
            request_id: upload.request_id,
            type_id: upload.type_id,
            file_name: upload.file.file_name.clone(),
            mime_type: upload.file.mime_type.clone(),
            original_size: upload.file.size(),
            storage_key,
            url,
            hash,
            dek: Some(key.to_base64()),
            validation_errors: vec![],
            uploaded_at: now,
            validated_at: None,
            invalidated_at: None,
            error_at: None,
            error_message: None,
            updated_at: now,
        };
        self.documents.insert(&document).await?;

        emit(on_progress, UploadEvent::Transfer(100));
        emit(on_progress, UploadEvent::Stage(DocumentStatus::Validating));

        match self
            .finalize(&document, &rules, &upload.file, upload.recorded_hash.as_deref())
            .await
        {
            Ok(finalized) => {
                emit(on_progress, UploadEvent::Stage(DocumentStatus::Valid));
                Ok(finalized)
            }
            Err(AppError::Validation(errors)) => {
                emit(on_progress, UploadEvent::Stage(DocumentStatus::Invalid));
                Err(AppError::Validation(errors))
            }
            Err(e) => {
                // Unexpected failure past the persist point: record it on
                // the document and re-raise.
                if let Err(record_err) = self
                    .documents
                    .record_error(document.id, Utc::now(), &e.to_string())
                    .await
                {
                    tracing::error!(
                        error = %record_err,
                        document_id = %document.id,
                        "Failed to record document error state"
                    );
                }
                emit(on_progress, UploadEvent::Stage(DocumentStatus::Error));
                Err(e)
            }
        }
    }

    async fn finalize(
        &self,
        document: &Document,
        rules: &documo_core::models::DocumentType,
        file: &UploadFile,
        recorded_hash: Option<&str>,
    ) -> Result<Document, AppError> {
        let outcome = validate_document(rules, file, recorded_hash);

        if !outcome.is_valid {
            tracing::debug!(
                document_id = %document.id,
                errors = ?outcome.errors,
                "Upload failed validation"
            );
            self.documents
                .update_validation(document.id, None, Some(Utc::now()), &outcome.errors)
                .await?;
            return Err(AppError::Validation(outcome.errors));
        }

        // Acceptance and its completion cascade go through the lifecycle
        // write path, the single mutator of post-creation timestamps.
        self.lifecycle.validate(document.id).await?;

        self.documents
            .get(document.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Document not found".to_string()))
    }
}
