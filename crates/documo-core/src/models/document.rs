use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle stage of a document, derived from its timestamp fields.
///
/// Never stored: keeping the status as a pure function of the timestamps
/// removes the possibility of a stored enum drifting out of sync with them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Pending,
    Uploading,
    Uploaded,
    Validating,
    Valid,
    Invalid,
    Error,
}

/// Transient pipeline stage. Only an in-flight upload carries one; a
/// document read back from the store never does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InFlightStage {
    Uploading,
    Validating,
}

/// A single collected document, belonging to one request and one document type.
///
/// `url` points at the *encrypted* blob; `hash` is the SHA-256 of the
/// plaintext, computed before encryption. `dek` holds the document's
/// base64-exported encryption key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Document {
    pub id: Uuid,
    pub request_id: Uuid,
    pub type_id: String,
    pub file_name: String,
    pub mime_type: String,
    pub original_size: i64,
    pub storage_key: String,
    pub url: String,
    pub hash: String,
    pub dek: Option<String>,
    pub validation_errors: Vec<String>,
    pub uploaded_at: DateTime<Utc>,
    pub validated_at: Option<DateTime<Utc>>,
    pub invalidated_at: Option<DateTime<Utc>>,
    pub error_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Derived status for a persisted document (no in-flight stage).
    pub fn status(&self) -> DocumentStatus {
        self.status_with(None)
    }

    /// Derived status, with an optional transient stage marker supplied by
    /// an in-flight pipeline. Precedence, first match wins:
    /// error → invalid → valid → uploaded/in-flight → pending.
    pub fn status_with(&self, in_flight: Option<InFlightStage>) -> DocumentStatus {
        if self.error_at.is_some() {
            return DocumentStatus::Error;
        }
        if self.invalidated_at.is_some() {
            return DocumentStatus::Invalid;
        }
        if self.validated_at.is_some() {
            return DocumentStatus::Valid;
        }
        if self.has_uploaded_file() {
            return match in_flight {
                Some(InFlightStage::Validating) => DocumentStatus::Validating,
                Some(InFlightStage::Uploading) | None => DocumentStatus::Uploaded,
            };
        }
        match in_flight {
            Some(InFlightStage::Uploading) => DocumentStatus::Uploading,
            _ => DocumentStatus::Pending,
        }
    }

    pub fn has_uploaded_file(&self) -> bool {
        !self.storage_key.is_empty()
    }

    /// Accept the document. Clears any invalidation so that validated and
    /// invalidated are never simultaneously set.
    pub fn mark_validated(&mut self, now: DateTime<Utc>) {
        self.validated_at = Some(now);
        self.invalidated_at = None;
        self.validation_errors.clear();
        self.updated_at = now;
    }

    /// Reject the document with a single reason, overwriting any previously
    /// recorded validation errors.
    pub fn mark_invalidated(&mut self, now: DateTime<Utc>, reason: &str) {
        self.invalidated_at = Some(now);
        self.validated_at = None;
        self.validation_errors = vec![reason.to_string()];
        self.updated_at = now;
    }

    /// Record an unrecoverable processing failure.
    pub fn mark_errored(&mut self, now: DateTime<Utc>, message: &str) {
        self.error_at = Some(now);
        self.error_message = Some(message.to_string());
        self.updated_at = now;
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DocumentResponse {
    pub id: Uuid,
    pub request_id: Uuid,
    pub type_id: String,
    pub file_name: String,
    pub mime_type: String,
    pub original_size: i64,
    pub status: DocumentStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub validation_errors: Vec<String>,
    pub uploaded_at: DateTime<Utc>,
    pub validated_at: Option<DateTime<Utc>>,
    pub invalidated_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl From<Document> for DocumentResponse {
    fn from(doc: Document) -> Self {
        let status = doc.status();
        DocumentResponse {
            id: doc.id,
            request_id: doc.request_id,
            type_id: doc.type_id,
            file_name: doc.file_name,
            mime_type: doc.mime_type,
            original_size: doc.original_size,
            status,
            validation_errors: doc.validation_errors,
            uploaded_at: doc.uploaded_at,
            validated_at: doc.validated_at,
            invalidated_at: doc.invalidated_at,
            updated_at: doc.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_document() -> Document {
        let now = Utc::now();
        Document {
            id: Uuid::new_v4(),
            request_id: Uuid::new_v4(),
            type_id: "identity_card".to_string(),
            file_name: "card.jpg".to_string(),
            mime_type: "image/jpeg".to_string(),
            original_size: 1024,
            storage_key: "documents/abc/card.jpg".to_string(),
            url: "https://blobs.example.com/documents/abc/card.jpg".to_string(),
            hash: "deadbeef".to_string(),
            dek: Some("a2V5".to_string()),
            validation_errors: vec![],
            uploaded_at: now,
            validated_at: None,
            invalidated_at: None,
            error_at: None,
            error_message: None,
            updated_at: now,
        }
    }

    #[test]
    fn test_uploaded_document_defaults_to_uploaded() {
        let doc = test_document();
        assert_eq!(doc.status(), DocumentStatus::Uploaded);
    }

    #[test]
    fn test_no_blob_means_pending() {
        let mut doc = test_document();
        doc.storage_key = String::new();
        assert_eq!(doc.status(), DocumentStatus::Pending);
    }

    #[test]
    fn test_in_flight_markers() {
        let mut doc = test_document();
        doc.storage_key = String::new();
        assert_eq!(
            doc.status_with(Some(InFlightStage::Uploading)),
            DocumentStatus::Uploading
        );

        let doc = test_document();
        assert_eq!(
            doc.status_with(Some(InFlightStage::Validating)),
            DocumentStatus::Validating
        );
    }

    #[test]
    fn test_error_takes_precedence_over_invalidated() {
        let mut doc = test_document();
        let now = Utc::now();
        doc.mark_invalidated(now, "illisible");
        doc.mark_errored(now, "storage write failed");
        assert_eq!(doc.status(), DocumentStatus::Error);
    }

    #[test]
    fn test_invalidated_takes_precedence_over_validated_timestamps() {
        let mut doc = test_document();
        let now = Utc::now();
        doc.mark_validated(now);
        assert_eq!(doc.status(), DocumentStatus::Valid);
        doc.mark_invalidated(now, "blurry scan");
        assert_eq!(doc.status(), DocumentStatus::Invalid);
    }

    #[test]
    fn test_validated_and_invalidated_are_mutually_exclusive() {
        let mut doc = test_document();
        let now = Utc::now();
        doc.mark_validated(now);
        doc.mark_invalidated(now, "wrong document");
        assert!(doc.validated_at.is_none());
        assert!(doc.invalidated_at.is_some());

        doc.mark_validated(now);
        assert!(doc.validated_at.is_some());
        assert!(doc.invalidated_at.is_none());
        assert!(doc.validation_errors.is_empty());
    }

    #[test]
    fn test_invalidation_overwrites_previous_errors() {
        let mut doc = test_document();
        let now = Utc::now();
        doc.validation_errors = vec!["old error".to_string(), "another".to_string()];
        doc.mark_invalidated(now, "Document illisible");
        assert_eq!(doc.validation_errors, vec!["Document illisible".to_string()]);
    }

    #[test]
    fn test_response_carries_derived_status() {
        let mut doc = test_document();
        doc.mark_validated(Utc::now());
        let response = DocumentResponse::from(doc);
        assert_eq!(response.status, DocumentStatus::Valid);
    }
}
