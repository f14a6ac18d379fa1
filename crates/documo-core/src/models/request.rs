use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::document::{Document, DocumentStatus};

/// A collection request sent to one recipient: a set of required document
/// types plus the documents uploaded against them so far.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct DocumentRequest {
    pub id: Uuid,
    pub folder_id: Option<Uuid>,
    pub email: String,
    pub requested_type_ids: Vec<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DocumentRequest {
    /// Whether every requested document type has at least one valid document.
    ///
    /// `documents` is the full set of documents uploaded against this request.
    pub fn is_satisfied_by(&self, documents: &[Document]) -> bool {
        self.requested_type_ids.iter().all(|type_id| {
            documents
                .iter()
                .any(|d| &d.type_id == type_id && d.status() == DocumentStatus::Valid)
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RequestResponse {
    pub id: Uuid,
    pub folder_id: Option<Uuid>,
    pub email: String,
    pub requested_type_ids: Vec<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    /// Upload URL of the active share link, when one was issued.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_url: Option<String>,
}

impl From<DocumentRequest> for RequestResponse {
    fn from(request: DocumentRequest) -> Self {
        RequestResponse {
            id: request.id,
            folder_id: request.folder_id,
            email: request.email,
            requested_type_ids: request.requested_type_ids,
            expires_at: request.expires_at,
            completed_at: request.completed_at,
            created_at: request.created_at,
            upload_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_for(type_ids: &[&str]) -> DocumentRequest {
        let now = Utc::now();
        DocumentRequest {
            id: Uuid::new_v4(),
            folder_id: None,
            email: "claimant@example.com".to_string(),
            requested_type_ids: type_ids.iter().map(|s| s.to_string()).collect(),
            expires_at: None,
            accepted_at: None,
            rejected_at: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn valid_document(request_id: Uuid, type_id: &str) -> Document {
        let now = Utc::now();
        Document {
            id: Uuid::new_v4(),
            request_id,
            type_id: type_id.to_string(),
            file_name: "f.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
            original_size: 10,
            storage_key: "documents/x/f.pdf".to_string(),
            url: "https://blobs.example.com/documents/x/f.pdf".to_string(),
            hash: "00".to_string(),
            dek: None,
            validation_errors: vec![],
            uploaded_at: now,
            validated_at: Some(now),
            invalidated_at: None,
            error_at: None,
            error_message: None,
            updated_at: now,
        }
    }

    #[test]
    fn test_satisfied_when_every_type_has_a_valid_document() {
        let request = request_for(&["identity_card", "bank_statement"]);
        let docs = vec![
            valid_document(request.id, "identity_card"),
            valid_document(request.id, "bank_statement"),
        ];
        assert!(request.is_satisfied_by(&docs));
    }

    #[test]
    fn test_not_satisfied_with_missing_type() {
        let request = request_for(&["identity_card", "bank_statement"]);
        let docs = vec![valid_document(request.id, "identity_card")];
        assert!(!request.is_satisfied_by(&docs));
    }

    #[test]
    fn test_invalidated_document_does_not_count() {
        let request = request_for(&["identity_card"]);
        let mut doc = valid_document(request.id, "identity_card");
        doc.mark_invalidated(Utc::now(), "unreadable");
        assert!(!request.is_satisfied_by(&[doc]));
    }
}
