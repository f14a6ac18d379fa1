//! Persistence interface consumed by the pipeline and lifecycle services.
//!
//! The services never talk to a database directly; they depend on these
//! traits. Production wires the Postgres repositories from [`crate::db`],
//! tests wire [`crate::test_helpers::InMemoryStores`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use documo_core::models::{Document, DocumentRequest, DocumentType, Folder, ShareLink};
use documo_core::AppError;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<Document>, AppError>;

    async fn insert(&self, document: &Document) -> Result<(), AppError>;

    async fn list_for_request(&self, request_id: Uuid) -> Result<Vec<Document>, AppError>;

    /// Overwrite the validation fields of a document. `validated_at` and
    /// `invalidated_at` are written as given; callers are responsible for
    /// the mutual-exclusion invariant.
    async fn update_validation(
        &self,
        id: Uuid,
        validated_at: Option<DateTime<Utc>>,
        invalidated_at: Option<DateTime<Utc>>,
        validation_errors: &[String],
    ) -> Result<Document, AppError>;

    /// Record an unrecoverable processing failure on a document.
    async fn record_error(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
        message: &str,
    ) -> Result<(), AppError>;
}

#[async_trait]
pub trait RequestStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<DocumentRequest>, AppError>;

    async fn insert(&self, request: &DocumentRequest) -> Result<(), AppError>;

    async fn set_completed_at(
        &self,
        id: Uuid,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<(), AppError>;

    async fn list_for_folder(&self, folder_id: Uuid) -> Result<Vec<DocumentRequest>, AppError>;
}

#[async_trait]
pub trait FolderStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<Folder>, AppError>;

    async fn insert(&self, folder: &Folder) -> Result<(), AppError>;

    async fn set_completed_at(
        &self,
        id: Uuid,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<(), AppError>;
}

#[async_trait]
pub trait ShareLinkStore: Send + Sync {
    /// The newest link for `request_id` that has not expired at `now`.
    async fn find_active(
        &self,
        request_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<ShareLink>, AppError>;

    async fn insert(&self, link: &ShareLink) -> Result<(), AppError>;

    async fn get_by_token(&self, token: &str) -> Result<Option<ShareLink>, AppError>;
}

#[async_trait]
pub trait DocumentTypeStore: Send + Sync {
    async fn get(&self, type_id: &str) -> Result<Option<DocumentType>, AppError>;

    async fn list(&self) -> Result<Vec<DocumentType>, AppError>;
}

/// Everything the lifecycle cascade needs to decide the new completion
/// state of a document's request and folder.
#[derive(Debug, Clone)]
pub struct CascadeSnapshot {
    pub document: Document,
    pub request: DocumentRequest,
    /// All documents uploaded against the request, the target included.
    pub request_documents: Vec<Document>,
    pub folder: Option<Folder>,
    /// All requests of the folder, the owning request included.
    pub folder_requests: Vec<DocumentRequest>,
}

/// The write set of one validate/invalidate cascade. Applied atomically:
/// either all three entities are updated or none is.
#[derive(Debug, Clone)]
pub struct CascadeUpdate {
    pub document_id: Uuid,
    pub validated_at: Option<DateTime<Utc>>,
    pub invalidated_at: Option<DateTime<Utc>>,
    pub validation_errors: Vec<String>,
    pub updated_at: DateTime<Utc>,
    pub request_id: Uuid,
    /// `None` leaves the request untouched; `Some(v)` writes `v`.
    pub request_completed_at: Option<Option<DateTime<Utc>>>,
    pub folder_id: Option<Uuid>,
    /// `None` leaves the folder untouched; `Some(v)` writes `v`.
    pub folder_completed_at: Option<Option<DateTime<Utc>>>,
}

#[async_trait]
pub trait LifecycleStore: Send + Sync {
    /// Load the document-request-folder triple. Fails with
    /// [`AppError::NotFound`] when the document or its request is missing.
    async fn load_cascade(&self, document_id: Uuid) -> Result<CascadeSnapshot, AppError>;

    /// Apply a cascade write set as one transaction.
    async fn apply_cascade(&self, update: &CascadeUpdate) -> Result<(), AppError>;
}
