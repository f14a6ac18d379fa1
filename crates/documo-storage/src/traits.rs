use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("blob not found: {0}")]
    NotFound(String),
    #[error("upload failed: {0}")]
    UploadFailed(String),
    #[error("download failed: {0}")]
    DownloadFailed(String),
    #[error("delete failed: {0}")]
    DeleteFailed(String),
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("storage configuration error: {0}")]
    ConfigError(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    S3,
    Local,
    Memory,
}

/// Backend-agnostic blob store for encrypted envelopes.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store an envelope under `documents/{request_id}/{filename}`.
    /// Returns `(storage_key, url)`.
    async fn upload(
        &self,
        request_id: Uuid,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<(String, String)>;

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>>;

    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    fn backend_type(&self) -> StorageBackend;
}

/// Storage key for a document blob. Filenames are sanitized by the caller;
/// the key layout is shared by every backend.
pub(crate) fn blob_key(request_id: Uuid, filename: &str) -> String {
    format!("documents/{}/{}", request_id, filename)
}
