//! Filesystem-backed storage.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::traits::{blob_key, Storage, StorageBackend, StorageError, StorageResult};

/// Stores envelopes under a root directory, one file per blob, mirroring the
/// storage-key layout.
#[derive(Clone)]
pub struct LocalStorage {
    root: PathBuf,
    base_url: String,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into(),
        }
    }

    fn resolve(&self, storage_key: &str) -> StorageResult<PathBuf> {
        // Keys are generated internally, but never trust them to stay inside
        // the root.
        if storage_key.is_empty()
            || storage_key.starts_with('/')
            || Path::new(storage_key)
                .components()
                .any(|c| matches!(c, std::path::Component::ParentDir))
        {
            return Err(StorageError::InvalidKey(storage_key.to_string()));
        }
        Ok(self.root.join(storage_key))
    }

    fn url_for(&self, storage_key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), storage_key)
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn upload(
        &self,
        request_id: Uuid,
        filename: &str,
        _content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<(String, String)> {
        let key = blob_key(request_id, filename);
        let path = self.resolve(&key)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &data).await.map_err(|e| {
            tracing::error!(error = %e, key = %key, "Local blob write failed");
            StorageError::UploadFailed(e.to_string())
        })?;

        tracing::debug!(key = %key, size_bytes = data.len(), "Local blob stored");
        Ok((key.clone(), self.url_for(&key)))
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        let path = self.resolve(storage_key)?;
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(storage_key.to_string()))
            }
            Err(e) => Err(StorageError::DownloadFailed(e.to_string())),
        }
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        let path = self.resolve(storage_key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(storage_key.to_string()))
            }
            Err(e) => Err(StorageError::DeleteFailed(e.to_string())),
        }
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        let path = self.resolve(storage_key)?;
        Ok(tokio::fs::try_exists(&path).await?)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_download_delete_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "http://localhost:8080/blobs");
        let request_id = Uuid::new_v4();

        let (key, url) = storage
            .upload(request_id, "card.jpg.enc", "application/octet-stream", vec![1, 2, 3])
            .await
            .unwrap();
        assert_eq!(key, format!("documents/{}/card.jpg.enc", request_id));
        assert!(url.ends_with(&key));

        assert_eq!(storage.download(&key).await.unwrap(), vec![1, 2, 3]);
        assert!(storage.exists(&key).await.unwrap());

        storage.delete(&key).await.unwrap();
        assert!(!storage.exists(&key).await.unwrap());
        assert!(matches!(
            storage.download(&key).await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_rejects_traversal_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "http://localhost:8080/blobs");
        assert!(matches!(
            storage.download("../../etc/passwd").await,
            Err(StorageError::InvalidKey(_))
        ));
    }
}
