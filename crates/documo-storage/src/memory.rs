//! In-memory storage used by tests across the workspace.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::traits::{blob_key, Storage, StorageBackend, StorageError, StorageResult};

/// Stores blobs in a shared map. Clones see the same contents.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    blobs: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blob bytes for test assertions.
    pub fn get_blob(&self, storage_key: &str) -> Option<Vec<u8>> {
        self.blobs.lock().unwrap().get(storage_key).cloned()
    }

    /// Replace blob bytes, e.g. to simulate tampering.
    pub fn set_blob(&self, storage_key: &str, data: Vec<u8>) {
        self.blobs
            .lock()
            .unwrap()
            .insert(storage_key.to_string(), data);
    }

    pub fn blob_count(&self) -> usize {
        self.blobs.lock().unwrap().len()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn upload(
        &self,
        request_id: Uuid,
        filename: &str,
        _content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<(String, String)> {
        let key = blob_key(request_id, filename);
        self.blobs.lock().unwrap().insert(key.clone(), data);
        let url = format!("https://blobs.example.com/{}", key);
        Ok((key, url))
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        self.blobs
            .lock()
            .unwrap()
            .get(storage_key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(storage_key.to_string()))
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        self.blobs
            .lock()
            .unwrap()
            .remove(storage_key)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(storage_key.to_string()))
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        Ok(self.blobs.lock().unwrap().contains_key(storage_key))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}
