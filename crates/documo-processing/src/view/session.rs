//! Per-document decrypted-view session.
//!
//! A session fetches a document's envelope, imports its key, decrypts, and
//! exposes the plaintext as a revocable temporary-file handle. Failures are
//! captured on the session rather than thrown so a caller can offer a retry;
//! the handle is released on revoke, on rebind, or when the session drops.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use documo_core::models::Document;
use documo_crypto::{decrypt, CryptoError, DocumentKey};
use documo_storage::{Storage, StorageError};

/// A decrypted document materialized in a temporary file.
///
/// The file is owned exclusively by the session that produced it and is
/// deleted when the handle drops.
pub struct DecryptedHandle {
    file: tempfile::NamedTempFile,
    mime_type: String,
    len: u64,
}

impl DecryptedHandle {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub async fn read(&self) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(self.path()).await
    }
}

enum ViewState {
    Idle,
    Loading,
    Ready(DecryptedHandle),
    Failed(String),
}

pub struct DecryptedViewSession {
    document: Document,
    storage: Arc<dyn Storage>,
    fetch_timeout: Duration,
    state: ViewState,
}

impl DecryptedViewSession {
    pub fn new(document: Document, storage: Arc<dyn Storage>, fetch_timeout: Duration) -> Self {
        Self {
            document,
            storage,
            fetch_timeout,
            state: ViewState::Idle,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn handle(&self) -> Option<&DecryptedHandle> {
        match &self.state {
            ViewState::Ready(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            ViewState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ViewState::Loading)
    }

    /// Decrypt the watched document into a handle.
    ///
    /// No-op when a load is already in flight or a handle is already
    /// resolved. Every failure lands in [`error`](Self::error); the handle
    /// stays empty so the caller can retry explicitly.
    pub async fn decrypt(&mut self) {
        if matches!(self.state, ViewState::Loading | ViewState::Ready(_)) {
            return;
        }

        if !self.document.has_uploaded_file() || self.document.url.is_empty() {
            self.state = ViewState::Failed("Document has no uploaded content".to_string());
            return;
        }
        let Some(dek) = self.document.dek.clone() else {
            self.state = ViewState::Failed("Document has no key material".to_string());
            return;
        };

        self.state = ViewState::Loading;
        self.state = match self.fetch_and_decrypt(&dek).await {
            Ok(handle) => ViewState::Ready(handle),
            Err(message) => {
                tracing::warn!(
                    document_id = %self.document.id,
                    error = %message,
                    "Decrypted view failed"
                );
                ViewState::Failed(message)
            }
        };
    }

    /// Auto-trigger: decrypt when there is content, no handle, no load in
    /// flight and no recorded error. Never re-fires after a failure without
    /// an explicit [`decrypt`](Self::decrypt) or [`revoke`](Self::revoke).
    pub async fn ensure(&mut self) {
        if matches!(self.state, ViewState::Idle) && self.document.has_uploaded_file() {
            self.decrypt().await;
        }
    }

    /// Release the handle (deleting the temporary file) and clear any error.
    pub fn revoke(&mut self) {
        self.state = ViewState::Idle;
    }

    /// Rebind the session to another document, releasing the current handle.
    pub fn watch(&mut self, document: Document) {
        self.revoke();
        self.document = document;
    }

    async fn fetch_and_decrypt(&self, dek: &str) -> Result<DecryptedHandle, String> {
        let download = self.storage.download(&self.document.storage_key);
        let envelope = match tokio::time::timeout(self.fetch_timeout, download).await {
            Ok(Ok(envelope)) => envelope,
            Ok(Err(StorageError::NotFound(_))) => {
                return Err("Document content is no longer available".to_string());
            }
            Ok(Err(e)) => {
                tracing::debug!(error = %e, "Envelope fetch failed");
                return Err("Could not fetch document content".to_string());
            }
            Err(_) => {
                return Err("Timed out fetching document content".to_string());
            }
        };

        let key =
            DocumentKey::from_base64(dek).map_err(|_| "Document key material is invalid")?;

        let plaintext = match decrypt(&envelope, &key) {
            Ok(plaintext) => plaintext,
            // Tampered or wrong key: no crypto internals in the message.
            Err(CryptoError::Integrity) => {
                return Err("Document could not be decrypted".to_string());
            }
            Err(e) => {
                tracing::debug!(error = %e, "Envelope malformed");
                return Err("Document content is corrupted".to_string());
            }
        };

        let mut file = tempfile::NamedTempFile::new()
            .map_err(|e| format!("Could not allocate view buffer: {}", e))?;
        file.write_all(&plaintext)
            .and_then(|_| file.flush())
            .map_err(|e| format!("Could not materialize view: {}", e))?;

        Ok(DecryptedHandle {
            file,
            mime_type: self.document.mime_type.clone(),
            len: plaintext.len() as u64,
        })
    }
}
