//! In-memory implementation of every store trait, backed by one shared map.
//!
//! Clones share state, so one instance can be handed to the pipeline, the
//! lifecycle service and the test assertions at the same time.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use documo_core::models::{Document, DocumentRequest, DocumentType, Folder, ShareLink};
use documo_core::AppError;

use crate::stores::{
    CascadeSnapshot, CascadeUpdate, DocumentStore, DocumentTypeStore, FolderStore,
    LifecycleStore, RequestStore, ShareLinkStore,
};

#[derive(Default)]
struct State {
    documents: HashMap<Uuid, Document>,
    requests: HashMap<Uuid, DocumentRequest>,
    folders: HashMap<Uuid, Folder>,
    share_links: Vec<ShareLink>,
    document_types: HashMap<String, DocumentType>,
}

#[derive(Clone, Default)]
pub struct InMemoryStores {
    state: Arc<Mutex<State>>,
}

impl InMemoryStores {
    pub fn new() -> Self {
        Self::default()
    }

    // Seeding helpers

    pub fn seed_document_type(&self, doc_type: DocumentType) {
        self.state
            .lock()
            .unwrap()
            .document_types
            .insert(doc_type.id.clone(), doc_type);
    }

    pub fn seed_request(&self, request: DocumentRequest) {
        self.state
            .lock()
            .unwrap()
            .requests
            .insert(request.id, request);
    }

    pub fn seed_folder(&self, folder: Folder) {
        self.state.lock().unwrap().folders.insert(folder.id, folder);
    }

    // Assertion helpers

    pub fn document(&self, id: Uuid) -> Option<Document> {
        self.state.lock().unwrap().documents.get(&id).cloned()
    }

    pub fn request(&self, id: Uuid) -> Option<DocumentRequest> {
        self.state.lock().unwrap().requests.get(&id).cloned()
    }

    pub fn folder(&self, id: Uuid) -> Option<Folder> {
        self.state.lock().unwrap().folders.get(&id).cloned()
    }

    pub fn share_link_count(&self, request_id: Uuid) -> usize {
        self.state
            .lock()
            .unwrap()
            .share_links
            .iter()
            .filter(|l| l.request_id == request_id)
            .count()
    }

    pub fn share_links(&self, request_id: Uuid) -> Vec<ShareLink> {
        self.state
            .lock()
            .unwrap()
            .share_links
            .iter()
            .filter(|l| l.request_id == request_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStores {
    async fn get(&self, id: Uuid) -> Result<Option<Document>, AppError> {
        Ok(self.state.lock().unwrap().documents.get(&id).cloned())
    }

    async fn insert(&self, document: &Document) -> Result<(), AppError> {
        self.state
            .lock()
            .unwrap()
            .documents
            .insert(document.id, document.clone());
        Ok(())
    }

    async fn list_for_request(&self, request_id: Uuid) -> Result<Vec<Document>, AppError> {
        let mut documents: Vec<Document> = self
            .state
            .lock()
            .unwrap()
            .documents
            .values()
            .filter(|d| d.request_id == request_id)
            .cloned()
            .collect();
        documents.sort_by_key(|d| d.uploaded_at);
        Ok(documents)
    }

    async fn update_validation(
        &self,
        id: Uuid,
        validated_at: Option<DateTime<Utc>>,
        invalidated_at: Option<DateTime<Utc>>,
        validation_errors: &[String],
    ) -> Result<Document, AppError> {
        let mut state = self.state.lock().unwrap();
        let document = state
            .documents
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Document not found".to_string()))?;
        document.validated_at = validated_at;
        document.invalidated_at = invalidated_at;
        document.validation_errors = validation_errors.to_vec();
        document.updated_at = Utc::now();
        Ok(document.clone())
    }

    async fn record_error(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
        message: &str,
    ) -> Result<(), AppError> {
        let mut state = self.state.lock().unwrap();
        let document = state
            .documents
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Document not found".to_string()))?;
        document.mark_errored(at, message);
        Ok(())
    }
}

#[async_trait]
impl RequestStore for InMemoryStores {
    async fn get(&self, id: Uuid) -> Result<Option<DocumentRequest>, AppError> {
        Ok(self.state.lock().unwrap().requests.get(&id).cloned())
    }

    async fn insert(&self, request: &DocumentRequest) -> Result<(), AppError> {
        self.state
            .lock()
            .unwrap()
            .requests
            .insert(request.id, request.clone());
        Ok(())
    }

    async fn set_completed_at(
        &self,
        id: Uuid,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<(), AppError> {
        let mut state = self.state.lock().unwrap();
        let request = state
            .requests
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Request not found".to_string()))?;
        request.completed_at = completed_at;
        request.updated_at = Utc::now();
        Ok(())
    }

    async fn list_for_folder(&self, folder_id: Uuid) -> Result<Vec<DocumentRequest>, AppError> {
        let mut requests: Vec<DocumentRequest> = self
            .state
            .lock()
            .unwrap()
            .requests
            .values()
            .filter(|r| r.folder_id == Some(folder_id))
            .cloned()
            .collect();
        requests.sort_by_key(|r| r.created_at);
        Ok(requests)
    }
}

#[async_trait]
impl FolderStore for InMemoryStores {
    async fn get(&self, id: Uuid) -> Result<Option<Folder>, AppError> {
        Ok(self.state.lock().unwrap().folders.get(&id).cloned())
    }

    async fn insert(&self, folder: &Folder) -> Result<(), AppError> {
        self.state
            .lock()
            .unwrap()
            .folders
            .insert(folder.id, folder.clone());
        Ok(())
    }

    async fn set_completed_at(
        &self,
        id: Uuid,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<(), AppError> {
        let mut state = self.state.lock().unwrap();
        let folder = state
            .folders
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Folder not found".to_string()))?;
        folder.completed_at = completed_at;
        folder.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl ShareLinkStore for InMemoryStores {
    async fn find_active(
        &self,
        request_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<ShareLink>, AppError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .share_links
            .iter()
            .filter(|l| l.request_id == request_id && !l.is_expired(now))
            .max_by_key(|l| l.created_at)
            .cloned())
    }

    async fn insert(&self, link: &ShareLink) -> Result<(), AppError> {
        self.state.lock().unwrap().share_links.push(link.clone());
        Ok(())
    }

    async fn get_by_token(&self, token: &str) -> Result<Option<ShareLink>, AppError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .share_links
            .iter()
            .find(|l| l.token == token)
            .cloned())
    }
}

#[async_trait]
impl DocumentTypeStore for InMemoryStores {
    async fn get(&self, type_id: &str) -> Result<Option<DocumentType>, AppError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .document_types
            .get(type_id)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<DocumentType>, AppError> {
        let mut types: Vec<DocumentType> = self
            .state
            .lock()
            .unwrap()
            .document_types
            .values()
            .cloned()
            .collect();
        types.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(types)
    }
}

#[async_trait]
impl LifecycleStore for InMemoryStores {
    async fn load_cascade(&self, document_id: Uuid) -> Result<CascadeSnapshot, AppError> {
        let state = self.state.lock().unwrap();

        let document = state
            .documents
            .get(&document_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Document not found".to_string()))?;

        let request = state
            .requests
            .get(&document.request_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Request not found".to_string()))?;

        let mut request_documents: Vec<Document> = state
            .documents
            .values()
            .filter(|d| d.request_id == request.id)
            .cloned()
            .collect();
        request_documents.sort_by_key(|d| d.uploaded_at);

        let (folder, folder_requests) = match request.folder_id {
            Some(folder_id) => {
                let folder = state
                    .folders
                    .get(&folder_id)
                    .cloned()
                    .ok_or_else(|| AppError::NotFound("Folder not found".to_string()))?;
                let mut folder_requests: Vec<DocumentRequest> = state
                    .requests
                    .values()
                    .filter(|r| r.folder_id == Some(folder_id))
                    .cloned()
                    .collect();
                folder_requests.sort_by_key(|r| r.created_at);
                (Some(folder), folder_requests)
            }
            None => (None, Vec::new()),
        };

        Ok(CascadeSnapshot {
            document,
            request,
            request_documents,
            folder,
            folder_requests,
        })
    }

    async fn apply_cascade(&self, update: &CascadeUpdate) -> Result<(), AppError> {
        let mut state = self.state.lock().unwrap();

        // All-or-nothing: check existence before mutating anything.
        if !state.documents.contains_key(&update.document_id) {
            return Err(AppError::NotFound("Document not found".to_string()));
        }
        if update.request_completed_at.is_some() && !state.requests.contains_key(&update.request_id)
        {
            return Err(AppError::NotFound("Request not found".to_string()));
        }
        if let (Some(folder_id), Some(_)) = (update.folder_id, update.folder_completed_at) {
            if !state.folders.contains_key(&folder_id) {
                return Err(AppError::NotFound("Folder not found".to_string()));
            }
        }

        let document = state.documents.get_mut(&update.document_id).unwrap();
        document.validated_at = update.validated_at;
        document.invalidated_at = update.invalidated_at;
        document.validation_errors = update.validation_errors.clone();
        document.updated_at = update.updated_at;

        if let Some(completed_at) = update.request_completed_at {
            let request = state.requests.get_mut(&update.request_id).unwrap();
            request.completed_at = completed_at;
            request.updated_at = update.updated_at;
        }

        if let (Some(folder_id), Some(completed_at)) =
            (update.folder_id, update.folder_completed_at)
        {
            let folder = state.folders.get_mut(&folder_id).unwrap();
            folder.completed_at = completed_at;
            folder.updated_at = update.updated_at;
        }

        Ok(())
    }
}
