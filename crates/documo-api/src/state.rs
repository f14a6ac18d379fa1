use std::sync::Arc;

use documo_core::Config;
use documo_db::{
    DocumentStore, DocumentTypeStore, FolderStore, RequestStore, ShareLinkStore,
};
use documo_infra::LifecycleService;
use documo_processing::UploadPipeline;
use documo_storage::Storage;

/// Shared application state handed to every handler.
pub struct AppState {
    pub config: Config,
    pub documents: Arc<dyn DocumentStore>,
    pub requests: Arc<dyn RequestStore>,
    pub folders: Arc<dyn FolderStore>,
    pub share_links: Arc<dyn ShareLinkStore>,
    pub document_types: Arc<dyn DocumentTypeStore>,
    pub storage: Arc<dyn Storage>,
    pub lifecycle: Arc<LifecycleService>,
    pub pipeline: UploadPipeline,
}
