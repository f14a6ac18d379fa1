//! Postgres repositories.

pub mod document;
pub mod document_type;
pub mod folder;
pub mod lifecycle;
pub mod request;
pub mod share_link;

pub use document::DocumentRepository;
pub use document_type::DocumentTypeRepository;
pub use folder::FolderRepository;
pub use lifecycle::LifecycleRepository;
pub use request::RequestRepository;
pub use share_link::ShareLinkRepository;
