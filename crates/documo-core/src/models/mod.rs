//! Domain models.

pub mod document;
pub mod document_type;
pub mod folder;
pub mod request;
pub mod share_link;

pub use document::{Document, DocumentResponse, DocumentStatus, InFlightStage};
pub use document_type::DocumentType;
pub use folder::{Folder, FolderResponse};
pub use request::{DocumentRequest, RequestResponse};
pub use share_link::ShareLink;
