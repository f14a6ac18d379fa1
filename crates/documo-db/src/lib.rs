//! Documo Database Layer
//!
//! This crate provides the persistence interface (the `stores` traits) and
//! its Postgres implementation, plus in-memory store implementations used by
//! tests across the workspace.

// Module declarations
pub mod db;
pub mod stores;
pub mod test_helpers;

// Re-exports: store traits and cascade types
pub use stores::{
    CascadeSnapshot, CascadeUpdate, DocumentStore, DocumentTypeStore, FolderStore,
    LifecycleStore, RequestStore, ShareLinkStore,
};

// Re-exports: Postgres repositories and helpers
pub use db::{
    DocumentRepository, DocumentTypeRepository, FolderRepository, LifecycleRepository,
    RequestRepository, ShareLinkRepository,
};

// Re-exports: in-memory stores for tests
pub use test_helpers::InMemoryStores;
