//! Documo Core (domain layer)
//!
//! Domain models for documents, requests, folders, document types and share
//! links, the derived document-status state machine, the application error
//! taxonomy and configuration loading.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

pub use config::{Config, SmtpConfig, StorageConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
