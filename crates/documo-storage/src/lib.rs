//! Blob storage for encrypted document envelopes.
//!
//! Everything that passes through this crate is ciphertext; plaintext never
//! reaches a backend. Backends share one `Storage` trait: a local
//! filesystem implementation, an S3 implementation (feature `storage-s3`)
//! and an in-memory implementation used by tests across the workspace.

pub mod memory;
mod traits;

#[cfg(feature = "storage-local")]
mod local;
#[cfg(feature = "storage-s3")]
mod s3;

pub use memory::MemoryStorage;
pub use traits::{Storage, StorageBackend, StorageError, StorageResult};

#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
