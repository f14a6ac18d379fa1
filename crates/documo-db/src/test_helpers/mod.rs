//! In-memory store implementations for testing.

mod stores;

pub use stores::InMemoryStores;
