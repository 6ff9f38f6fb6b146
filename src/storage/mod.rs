//! Snapshot persistence
//!
//! Stores are synchronous and best effort. Only [`SnapshotStore`] talks to
//! them on behalf of the widget, and it never lets a store failure escape.

mod file;
mod memory;
mod snapshot;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use snapshot::{PersistedSuggestions, SnapshotStore, SNAPSHOT_KEY};

use crate::config::{StorageBackend, StorageSettings};
use std::sync::Arc;
use thiserror::Error;

/// Failure inside a key-value store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("quota exceeded: {size} bytes > {quota} bytes")]
    QuotaExceeded { size: usize, quota: usize },
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Narrow string key-value interface
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// Build the configured backend
pub fn open_store(settings: &StorageSettings) -> Arc<dyn KeyValueStore> {
    match settings.backend {
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
        StorageBackend::File => Arc::new(FileStore::new(settings.session_dir())),
    }
}
