//! Storage abstraction for persistence.

mod memory;
mod record;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use memory::MemoryStorage;
pub use record::{ParsedRecord, RECORD_VERSION, SceneRecord};

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Board not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serialization(e.to_string())
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for board storage backends.
///
/// Calls are synchronous and are made by the host, never from inside the
/// pointer handling path.
#[cfg(not(target_arch = "wasm32"))]
pub trait Storage: Send + Sync {
    /// Save a record under `id`, replacing any previous one.
    fn save(&self, id: &str, record: &SceneRecord) -> StorageResult<()>;

    /// Load the record saved under `id`.
    fn load(&self, id: &str) -> StorageResult<SceneRecord>;

    /// Delete a record. Deleting a missing id is not an error.
    fn delete(&self, id: &str) -> StorageResult<()>;

    /// List all saved ids.
    fn list(&self) -> StorageResult<Vec<String>>;

    /// Check if a record exists.
    fn exists(&self, id: &str) -> StorageResult<bool>;
}

/// Trait for board storage backends (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait Storage {
    fn save(&self, id: &str, record: &SceneRecord) -> StorageResult<()>;
    fn load(&self, id: &str) -> StorageResult<SceneRecord>;
    fn delete(&self, id: &str) -> StorageResult<()>;
    fn list(&self) -> StorageResult<Vec<String>>;
    fn exists(&self, id: &str) -> StorageResult<bool>;
}
