//! In-memory storage implementation.

use super::{SceneRecord, Storage, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
#[derive(Default)]
pub struct MemoryStorage {
    records: RwLock<HashMap<String, SceneRecord>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Other(format!("Lock error: {}", e))
}

impl Storage for MemoryStorage {
    fn save(&self, id: &str, record: &SceneRecord) -> StorageResult<()> {
        let mut records = self.records.write().map_err(lock_error)?;
        records.insert(id.to_string(), record.clone());
        Ok(())
    }

    fn load(&self, id: &str) -> StorageResult<SceneRecord> {
        let records = self.records.read().map_err(lock_error)?;
        records
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    fn delete(&self, id: &str) -> StorageResult<()> {
        let mut records = self.records.write().map_err(lock_error)?;
        records.remove(id);
        Ok(())
    }

    fn list(&self) -> StorageResult<Vec<String>> {
        let records = self.records.read().map_err(lock_error)?;
        let mut ids: Vec<String> = records.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    fn exists(&self, id: &str) -> StorageResult<bool> {
        let records = self.records.read().map_err(lock_error)?;
        Ok(records.contains_key(id))
    }
}
