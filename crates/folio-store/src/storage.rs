//! # Storage Backends
//!
//! The medium a [`CartStore`](crate::CartStore) persists into.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Storage                                         │
//! │                                                                         │
//! │   ┌──────────────────────────┐      ┌──────────────────────────┐        │
//! │   │  Sqlite(SqliteStorage)   │      │  Memory(MemoryStorage)   │        │
//! │   │  durable, survives       │      │  session only; used when │        │
//! │   │  restarts                │      │  SQLite is unavailable   │        │
//! │   └──────────────────────────┘      └──────────────────────────┘        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::{StoreError, StoreResult};
use crate::pool::SqliteStorage;

// =============================================================================
// Memory Storage
// =============================================================================

/// Process-local key/value map. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&self, key: &str) -> StoreResult<Option<String>> {
        let entries = self.lock()?;
        Ok(entries.get(key).cloned())
    }

    pub fn write(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut entries = self.lock()?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    pub fn remove(&self, key: &str) -> StoreResult<()> {
        let mut entries = self.lock()?;
        entries.remove(key);
        Ok(())
    }

    fn lock(&self) -> StoreResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| StoreError::Internal("memory storage lock poisoned".to_string()))
    }
}

// =============================================================================
// Storage
// =============================================================================

/// A storage medium: durable SQLite or the in-memory fallback.
#[derive(Debug, Clone)]
pub enum Storage {
    Sqlite(SqliteStorage),
    Memory(MemoryStorage),
}

impl Storage {
    /// A fresh, empty in-memory backend.
    pub fn memory() -> Self {
        Storage::Memory(MemoryStorage::new())
    }

    /// True if writes survive a restart.
    pub fn is_persistent(&self) -> bool {
        matches!(self, Storage::Sqlite(_))
    }

    pub async fn read(&self, key: &str) -> StoreResult<Option<String>> {
        match self {
            Storage::Sqlite(sqlite) => sqlite.read(key).await,
            Storage::Memory(memory) => memory.read(key),
        }
    }

    pub async fn write(&self, key: &str, value: &str) -> StoreResult<()> {
        match self {
            Storage::Sqlite(sqlite) => sqlite.write(key, value).await,
            Storage::Memory(memory) => memory.write(key, value),
        }
    }

    pub async fn remove(&self, key: &str) -> StoreResult<()> {
        match self {
            Storage::Sqlite(sqlite) => sqlite.remove(key).await,
            Storage::Memory(memory) => memory.remove(key),
        }
    }
}

impl From<SqliteStorage> for Storage {
    fn from(sqlite: SqliteStorage) -> Self {
        Storage::Sqlite(sqlite)
    }
}

impl From<MemoryStorage> for Storage {
    fn from(memory: MemoryStorage) -> Self {
        Storage::Memory(memory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::StorageConfig;

    #[tokio::test]
    async fn test_memory_storage_shares_entries_between_clones() {
        let storage = Storage::memory();
        let clone = storage.clone();

        storage.write("cart", "[]").await.unwrap();
        assert_eq!(clone.read("cart").await.unwrap().as_deref(), Some("[]"));

        clone.remove("cart").await.unwrap();
        assert_eq!(storage.read("cart").await.unwrap(), None);
        assert!(!storage.is_persistent());
    }

    #[tokio::test]
    async fn test_sqlite_variant_dispatches() {
        let sqlite = SqliteStorage::connect(StorageConfig::in_memory())
            .await
            .unwrap();
        let storage = Storage::from(sqlite);

        assert!(storage.is_persistent());
        storage.write("k", "v").await.unwrap();
        assert_eq!(storage.read("k").await.unwrap().as_deref(), Some("v"));
    }
}
