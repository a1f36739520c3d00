mod file;
mod memory;

pub use self::file::FileStore;
pub use self::memory::MemoryStore;

use crate::dao::storage::StorageResult;

/// Minimal string key-value store, modelled after browser local storage.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: String) -> StorageResult<()>;
}
