pub mod file;
pub mod memory;

use crate::error::StorageError;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Durable string key-value store, the stand-in for the browser's local storage.
///
/// Each call is atomic on its own. Callers needing read-modify-write hold their own lock.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
