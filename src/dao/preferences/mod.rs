//! Key-value preference storage used to persist client settings between runs.

mod file;
mod memory;

pub use file::FilePreferences;
pub use memory::MemoryPreferences;

use crate::dao::storage::StorageResult;

/// Abstraction over a string key-value store (browser-style local storage).
pub trait PreferenceStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;
    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;
    /// Remove the value stored under `key`. Missing keys are not an error.
    fn remove_item(&self, key: &str) -> StorageResult<()>;
}
