use std::{collections::HashMap, sync::RwLock};

use crate::dao::storage::{StorageError, StorageResult};

use super::PreferenceStore;

/// Volatile preference store, used by tests and headless runs.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryPreferences {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with the given entries.
    pub fn with_items<I, K, V>(items: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let items = items
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self {
            items: RwLock::new(items),
        }
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let guard = self.items.read().map_err(|_| StorageError::Poisoned)?;
        Ok(guard.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut guard = self.items.write().map_err(|_| StorageError::Poisoned)?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        let mut guard = self.items.write().map_err(|_| StorageError::Poisoned)?;
        guard.remove(key);
        Ok(())
    }
}
