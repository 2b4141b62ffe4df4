//! JSON file backend for [`PreferenceStore`].

use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Mutex,
};

use tracing::debug;

use crate::dao::storage::{StorageError, StorageResult};

use super::PreferenceStore;

/// Preference store persisted as a flat JSON object on disk.
///
/// The file is read on every lookup and rewritten on every change, so several
/// handles pointing at the same path stay consistent within a process.
#[derive(Debug)]
pub struct FilePreferences {
    path: PathBuf,
    write_gate: Mutex<()>,
}

impl FilePreferences {
    /// Store backed by `path`. The file is created lazily on the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_gate: Mutex::new(()),
        }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> StorageResult<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => {
                serde_json::from_str(&contents).map_err(|source| StorageError::Serialize {
                    path: self.path.clone(),
                    source,
                })
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(StorageError::io(&self.path, err)),
        }
    }

    fn save(&self, items: &BTreeMap<String, String>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| StorageError::io(parent, err))?;
        }
        let contents =
            serde_json::to_string_pretty(items).map_err(|source| StorageError::Serialize {
                path: self.path.clone(),
                source,
            })?;
        fs::write(&self.path, contents).map_err(|err| StorageError::io(&self.path, err))
    }

    fn modify<F>(&self, f: F) -> StorageResult<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let _gate = self.write_gate.lock().map_err(|_| StorageError::Poisoned)?;
        let mut items = self.load()?;
        f(&mut items);
        self.save(&items)
    }
}

impl PreferenceStore for FilePreferences {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let mut items = self.load()?;
        Ok(items.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.modify(|items| {
            items.insert(key.to_owned(), value.to_owned());
        })?;
        debug!(path = %self.path.display(), key, value, "preference stored");
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.modify(|items| {
            items.remove(key);
        })
    }
}
