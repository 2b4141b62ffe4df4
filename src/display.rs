//! Capabilities of the surface the client renders to.

use std::{
    collections::BTreeSet,
    sync::{PoisonError, RwLock},
};

use tracing::debug;

/// Rendering surface the stores can query and decorate.
///
/// Stores receive this as an `Option`: `None` means the client runs without a
/// display (tests, batch jobs) and must not apply any visual side effect.
pub trait DisplayEnvironment: Send + Sync {
    /// Whether the system asks for a dark color scheme.
    fn prefers_dark(&self) -> bool;
    /// Add (`present == true`) or remove a class on the document root.
    fn set_root_class(&self, class: &str, present: bool);
    /// Whether the document root currently carries `class`.
    fn has_root_class(&self, class: &str) -> bool;
}

/// Display backed by an in-process class set, used by the command-line front end.
#[derive(Debug, Default)]
pub struct ConsoleDisplay {
    prefers_dark: bool,
    root_classes: RwLock<BTreeSet<String>>,
}

impl ConsoleDisplay {
    /// Display reporting the given system color-scheme preference.
    pub fn new(prefers_dark: bool) -> Self {
        Self {
            prefers_dark,
            root_classes: RwLock::default(),
        }
    }

    /// Classes currently applied to the root, sorted.
    pub fn root_classes(&self) -> Vec<String> {
        self.root_classes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }
}

impl DisplayEnvironment for ConsoleDisplay {
    fn prefers_dark(&self) -> bool {
        self.prefers_dark
    }

    fn set_root_class(&self, class: &str, present: bool) {
        let mut classes = self
            .root_classes
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let changed = if present {
            classes.insert(class.to_owned())
        } else {
            classes.remove(class)
        };
        if changed {
            debug!(class, present, "root class updated");
        }
    }

    fn has_root_class(&self, class: &str) -> bool {
        self.root_classes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(class)
    }
}
