//! Light/dark theme preference, persisted and mirrored onto the display root.

use std::{fmt, str::FromStr, sync::Arc};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, warn};

use crate::{
    dao::{preferences::PreferenceStore, storage::StorageResult},
    display::DisplayEnvironment,
    state::writable::{ListenerId, Writable},
    styling::DARK_CLASS,
};

/// Preference key the theme is persisted under.
pub const THEME_STORAGE_KEY: &str = "theme";

/// Color scheme of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Default scheme; the root carries no `dark` class.
    #[default]
    Light,
    /// Dark scheme; the root carries the `dark` class.
    Dark,
}

impl Theme {
    /// Value as persisted in preference storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Whether the root `dark` class should be present.
    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }

    /// The other theme.
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names neither `light` nor `dark`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown theme `{0}`")]
pub struct UnknownTheme(pub String);

impl FromStr for Theme {
    type Err = UnknownTheme;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(UnknownTheme(other.to_owned())),
        }
    }
}

/// Where a theme change is mirrored when a display is attached.
struct ThemeSync {
    storage: Arc<dyn PreferenceStore>,
    display: Arc<dyn DisplayEnvironment>,
}

impl ThemeSync {
    fn apply(&self, theme: Theme) -> StorageResult<()> {
        self.storage.set_item(THEME_STORAGE_KEY, theme.as_str())?;
        self.display.set_root_class(DARK_CLASS, theme.is_dark());
        Ok(())
    }
}

/// Theme preference store.
///
/// With a display attached, every committed value (the initial one included)
/// is written to preference storage and mirrored onto the root `dark` class.
/// Without a display the store starts at [`Theme::Light`] and never touches
/// storage.
pub struct ThemeStore {
    store: Writable<Theme>,
    sync: Option<ThemeSync>,
}

impl ThemeStore {
    /// Resolve the initial theme and apply it.
    ///
    /// Lookup order is the persisted value, then the system dark preference,
    /// then [`Theme::Light`].
    pub fn new(
        storage: Arc<dyn PreferenceStore>,
        display: Option<Arc<dyn DisplayEnvironment>>,
    ) -> StorageResult<Self> {
        let Some(display) = display else {
            debug!("no display attached; theme defaults to light");
            return Ok(Self {
                store: Writable::new(Theme::Light),
                sync: None,
            });
        };

        let initial = initial_theme(storage.as_ref(), display.as_ref())?;
        let sync = ThemeSync { storage, display };
        sync.apply(initial)?;
        debug!(theme = %initial, "theme initialized");

        Ok(Self {
            store: Writable::new(initial),
            sync: Some(sync),
        })
    }

    /// Current theme.
    pub fn get(&self) -> Theme {
        *self.store.get()
    }

    /// Switch to `theme`.
    pub fn set(&self, theme: Theme) -> StorageResult<Theme> {
        self.update(|_| theme)
    }

    /// Switch to the theme derived from the current one.
    ///
    /// Storage and the root class are updated under the store's commit lock,
    /// before listeners run, so listeners may change the theme again. The new
    /// value stays committed when the storage write fails.
    pub fn update<F>(&self, f: F) -> StorageResult<Theme>
    where
        F: FnOnce(Theme) -> Theme,
    {
        let (next, applied) = self.store.commit_with(
            |current| f(*current),
            |next| match &self.sync {
                Some(sync) => sync.apply(**next),
                None => Ok(()),
            },
        );
        applied?;
        debug!(theme = %next, "theme changed");
        Ok(*next)
    }

    /// Flip between light and dark.
    pub fn toggle(&self) -> StorageResult<Theme> {
        self.update(Theme::toggled)
    }

    /// Whether changes are mirrored to storage and the display.
    pub fn is_attached(&self) -> bool {
        self.sync.is_some()
    }

    /// Receiver that observes every theme published from now on.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Theme>> {
        self.store.subscribe()
    }

    /// Stream yielding the current theme first, then each change.
    pub fn stream(&self) -> WatchStream<Arc<Theme>> {
        self.store.stream()
    }

    /// See [`Writable::listen`].
    pub fn listen<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&Arc<Theme>) + Send + Sync + 'static,
    {
        self.store.listen(listener)
    }

    /// Detach a listener registered with [`listen`](Self::listen).
    pub fn unlisten(&self, id: ListenerId) -> bool {
        self.store.unlisten(id)
    }
}

fn initial_theme(
    storage: &dyn PreferenceStore,
    display: &dyn DisplayEnvironment,
) -> StorageResult<Theme> {
    if let Some(saved) = storage.get_item(THEME_STORAGE_KEY)? {
        match saved.parse::<Theme>() {
            Ok(theme) => return Ok(theme),
            Err(err) => warn!(error = %err, "ignoring persisted theme"),
        }
    }

    if display.prefers_dark() {
        display.set_root_class(DARK_CLASS, true);
        return Ok(Theme::Dark);
    }

    Ok(Theme::Light)
}
