//! Client-side state: the observable stores and the context bundling them.

pub mod game;
pub mod player;
pub mod theme;
pub mod writable;

use std::sync::Arc;

use tracing::info;

use crate::{
    config::AppConfig,
    dao::preferences::PreferenceStore,
    display::DisplayEnvironment,
    error::InitError,
    services::api_client::ApiClient,
    styling::StylingConfig,
};

pub use self::game::{GameState, GameStore};
pub use self::player::{PlayerState, PlayerStore};
pub use self::theme::{Theme, ThemeStore};
pub use self::writable::{ListenerId, Writable};

/// Handle to an [`AppState`] shared across views and tasks.
pub type SharedState = Arc<AppState>;

/// Client context handed to every view: the stores plus the backend client.
///
/// Each instance is independent, so tests and embedders build as many as they
/// need instead of sharing process-wide singletons.
pub struct AppState {
    theme: ThemeStore,
    players: PlayerStore,
    game: GameStore,
    api: ApiClient,
    styling: StylingConfig,
}

impl AppState {
    /// Assemble the context from configuration and the injected capabilities.
    ///
    /// `display` is `None` when the client runs without a rendering surface.
    pub fn new(
        config: &AppConfig,
        preferences: Arc<dyn PreferenceStore>,
        display: Option<Arc<dyn DisplayEnvironment>>,
    ) -> Result<SharedState, InitError> {
        let theme = ThemeStore::new(preferences, display)?;
        let api = ApiClient::new(&config.api_base_url)?;
        info!(
            api_base_url = %config.api_base_url,
            theme = %theme.get(),
            "client state ready"
        );

        Ok(Arc::new(Self {
            theme,
            players: PlayerStore::new(),
            game: GameStore::new(),
            api,
            styling: StylingConfig::default(),
        }))
    }

    /// Theme preference store.
    pub fn theme(&self) -> &ThemeStore {
        &self.theme
    }

    /// Roster and active-point store.
    pub fn players(&self) -> &PlayerStore {
        &self.players
    }

    /// Tracked game store.
    pub fn game(&self) -> &GameStore {
        &self.game
    }

    /// Backend API client.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Styling configuration the theme store's root class belongs to.
    pub fn styling(&self) -> &StylingConfig {
        &self.styling
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::{models::Player, preferences::MemoryPreferences};

    #[test]
    fn contexts_are_isolated() {
        let config = AppConfig::default();
        let first = AppState::new(&config, Arc::new(MemoryPreferences::new()), None).unwrap();
        let second = AppState::new(&config, Arc::new(MemoryPreferences::new()), None).unwrap();

        first.players().add_to_roster(Player::new("p1", "Ada"));

        assert_eq!(first.players().get().roster.len(), 1);
        assert!(second.players().get().roster.is_empty());
        assert_eq!(first.api().base_url(), "http://localhost:8000/api");
        assert_eq!(first.theme().get(), Theme::Light);
        assert_eq!(first.styling().dark_class(), Some(crate::styling::DARK_CLASS));
    }
}
