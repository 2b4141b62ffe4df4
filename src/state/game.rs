//! Snapshot store for the game currently being tracked.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::{
    dao::models::{Action, Game, Player, Point, Team},
    state::writable::{ListenerId, Writable},
};

/// In-memory snapshot of the game being tracked.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GameState {
    /// Game being scored, if one was picked.
    pub current_game: Option<Game>,
    /// Point in progress within the current game.
    pub current_point: Option<Point>,
    /// Teams seen so far, in the order they were added.
    pub teams: Vec<Team>,
    /// Players added to the game, duplicates included.
    pub players: Vec<Player>,
    /// Points played, in the order they were added.
    pub points: Vec<Point>,
    /// Recorded disc actions, oldest first.
    pub actions: Vec<Action>,
}

/// Accumulates game data until [`reset`](GameStore::reset).
#[derive(Default)]
pub struct GameStore {
    store: Writable<GameState>,
}

impl GameStore {
    /// Create a store holding an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot.
    pub fn get(&self) -> Arc<GameState> {
        self.store.get()
    }

    /// Replace or clear the current game.
    pub fn set_current_game(&self, game: Option<Game>) -> Arc<GameState> {
        self.store.update(|state| GameState {
            current_game: game,
            ..state.clone()
        })
    }

    /// Replace or clear the current point.
    pub fn set_current_point(&self, point: Option<Point>) -> Arc<GameState> {
        self.store.update(|state| GameState {
            current_point: point,
            ..state.clone()
        })
    }

    /// Append a team.
    pub fn add_team(&self, team: Team) -> Arc<GameState> {
        self.append(|state| &mut state.teams, team)
    }

    /// Append a player. Duplicates are kept.
    pub fn add_player(&self, player: Player) -> Arc<GameState> {
        self.append(|state| &mut state.players, player)
    }

    /// Append a point.
    pub fn add_point(&self, point: Point) -> Arc<GameState> {
        self.append(|state| &mut state.points, point)
    }

    /// Append an action after the ones already recorded.
    pub fn add_action(&self, action: Action) -> Arc<GameState> {
        self.append(|state| &mut state.actions, action)
    }

    /// Go back to the empty initial snapshot.
    pub fn reset(&self) -> Arc<GameState> {
        self.store.set(GameState::default())
    }

    /// Receiver that observes every snapshot published from now on.
    pub fn subscribe(&self) -> watch::Receiver<Arc<GameState>> {
        self.store.subscribe()
    }

    /// Stream yielding the current snapshot first, then each change.
    pub fn stream(&self) -> WatchStream<Arc<GameState>> {
        self.store.stream()
    }

    /// See [`Writable::listen`].
    pub fn listen<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&Arc<GameState>) + Send + Sync + 'static,
    {
        self.store.listen(listener)
    }

    /// Detach a listener registered with [`listen`](Self::listen).
    pub fn unlisten(&self, id: ListenerId) -> bool {
        self.store.unlisten(id)
    }

    fn append<V, F>(&self, field: F, value: V) -> Arc<GameState>
    where
        F: FnOnce(&mut GameState) -> &mut Vec<V>,
    {
        self.store.update(|state| {
            let mut next = state.clone();
            field(&mut next).push(value);
            next
        })
    }
}
