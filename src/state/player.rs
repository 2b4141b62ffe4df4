//! Roster and active-point store.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::{
    dao::models::Player,
    state::writable::{ListenerId, Writable},
};

/// Snapshot of the roster and of the players on the field for the current point.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlayerState {
    /// Every player eligible for the team, in insertion order.
    pub roster: Vec<Player>,
    /// Players assigned to the point being played.
    pub active_point: Vec<Player>,
}

/// Roster store. No duplicate or consistency checks are performed.
#[derive(Default)]
pub struct PlayerStore {
    store: Writable<PlayerState>,
}

impl PlayerStore {
    /// Create a store with an empty roster and no active point.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot.
    pub fn get(&self) -> Arc<PlayerState> {
        self.store.get()
    }

    /// Append `player` to the roster.
    pub fn add_to_roster(&self, player: Player) -> Arc<PlayerState> {
        self.store.update(|state| {
            let mut roster = state.roster.clone();
            roster.push(player);
            PlayerState {
                roster,
                ..state.clone()
            }
        })
    }

    /// Replace the players of the current point.
    pub fn set_active_point(&self, players: Vec<Player>) -> Arc<PlayerState> {
        self.store.update(|state| PlayerState {
            active_point: players,
            ..state.clone()
        })
    }

    /// Drop every roster entry whose id is `player_id`, keeping the order of the rest.
    pub fn remove_from_roster(&self, player_id: &str) -> Arc<PlayerState> {
        self.store.update(|state| PlayerState {
            roster: state
                .roster
                .iter()
                .filter(|player| player.id != player_id)
                .cloned()
                .collect(),
            ..state.clone()
        })
    }

    /// Receiver that observes every snapshot published from now on.
    pub fn subscribe(&self) -> watch::Receiver<Arc<PlayerState>> {
        self.store.subscribe()
    }

    /// Stream yielding the current snapshot first, then each change.
    pub fn stream(&self) -> WatchStream<Arc<PlayerState>> {
        self.store.stream()
    }

    /// See [`Writable::listen`].
    pub fn listen<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&Arc<PlayerState>) + Send + Sync + 'static,
    {
        self.store.listen(listener)
    }

    /// Detach a listener registered with [`listen`](Self::listen).
    pub fn unlisten(&self, id: ListenerId) -> bool {
        self.store.unlisten(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(players: &[Player]) -> Vec<&str> {
        players.iter().map(|player| player.id.as_str()).collect()
    }

    #[test]
    fn roster_keeps_insertion_order_and_duplicates() {
        let store = PlayerStore::new();
        store.add_to_roster(Player::new("a", "Ada"));
        store.add_to_roster(Player::new("b", "Bo"));
        let state = store.add_to_roster(Player::new("a", "Ada again"));

        assert_eq!(ids(&state.roster), vec!["a", "b", "a"]);
        assert!(state.active_point.is_empty());
    }

    #[test]
    fn remove_drops_every_match_and_keeps_order() {
        let store = PlayerStore::new();
        for id in ["a", "b", "a", "c"] {
            store.add_to_roster(Player::new(id, id));
        }

        let state = store.remove_from_roster("a");
        assert_eq!(ids(&state.roster), vec!["b", "c"]);
    }

    #[test]
    fn remove_unknown_id_leaves_roster_unchanged() {
        let store = PlayerStore::new();
        store.add_to_roster(Player::new("a", "Ada"));
        let before = store.get();

        let after = store.remove_from_roster("zzz");
        assert_eq!(*before, *after);
    }

    #[test]
    fn active_point_is_replaced_wholesale() {
        let store = PlayerStore::new();
        store.add_to_roster(Player::new("a", "Ada"));
        store.set_active_point(vec![Player::new("a", "Ada"), Player::new("b", "Bo")]);
        let state = store.set_active_point(vec![Player::new("c", "Cy")]);

        assert_eq!(ids(&state.active_point), vec!["c"]);
        assert_eq!(ids(&state.roster), vec!["a"]);
    }

    #[test]
    fn earlier_snapshots_are_not_mutated() {
        let store = PlayerStore::new();
        let empty = store.get();
        store.add_to_roster(Player::new("a", "Ada"));

        assert!(empty.roster.is_empty());
        assert_eq!(store.get().roster.len(), 1);
    }
}
