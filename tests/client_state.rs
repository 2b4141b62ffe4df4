use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use ultistats_client::{
    config::AppConfig,
    dao::{
        models::{Action, DiscEvent, Game, Player, Point, Team},
        preferences::{FilePreferences, PreferenceStore},
    },
    display::{ConsoleDisplay, DisplayEnvironment},
    state::{AppState, GameState, Theme, theme::THEME_STORAGE_KEY},
    styling::DARK_CLASS,
};

fn attached_state(
    dir: &TempDir,
    prefers_dark: bool,
) -> (Arc<AppState>, Arc<ConsoleDisplay>, Arc<FilePreferences>) {
    let config = AppConfig {
        preferences_path: dir.path().join("preferences.json"),
        ..AppConfig::default()
    };
    let preferences = Arc::new(FilePreferences::new(&config.preferences_path));
    let display = Arc::new(ConsoleDisplay::new(prefers_dark));
    let state = AppState::new(
        &config,
        preferences.clone(),
        Some(display.clone() as Arc<dyn DisplayEnvironment>),
    )
    .unwrap();
    (state, display, preferences)
}

#[test]
fn theme_choice_survives_restart() {
    let dir = TempDir::new().unwrap();

    let (state, display, preferences) = attached_state(&dir, true);
    assert_eq!(state.theme().get(), Theme::Dark);
    assert!(display.has_root_class(DARK_CLASS));

    state.theme().set(Theme::Light).unwrap();
    assert_eq!(
        preferences.get_item(THEME_STORAGE_KEY).unwrap().as_deref(),
        Some("light")
    );
    assert!(!display.has_root_class(DARK_CLASS));
    drop(state);

    let (restarted, display, _) = attached_state(&dir, true);
    assert_eq!(restarted.theme().get(), Theme::Light);
    assert!(!display.has_root_class(DARK_CLASS));
}

#[test]
fn game_flow_accumulates_until_reset() {
    let state = AppState::new(
        &AppConfig::default(),
        Arc::new(ultistats_client::dao::preferences::MemoryPreferences::new()),
        None,
    )
    .unwrap();
    let game = state.game();

    let commits = Arc::new(Mutex::new(0_usize));
    let counter = Arc::clone(&commits);
    game.listen(move |_| *counter.lock().unwrap() += 1);

    game.set_current_game(Some(Game::new("g1")));
    game.add_team(Team::new("t1", "Flyers"));
    game.add_team(Team::new("t2", "Hucks"));
    game.add_player(Player::new("p1", "Ada"));
    game.add_player(Player::new("p2", "Bo"));
    game.set_current_point(Some(Point::new("pt1", "g1")));
    game.add_point(Point::new("pt1", "g1"));
    game.add_point(Point::new("pt2", "g1"));
    game.add_action(Action::new("a1", DiscEvent::Pass));
    game.add_action(Action::new("a2", DiscEvent::Score));

    let snapshot = game.get();
    let ids = |records: Vec<&str>| records.join(",");
    assert_eq!(
        ids(snapshot.players.iter().map(|p| p.id.as_str()).collect()),
        "p1,p2"
    );
    assert_eq!(
        ids(snapshot.points.iter().map(|p| p.id.as_str()).collect()),
        "pt1,pt2"
    );
    assert_eq!(snapshot.teams.len(), 2);
    assert_eq!(snapshot.actions[1].event, Some(DiscEvent::Score));
    assert_eq!(
        snapshot.current_point.as_ref().map(|p| p.id.as_str()),
        Some("pt1")
    );

    game.reset();
    assert_eq!(*game.get(), GameState::default());
    // one call on registration plus eleven commits
    assert_eq!(*commits.lock().unwrap(), 12);

    // the snapshot taken before the reset is untouched
    assert_eq!(snapshot.teams.len(), 2);
}

#[test]
fn roster_management_round() {
    let state = AppState::new(
        &AppConfig::default(),
        Arc::new(ultistats_client::dao::preferences::MemoryPreferences::new()),
        None,
    )
    .unwrap();
    let players = state.players();

    for (id, name) in [("p1", "Ada"), ("p2", "Bo"), ("p3", "Cy")] {
        players.add_to_roster(Player::new(id, name));
    }
    let roster = players.get().roster.clone();
    players.set_active_point(roster[..2].to_vec());
    let snapshot = players.remove_from_roster("p2");

    let ids: Vec<_> = snapshot.roster.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["p1", "p3"]);
    // the active point is not pruned with the roster
    assert_eq!(snapshot.active_point.len(), 2);
}
