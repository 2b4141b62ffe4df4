//! Records exchanged with the statistics backend and held by the client stores.
//!
//! The stores treat these as opaque values (only [`Player::id`] is ever
//! inspected). Fields the client does not know about are kept in `extra` so a
//! record fetched from the backend can be sent back unchanged.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Unknown JSON fields carried alongside a typed record.
pub type Extra = Map<String, Value>;

/// Player roles in ultimate frisbee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerRole {
    Handler,
    Cutter,
    Hybrid,
}

/// Gender a player is listed under, for mixed-division lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

/// Division a team competes in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Division {
    Open,
    Mixed,
    Women,
}

/// Lifecycle of a game on the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// Created but no point played yet.
    #[default]
    NotStarted,
    /// Points are being recorded.
    OnGoing,
    /// Final score reached; no further points.
    Finished,
}

/// Where the pull landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PullLocation {
    InBounds,
    OutOfBounds,
}

/// Whether the receiving team caught the pull or picked it up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PullCatchOrLift {
    Catch,
    Lift,
}

/// Events that can occur during a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscEvent {
    Pass,
    Defense,
    Drop,
    Turnover,
    Timeout,
    Score,
    Injury,
    Call,
}

/// Calls a player can make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallType {
    Foul,
    Violation,
    Travel,
    Pick,
    Strip,
    DiscSpace,
    Stall,
    DoubleTeam,
    Out,
    LostControl,
    DangerousPlay,
}

/// Throw used for a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThrowType {
    Backhand,
    Forehand,
    Other,
}

/// Outcome of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallResult {
    Accepted,
    Contested,
    Retracted,
}

/// A player of a team roster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Identifier used for roster membership.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Jersey number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<PlayerRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Player {
    /// Minimal player record carrying only an id and a display name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A team taking part in games.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Team {
    /// Backend identifier.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Home city, empty when unknown.
    #[serde(default)]
    pub city: String,
    /// The backend historically spells this field `disivion`.
    #[serde(default, alias = "disivion", skip_serializing_if = "Option::is_none")]
    pub division: Option<Division>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Team {
    /// Minimal team record carrying only an id and a display name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Score of a single team.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamScore {
    #[serde(default)]
    pub team_id: String,
    #[serde(default)]
    pub score: u32,
}

/// Scoreboard of both teams of a game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    #[serde(default)]
    pub team_1: TeamScore,
    #[serde(default)]
    pub team_2: TeamScore,
}

/// A tracked game between two teams.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team1: Option<Team>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team2: Option<Team>,
    #[serde(default)]
    pub status: GameStatus,
    #[serde(default)]
    pub score: Scores,
    /// Points keyed by id, in the order they were played.
    #[serde(default)]
    pub points: IndexMap<String, Point>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Game {
    /// Game record with only an id; everything else at its default.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

/// How the disc was put into play at the start of a point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PullData {
    #[serde(default)]
    pub pulling_player: String,
    #[serde(default)]
    pub pulling_team: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_location: Option<PullLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catch_or_lift: Option<PullCatchOrLift>,
    #[serde(default)]
    pub brick_called: bool,
    #[serde(default)]
    pub receiving_player: String,
    #[serde(default)]
    pub receiving_team: String,
}

/// One scoring point of a game.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub id: String,
    #[serde(default)]
    pub game_id: String,
    #[serde(default)]
    pub scoring_team: String,
    #[serde(default)]
    pub scoring_player_id: String,
    #[serde(default)]
    pub assisting_player_id: String,
    /// Players on the field for team 1.
    #[serde(default)]
    pub team1_players: Vec<String>,
    /// Players on the field for team 2.
    #[serde(default)]
    pub team2_players: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_data: Option<PullData>,
    /// Actions of the point keyed by id, in play order.
    #[serde(default)]
    pub course_of_the_point: IndexMap<String, Action>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Point {
    /// Empty point of game `game_id`.
    pub fn new(id: impl Into<String>, game_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            game_id: game_id.into(),
            ..Self::default()
        }
    }
}

/// A single in-game event during a point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Backend identifier.
    pub id: String,
    /// What happened; absent on records the backend has not classified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<DiscEvent>,
    /// Player the event is attributed to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throw_type: Option<ThrowType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_type: Option<CallType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_result: Option<CallResult>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Action {
    /// Action of the given kind with no player attached.
    pub fn new(id: impl Into<String>, event: DiscEvent) -> Self {
        Self {
            id: id.into(),
            event: Some(event),
            ..Self::default()
        }
    }
}
