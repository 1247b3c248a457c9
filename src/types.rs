//! Common types used throughout the canchita service
//!
//! Boundary shapes serialize with the camelCase field names the product's
//! API has always exposed (`elo`, `teamAPlayers`, ...), so the internal
//! snake_case names carry explicit renames where the two disagree.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for players
pub type PlayerId = Uuid;

/// Unique identifier for matches
pub type MatchId = Uuid;

/// Which side of a match a participant played on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::A => write!(f, "A"),
            Side::B => write!(f, "B"),
        }
    }
}

/// Final outcome of a match, as submitted by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchOutcome {
    A,
    B,
    #[serde(rename = "draw")]
    Draw,
}

impl MatchOutcome {
    /// The winning side, if the match was not drawn
    pub fn winning_side(&self) -> Option<Side> {
        match self {
            MatchOutcome::A => Some(Side::A),
            MatchOutcome::B => Some(Side::B),
            MatchOutcome::Draw => None,
        }
    }
}

impl std::fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchOutcome::A => write!(f, "A"),
            MatchOutcome::B => write!(f, "B"),
            MatchOutcome::Draw => write!(f, "draw"),
        }
    }
}

/// One rating change in a player's append-only history
///
/// Both full rosters are recorded on every entry so that synergy
/// statistics can be re-derived from history alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[serde(rename = "oldElo")]
    pub old_rating: i32,
    #[serde(rename = "newElo")]
    pub new_rating: i32,
    pub changed_at: DateTime<Utc>,
    pub match_id: MatchId,
    #[serde(rename = "teamAPlayers")]
    pub team_a: Vec<String>,
    #[serde(rename = "teamBPlayers")]
    pub team_b: Vec<String>,
}

impl HistoryEntry {
    /// Whether this entry counts as a personal win for its owner.
    ///
    /// A positive rating delta is the win signal; it is guaranteed
    /// consistent with the resolver's own output, unlike a separately
    /// stored winner flag that could drift.
    pub fn is_personal_win(&self) -> bool {
        self.new_rating - self.old_rating > 0
    }
}

/// An immutable record of a played match
///
/// Corrections require a new compensating match; there is no update or
/// delete path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub id: MatchId,
    pub date: DateTime<Utc>,
    #[serde(rename = "teamAPlayers")]
    pub team_a: Vec<String>,
    #[serde(rename = "teamBPlayers")]
    pub team_b: Vec<String>,
    pub winner: MatchOutcome,
    pub goal_difference: u32,
}

impl MatchRecord {
    /// Which side a player name appears on, if any
    pub fn side_of(&self, name: &str) -> Option<Side> {
        if self.team_a.iter().any(|n| n == name) {
            Some(Side::A)
        } else if self.team_b.iter().any(|n| n == name) {
            Some(Side::B)
        } else {
            None
        }
    }
}

/// Inbound match submission payload
///
/// Rosters arrive as display names; the resolver maps them to player ids
/// before any rating work happens. `goal_difference` is unsigned, so a
/// negative value is rejected at the deserialization boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSubmission {
    #[serde(rename = "teamANames")]
    pub team_a_names: Vec<String>,
    #[serde(rename = "teamBNames")]
    pub team_b_names: Vec<String>,
    pub winner: MatchOutcome,
    pub goal_difference: u32,
    /// Optional match date; the frontend sends a naive local midnight
    #[serde(default)]
    pub date: Option<NaiveDateTime>,
}

/// Inbound team-balancing request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceRequest {
    pub player_names: Vec<String>,
}

/// Inbound player registration payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterPlayer {
    pub name: String,
}

/// Minimal player reference for roster listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRef {
    pub id: PlayerId,
    pub name: String,
}

/// One row of the rating ranking, sorted descending by rating
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub name: String,
    #[serde(rename = "elo")]
    pub rating: i32,
}

/// Win-rate statistics for one (player, teammate) pair
///
/// `win_rate` is a percentage in `[0, 100]`, the unit the API has always
/// reported.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynergyStat {
    pub mate: String,
    #[serde(rename = "victories")]
    pub wins_together: u32,
    #[serde(rename = "matches")]
    pub matches_together: u32,
    pub win_rate: f64,
}

/// Full synergy block for one player
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Synergies {
    pub best_mate: Option<String>,
    pub worst_mate: Option<String>,
    pub mates: Vec<SynergyStat>,
}

/// Per-player outbound summary: rating, counters, history and synergies
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    pub id: PlayerId,
    pub name: String,
    #[serde(rename = "elo")]
    pub rating: i32,
    #[serde(rename = "initialElo")]
    pub initial_rating: i32,
    #[serde(rename = "totalMatchesPlayed")]
    pub matches_played: u32,
    #[serde(rename = "winCount")]
    pub wins: u32,
    #[serde(rename = "lossCount")]
    pub losses: u32,
    #[serde(rename = "drawCount")]
    pub draws: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub history: Vec<HistoryEntry>,
    pub synergies: Synergies,
}

/// A pool split into two sides with minimal rating-sum difference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalancedPartition {
    pub team_a: Vec<String>,
    pub team_b: Vec<String>,
    #[serde(rename = "eloA")]
    pub rating_sum_a: i64,
    #[serde(rename = "eloB")]
    pub rating_sum_b: i64,
    pub difference: i64,
}
