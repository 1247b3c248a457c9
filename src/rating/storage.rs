//! League storage interface and implementations
//!
//! This module defines the persistence collaborator for player and match
//! state, with an in-memory reference implementation and a mock for
//! testing. The ledger writes through this interface before mutating its
//! own state, so a storage failure never leaves half a match applied.

use crate::error::LeagueError;
use crate::types::{HistoryEntry, MatchId, MatchRecord, PlayerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

/// Stored state for one player, including the append-only history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub name: String,
    pub rating: i32,
    pub initial_rating: i32,
    pub matches_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub history: Vec<HistoryEntry>,
    pub created_at: DateTime<Utc>,
}

impl PlayerRecord {
    /// Create a record for a newly registered player
    pub fn new(id: PlayerId, name: String, initial_rating: i32, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name,
            rating: initial_rating,
            initial_rating,
            matches_played: 0,
            wins: 0,
            losses: 0,
            draws: 0,
            goals_for: 0,
            goals_against: 0,
            history: Vec::new(),
            created_at,
        }
    }

    /// Counter invariant: every played match is a win, a loss or a draw
    pub fn counters_consistent(&self) -> bool {
        self.wins + self.losses + self.draws == self.matches_played
    }
}

/// Trait for league persistence operations
pub trait LeagueStore: Send + Sync {
    /// Load a player's stored record
    fn load_player(&self, player_id: &PlayerId) -> crate::error::Result<Option<PlayerRecord>>;

    /// Store or update a player's record (new rating and appended history)
    fn save_player(&self, record: &PlayerRecord) -> crate::error::Result<()>;

    /// Persist an immutable match record
    fn save_match(&self, record: &MatchRecord) -> crate::error::Result<()>;

    /// All recorded matches, in recording order
    fn load_matches(&self) -> crate::error::Result<Vec<MatchRecord>>;
}

/// In-memory league store implementation
#[derive(Debug, Default)]
pub struct InMemoryLeagueStore {
    players: RwLock<HashMap<PlayerId, PlayerRecord>>,
    matches: RwLock<Vec<MatchRecord>>,
}

impl InMemoryLeagueStore {
    /// Create a new empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded matches
    pub fn match_count(&self) -> crate::error::Result<usize> {
        let matches = self.matches.read().map_err(|_| LeagueError::StorageError {
            message: "Failed to acquire matches read lock".to_string(),
        })?;

        Ok(matches.len())
    }
}

impl LeagueStore for InMemoryLeagueStore {
    fn load_player(&self, player_id: &PlayerId) -> crate::error::Result<Option<PlayerRecord>> {
        let players = self.players.read().map_err(|_| LeagueError::StorageError {
            message: "Failed to acquire players read lock".to_string(),
        })?;

        Ok(players.get(player_id).cloned())
    }

    fn save_player(&self, record: &PlayerRecord) -> crate::error::Result<()> {
        let mut players = self.players.write().map_err(|_| LeagueError::StorageError {
            message: "Failed to acquire players write lock".to_string(),
        })?;

        players.insert(record.id, record.clone());
        Ok(())
    }

    fn save_match(&self, record: &MatchRecord) -> crate::error::Result<()> {
        let mut matches = self.matches.write().map_err(|_| LeagueError::StorageError {
            message: "Failed to acquire matches write lock".to_string(),
        })?;

        matches.push(record.clone());
        Ok(())
    }

    fn load_matches(&self) -> crate::error::Result<Vec<MatchRecord>> {
        let matches = self.matches.read().map_err(|_| LeagueError::StorageError {
            message: "Failed to acquire matches read lock".to_string(),
        })?;

        Ok(matches.clone())
    }
}

/// Mock league store for testing
///
/// Records every save call and can be told to fail, for exercising the
/// all-or-nothing commit path.
#[derive(Debug, Default)]
pub struct MockLeagueStore {
    inner: InMemoryLeagueStore,
    saved_players: RwLock<Vec<PlayerId>>,
    saved_matches: RwLock<Vec<MatchId>>,
    fail_player_saves: AtomicBool,
    fail_match_saves: AtomicBool,
}

impl MockLeagueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `save_player` fail with a storage error
    pub fn fail_player_saves(&self, fail: bool) {
        self.fail_player_saves.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `save_match` fail with a storage error
    pub fn fail_match_saves(&self, fail: bool) {
        self.fail_match_saves.store(fail, Ordering::SeqCst);
    }

    /// Player ids passed to `save_player`, in call order
    pub fn saved_players(&self) -> Vec<PlayerId> {
        self.saved_players
            .read()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Match ids passed to `save_match`, in call order
    pub fn saved_matches(&self) -> Vec<MatchId> {
        self.saved_matches
            .read()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl LeagueStore for MockLeagueStore {
    fn load_player(&self, player_id: &PlayerId) -> crate::error::Result<Option<PlayerRecord>> {
        self.inner.load_player(player_id)
    }

    fn save_player(&self, record: &PlayerRecord) -> crate::error::Result<()> {
        if self.fail_player_saves.load(Ordering::SeqCst) {
            return Err(LeagueError::StorageError {
                message: format!("Injected save_player failure for '{}'", record.name),
            }
            .into());
        }

        if let Ok(mut calls) = self.saved_players.write() {
            calls.push(record.id);
        }

        self.inner.save_player(record)
    }

    fn save_match(&self, record: &MatchRecord) -> crate::error::Result<()> {
        if self.fail_match_saves.load(Ordering::SeqCst) {
            return Err(LeagueError::StorageError {
                message: format!("Injected save_match failure for match {}", record.id),
            }
            .into());
        }

        if let Ok(mut calls) = self.saved_matches.write() {
            calls.push(record.id);
        }

        self.inner.save_match(record)
    }

    fn load_matches(&self) -> crate::error::Result<Vec<MatchRecord>> {
        self.inner.load_matches()
    }
}
