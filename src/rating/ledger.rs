//! The rating ledger: authoritative owner of player state
//!
//! All player records and their history entries live here, behind one
//! `RwLock`. A match commit happens entirely inside a single write
//! section: it writes through the store first, then swaps the staged
//! records into memory, so readers observe every match either fully
//! applied or not at all.

use crate::error::LeagueError;
use crate::rating::storage::{LeagueStore, PlayerRecord};
use crate::types::{HistoryEntry, MatchRecord, PlayerId, PlayerRef, RankingEntry, Side};
use crate::utils::{current_timestamp, generate_player_id};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

/// One participant's share of a match commit
#[derive(Debug, Clone)]
pub struct ParticipantUpdate {
    pub player_id: PlayerId,
    pub side: Side,
    pub delta: i32,
}

#[derive(Debug, Default)]
struct LedgerState {
    players: HashMap<PlayerId, PlayerRecord>,
    names: HashMap<String, PlayerId>,
}

/// Authoritative in-memory rating state, persisted through a [`LeagueStore`]
pub struct RatingLedger {
    state: RwLock<LedgerState>,
    store: Arc<dyn LeagueStore>,
    initial_rating: i32,
    rating_floor: i32,
}

impl RatingLedger {
    /// Create an empty ledger backed by the given store
    pub fn new(store: Arc<dyn LeagueStore>, initial_rating: i32, rating_floor: i32) -> Self {
        Self {
            state: RwLock::new(LedgerState::default()),
            store,
            initial_rating,
            rating_floor,
        }
    }

    fn read_state(&self) -> crate::error::Result<std::sync::RwLockReadGuard<'_, LedgerState>> {
        self.state.read().map_err(|_| {
            LeagueError::InternalError {
                message: "Failed to acquire ledger read lock".to_string(),
            }
            .into()
        })
    }

    fn write_state(&self) -> crate::error::Result<std::sync::RwLockWriteGuard<'_, LedgerState>> {
        self.state.write().map_err(|_| {
            LeagueError::InternalError {
                message: "Failed to acquire ledger write lock".to_string(),
            }
            .into()
        })
    }

    /// Register a new player at the configured initial rating.
    ///
    /// Display names are unique; a duplicate is rejected before any state
    /// changes.
    pub fn register_player(&self, name: &str) -> crate::error::Result<PlayerRef> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LeagueError::InvalidInput {
                reason: "Player name cannot be empty".to_string(),
            }
            .into());
        }

        let mut state = self.write_state()?;
        if state.names.contains_key(name) {
            return Err(LeagueError::InvalidInput {
                reason: format!("Player name already taken: {}", name),
            }
            .into());
        }

        let record = PlayerRecord::new(
            generate_player_id(),
            name.to_string(),
            self.initial_rating,
            current_timestamp(),
        );

        // Persist first so an unsaved player never becomes visible
        self.store.save_player(&record)?;

        let player_ref = PlayerRef {
            id: record.id,
            name: record.name.clone(),
        };
        state.names.insert(record.name.clone(), record.id);
        state.players.insert(record.id, record);

        info!("Registered player '{}' at rating {}", name, self.initial_rating);
        Ok(player_ref)
    }

    /// Resolve a display name to a player id
    pub fn resolve_name(&self, name: &str) -> crate::error::Result<PlayerId> {
        let state = self.read_state()?;
        state.names.get(name).copied().ok_or_else(|| {
            LeagueError::PlayerNotFound {
                name: name.to_string(),
            }
            .into()
        })
    }

    /// Current rating of a player
    pub fn rating_of(&self, player_id: &PlayerId) -> crate::error::Result<i32> {
        let state = self.read_state()?;
        state
            .players
            .get(player_id)
            .map(|record| record.rating)
            .ok_or_else(|| {
                LeagueError::PlayerNotFound {
                    name: player_id.to_string(),
                }
                .into()
            })
    }

    /// A player's history entries, in creation order
    pub fn history_of(&self, player_id: &PlayerId) -> crate::error::Result<Vec<HistoryEntry>> {
        let state = self.read_state()?;
        state
            .players
            .get(player_id)
            .map(|record| record.history.clone())
            .ok_or_else(|| {
                LeagueError::PlayerNotFound {
                    name: player_id.to_string(),
                }
                .into()
            })
    }

    /// Full stored record for a player, looked up by display name
    pub fn player_named(&self, name: &str) -> crate::error::Result<PlayerRecord> {
        let state = self.read_state()?;
        let id = state.names.get(name).ok_or_else(|| LeagueError::PlayerNotFound {
            name: name.to_string(),
        })?;
        state
            .players
            .get(id)
            .cloned()
            .ok_or_else(|| {
                LeagueError::InternalError {
                    message: format!("Name index points at missing player record: {}", name),
                }
                .into()
            })
    }

    /// All registered players, sorted by display name
    pub fn players(&self) -> crate::error::Result<Vec<PlayerRef>> {
        let state = self.read_state()?;
        let mut players: Vec<PlayerRef> = state
            .players
            .values()
            .map(|record| PlayerRef {
                id: record.id,
                name: record.name.clone(),
            })
            .collect();
        players.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(players)
    }

    /// Number of registered players
    pub fn player_count(&self) -> crate::error::Result<usize> {
        Ok(self.read_state()?.players.len())
    }

    /// Ranking projection: players by rating descending.
    ///
    /// Recomputed from current state on every call; nothing is cached, so
    /// there is no cache to fall out of sync.
    pub fn ranking(&self) -> crate::error::Result<Vec<RankingEntry>> {
        let state = self.read_state()?;
        let mut entries: Vec<RankingEntry> = state
            .players
            .values()
            .map(|record| RankingEntry {
                name: record.name.clone(),
                rating: record.rating,
            })
            .collect();
        entries.sort_by(|a, b| b.rating.cmp(&a.rating).then_with(|| a.name.cmp(&b.name)));
        Ok(entries)
    }

    /// Current ratings for a set of display names, read under one lock so
    /// the result is a consistent snapshot.
    pub fn ratings_for(&self, names: &[String]) -> crate::error::Result<Vec<(String, i32)>> {
        let state = self.read_state()?;
        let mut ratings = Vec::with_capacity(names.len());
        for name in names {
            let id = state.names.get(name).ok_or_else(|| LeagueError::PlayerNotFound {
                name: name.clone(),
            })?;
            let record =
                state
                    .players
                    .get(id)
                    .ok_or_else(|| LeagueError::InternalError {
                        message: format!("Name index points at missing player record: {}", name),
                    })?;
            ratings.push((record.name.clone(), record.rating));
        }
        Ok(ratings)
    }

    /// Apply one match to every participant as a single all-or-nothing unit.
    ///
    /// Staged copies of each participant are updated (delta clamped at the
    /// rating floor, history appended, counters bumped), persisted through
    /// the store, and only then swapped into memory. Any failure along the
    /// way leaves the ledger exactly as it was.
    pub fn commit_match(
        &self,
        record: &MatchRecord,
        updates: &[ParticipantUpdate],
    ) -> crate::error::Result<()> {
        let mut state = self.write_state()?;

        // Stage every participant before persisting anything
        let mut staged: Vec<PlayerRecord> = Vec::with_capacity(updates.len());
        for update in updates {
            let current = state.players.get(&update.player_id).ok_or_else(|| {
                LeagueError::PlayerNotFound {
                    name: update.player_id.to_string(),
                }
            })?;

            let mut player = current.clone();
            let old_rating = player.rating;
            let new_rating = (old_rating + update.delta).max(self.rating_floor);

            player.rating = new_rating;
            player.history.push(HistoryEntry {
                old_rating,
                new_rating,
                changed_at: record.date,
                match_id: record.id,
                team_a: record.team_a.clone(),
                team_b: record.team_b.clone(),
            });

            player.matches_played += 1;
            match record.winner.winning_side() {
                Some(winning_side) if winning_side == update.side => {
                    player.wins += 1;
                    player.goals_for += record.goal_difference;
                }
                Some(_) => {
                    player.losses += 1;
                    player.goals_against += record.goal_difference;
                }
                None => {
                    player.draws += 1;
                }
            }

            debug!(
                "Staged update for '{}': {} -> {} ({:+})",
                player.name, old_rating, new_rating, update.delta
            );
            staged.push(player);
        }

        // Write-through: the store sees the whole match before memory does.
        // The match record goes last, so a failure part-way never surfaces
        // a recorded match whose rating updates were not applied.
        for player in &staged {
            self.store.save_player(player)?;
        }
        self.store.save_match(record)?;

        for player in staged {
            state.players.insert(player.id, player);
        }

        info!(
            "Committed match {}: {} vs {} participants, winner {}",
            record.id,
            record.team_a.len(),
            record.team_b.len(),
            record.winner
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::storage::{InMemoryLeagueStore, MockLeagueStore};
    use crate::types::MatchOutcome;
    use crate::utils::generate_match_id;

    fn ledger_with_store(store: Arc<dyn LeagueStore>) -> RatingLedger {
        RatingLedger::new(store, 1000, 0)
    }

    fn ledger() -> RatingLedger {
        ledger_with_store(Arc::new(InMemoryLeagueStore::new()))
    }

    fn match_record(team_a: &[&str], team_b: &[&str], winner: MatchOutcome, gd: u32) -> MatchRecord {
        MatchRecord {
            id: generate_match_id(),
            date: current_timestamp(),
            team_a: team_a.iter().map(|n| n.to_string()).collect(),
            team_b: team_b.iter().map(|n| n.to_string()).collect(),
            winner,
            goal_difference: gd,
        }
    }

    #[test]
    fn test_register_and_resolve() {
        let ledger = ledger();
        let ana = ledger.register_player("Ana").unwrap();

        assert_eq!(ledger.resolve_name("Ana").unwrap(), ana.id);
        assert_eq!(ledger.rating_of(&ana.id).unwrap(), 1000);
        assert!(ledger.history_of(&ana.id).unwrap().is_empty());
    }

    #[test]
    fn test_register_rejects_duplicates_and_blank_names() {
        let ledger = ledger();
        ledger.register_player("Ana").unwrap();

        assert!(ledger.register_player("Ana").is_err());
        assert!(ledger.register_player("   ").is_err());
        assert_eq!(ledger.player_count().unwrap(), 1);
    }

    #[test]
    fn test_unknown_player_lookups_fail() {
        let ledger = ledger();
        assert!(ledger.resolve_name("Nadie").is_err());
        assert!(ledger.player_named("Nadie").is_err());
        assert!(ledger.ratings_for(&["Nadie".to_string()]).is_err());
    }

    #[test]
    fn test_commit_applies_deltas_history_and_counters() {
        let ledger = ledger();
        let ana = ledger.register_player("Ana").unwrap();
        let bruno = ledger.register_player("Bruno").unwrap();

        let record = match_record(&["Ana"], &["Bruno"], MatchOutcome::A, 2);
        let updates = vec![
            ParticipantUpdate {
                player_id: ana.id,
                side: Side::A,
                delta: 16,
            },
            ParticipantUpdate {
                player_id: bruno.id,
                side: Side::B,
                delta: -16,
            },
        ];

        ledger.commit_match(&record, &updates).unwrap();

        let ana_record = ledger.player_named("Ana").unwrap();
        assert_eq!(ana_record.rating, 1016);
        assert_eq!(ana_record.wins, 1);
        assert_eq!(ana_record.losses, 0);
        assert_eq!(ana_record.matches_played, 1);
        assert_eq!(ana_record.goals_for, 2);
        assert_eq!(ana_record.goals_against, 0);
        assert!(ana_record.counters_consistent());

        let bruno_record = ledger.player_named("Bruno").unwrap();
        assert_eq!(bruno_record.rating, 984);
        assert_eq!(bruno_record.losses, 1);
        assert_eq!(bruno_record.goals_against, 2);

        let history = ledger.history_of(&ana.id).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].old_rating, 1000);
        assert_eq!(history[0].new_rating, 1016);
        assert_eq!(history[0].match_id, record.id);
        assert_eq!(history[0].team_a, vec!["Ana"]);
        assert_eq!(history[0].team_b, vec!["Bruno"]);
    }

    #[test]
    fn test_commit_records_draw_counters() {
        let ledger = ledger();
        let ana = ledger.register_player("Ana").unwrap();
        let bruno = ledger.register_player("Bruno").unwrap();

        let record = match_record(&["Ana"], &["Bruno"], MatchOutcome::Draw, 0);
        let updates = vec![
            ParticipantUpdate {
                player_id: ana.id,
                side: Side::A,
                delta: 0,
            },
            ParticipantUpdate {
                player_id: bruno.id,
                side: Side::B,
                delta: 0,
            },
        ];

        ledger.commit_match(&record, &updates).unwrap();

        let ana_record = ledger.player_named("Ana").unwrap();
        assert_eq!(ana_record.draws, 1);
        assert_eq!(ana_record.wins, 0);
        assert_eq!(ana_record.goals_for, 0);
        assert!(ana_record.counters_consistent());
    }

    #[test]
    fn test_rating_clamped_at_floor() {
        let store: Arc<dyn LeagueStore> = Arc::new(InMemoryLeagueStore::new());
        let ledger = RatingLedger::new(store, 10, 0);
        let ana = ledger.register_player("Ana").unwrap();
        let bruno = ledger.register_player("Bruno").unwrap();

        let record = match_record(&["Ana"], &["Bruno"], MatchOutcome::B, 0);
        let updates = vec![
            ParticipantUpdate {
                player_id: ana.id,
                side: Side::A,
                delta: -16,
            },
            ParticipantUpdate {
                player_id: bruno.id,
                side: Side::B,
                delta: 16,
            },
        ];

        ledger.commit_match(&record, &updates).unwrap();

        // 10 - 16 would go negative; it clamps to the floor instead
        assert_eq!(ledger.rating_of(&ana.id).unwrap(), 0);
        let history = ledger.history_of(&ana.id).unwrap();
        assert_eq!(history[0].new_rating, 0);
    }

    #[test]
    fn test_storage_failure_leaves_ledger_untouched() {
        let mock = Arc::new(MockLeagueStore::new());
        let ledger = ledger_with_store(mock.clone());
        let ana = ledger.register_player("Ana").unwrap();
        let bruno = ledger.register_player("Bruno").unwrap();

        mock.fail_player_saves(true);

        let record = match_record(&["Ana"], &["Bruno"], MatchOutcome::A, 1);
        let updates = vec![
            ParticipantUpdate {
                player_id: ana.id,
                side: Side::A,
                delta: 16,
            },
            ParticipantUpdate {
                player_id: bruno.id,
                side: Side::B,
                delta: -16,
            },
        ];

        let result = ledger.commit_match(&record, &updates);
        assert!(result.is_err());

        // No partial application: ratings, counters and history unchanged
        let ana_record = ledger.player_named("Ana").unwrap();
        assert_eq!(ana_record.rating, 1000);
        assert_eq!(ana_record.matches_played, 0);
        assert!(ana_record.history.is_empty());

        let bruno_record = ledger.player_named("Bruno").unwrap();
        assert_eq!(bruno_record.rating, 1000);
    }

    #[test]
    fn test_commit_with_unknown_participant_changes_nothing() {
        let ledger = ledger();
        let ana = ledger.register_player("Ana").unwrap();

        let record = match_record(&["Ana"], &["Fantasma"], MatchOutcome::A, 0);
        let updates = vec![
            ParticipantUpdate {
                player_id: ana.id,
                side: Side::A,
                delta: 16,
            },
            ParticipantUpdate {
                player_id: generate_player_id(),
                side: Side::B,
                delta: -16,
            },
        ];

        assert!(ledger.commit_match(&record, &updates).is_err());
        assert_eq!(ledger.rating_of(&ana.id).unwrap(), 1000);
    }

    #[test]
    fn test_ranking_sorted_descending_with_stable_ties() {
        let ledger = ledger();
        let ana = ledger.register_player("Ana").unwrap();
        let bruno = ledger.register_player("Bruno").unwrap();
        ledger.register_player("Carla").unwrap();

        let record = match_record(&["Ana"], &["Bruno"], MatchOutcome::A, 0);
        ledger
            .commit_match(
                &record,
                &[
                    ParticipantUpdate {
                        player_id: ana.id,
                        side: Side::A,
                        delta: 16,
                    },
                    ParticipantUpdate {
                        player_id: bruno.id,
                        side: Side::B,
                        delta: -16,
                    },
                ],
            )
            .unwrap();

        let ranking = ledger.ranking().unwrap();
        assert_eq!(ranking.len(), 3);
        assert_eq!(ranking[0].name, "Ana");
        assert_eq!(ranking[0].rating, 1016);
        assert_eq!(ranking[1].name, "Carla");
        assert_eq!(ranking[2].name, "Bruno");

        // Idempotent between commits
        assert_eq!(ledger.ranking().unwrap(), ranking);
    }
}
