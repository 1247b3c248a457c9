//! Match resolver implementation
//!
//! The resolver validates a submission, reads a rating snapshot, computes
//! one signed delta per team via the ELO engine, and hands the whole
//! update set to the ledger as a single unit. A submission mutex keeps the
//! snapshot-compute-commit sequence exclusive, so two in-flight results
//! can never base their expectations on each other's half-applied state.

use crate::error::LeagueError;
use crate::rating::elo::EloEngine;
use crate::rating::ledger::{ParticipantUpdate, RatingLedger};
use crate::types::{MatchRecord, MatchSubmission, PlayerId, Side};
use crate::utils::{current_timestamp, generate_match_id, mean_rating};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Turns submitted match results into committed rating changes
pub struct MatchResolver {
    ledger: Arc<RatingLedger>,
    engine: EloEngine,
    submission_lock: Mutex<()>,
}

impl MatchResolver {
    /// Create a resolver over the given ledger and engine
    pub fn new(ledger: Arc<RatingLedger>, engine: EloEngine) -> Self {
        Self {
            ledger,
            engine,
            submission_lock: Mutex::new(()),
        }
    }

    /// Validate, rate and commit one match submission.
    ///
    /// Returns the recorded match. Any validation failure rejects the
    /// submission before a single rating moves.
    pub fn submit(&self, submission: &MatchSubmission) -> crate::error::Result<MatchRecord> {
        let _exclusive = self.submission_lock.lock().map_err(|_| {
            LeagueError::InternalError {
                message: "Failed to acquire submission lock".to_string(),
            }
        })?;

        self.validate_rosters(submission)?;

        let team_a_ids = self.resolve_roster(&submission.team_a_names)?;
        let team_b_ids = self.resolve_roster(&submission.team_b_names)?;

        // One consistent snapshot for both sides
        let ratings_a = self.ledger.ratings_for(&submission.team_a_names)?;
        let ratings_b = self.ledger.ratings_for(&submission.team_b_names)?;

        let avg_a = mean_rating(&ratings_a.iter().map(|(_, r)| *r).collect::<Vec<_>>());
        let avg_b = mean_rating(&ratings_b.iter().map(|(_, r)| *r).collect::<Vec<_>>());

        let delta_a = self.engine.team_delta(
            avg_a,
            avg_b,
            submission.winner,
            submission.goal_difference,
        );

        let record = MatchRecord {
            id: generate_match_id(),
            date: submission
                .date
                .map(|naive| naive.and_utc())
                .unwrap_or_else(current_timestamp),
            team_a: submission.team_a_names.clone(),
            team_b: submission.team_b_names.clone(),
            winner: submission.winner,
            goal_difference: submission.goal_difference,
        };

        let updates: Vec<ParticipantUpdate> = team_a_ids
            .iter()
            .map(|id| ParticipantUpdate {
                player_id: *id,
                side: Side::A,
                delta: delta_a,
            })
            .chain(team_b_ids.iter().map(|id| ParticipantUpdate {
                player_id: *id,
                side: Side::B,
                delta: -delta_a,
            }))
            .collect();

        if let Err(e) = self.ledger.commit_match(&record, &updates) {
            warn!("Match commit failed, no ratings were changed: {}", e);
            return Err(e);
        }

        info!(
            "Resolved match {}: winner {}, goal difference {}, avg {:.1} vs {:.1}, delta {:+}",
            record.id, record.winner, record.goal_difference, avg_a, avg_b, delta_a
        );
        Ok(record)
    }

    fn validate_rosters(&self, submission: &MatchSubmission) -> crate::error::Result<()> {
        if submission.team_a_names.is_empty() || submission.team_b_names.is_empty() {
            return Err(LeagueError::InvalidMatch {
                reason: "Both rosters need at least one player".to_string(),
            }
            .into());
        }

        let team_a: HashSet<&String> = submission.team_a_names.iter().collect();
        if team_a.len() != submission.team_a_names.len() {
            return Err(LeagueError::InvalidMatch {
                reason: "Team A contains a duplicate player".to_string(),
            }
            .into());
        }

        let team_b: HashSet<&String> = submission.team_b_names.iter().collect();
        if team_b.len() != submission.team_b_names.len() {
            return Err(LeagueError::InvalidMatch {
                reason: "Team B contains a duplicate player".to_string(),
            }
            .into());
        }

        if let Some(shared) = team_a.intersection(&team_b).next() {
            return Err(LeagueError::InvalidMatch {
                reason: format!("Player on both rosters: {}", shared),
            }
            .into());
        }

        if submission.winner.winning_side().is_none() && submission.goal_difference != 0 {
            return Err(LeagueError::InvalidMatch {
                reason: "A drawn match cannot have a goal difference".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Resolve a roster of display names to ids; an unknown name makes the
    /// whole submission invalid.
    fn resolve_roster(&self, names: &[String]) -> crate::error::Result<Vec<PlayerId>> {
        names
            .iter()
            .map(|name| {
                self.ledger.resolve_name(name).map_err(|_| {
                    LeagueError::InvalidMatch {
                        reason: format!("Unknown player: {}", name),
                    }
                    .into()
                })
            })
            .collect()
    }
}
