//! Test fixtures and helpers for integration testing

use canchita::config::AppConfig;
use canchita::rating::storage::MockLeagueStore;
use canchita::service::AppState;
use canchita::types::{MatchOutcome, MatchSubmission};
use std::sync::Arc;

/// Create a complete system over a mock store that records every
/// persistence call and can be told to fail
pub fn create_test_system() -> (Arc<AppState>, Arc<MockLeagueStore>) {
    let store = Arc::new(MockLeagueStore::new());
    let state = AppState::with_store(AppConfig::default(), store.clone())
        .expect("Failed to build test app state");

    (Arc::new(state), store)
}

/// Register a squad of players, failing the test on any rejection
pub fn register_squad(state: &AppState, names: &[&str]) {
    for name in names {
        state
            .register_player(name)
            .unwrap_or_else(|e| panic!("Failed to register '{}': {}", name, e));
    }
}

/// Build a match submission from rosters of display names
pub fn submission(
    team_a: &[&str],
    team_b: &[&str],
    winner: MatchOutcome,
    goal_difference: u32,
) -> MatchSubmission {
    MatchSubmission {
        team_a_names: team_a.iter().map(|n| n.to_string()).collect(),
        team_b_names: team_b.iter().map(|n| n.to_string()).collect(),
        winner,
        goal_difference,
        date: None,
    }
}
