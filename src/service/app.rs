//! Main application state and component wiring
//!
//! `AppState` assembles the store, ledger, resolver and balancer from one
//! validated configuration and exposes the operations the HTTP layer
//! serves.

use crate::balancer::TeamBalancer;
use crate::config::{validate_config, AppConfig};
use crate::matches::MatchResolver;
use crate::rating::elo::{EloEngine, EloSettings};
use crate::rating::ledger::RatingLedger;
use crate::rating::storage::{InMemoryLeagueStore, LeagueStore};
use crate::synergy::synergies_for;
use crate::types::{
    BalanceRequest, BalancedPartition, MatchRecord, MatchSubmission, PlayerRef, PlayerSummary,
    RankingEntry,
};
use crate::utils::current_timestamp;
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;

/// Main application state containing all service components
pub struct AppState {
    config: AppConfig,
    store: Arc<dyn LeagueStore>,
    ledger: Arc<RatingLedger>,
    resolver: MatchResolver,
    balancer: TeamBalancer,
    started_at: DateTime<Utc>,
}

impl AppState {
    /// Initialize the application with an in-memory store
    pub fn new(config: AppConfig) -> Result<Self> {
        let store: Arc<dyn LeagueStore> = Arc::new(InMemoryLeagueStore::new());
        Self::with_store(config, store)
    }

    /// Initialize the application against an injected store
    pub fn with_store(config: AppConfig, store: Arc<dyn LeagueStore>) -> Result<Self> {
        validate_config(&config)?;

        let ledger = Arc::new(RatingLedger::new(
            store.clone(),
            config.rating.initial_rating,
            config.rating.rating_floor,
        ));
        let engine = EloEngine::new(EloSettings::from(&config.rating))?;
        let resolver = MatchResolver::new(ledger.clone(), engine);
        let balancer = TeamBalancer::new(ledger.clone(), &config.balancer);

        info!(
            "Initialized {} (K={}, initial rating {}, floor {})",
            config.service.name,
            config.rating.k_factor,
            config.rating.initial_rating,
            config.rating.rating_floor
        );

        Ok(Self {
            config,
            store,
            ledger,
            resolver,
            balancer,
            started_at: current_timestamp(),
        })
    }

    /// Application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Register a new player at the configured initial rating
    pub fn register_player(&self, name: &str) -> Result<PlayerRef> {
        self.ledger.register_player(name)
    }

    /// All registered players, sorted by name
    pub fn players(&self) -> Result<Vec<PlayerRef>> {
        self.ledger.players()
    }

    /// Players ranked by current rating, descending
    pub fn ranking(&self) -> Result<Vec<RankingEntry>> {
        self.ledger.ranking()
    }

    /// Full per-player summary: rating, counters, history and synergies
    pub fn player_summary(&self, name: &str) -> Result<PlayerSummary> {
        let record = self.ledger.player_named(name)?;
        let synergies = synergies_for(&record.name, &record.history);

        Ok(PlayerSummary {
            id: record.id,
            name: record.name,
            rating: record.rating,
            initial_rating: record.initial_rating,
            matches_played: record.matches_played,
            wins: record.wins,
            losses: record.losses,
            draws: record.draws,
            goals_for: record.goals_for,
            goals_against: record.goals_against,
            history: record.history,
            synergies,
        })
    }

    /// Resolve and commit a submitted match result
    pub fn submit_match(&self, submission: &MatchSubmission) -> Result<MatchRecord> {
        self.resolver.submit(submission)
    }

    /// Recorded matches, newest first
    pub fn matches_summary(&self) -> Result<Vec<MatchRecord>> {
        let mut matches = self.store.load_matches()?;
        matches.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(matches)
    }

    /// Split a pool of players into two rating-balanced sides
    pub fn balance_teams(&self, request: &BalanceRequest) -> Result<BalancedPartition> {
        self.balancer.balance(&request.player_names)
    }

    /// Number of registered players
    pub fn player_count(&self) -> Result<usize> {
        self.ledger.player_count()
    }

    /// Number of recorded matches
    pub fn match_count(&self) -> Result<usize> {
        Ok(self.store.load_matches()?.len())
    }

    /// Seconds since this state was created
    pub fn uptime_seconds(&self) -> i64 {
        (current_timestamp() - self.started_at).num_seconds()
    }
}
