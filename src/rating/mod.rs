//! Rating system for five-a-side match results
//!
//! This module provides the ELO update arithmetic, the persistence
//! interface, and the ledger that owns every player's rating and history.

pub mod elo;
pub mod ledger;
pub mod storage;

// Re-export commonly used types
pub use elo::{EloEngine, EloSettings};
pub use ledger::{ParticipantUpdate, RatingLedger};
pub use storage::{InMemoryLeagueStore, LeagueStore, PlayerRecord};
