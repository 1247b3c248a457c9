//! Utility functions for the canchita service

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate a new unique player ID
pub fn generate_player_id() -> Uuid {
    Uuid::new_v4()
}

/// Generate a new unique match ID
pub fn generate_match_id() -> Uuid {
    Uuid::new_v4()
}

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// Arithmetic mean of a non-empty set of ratings
pub fn mean_rating(ratings: &[i32]) -> f64 {
    debug_assert!(!ratings.is_empty());
    ratings.iter().map(|r| *r as f64).sum::<f64>() / ratings.len() as f64
}
