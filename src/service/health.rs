//! Health reporting for the canchita service

use crate::service::app::AppState;
use serde::{Deserialize, Serialize};

/// Health check status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "healthy"),
            HealthStatus::Degraded => write!(f, "degraded"),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    /// Overall service status
    pub status: HealthStatus,
    /// Service name
    pub service: String,
    /// Service version
    pub version: String,
    /// Current timestamp
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Seconds since startup
    pub uptime_seconds: i64,
    /// Number of registered players
    pub players_registered: usize,
    /// Number of recorded matches
    pub matches_recorded: usize,
}

impl HealthReport {
    /// Gather a health report from the current application state.
    ///
    /// Component failures degrade the report instead of failing it, so
    /// the endpoint stays useful while the service is limping.
    pub fn check(state: &AppState) -> Self {
        let mut status = HealthStatus::Healthy;

        let players_registered = state.player_count().unwrap_or_else(|_| {
            status = HealthStatus::Degraded;
            0
        });
        let matches_recorded = state.match_count().unwrap_or_else(|_| {
            status = HealthStatus::Degraded;
            0
        });

        Self {
            status,
            service: state.config().service.name.clone(),
            version: crate::VERSION.to_string(),
            timestamp: crate::utils::current_timestamp(),
            uptime_seconds: state.uptime_seconds(),
            players_registered,
            matches_recorded,
        }
    }
}
