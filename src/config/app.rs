//! Main application configuration
//!
//! This module defines the primary configuration structures for the
//! canchita service, including environment variable loading, TOML file
//! loading and validation.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub service: ServiceSettings,
    #[serde(default)]
    pub rating: RatingSettings,
    #[serde(default)]
    pub balancer: BalancerSettings,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSettings {
    /// Service name for logging
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Port for the HTTP API
    pub http_port: u16,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout_seconds: u64,
}

/// Rating system settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingSettings {
    /// Fixed K factor applied to every update
    pub k_factor: f64,
    /// Rating assigned to newly registered players
    pub initial_rating: i32,
    /// Ratings are clamped here instead of going lower
    pub rating_floor: i32,
}

/// Team balancer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalancerSettings {
    /// Largest pool the exhaustive search is allowed to handle;
    /// bigger pools fall back to the greedy heuristic
    pub exhaustive_pool_limit: usize,
    /// Optional time budget for one balancing call, in milliseconds
    pub time_budget_ms: Option<u64>,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "canchita".to_string(),
            log_level: "info".to_string(),
            http_port: 3000,
            shutdown_timeout_seconds: 30,
        }
    }
}

impl Default for RatingSettings {
    fn default() -> Self {
        Self {
            k_factor: 32.0,
            initial_rating: 1000,
            rating_floor: 0,
        }
    }
}

impl Default for BalancerSettings {
    fn default() -> Self {
        Self {
            exhaustive_pool_limit: 20,
            time_budget_ms: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            config.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            config.service.log_level = log_level;
        }
        if let Ok(port) = env::var("HTTP_PORT") {
            config.service.http_port = port
                .parse()
                .map_err(|_| anyhow!("Invalid HTTP_PORT value: {}", port))?;
        }
        if let Ok(timeout) = env::var("SHUTDOWN_TIMEOUT_SECONDS") {
            config.service.shutdown_timeout_seconds = timeout
                .parse()
                .map_err(|_| anyhow!("Invalid SHUTDOWN_TIMEOUT_SECONDS value: {}", timeout))?;
        }

        // Rating settings
        if let Ok(k) = env::var("RATING_K_FACTOR") {
            config.rating.k_factor = k
                .parse()
                .map_err(|_| anyhow!("Invalid RATING_K_FACTOR value: {}", k))?;
        }
        if let Ok(initial) = env::var("RATING_INITIAL") {
            config.rating.initial_rating = initial
                .parse()
                .map_err(|_| anyhow!("Invalid RATING_INITIAL value: {}", initial))?;
        }
        if let Ok(floor) = env::var("RATING_FLOOR") {
            config.rating.rating_floor = floor
                .parse()
                .map_err(|_| anyhow!("Invalid RATING_FLOOR value: {}", floor))?;
        }

        // Balancer settings
        if let Ok(limit) = env::var("BALANCER_EXHAUSTIVE_POOL_LIMIT") {
            config.balancer.exhaustive_pool_limit = limit
                .parse()
                .map_err(|_| anyhow!("Invalid BALANCER_EXHAUSTIVE_POOL_LIMIT value: {}", limit))?;
        }
        if let Ok(budget) = env::var("BALANCER_TIME_BUDGET_MS") {
            config.balancer.time_budget_ms = Some(
                budget
                    .parse()
                    .map_err(|_| anyhow!("Invalid BALANCER_TIME_BUDGET_MS value: {}", budget))?,
            );
        }

        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read config file: {}", path.as_ref().display())
        })?;
        let config: Self = toml::from_str(&contents).with_context(|| {
            format!("Failed to parse config file: {}", path.as_ref().display())
        })?;

        validate_config(&config)?;
        Ok(config)
    }

    /// Graceful shutdown timeout as a Duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.service.shutdown_timeout_seconds)
    }

    /// Balancer time budget as a Duration, if configured
    pub fn balancer_time_budget(&self) -> Option<Duration> {
        self.balancer.time_budget_ms.map(Duration::from_millis)
    }
}

/// Validate a configuration, rejecting values the service cannot run with
pub fn validate_config(config: &AppConfig) -> Result<()> {
    if config.service.name.is_empty() {
        return Err(anyhow!("Service name cannot be empty"));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.service.log_level.as_str()) {
        return Err(anyhow!(
            "Invalid log level '{}', expected one of: {}",
            config.service.log_level,
            valid_levels.join(", ")
        ));
    }

    if config.rating.k_factor <= 0.0 {
        return Err(anyhow!("Rating K factor must be positive"));
    }

    if config.rating.initial_rating < config.rating.rating_floor {
        return Err(anyhow!(
            "Initial rating {} is below the rating floor {}",
            config.rating.initial_rating,
            config.rating.rating_floor
        ));
    }

    if config.balancer.exhaustive_pool_limit < 2 {
        return Err(anyhow!("Exhaustive pool limit must be at least 2"));
    }

    if let Some(budget) = config.balancer.time_budget_ms {
        if budget == 0 {
            return Err(anyhow!("Balancer time budget must be non-zero"));
        }
    }

    Ok(())
}
