//! Service layer for the canchita HTTP API
//!
//! This module contains the main application state, the axum route
//! surface, and health reporting for the production service.

pub mod app;
pub mod health;
pub mod routes;

pub use app::AppState;
pub use health::{HealthReport, HealthStatus};
pub use routes::router;
