//! HTTP route surface for the canchita API
//!
//! Thin axum handlers over [`AppState`]: deserialize, delegate, map the
//! error taxonomy to status codes. All shapes serialize with the field
//! names the product's frontend consumes.

use crate::error::LeagueError;
use crate::service::app::AppState;
use crate::service::health::HealthReport;
use crate::types::{
    BalanceRequest, BalancedPartition, MatchRecord, MatchSubmission, PlayerRef, PlayerSummary,
    RankingEntry, RegisterPlayer,
};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, warn};

/// Error wrapper mapping the league taxonomy onto HTTP status codes
pub struct ApiError(anyhow::Error);

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.downcast_ref::<LeagueError>() {
            Some(LeagueError::PlayerNotFound { .. }) => StatusCode::NOT_FOUND,
            Some(LeagueError::InvalidMatch { .. }) | Some(LeagueError::InvalidInput { .. }) => {
                StatusCode::BAD_REQUEST
            }
            Some(LeagueError::StorageError { .. }) => StatusCode::BAD_GATEWAY,
            Some(LeagueError::BalancerTimeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Request failed: {:#}", self.0);
        } else {
            warn!("Request rejected ({}): {}", status, self.0);
        }

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

/// Build the full API router over shared application state
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/players", get(list_players).post(register_player))
        .route("/players/ranking", get(ranking))
        .route("/players/{name}", get(player_summary))
        .route("/match", post(submit_match))
        .route("/matches/summary", get(matches_summary))
        .route("/teams/balanced", post(balanced_teams))
        .route("/health", get(health))
        .with_state(state)
}

async fn list_players(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PlayerRef>>, ApiError> {
    Ok(Json(state.players()?))
}

async fn register_player(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterPlayer>,
) -> Result<(StatusCode, Json<PlayerRef>), ApiError> {
    let player = state.register_player(&body.name)?;
    Ok((StatusCode::CREATED, Json(player)))
}

async fn ranking(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<RankingEntry>>, ApiError> {
    Ok(Json(state.ranking()?))
}

async fn player_summary(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<PlayerSummary>, ApiError> {
    Ok(Json(state.player_summary(&name)?))
}

async fn submit_match(
    State(state): State<Arc<AppState>>,
    Json(submission): Json<MatchSubmission>,
) -> Result<(StatusCode, Json<MatchRecord>), ApiError> {
    let record = state.submit_match(&submission)?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn matches_summary(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MatchRecord>>, ApiError> {
    Ok(Json(state.matches_summary()?))
}

/// Returns an array with the single best partition, the shape the
/// frontend has always consumed
async fn balanced_teams(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BalanceRequest>,
) -> Result<Json<Vec<BalancedPartition>>, ApiError> {
    let partition = state.balance_teams(&request)?;
    Ok(Json(vec![partition]))
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthReport> {
    Json(HealthReport::check(&state))
}
