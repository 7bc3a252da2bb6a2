//! JSON API surface
//!
//! Thin presentation boundary over the planner: one planning endpoint,
//! geocoding autocomplete, and a liveness probe. Fatal planning failures
//! map to 422 with a payload naming the step that failed, so callers can
//! show an actionable message.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::advisory::AdvisoryClient;
use crate::config::AppConfig;
use crate::geocoding::{Geocoder, GeocodingClient};
use crate::models::{GeocodedPlace, PlanRequest};
use crate::planner::TripPlanner;
use crate::routing::RoutingClient;
use crate::weather::WeatherClient;

/// Planner wired to the live provider clients
pub type LivePlanner =
    TripPlanner<GeocodingClient, RoutingClient, WeatherClient, AdvisoryClient>;

/// Shared, read-only application state
pub struct AppState {
    pub planner: LivePlanner,
    pub geocoder: GeocodingClient,
}

impl AppState {
    /// Build the live clients and planner from configuration
    pub fn from_config(config: &AppConfig) -> crate::Result<Self> {
        let geocoder = GeocodingClient::new(config)?;
        let planner = TripPlanner::new(
            geocoder.clone(),
            RoutingClient::new(config)?,
            WeatherClient::new(config)?,
            AdvisoryClient::new(config)?,
        );
        Ok(Self { planner, geocoder })
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/plan", post(plan_trip))
        .route("/suggest", get(suggest))
        .route("/health", get(health))
        .with_state(state)
}

async fn plan_trip(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PlanRequest>,
) -> Response {
    match state.planner.plan(request).await {
        Ok(result) => Json(result).into_response(),
        Err(e) if e.is_fatal() => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "error": e.user_message(),
                "step": e.phase(),
            })),
        )
            .into_response(),
        Err(e) => {
            error!("Planning failed unexpectedly: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": e.user_message(),
                    "step": e.phase(),
                })),
            )
                .into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
struct SuggestParams {
    q: String,
    #[serde(default = "default_suggest_limit")]
    limit: usize,
}

fn default_suggest_limit() -> usize {
    5
}

async fn suggest(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SuggestParams>,
) -> Result<Json<Vec<GeocodedPlace>>, StatusCode> {
    let places = state
        .geocoder
        .suggest(&params.q, params.limit)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(places))
}

async fn health() -> StatusCode {
    StatusCode::OK
}
