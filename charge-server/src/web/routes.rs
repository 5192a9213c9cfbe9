//! HTTP route handlers.

use std::path::Path as FsPath;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use tower_http::services::{ServeDir, ServeFile};

use crate::domain::StationId;
use crate::opendata::StatusError;
use crate::status::aggregate;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
///
/// `static_dir` is the path to the built frontend; unknown paths fall back
/// to `index.html` so client-side routing keeps working.
pub fn create_router(state: AppState, static_dir: &str) -> Router {
    let index = FsPath::new(static_dir).join("index.html");
    let spa = ServeDir::new(static_dir).not_found_service(ServeFile::new(index));

    Router::new()
        .route("/health", get(health))
        .route("/api/stations", get(list_stations))
        .route("/api/stations/:id", get(get_station))
        .route("/api/charger-status", get(charger_status))
        .fallback_service(spa)
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// List every station in the static snapshot.
async fn list_stations(State(state): State<AppState>) -> Json<StationListResponse> {
    let stations = state
        .stations
        .all()
        .iter()
        .map(|s| StationResult::from_station(s))
        .collect();

    Json(StationListResponse { stations })
}

/// Fetch one station by id.
async fn get_station(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StationResult>, AppError> {
    let id = StationId::parse(&id).map_err(|_| AppError::BadRequest {
        message: format!("Invalid station id: {id}"),
    })?;

    let station = state.stations.get(&id).ok_or_else(|| AppError::NotFound {
        message: format!("Unknown station: {id}"),
    })?;

    Ok(Json(StationResult::from_station(station)))
}

/// Fetch live charger status for a station and aggregate availability.
///
/// The lookup goes through the status cache, so repeated selections of the
/// same station within the TTL cost no upstream request.
async fn charger_status(
    State(state): State<AppState>,
    Query(req): Query<ChargerStatusRequest>,
) -> Result<Json<ChargerStatusResponse>, AppError> {
    let id = StationId::parse(&req.stat_id).map_err(|_| AppError::BadRequest {
        message: format!("Invalid station id: {}", req.stat_id),
    })?;

    let station = state.stations.get(&id).cloned().ok_or_else(|| AppError::NotFound {
        message: format!("Unknown station: {id}"),
    })?;

    let live = state.status.get_status(&id).await?;
    let status_summary = aggregate(&station.chargers, &live);

    Ok(Json(ChargerStatusResponse {
        stat_id: id,
        status_summary,
        chargers: live.as_ref().clone(),
    }))
}

/// Web layer errors.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    UpstreamTimeout,
    Upstream { message: String },
    Internal { message: String },
}

impl From<StatusError> for AppError {
    fn from(e: StatusError) -> Self {
        match e {
            StatusError::Timeout => AppError::UpstreamTimeout,
            StatusError::Api { .. } | StatusError::Http { .. } | StatusError::Upstream { .. } => {
                AppError::Upstream {
                    message: e.to_string(),
                }
            }
            StatusError::Json { .. } => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::UpstreamTimeout => (
                StatusCode::GATEWAY_TIMEOUT,
                "Charger status is taking too long to load. Please try again shortly.".to_string(),
            ),
            AppError::Upstream { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        // Log errors to stderr for debugging
        eprintln!("[{status}] {message}");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
