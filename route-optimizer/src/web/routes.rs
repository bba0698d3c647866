//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::graph::{Airport, GraphError};
use crate::planner::{PlanError, PlanRequest, Planner};
use crate::report::{ErrorReport, ExitStatus, Report, summarize};

use super::dto::SubmitAirportsRequest;
use super::state::AppState;

/// Create the application router.
///
/// Any origin may call the API; the catalog page is usually served from a
/// different port.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/data/airport", get(airport_catalog))
        .route("/api/submit-airports", post(submit_airports))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// HTTP status for a run's exit status.
pub fn http_status(status: ExitStatus) -> StatusCode {
    match status {
        ExitStatus::Success => StatusCode::OK,
        ExitStatus::NoRoute => StatusCode::UNPROCESSABLE_ENTITY,
        ExitStatus::InvalidInput => StatusCode::BAD_REQUEST,
        ExitStatus::SearchTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        ExitStatus::SetupFailure => StatusCode::BAD_GATEWAY,
    }
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Airports clients can pick destinations from.
async fn airport_catalog(State(state): State<AppState>) -> Result<Json<Vec<Airport>>, AppError> {
    let airports = state.paths.inner().airports().await?;
    Ok(Json(airports))
}

/// Plan a route through the selected airports.
async fn submit_airports(
    State(state): State<AppState>,
    Json(req): Json<SubmitAirportsRequest>,
) -> (StatusCode, Json<Report>) {
    let origin = req.origin.as_deref().unwrap_or(state.origin.as_str());

    let outcome = match PlanRequest::parse(origin, req.selected_codes.as_slice()) {
        Ok(request) => {
            Planner::new(state.paths.as_ref(), &state.config)
                .plan(&request)
                .await
        }
        Err(e) => Err(PlanError::from(e)),
    };

    let (report, status) = summarize(&outcome);
    match &outcome {
        Ok(result) => info!(
            %origin,
            destinations = req.selected_codes.len(),
            total_value = result.itinerary.total_value(),
            "Plan served"
        ),
        Err(e) => error!(%origin, error = %e, "Planning failed"),
    }

    (http_status(status), Json(report))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// The path engine could not answer
    Engine { message: String },
}

impl From<GraphError> for AppError {
    fn from(e: GraphError) -> Self {
        AppError::Engine {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Engine { message } => (http_status(ExitStatus::SetupFailure), message),
        };

        error!(%status, %message, "Request failed");

        (status, Json(ErrorReport::new(message))).into_response()
    }
}
