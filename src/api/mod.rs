use std::sync::Arc;

use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tokio::task::JoinError;
use tracing::{error, warn};

use crate::context::AppContext;
use crate::error::{DisasterWatchError, ErrorCode};
use crate::evacuation::EvacuationPlanner;
use crate::models::{EvacuationPlan, EvacuationRequest, Location, PredictionRequest, RiskResult};
use crate::risk::RiskPredictionOrchestrator;

#[derive(Clone)]
pub struct ApiState {
    orchestrator: Arc<RiskPredictionOrchestrator>,
    planner: Arc<EvacuationPlanner>,
    default_time_window: u32,
}

impl From<&AppContext> for ApiState {
    fn from(context: &AppContext) -> Self {
        Self {
            orchestrator: Arc::new(context.orchestrator()),
            planner: Arc::new(context.planner()),
            default_time_window: context.default_time_window,
        }
    }
}

/// `/predict` body; `time_window` falls back to the configured default
#[derive(Debug, Deserialize)]
pub struct PredictBody {
    pub location: Location,
    pub disaster_type: String,
    pub time_window: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

pub enum ApiError {
    Domain(DisasterWatchError),
    BadRequest(String),
    Internal(String),
}

impl From<DisasterWatchError> for ApiError {
    fn from(err: DisasterWatchError) -> Self {
        ApiError::Domain(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<JoinError> for ApiError {
    fn from(err: JoinError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::UnsupportedDisasterType | ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::NoSafeShelterFound => StatusCode::NOT_FOUND,
        ErrorCode::ModelUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Domain(err) => {
                let code = err.code();
                let status = status_for(code);
                if status.is_server_error() {
                    error!("Request failed: {}", err);
                } else {
                    warn!("Request rejected: {}", err);
                }
                (
                    status,
                    ErrorBody {
                        error: code.as_str().to_string(),
                        message: err.user_message(),
                    },
                )
            }
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: ErrorCode::InvalidRequest.as_str().to_string(),
                    message,
                },
            ),
            ApiError::Internal(message) => {
                error!("Request task failed: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: "internal_error".to_string(),
                        message: "Internal server error".to_string(),
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

pub fn router(context: &AppContext) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route("/evacuation", post(evacuation))
        .route("/health", get(health))
        .with_state(ApiState::from(context))
}

#[tracing::instrument(skip_all)]
async fn predict(
    State(state): State<ApiState>,
    payload: Result<Json<PredictBody>, JsonRejection>,
) -> Result<Json<RiskResult>, ApiError> {
    let Json(body) = payload?;
    let request = PredictionRequest::new(
        body.location,
        body.disaster_type,
        body.time_window.unwrap_or(state.default_time_window),
    );

    let orchestrator = Arc::clone(&state.orchestrator);
    let result = tokio::task::spawn_blocking(move || orchestrator.predict(&request)).await??;
    Ok(Json(result))
}

#[tracing::instrument(skip_all)]
async fn evacuation(
    State(state): State<ApiState>,
    payload: Result<Json<EvacuationRequest>, JsonRejection>,
) -> Result<Json<EvacuationPlan>, ApiError> {
    let Json(request) = payload?;

    let planner = Arc::clone(&state.planner);
    let plan = tokio::task::spawn_blocking(move || planner.plan(&request)).await??;
    Ok(Json(plan))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
    })
}
