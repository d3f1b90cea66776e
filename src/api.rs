// 🌍 REST API with Axum
// Thin routing over RecordService. Every service error becomes a 500.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::error::CoachError;
use crate::record::{HistoryEntry, SpeciesRecord, StoredRecord};
use crate::service::RecordService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    service: Arc<RecordService>,
}

/// API Response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn failure(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Save confirmation
#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub message: &'static str,
    pub id: i64,
}

/// Any failure surfaced to HTTP callers
#[derive(Debug)]
pub struct ApiError(String);

impl From<CoachError> for ApiError {
    fn from(err: CoachError) -> Self {
        ApiError(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(error = %self.0, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<()>::failure(self.0)),
        )
            .into_response()
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

// Service calls block on SQLite and the provider, so they run off the async workers
async fn run_blocking<T, F>(state: AppState, op: F) -> Result<T, ApiError>
where
    F: FnOnce(&RecordService) -> crate::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let service = state.service;
    tokio::task::spawn_blocking(move || op(&service))
        .await
        .map_err(|e| ApiError(format!("worker task failed: {}", e)))?
        .map_err(ApiError::from)
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /pokemon/:identifier - Fetch from the provider and record in history
async fn fetch_record(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> ApiResult<SpeciesRecord> {
    let record = run_blocking(state, move |service| service.fetch_and_record(&identifier)).await?;
    Ok(Json(ApiResponse::ok(record)))
}

/// POST /pokemon/save - Persist a record into the saved collection
async fn save_record(
    State(state): State<AppState>,
    payload: Result<Json<SpeciesRecord>, JsonRejection>,
) -> ApiResult<SaveResponse> {
    // Unreadable bodies are validation failures like any other bad record
    let Json(record) =
        payload.map_err(|rejection| CoachError::validation("body", &rejection.body_text()))?;
    let id = run_blocking(state, move |service| service.save(&record)).await?;
    Ok(Json(ApiResponse::ok(SaveResponse {
        message: "Pokemon saved successfully",
        id,
    })))
}

/// GET /pokemon/saved - All saved records
async fn list_saved(State(state): State<AppState>) -> ApiResult<Vec<StoredRecord>> {
    let saved = run_blocking(state, |service| service.list_saved()).await?;
    Ok(Json(ApiResponse::ok(saved)))
}

/// GET /pokemon/history - Query history, newest first
async fn list_history(State(state): State<AppState>) -> ApiResult<Vec<HistoryEntry>> {
    let history = run_blocking(state, |service| service.list_history()).await?;
    Ok(Json(ApiResponse::ok(history)))
}

// ============================================================================
// Router
// ============================================================================

pub fn router(service: Arc<RecordService>) -> Router {
    let state = AppState { service };

    let pokemon_routes = Router::new()
        .route("/save", post(save_record))
        .route("/saved", get(list_saved))
        .route("/history", get(list_history))
        .route("/:identifier", get(fetch_record));

    Router::new()
        .route("/api/health", get(health_check))
        .nest("/pokemon", pokemon_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
