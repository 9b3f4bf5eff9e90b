//! Health endpoint

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde::Serialize;
use utoipa::ToSchema;

use outlook_tasks_core::FolderHandle;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// `ok` or `unavailable`
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<FolderHandle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GET /health - Whether Outlook is reachable and the configured folder resolves
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Session and folder are reachable", body = HealthResponse),
        (status = 503, description = "Session or folder unavailable", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match state.service.folder().await {
        Ok(folder) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok".to_string(),
                folder: Some(folder),
                error: None,
            }),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "unavailable".to_string(),
                folder: None,
                error: Some(e.to_string()),
            }),
        ),
    }
}
