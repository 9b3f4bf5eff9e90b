pub mod health;
pub mod openapi;
pub mod tasks;

use axum::{
    Json, Router,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use outlook_tasks_core::TaskError;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::ToSchema;

use crate::state::AppState;

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(tasks::router())
        .merge(health::router())
        .merge(openapi::router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Standard API error response
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// snake_case error kind, e.g. `task_not_found`
    pub kind: String,
}

/// Convert task errors to HTTP responses
#[derive(Debug)]
pub struct AppError(TaskError);

impl AppError {
    fn status(&self) -> StatusCode {
        match self.0 {
            TaskError::SessionUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            TaskError::TaskNotFound(_) => StatusCode::NOT_FOUND,
            TaskError::Validation(_) => StatusCode::BAD_REQUEST,
            TaskError::FolderNotFound(_) | TaskError::Config(_) | TaskError::Bridge(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = %status, error = %self.0, "request failed");
        } else {
            tracing::debug!(status = %status, error = %self.0, "request rejected");
        }

        let body = Json(ErrorResponse {
            error: self.0.to_string(),
            kind: self.0.kind().to_string(),
        });
        (status, body).into_response()
    }
}

impl From<TaskError> for AppError {
    fn from(err: TaskError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self(TaskError::Validation(rejection.body_text()))
    }
}
