//! OpenAPI document

use axum::{Json, Router, routing::get};
use utoipa::OpenApi;

use outlook_tasks_core::{CreateTaskRequest, FolderHandle, TaskDto, TaskStatus};

use crate::routes::ErrorResponse;
use crate::routes::health::HealthResponse;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(title = "Outlook Tasks API", version = "0.1.0"),
    paths(
        crate::routes::tasks::list_tasks,
        crate::routes::tasks::create_task,
        crate::routes::tasks::complete_task,
        crate::routes::tasks::delete_task,
        crate::routes::health::health,
    ),
    components(schemas(
        TaskDto,
        TaskStatus,
        CreateTaskRequest,
        FolderHandle,
        ErrorResponse,
        HealthResponse
    )),
    tags((name = "tasks", description = "Outlook Tasks folder CRUD"))
)]
pub struct ApiDoc;

pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json - The OpenAPI document for this API
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
