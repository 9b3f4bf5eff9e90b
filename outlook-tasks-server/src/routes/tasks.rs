//! Task endpoints

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::{delete, get, post},
};

use outlook_tasks_core::{CreateTaskRequest, TaskDto};

use crate::routes::{AppError, ErrorResponse};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/{taskId}/complete", post(complete_task))
        .route("/tasks/{taskId}", delete(delete_task))
}

/// GET /tasks - List incomplete tasks in the configured folder
#[utoipa::path(
    get,
    path = "/tasks",
    tag = "tasks",
    responses(
        (status = 200, description = "Incomplete tasks in native folder order", body = [TaskDto]),
        (status = 500, description = "Configured folder not found", body = ErrorResponse),
        (status = 503, description = "Outlook session unavailable", body = ErrorResponse)
    )
)]
pub async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<TaskDto>>, AppError> {
    Ok(Json(state.service.list().await?))
}

/// POST /tasks - Create a task
#[utoipa::path(
    post,
    path = "/tasks",
    tag = "tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = TaskDto),
        (status = 400, description = "Empty subject or malformed due date", body = ErrorResponse),
        (status = 503, description = "Outlook session unavailable", body = ErrorResponse)
    )
)]
pub async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TaskDto>), AppError> {
    let Json(request) = payload?;
    let task = state.service.create(request).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// POST /tasks/:taskId/complete - Mark a task complete
#[utoipa::path(
    post,
    path = "/tasks/{taskId}/complete",
    tag = "tasks",
    params(("taskId" = String, Path, description = "Task identifier returned by list or create")),
    responses(
        (status = 204, description = "Task is complete"),
        (status = 404, description = "No such task in the folder", body = ErrorResponse),
        (status = 503, description = "Outlook session unavailable", body = ErrorResponse)
    )
)]
pub async fn complete_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.service.complete(&task_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /tasks/:taskId - Permanently delete a task
#[utoipa::path(
    delete,
    path = "/tasks/{taskId}",
    tag = "tasks",
    params(("taskId" = String, Path, description = "Task identifier returned by list or create")),
    responses(
        (status = 204, description = "Task deleted"),
        (status = 404, description = "No such task in the folder", body = ErrorResponse),
        (status = 503, description = "Outlook session unavailable", body = ErrorResponse)
    )
)]
pub async fn delete_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.service.delete(&task_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request};
    use outlook_tasks_core::memory::MemorySession;
    use outlook_tasks_core::{FolderPath, TaskService};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::routes::app;
    use crate::state::AppState;

    fn test_app() -> (Arc<MemorySession>, axum::Router) {
        let session = Arc::new(MemorySession::new());
        let service = TaskService::new(session.clone(), FolderPath::Default);
        (session, app(AppState::new(service)))
    }

    async fn send(
        app: &axum::Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (u16, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(v) => builder
                .header("content-type", "application/json")
                .body(Body::from(v.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status().as_u16();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_create_list_complete_delete() {
        let (_session, app) = test_app();

        let (status, created) = send(
            &app,
            Method::POST,
            "/tasks",
            Some(json!({"subject": "File taxes", "dueDate": "2025-04-15", "body": "Form 1040"})),
        )
        .await;
        assert_eq!(status, 201);
        assert_eq!(created["subject"], "File taxes");
        assert_eq!(created["dueDate"], "2025-04-15");
        assert_eq!(created["complete"], false);
        let task_id = created["taskId"].as_str().unwrap().to_string();

        let (status, listed) = send(&app, Method::GET, "/tasks", None).await;
        assert_eq!(status, 200);
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["taskId"], task_id.as_str());

        let complete_uri = format!("/tasks/{}/complete", task_id);
        let (status, body) = send(&app, Method::POST, &complete_uri, None).await;
        assert_eq!(status, 204);
        assert_eq!(body, Value::Null);

        let (status, body) = send(&app, Method::POST, &complete_uri, None).await;
        assert_eq!(status, 204, "completing twice is idempotent: {body}");

        let (_, listed) = send(&app, Method::GET, "/tasks", None).await;
        assert!(listed.as_array().unwrap().is_empty());

        let task_uri = format!("/tasks/{}", task_id);
        let (status, _) = send(&app, Method::DELETE, &task_uri, None).await;
        assert_eq!(status, 204);

        let (status, body) = send(&app, Method::DELETE, &task_uri, None).await;
        assert_eq!(status, 404);
        assert_eq!(body["kind"], "task_not_found");
    }

    #[tokio::test]
    async fn test_missing_due_date_is_null() {
        let (_session, app) = test_app();
        let (status, created) =
            send(&app, Method::POST, "/tasks", Some(json!({"subject": "Call mom"}))).await;

        assert_eq!(status, 201);
        assert_eq!(created["dueDate"], Value::Null);
        assert_eq!(created["body"], Value::Null);
    }

    #[tokio::test]
    async fn test_empty_subject_is_bad_request_and_creates_nothing() {
        let (session, app) = test_app();
        let folder = session.with_folder("default").unwrap();

        let (status, body) = send(&app, Method::POST, "/tasks", Some(json!({"subject": ""}))).await;
        assert_eq!(status, 400);
        assert_eq!(body["kind"], "validation_error");

        let (status, _) = send(&app, Method::POST, "/tasks", Some(json!({}))).await;
        assert_eq!(status, 400);

        assert_eq!(session.item_count(&folder), 0);
    }

    #[tokio::test]
    async fn test_malformed_due_date_is_bad_request() {
        let (_session, app) = test_app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/tasks",
            Some(json!({"subject": "File taxes", "dueDate": "not-a-date"})),
        )
        .await;

        assert_eq!(status, 400);
        assert_eq!(body["kind"], "validation_error");
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let (_session, app) = test_app();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/tasks")
            .header("content-type", "application/json")
            .body(Body::from("{\"subject\": "))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status().as_u16(), 400);
    }

    #[tokio::test]
    async fn test_unknown_task_is_not_found() {
        let (_session, app) = test_app();
        let (status, body) = send(&app, Method::POST, "/tasks/DEADBEEF/complete", None).await;

        assert_eq!(status, 404);
        assert_eq!(body["kind"], "task_not_found");
    }

    #[tokio::test]
    async fn test_unavailable_session_is_service_unavailable() {
        let (session, app) = test_app();
        session.set_available(false);

        let (status, body) = send(&app, Method::GET, "/tasks", None).await;
        assert_eq!(status, 503);
        assert_eq!(body["kind"], "session_unavailable");

        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, 503);
        assert_eq!(body["status"], "unavailable");
    }

    #[tokio::test]
    async fn test_missing_folder_is_server_error() {
        let session = Arc::new(MemorySession::new());
        let service = TaskService::new(session, FolderPath::parse("\\Mailbox\\Gone").unwrap());
        let app = app(AppState::new(service));

        let (status, body) = send(&app, Method::GET, "/tasks", None).await;
        assert_eq!(status, 500);
        assert_eq!(body["kind"], "folder_not_found");
    }

    #[tokio::test]
    async fn test_health_reports_folder() {
        let (_session, app) = test_app();
        let (status, body) = send(&app, Method::GET, "/health", None).await;

        assert_eq!(status, 200);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["folder"]["name"], "Tasks");
    }

    #[tokio::test]
    async fn test_openapi_document_lists_task_paths() {
        let (_session, app) = test_app();
        let (status, doc) = send(&app, Method::GET, "/openapi.json", None).await;

        assert_eq!(status, 200);
        assert_eq!(doc["info"]["title"], "Outlook Tasks API");
        let paths = doc["paths"].as_object().unwrap();
        assert!(paths.contains_key("/tasks"));
        assert!(paths.contains_key("/tasks/{taskId}/complete"));
        assert!(paths.contains_key("/tasks/{taskId}"));
        assert!(doc["components"]["schemas"]["TaskDto"].is_object());

        let required = doc["components"]["schemas"]["CreateTaskRequest"]["required"]
            .as_array()
            .expect("CreateTaskRequest should list required fields");
        assert!(required.contains(&json!("subject")));
        assert!(!required.contains(&json!("dueDate")));
    }
}
