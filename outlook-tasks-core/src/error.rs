//! Error types for the Outlook Tasks API.

use thiserror::Error;

/// Errors that can occur in task operations.
#[derive(Error, Debug)]
pub enum TaskError {
    #[error("Outlook session unavailable: {0}")]
    SessionUnavailable(String),

    #[error("Folder not found: {0}")]
    FolderNotFound(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bridge error: {0}")]
    Bridge(String),
}

impl TaskError {
    /// Stable snake_case name of the variant, used in error response bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            TaskError::SessionUnavailable(_) => "session_unavailable",
            TaskError::FolderNotFound(_) => "folder_not_found",
            TaskError::TaskNotFound(_) => "task_not_found",
            TaskError::Validation(_) => "validation_error",
            TaskError::Config(_) => "config_error",
            TaskError::Bridge(_) => "bridge_error",
        }
    }
}

/// Result type alias for task operations.
pub type TaskResult<T> = Result<T, TaskError>;
