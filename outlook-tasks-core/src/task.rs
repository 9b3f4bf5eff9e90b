//! Task types.
//!
//! `NativeTask` is what the automation session hands back for an item in a
//! folder. `TaskDto` and `CreateTaskRequest` are the wire shapes exchanged
//! over HTTP; `mapper` converts between them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Message class of task items. Subclasses look like `IPM.Task.Custom`.
pub const TASK_MESSAGE_CLASS: &str = "IPM.Task";

/// Task progress as tracked by the desktop client (OlTaskStatus).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum TaskStatus {
    #[default]
    NotStarted,
    InProgress,
    Complete,
    Waiting,
    Deferred,
}

/// A task item as exposed by the automation object model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeTask {
    /// Store entry id, stable across restarts of either process
    pub entry_id: String,
    #[serde(default = "default_message_class")]
    pub message_class: String,
    pub subject: String,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub complete: bool,
}

fn default_message_class() -> String {
    TASK_MESSAGE_CLASS.to_string()
}

impl NativeTask {
    /// Whether this item is a task (folders may also hold notes, mail, etc).
    pub fn is_task(&self) -> bool {
        self.message_class == TASK_MESSAGE_CLASS
            || self
                .message_class
                .strip_prefix(TASK_MESSAGE_CLASS)
                .is_some_and(|rest| rest.starts_with('.'))
    }
}

/// Validated fields for a task about to be created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTask {
    pub subject: String,
    pub due_date: Option<NaiveDate>,
    pub body: Option<String>,
}

/// Task as returned to HTTP callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskDto {
    /// Identifier accepted by the complete and delete endpoints
    pub task_id: String,
    pub subject: String,
    /// ISO-8601 calendar date, null when the task has no due date
    pub due_date: Option<NaiveDate>,
    pub body: Option<String>,
    pub complete: bool,
    pub status: TaskStatus,
}

/// Request body for `POST /tasks`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    // Missing subject deserializes as empty and fails validation with a 400.
    #[serde(default)]
    #[schema(required = true)]
    pub subject: String,
    /// `YYYY-MM-DD` or an RFC 3339 date-time
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task_with_class(class: &str) -> NativeTask {
        NativeTask {
            entry_id: "00AB".to_string(),
            message_class: class.to_string(),
            subject: "Call Bob".to_string(),
            due_date: None,
            body: None,
            status: TaskStatus::NotStarted,
            complete: false,
        }
    }

    #[test]
    fn test_is_task_accepts_task_subclasses() {
        assert!(task_with_class("IPM.Task").is_task());
        assert!(task_with_class("IPM.Task.Flagged").is_task());
        assert!(!task_with_class("IPM.TaskRequest").is_task());
        assert!(!task_with_class("IPM.Note").is_task());
    }

    #[test]
    fn test_native_task_defaults_when_bridge_omits_fields() {
        let task: NativeTask =
            serde_json::from_str(r#"{"entry_id": "00AB", "subject": "Call Bob"}"#).unwrap();

        assert_eq!(task.message_class, TASK_MESSAGE_CLASS);
        assert_eq!(task.status, TaskStatus::NotStarted);
        assert!(!task.complete);
        assert!(task.due_date.is_none());
    }

    #[test]
    fn test_task_dto_uses_camel_case_on_the_wire() {
        let dto = TaskDto {
            task_id: "00AB".to_string(),
            subject: "Call Bob".to_string(),
            due_date: NaiveDate::from_ymd_opt(2025, 3, 20),
            body: None,
            complete: false,
            status: TaskStatus::InProgress,
        };

        let json = serde_json::to_value(&dto).unwrap();

        assert_eq!(json["taskId"], "00AB");
        assert_eq!(json["dueDate"], "2025-03-20");
        assert_eq!(json["body"], serde_json::Value::Null);
        assert_eq!(json["status"], "inProgress");
    }
}
