//! Conversion between native task items and the wire shape.

use chrono::{DateTime, NaiveDate};

use crate::error::{TaskError, TaskResult};
use crate::task::{CreateTaskRequest, NativeTask, NewTask, TaskDto};

/// The desktop client stores "no due date" as 4501-01-01.
pub fn is_no_date_sentinel(date: &NaiveDate) -> bool {
    NaiveDate::from_ymd_opt(4501, 1, 1).is_some_and(|sentinel| *date == sentinel)
}

/// Map a native task to its wire representation.
pub fn to_wire(task: &NativeTask) -> TaskDto {
    TaskDto {
        task_id: task.entry_id.clone(),
        subject: task.subject.clone(),
        due_date: task.due_date.filter(|d| !is_no_date_sentinel(d)),
        body: task.body.clone().filter(|b| !b.is_empty()),
        complete: task.complete,
        status: task.status,
    }
}

/// Validate a create request and turn it into fields for a new task.
pub fn from_wire(request: CreateTaskRequest) -> TaskResult<NewTask> {
    let subject = request.subject.trim();
    if subject.is_empty() {
        return Err(TaskError::Validation("subject must not be empty".into()));
    }

    let due_date = match request.due_date.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(s) => Some(parse_due_date(s)?),
    };

    Ok(NewTask {
        subject: subject.to_string(),
        due_date,
        body: request.body.filter(|b| !b.is_empty()),
    })
}

/// Parse `YYYY-MM-DD`, or an RFC 3339 date-time keeping its own calendar date.
fn parse_due_date(s: &str) -> TaskResult<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }

    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.date_naive())
        .map_err(|_| {
            TaskError::Validation(format!(
                "Invalid dueDate '{}'. Expected an ISO-8601 date (YYYY-MM-DD)",
                s
            ))
        })
}
