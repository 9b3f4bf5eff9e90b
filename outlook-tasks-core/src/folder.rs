//! Folder path parsing and resolution.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{TaskError, TaskResult};
use crate::session::AutomationSession;

const SEPARATOR: char = '\\';

/// A configured task folder location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderPath {
    /// The profile's default Tasks folder
    Default,
    /// Store name followed by nested folder names, e.g. `\Mailbox\Tasks\Work`
    Path(Vec<String>),
}

impl FolderPath {
    /// Parse a configured folder path.
    ///
    /// `default` (any case) selects the default Tasks folder. Otherwise the
    /// string is split on backslashes and empty segments are dropped.
    pub fn parse(s: &str) -> TaskResult<Self> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("default") {
            return Ok(FolderPath::Default);
        }

        let segments: Vec<String> = trimmed
            .split(SEPARATOR)
            .filter(|p| !p.is_empty())
            .map(String::from)
            .collect();

        if segments.is_empty() {
            return Err(TaskError::Config(format!(
                "Invalid folder path '{}': expected \\Store\\Folder or 'default'",
                s
            )));
        }

        Ok(FolderPath::Path(segments))
    }
}

impl std::fmt::Display for FolderPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FolderPath::Default => write!(f, "default"),
            FolderPath::Path(segments) => {
                for segment in segments {
                    write!(f, "{}{}", SEPARATOR, segment)?;
                }
                Ok(())
            }
        }
    }
}

/// A resolved folder. Valid only for the call that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FolderHandle {
    /// Store entry id of the folder
    pub id: String,
    pub name: String,
    /// Full display path, e.g. `\\Mailbox\Tasks`
    pub path: String,
}

/// Walk the session's folder hierarchy to the folder named by `path`.
pub async fn resolve(
    session: &dyn AutomationSession,
    path: &FolderPath,
) -> TaskResult<FolderHandle> {
    let segments = match path {
        FolderPath::Default => return session.default_task_folder().await,
        FolderPath::Path(segments) => segments,
    };

    let mut candidates = session.root_folders().await?;
    let mut walked = String::new();
    let mut current: Option<FolderHandle> = None;

    for segment in segments {
        if let Some(parent) = &current {
            candidates = session.sub_folders(parent).await?;
        }

        walked.push(SEPARATOR);
        walked.push_str(segment);

        tracing::debug!(segment = %segment, candidates = candidates.len(), "resolving folder segment");

        let found = candidates
            .iter()
            .find(|folder| folder.name == *segment)
            .cloned()
            .ok_or_else(|| TaskError::FolderNotFound(walked.clone()))?;

        current = Some(found);
    }

    current.ok_or_else(|| TaskError::Config(format!("Invalid folder path '{}'", path)))
}
