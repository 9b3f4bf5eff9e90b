//! Defines the JSON protocol spoken with the automation bridge over
//! stdin/stdout. One request line in, one response document out.

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::TaskError;
use crate::folder::FolderHandle;
use crate::task::{NativeTask, NewTask};

pub trait BridgeCommand: Serialize {
    type Response: DeserializeOwned;
    fn command() -> Command;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    RootFolders,
    SubFolders,
    DefaultTaskFolder,
    ListItems,
    FindItem,
    AddItem,
    MarkComplete,
    DeleteItem,
}

/// Request sent to the bridge.
#[derive(Debug, Serialize, Deserialize)]
pub struct Request {
    pub command: Command,
    /// Outlook profile to log on with (None = the running session's profile)
    pub profile: Option<String>,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Machine-readable failure reason reported by the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Outlook is not running, not logged on, or rejected the call
    SessionUnavailable,
    /// The addressed item does not exist
    NotFound,
    /// The object model refused the values supplied
    Invalid,
    #[serde(other)]
    Other,
}

/// Response sent back by the bridge.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response<T> {
    Success {
        data: T,
    },
    Error {
        error: String,
        #[serde(default)]
        code: Option<ErrorCode>,
    },
}

/// Map a bridge error response to the matching task error.
pub fn task_error(code: Option<ErrorCode>, message: String) -> TaskError {
    match code {
        Some(ErrorCode::SessionUnavailable) => TaskError::SessionUnavailable(message),
        Some(ErrorCode::NotFound) => TaskError::TaskNotFound(message),
        Some(ErrorCode::Invalid) => TaskError::Validation(message),
        Some(ErrorCode::Other) | None => TaskError::Bridge(message),
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RootFolders {}

impl BridgeCommand for RootFolders {
    type Response = Vec<FolderHandle>;
    fn command() -> Command {
        Command::RootFolders
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubFolders {
    pub folder_id: String,
}

impl BridgeCommand for SubFolders {
    type Response = Vec<FolderHandle>;
    fn command() -> Command {
        Command::SubFolders
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DefaultTaskFolder {}

impl BridgeCommand for DefaultTaskFolder {
    type Response = FolderHandle;
    fn command() -> Command {
        Command::DefaultTaskFolder
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListItems {
    pub folder_id: String,
}

impl BridgeCommand for ListItems {
    type Response = Vec<NativeTask>;
    fn command() -> Command {
        Command::ListItems
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FindItem {
    pub folder_id: String,
    pub entry_id: String,
}

impl BridgeCommand for FindItem {
    type Response = Option<NativeTask>;
    fn command() -> Command {
        Command::FindItem
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddItem {
    pub folder_id: String,
    pub task: NewTask,
}

impl BridgeCommand for AddItem {
    type Response = NativeTask;
    fn command() -> Command {
        Command::AddItem
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MarkComplete {
    pub folder_id: String,
    pub entry_id: String,
}

impl BridgeCommand for MarkComplete {
    type Response = ();
    fn command() -> Command {
        Command::MarkComplete
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteItem {
    pub folder_id: String,
    pub entry_id: String,
}

impl BridgeCommand for DeleteItem {
    type Response = ();
    fn command() -> Command {
        Command::DeleteItem
    }
}
