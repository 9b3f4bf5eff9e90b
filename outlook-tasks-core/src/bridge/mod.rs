//! Automation session backed by an external bridge executable.
//!
//! Each session call spawns the bridge (e.g. `outlook-automation-bridge`),
//! sends one JSON request on stdin and reads the JSON response from stdout.
//! The bridge owns the COM side: attaching to the running Outlook instance,
//! logging on to the profile and touching the object model. Nothing is held
//! between calls, so an Outlook restart never leaves a stale handle behind.

pub mod protocol;

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt;
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

use crate::error::{TaskError, TaskResult};
use crate::folder::FolderHandle;
use crate::session::AutomationSession;
use crate::task::{NativeTask, NewTask};
use protocol::{
    AddItem, BridgeCommand, Command, DefaultTaskFolder, DeleteItem, FindItem,
    ListItems, MarkComplete, Request, Response, RootFolders, SubFolders,
};

pub const DEFAULT_BRIDGE: &str = "outlook-automation-bridge";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct BridgeSession {
    program: String,
    args: Vec<String>,
    profile: Option<String>,
    timeout: Duration,
}

impl BridgeSession {
    pub fn new(program: &str) -> Self {
        BridgeSession {
            program: program.to_string(),
            args: Vec::new(),
            profile: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Extra arguments passed to the bridge before any request is written.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_profile(mut self, profile: Option<String>) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn binary_path(&self) -> TaskResult<PathBuf> {
        which::which(&self.program).map_err(|_| {
            TaskError::SessionUnavailable(format!(
                "Automation bridge '{}' not found in PATH",
                self.program
            ))
        })
    }

    /// Call a typed bridge command and return the result.
    pub async fn call<C: BridgeCommand>(&self, cmd: C) -> TaskResult<C::Response> {
        timeout(self.timeout, self.call_raw(C::command(), cmd))
            .await
            .map_err(|_| {
                TaskError::SessionUnavailable(format!(
                    "Automation bridge did not answer within {}s",
                    self.timeout.as_secs_f32()
                ))
            })?
    }

    /// Low-level call that sends a command with params and deserializes the response.
    async fn call_raw<P: Serialize, R: DeserializeOwned>(
        &self,
        command: Command,
        params: P,
    ) -> TaskResult<R> {
        let params =
            serde_json::to_value(params).map_err(|e| TaskError::Bridge(e.to_string()))?;
        let request = Request {
            command,
            profile: self.profile.clone(),
            params,
        };
        let request_json =
            serde_json::to_string(&request).map_err(|e| TaskError::Bridge(e.to_string()))?;

        let binary_path = self.binary_path()?;
        tracing::debug!(?command, bridge = %binary_path.display(), "calling automation bridge");

        let mut child = TokioCommand::new(&binary_path)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                TaskError::SessionUnavailable(format!(
                    "Failed to spawn {}: {}",
                    binary_path.display(),
                    e
                ))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| TaskError::Bridge("Bridge stdin was not captured".into()))?;
        stdin
            .write_all(format!("{request_json}\n").as_bytes())
            .await
            .map_err(|e| TaskError::SessionUnavailable(format!("Failed to write request: {e}")))?;
        drop(stdin);

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| TaskError::SessionUnavailable(format!("Bridge failed: {e}")))?;

        if !output.status.success() {
            return Err(TaskError::SessionUnavailable(format!(
                "Automation bridge exited with status: {}",
                output.status.code().unwrap_or(-1)
            )));
        }

        let response_str = String::from_utf8_lossy(&output.stdout);
        let response_str = response_str.trim();

        if response_str.is_empty() {
            return Err(TaskError::SessionUnavailable(
                "Automation bridge returned no response".into(),
            ));
        }

        let response: Response<R> = serde_json::from_str(response_str).map_err(|e| {
            TaskError::SessionUnavailable(format!("Failed to parse bridge response: {}", e))
        })?;

        match response {
            Response::Success { data } => Ok(data),
            Response::Error { error, code } => {
                tracing::debug!(?command, ?code, error = %error, "automation bridge reported an error");
                Err(protocol::task_error(code, error))
            }
        }
    }
}

#[async_trait]
impl AutomationSession for BridgeSession {
    async fn root_folders(&self) -> TaskResult<Vec<FolderHandle>> {
        self.call(RootFolders {}).await
    }

    async fn sub_folders(&self, folder: &FolderHandle) -> TaskResult<Vec<FolderHandle>> {
        self.call(SubFolders {
            folder_id: folder.id.clone(),
        })
        .await
    }

    async fn default_task_folder(&self) -> TaskResult<FolderHandle> {
        self.call(DefaultTaskFolder {}).await
    }

    async fn items(&self, folder: &FolderHandle) -> TaskResult<Vec<NativeTask>> {
        self.call(ListItems {
            folder_id: folder.id.clone(),
        })
        .await
    }

    async fn find_item(
        &self,
        folder: &FolderHandle,
        entry_id: &str,
    ) -> TaskResult<Option<NativeTask>> {
        self.call(FindItem {
            folder_id: folder.id.clone(),
            entry_id: entry_id.to_string(),
        })
        .await
    }

    async fn add_item(&self, folder: &FolderHandle, task: &NewTask) -> TaskResult<NativeTask> {
        self.call(AddItem {
            folder_id: folder.id.clone(),
            task: task.clone(),
        })
        .await
    }

    async fn mark_complete(&self, folder: &FolderHandle, entry_id: &str) -> TaskResult<()> {
        self.call(MarkComplete {
            folder_id: folder.id.clone(),
            entry_id: entry_id.to_string(),
        })
        .await
    }

    async fn delete_item(&self, folder: &FolderHandle, entry_id: &str) -> TaskResult<()> {
        self.call(DeleteItem {
            folder_id: folder.id.clone(),
            entry_id: entry_id.to_string(),
        })
        .await
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    /// A bridge that runs `script` under `sh -c`.
    fn script_bridge(script: &str) -> BridgeSession {
        BridgeSession::new("sh").with_args(["-c", script])
    }

    #[tokio::test]
    async fn test_missing_bridge_is_session_unavailable() {
        let session = BridgeSession::new("outlook-automation-bridge-that-does-not-exist");
        assert!(matches!(
            session.root_folders().await,
            Err(TaskError::SessionUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_root_folders_round_trip_through_bridge() {
        let session = script_bridge(
            r#"read line
case "$line" in
  *'"command":"root_folders","profile":"Work"'*)
    echo '{"status":"success","data":[{"id":"F1","name":"Mailbox","path":"\\\\Mailbox"}]}' ;;
  *)
    echo '{"status":"error","error":"unexpected request"}' ;;
esac"#,
        )
        .with_profile(Some("Work".into()));

        let folders = session.root_folders().await.unwrap();

        assert_eq!(folders.len(), 1);
        assert_eq!(folders[0].id, "F1");
        assert_eq!(folders[0].name, "Mailbox");
    }

    #[tokio::test]
    async fn test_not_found_code_maps_to_task_not_found() {
        let session = script_bridge(
            r#"read line; echo '{"status":"error","error":"no such item","code":"not_found"}'"#,
        );
        let folder = FolderHandle {
            id: "F1".into(),
            name: "Tasks".into(),
            path: "\\\\Mailbox\\Tasks".into(),
        };

        assert!(matches!(
            session.delete_item(&folder, "E1").await,
            Err(TaskError::TaskNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_silent_failing_bridge_is_session_unavailable() {
        let session = script_bridge("read line; exit 3");
        assert!(matches!(
            session.default_task_folder().await,
            Err(TaskError::SessionUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_failing_exit_overrides_success_document() {
        let session =
            script_bridge(r#"read line; echo '{"status":"success","data":[]}'; exit 1"#);
        assert!(matches!(
            session.root_folders().await,
            Err(TaskError::SessionUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_unparseable_output_is_session_unavailable() {
        let session = script_bridge("read line; echo 'Outlook is showing a dialog'");
        assert!(matches!(
            session.default_task_folder().await,
            Err(TaskError::SessionUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_slow_bridge_times_out() {
        let session = script_bridge("read line; sleep 5").with_timeout(Duration::from_millis(200));
        assert!(matches!(
            session.root_folders().await,
            Err(TaskError::SessionUnavailable(_))
        ));
    }
}
