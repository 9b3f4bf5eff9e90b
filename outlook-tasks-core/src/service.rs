//! Task operations over the configured folder.
//!
//! Every operation resolves the folder afresh, performs its calls against
//! the session and returns. The gate keeps at most one automation call
//! sequence in flight process-wide.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::{TaskError, TaskResult};
use crate::folder::{self, FolderHandle, FolderPath};
use crate::mapper;
use crate::session::AutomationSession;
use crate::task::{CreateTaskRequest, NativeTask, TaskDto};

pub struct TaskService {
    session: Arc<dyn AutomationSession>,
    folder_path: FolderPath,
    gate: Mutex<()>,
}

impl TaskService {
    pub fn new(session: Arc<dyn AutomationSession>, folder_path: FolderPath) -> Self {
        TaskService {
            session,
            folder_path,
            gate: Mutex::new(()),
        }
    }

    pub fn folder_path(&self) -> &FolderPath {
        &self.folder_path
    }

    /// Resolve the configured folder.
    pub async fn folder(&self) -> TaskResult<FolderHandle> {
        let _gate = self.gate.lock().await;
        folder::resolve(self.session.as_ref(), &self.folder_path).await
    }

    /// The profile's default Tasks folder, regardless of configuration.
    pub async fn default_folder(&self) -> TaskResult<FolderHandle> {
        let _gate = self.gate.lock().await;
        self.session.default_task_folder().await
    }

    /// Incomplete tasks in native enumeration order.
    pub async fn list(&self) -> TaskResult<Vec<TaskDto>> {
        let _gate = self.gate.lock().await;
        let folder = folder::resolve(self.session.as_ref(), &self.folder_path).await?;

        let tasks: Vec<TaskDto> = self
            .session
            .items(&folder)
            .await?
            .iter()
            .filter(|item| item.is_task() && !item.complete)
            .map(mapper::to_wire)
            .collect();

        tracing::debug!(folder = %folder.path, count = tasks.len(), "listed incomplete tasks");
        Ok(tasks)
    }

    pub async fn create(&self, request: CreateTaskRequest) -> TaskResult<TaskDto> {
        let new_task = mapper::from_wire(request)?;

        let _gate = self.gate.lock().await;
        let folder = folder::resolve(self.session.as_ref(), &self.folder_path).await?;
        let created = self.session.add_item(&folder, &new_task).await?;

        tracing::info!(task_id = %created.entry_id, folder = %folder.path, "created task");
        Ok(mapper::to_wire(&created))
    }

    /// Mark a task complete. Completing an already completed task is a no-op.
    pub async fn complete(&self, task_id: &str) -> TaskResult<()> {
        let _gate = self.gate.lock().await;
        let folder = folder::resolve(self.session.as_ref(), &self.folder_path).await?;
        let task = self.find(&folder, task_id).await?;

        if task.complete {
            tracing::debug!(task_id = %task_id, "task already complete");
            return Ok(());
        }

        self.session.mark_complete(&folder, &task.entry_id).await?;
        tracing::info!(task_id = %task_id, folder = %folder.path, "completed task");
        Ok(())
    }

    /// Permanently delete a task.
    pub async fn delete(&self, task_id: &str) -> TaskResult<()> {
        let _gate = self.gate.lock().await;
        let folder = folder::resolve(self.session.as_ref(), &self.folder_path).await?;
        let task = self.find(&folder, task_id).await?;

        self.session.delete_item(&folder, &task.entry_id).await?;
        tracing::info!(task_id = %task_id, folder = %folder.path, "deleted task");
        Ok(())
    }

    async fn find(&self, folder: &FolderHandle, task_id: &str) -> TaskResult<NativeTask> {
        let task_id = task_id.trim();
        if task_id.is_empty() {
            return Err(TaskError::TaskNotFound("empty task id".into()));
        }

        self.session
            .find_item(folder, task_id)
            .await?
            .filter(|item| item.is_task())
            .ok_or_else(|| TaskError::TaskNotFound(task_id.to_string()))
    }
}
