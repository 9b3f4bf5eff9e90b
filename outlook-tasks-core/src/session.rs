//! The automation session capability.
//!
//! A session is the live link to the desktop client. Operations acquire
//! folder handles and items through it for the duration of one call and
//! never hold them across requests.

use async_trait::async_trait;

use crate::error::TaskResult;
use crate::folder::FolderHandle;
use crate::task::{NativeTask, NewTask};

#[async_trait]
pub trait AutomationSession: Send + Sync {
    /// Top-level folders, one per store (mailbox, PST, ...).
    async fn root_folders(&self) -> TaskResult<Vec<FolderHandle>>;

    async fn sub_folders(&self, folder: &FolderHandle) -> TaskResult<Vec<FolderHandle>>;

    /// The profile's default Tasks folder.
    async fn default_task_folder(&self) -> TaskResult<FolderHandle>;

    /// All items in the folder, in the store's native enumeration order.
    async fn items(&self, folder: &FolderHandle) -> TaskResult<Vec<NativeTask>>;

    async fn find_item(
        &self,
        folder: &FolderHandle,
        entry_id: &str,
    ) -> TaskResult<Option<NativeTask>>;

    /// Create and save a new task item, returning it with its assigned entry id.
    async fn add_item(&self, folder: &FolderHandle, task: &NewTask) -> TaskResult<NativeTask>;

    /// Set the item's status to complete and save it.
    async fn mark_complete(&self, folder: &FolderHandle, entry_id: &str) -> TaskResult<()>;

    /// Permanently remove the item from the store.
    async fn delete_item(&self, folder: &FolderHandle, entry_id: &str) -> TaskResult<()>;
}
