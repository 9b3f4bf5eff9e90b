//! In-memory automation session.
//!
//! Holds a store/folder hierarchy and task items in process memory. Used by
//! tests and by the `memory` backend for running the API without a desktop
//! client.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::{TaskError, TaskResult};
use crate::folder::{FolderHandle, FolderPath};
use crate::session::AutomationSession;
use crate::task::{NativeTask, NewTask, TASK_MESSAGE_CLASS, TaskStatus};

const DEFAULT_STORE: &str = "Mailbox";
const DEFAULT_TASKS_FOLDER: &str = "Tasks";

struct MemoryFolder {
    handle: FolderHandle,
    parent: Option<String>,
    items: Vec<NativeTask>,
}

struct MemoryStore {
    folders: Vec<MemoryFolder>,
    default_tasks: String,
    available: bool,
}

impl MemoryStore {
    fn add_folder(&mut self, parent: Option<&FolderHandle>, name: &str) -> FolderHandle {
        let path = match parent {
            Some(p) => format!("{}\\{}", p.path, name),
            None => format!("\\\\{}", name),
        };
        let handle = FolderHandle {
            id: new_entry_id(),
            name: name.to_string(),
            path,
        };
        self.folders.push(MemoryFolder {
            handle: handle.clone(),
            parent: parent.map(|p| p.id.clone()),
            items: Vec::new(),
        });
        handle
    }

    fn children(&self, parent: Option<&str>) -> Vec<FolderHandle> {
        self.folders
            .iter()
            .filter(|f| f.parent.as_deref() == parent)
            .map(|f| f.handle.clone())
            .collect()
    }

    fn folder(&self, id: &str) -> Option<&MemoryFolder> {
        self.folders.iter().find(|f| f.handle.id == id)
    }

    fn folder_mut(&mut self, handle: &FolderHandle) -> TaskResult<&mut MemoryFolder> {
        self.folders
            .iter_mut()
            .find(|f| f.handle.id == handle.id)
            .ok_or_else(|| TaskError::FolderNotFound(handle.path.clone()))
    }
}

/// Automation session backed by process memory.
pub struct MemorySession {
    store: Mutex<MemoryStore>,
}

impl Default for MemorySession {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySession {
    /// A session with a single `Mailbox` store holding the default `Tasks` folder.
    pub fn new() -> Self {
        let mut store = MemoryStore {
            folders: Vec::new(),
            default_tasks: String::new(),
            available: true,
        };
        let root = store.add_folder(None, DEFAULT_STORE);
        let tasks = store.add_folder(Some(&root), DEFAULT_TASKS_FOLDER);
        store.default_tasks = tasks.id;

        MemorySession {
            store: Mutex::new(store),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MemoryStore> {
        self.store.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_available(&self) -> TaskResult<MutexGuard<'_, MemoryStore>> {
        let store = self.lock();
        if !store.available {
            return Err(TaskError::SessionUnavailable(
                "in-memory session marked unavailable".into(),
            ));
        }
        Ok(store)
    }

    /// Make sure the folder path exists, creating missing stores and folders.
    pub fn with_folder(&self, path: &str) -> TaskResult<FolderHandle> {
        let mut store = self.lock();

        let segments = match FolderPath::parse(path)? {
            FolderPath::Default => {
                let id = store.default_tasks.clone();
                return store
                    .folder(&id)
                    .map(|f| f.handle.clone())
                    .ok_or_else(|| TaskError::FolderNotFound("default".into()));
            }
            FolderPath::Path(segments) => segments,
        };

        let mut current: Option<FolderHandle> = None;
        for segment in &segments {
            let existing = store
                .children(current.as_ref().map(|c| c.id.as_str()))
                .into_iter()
                .find(|f| f.name == *segment);

            current = Some(match existing {
                Some(folder) => folder,
                None => store.add_folder(current.as_ref(), segment),
            });
        }

        current.ok_or_else(|| TaskError::Config(format!("Invalid folder path '{}'", path)))
    }

    /// Seed an item into a folder as-is.
    pub fn insert(&self, folder: &FolderHandle, task: NativeTask) -> TaskResult<()> {
        self.lock().folder_mut(folder)?.items.push(task);
        Ok(())
    }

    /// Number of items currently in the folder, of any message class.
    pub fn item_count(&self, folder: &FolderHandle) -> usize {
        self.lock()
            .folder(&folder.id)
            .map(|f| f.items.len())
            .unwrap_or(0)
    }

    /// Simulate the desktop client going away (or coming back).
    pub fn set_available(&self, available: bool) {
        self.lock().available = available;
    }
}

#[async_trait]
impl AutomationSession for MemorySession {
    async fn root_folders(&self) -> TaskResult<Vec<FolderHandle>> {
        Ok(self.lock_available()?.children(None))
    }

    async fn sub_folders(&self, folder: &FolderHandle) -> TaskResult<Vec<FolderHandle>> {
        let store = self.lock_available()?;
        if store.folder(&folder.id).is_none() {
            return Err(TaskError::FolderNotFound(folder.path.clone()));
        }
        Ok(store.children(Some(&folder.id)))
    }

    async fn default_task_folder(&self) -> TaskResult<FolderHandle> {
        let store = self.lock_available()?;
        store
            .folder(&store.default_tasks)
            .map(|f| f.handle.clone())
            .ok_or_else(|| TaskError::FolderNotFound("default".into()))
    }

    async fn items(&self, folder: &FolderHandle) -> TaskResult<Vec<NativeTask>> {
        Ok(self.lock_available()?.folder_mut(folder)?.items.clone())
    }

    async fn find_item(
        &self,
        folder: &FolderHandle,
        entry_id: &str,
    ) -> TaskResult<Option<NativeTask>> {
        let mut store = self.lock_available()?;
        Ok(store
            .folder_mut(folder)?
            .items
            .iter()
            .find(|t| t.entry_id == entry_id)
            .cloned())
    }

    async fn add_item(&self, folder: &FolderHandle, task: &NewTask) -> TaskResult<NativeTask> {
        let mut store = self.lock_available()?;
        let native = NativeTask {
            entry_id: new_entry_id(),
            message_class: TASK_MESSAGE_CLASS.to_string(),
            subject: task.subject.clone(),
            due_date: task.due_date,
            body: task.body.clone(),
            status: TaskStatus::NotStarted,
            complete: false,
        };
        store.folder_mut(folder)?.items.push(native.clone());
        Ok(native)
    }

    async fn mark_complete(&self, folder: &FolderHandle, entry_id: &str) -> TaskResult<()> {
        let mut store = self.lock_available()?;
        let task = store
            .folder_mut(folder)?
            .items
            .iter_mut()
            .find(|t| t.entry_id == entry_id)
            .ok_or_else(|| TaskError::TaskNotFound(entry_id.to_string()))?;

        task.status = TaskStatus::Complete;
        task.complete = true;
        Ok(())
    }

    async fn delete_item(&self, folder: &FolderHandle, entry_id: &str) -> TaskResult<()> {
        let mut store = self.lock_available()?;
        let items = &mut store.folder_mut(folder)?.items;
        let index = items
            .iter()
            .position(|t| t.entry_id == entry_id)
            .ok_or_else(|| TaskError::TaskNotFound(entry_id.to_string()))?;

        items.remove(index);
        Ok(())
    }
}

fn new_entry_id() -> String {
    uuid::Uuid::new_v4().simple().to_string().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_folder_is_idempotent() {
        let session = MemorySession::new();
        let first = session.with_folder("\\Archive\\Projects").unwrap();
        let second = session.with_folder("\\Archive\\Projects").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_with_folder_reuses_default_store() {
        let session = MemorySession::new();
        let tasks = session.with_folder("\\Mailbox\\Tasks").unwrap();
        let default = session.with_folder("default").unwrap();
        assert_eq!(tasks, default);
    }

    #[tokio::test]
    async fn test_entry_ids_are_unique() {
        let session = MemorySession::new();
        let folder = session.default_task_folder().await.unwrap();
        let new_task = NewTask {
            subject: "A".into(),
            due_date: None,
            body: None,
        };

        let a = session.add_item(&folder, &new_task).await.unwrap();
        let b = session.add_item(&folder, &new_task).await.unwrap();

        assert_ne!(a.entry_id, b.entry_id);
        assert_eq!(a.entry_id.len(), 32);
        assert_eq!(session.item_count(&folder), 2);
    }

    #[tokio::test]
    async fn test_unavailable_session_rejects_calls() {
        let session = MemorySession::new();
        session.set_available(false);
        assert!(matches!(
            session.root_folders().await,
            Err(TaskError::SessionUnavailable(_))
        ));

        session.set_available(true);
        assert!(session.root_folders().await.is_ok());
    }
}
