//! Core types for the Outlook Tasks API.
//!
//! This crate holds everything between the HTTP surface and the desktop
//! client's automation object model:
//! - `folder` resolves a configured folder path to a task folder
//! - `mapper` converts native task items to and from the wire shape
//! - `service` implements the list/create/complete/delete operations
//! - `session` is the capability trait the operations run against, with
//!   `bridge` (external automation bridge) and `memory` implementations

pub mod bridge;
pub mod config;
pub mod error;
pub mod folder;
pub mod mapper;
pub mod memory;
pub mod service;
pub mod session;
pub mod task;

pub use error::{TaskError, TaskResult};
pub use folder::{FolderHandle, FolderPath};
pub use service::TaskService;
pub use session::AutomationSession;
pub use task::{CreateTaskRequest, NativeTask, NewTask, TaskDto, TaskStatus};
