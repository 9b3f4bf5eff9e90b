use std::sync::Arc;

use outlook_tasks_core::TaskService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    // Folder handles are resolved per request inside the service;
    // nothing here outlives a single automation call sequence.
    pub service: Arc<TaskService>,
}

impl AppState {
    pub fn new(service: TaskService) -> Self {
        AppState {
            service: Arc::new(service),
        }
    }
}
