//! Process configuration.
//!
//! Built once at startup from CLI flags and environment variables and never
//! mutated afterwards.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::bridge::{self, BridgeSession};
use crate::error::{TaskError, TaskResult};
use crate::folder::FolderPath;
use crate::memory::MemorySession;
use crate::service::TaskService;
use crate::session::AutomationSession;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8124;
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_FOLDER: &str = "default";

/// Which automation session implementation to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// External automation bridge talking to a running Outlook
    #[default]
    Bridge,
    /// In-process store, for development without Outlook
    Memory,
}

impl FromStr for Backend {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bridge" => Ok(Backend::Bridge),
            "memory" => Ok(Backend::Memory),
            other => Err(TaskError::Config(format!(
                "Unknown backend '{}'. Expected 'bridge' or 'memory'",
                other
            ))),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Bridge => write!(f, "bridge"),
            Backend::Memory => write!(f, "memory"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub folder: FolderPath,
    pub profile: Option<String>,
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub backend: Backend,
    pub bridge: String,
    pub bridge_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            folder: FolderPath::Default,
            profile: None,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            backend: Backend::default(),
            bridge: bridge::DEFAULT_BRIDGE.to_string(),
            bridge_timeout: bridge::DEFAULT_TIMEOUT,
        }
    }
}

impl Config {
    /// Parse the folder setting. An unset or blank value means the default folder.
    pub fn parse_folder(value: Option<&str>) -> TaskResult<FolderPath> {
        match value.map(str::trim) {
            None | Some("") => Ok(FolderPath::Default),
            Some(s) => FolderPath::parse(s),
        }
    }

    /// Address the HTTP server binds to, as `host:port`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Build the automation session selected by `backend`.
    pub fn session(&self) -> Arc<dyn AutomationSession> {
        match self.backend {
            Backend::Bridge => Arc::new(
                BridgeSession::new(&self.bridge)
                    .with_profile(self.profile.clone())
                    .with_timeout(self.bridge_timeout),
            ),
            Backend::Memory => Arc::new(MemorySession::new()),
        }
    }

    pub fn service(&self) -> TaskService {
        TaskService::new(self.session(), self.folder.clone())
    }
}
