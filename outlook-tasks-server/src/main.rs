//! outlook-tasks - REST API over an Outlook Tasks folder
//!
//! Every setting can come from a flag, an environment variable, or a `.env`
//! file in the working directory (or any parent). Settings are read once at
//! startup.

mod routes;
mod state;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use outlook_tasks_core::config::{self, Backend, Config};
use outlook_tasks_core::{TaskError, TaskService};
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[derive(Parser)]
#[command(name = "outlook-tasks")]
#[command(version, about = "Expose an Outlook Tasks folder as a REST API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Tasks folder path (e.g. "\\Mailbox\Tasks\Work"), or "default"
    #[arg(long, env = "OUTLOOK_TASKS_FOLDER", default_value = config::DEFAULT_FOLDER, global = true)]
    folder: String,

    /// Outlook profile to log on with
    #[arg(long, env = "OUTLOOK_PROFILE", global = true)]
    profile: Option<String>,

    #[arg(long, env = "HOST", default_value = config::DEFAULT_HOST, global = true)]
    host: String,

    #[arg(long, env = "PORT", default_value_t = config::DEFAULT_PORT, global = true)]
    port: u16,

    /// Log filter used when RUST_LOG is not set (e.g. "debug")
    #[arg(long, env = "LOG_LEVEL", default_value = config::DEFAULT_LOG_LEVEL, global = true)]
    log_level: String,

    /// Automation session backend: "bridge" or "memory"
    #[arg(long, env = "OUTLOOK_TASKS_BACKEND", default_value = "bridge", global = true)]
    backend: Backend,

    /// Automation bridge executable (looked up in PATH)
    #[arg(long, env = "OUTLOOK_BRIDGE", default_value = outlook_tasks_core::bridge::DEFAULT_BRIDGE, global = true)]
    bridge: String,

    /// Seconds to wait for the bridge to answer a single call
    #[arg(long, env = "OUTLOOK_BRIDGE_TIMEOUT", default_value_t = 10, global = true)]
    bridge_timeout_secs: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve,
    /// Show the default Tasks folder and whether the configured folder resolves
    Folders,
    /// Print incomplete tasks in the configured folder
    List,
}

impl Cli {
    fn config(&self) -> Result<Config> {
        Ok(Config {
            folder: Config::parse_folder(Some(&self.folder))?,
            profile: self.profile.clone().filter(|p| !p.trim().is_empty()),
            host: self.host.clone(),
            port: self.port,
            log_level: self.log_level.clone(),
            backend: self.backend,
            bridge: self.bridge.clone(),
            bridge_timeout: Duration::from_secs(self.bridge_timeout_secs),
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before clap reads env fallbacks
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match &dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded environment file"),
        Err(_) => tracing::debug!("no .env file found, using process environment"),
    }

    let config = cli.config()?;
    tracing::info!(
        folder = %config.folder,
        profile = config.profile.as_deref().unwrap_or("<running session>"),
        backend = %config.backend,
        "loaded configuration"
    );

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Folders => folders(config.service()).await,
        Commands::List => list(config.service()).await,
    }
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new(config::DEFAULT_LOG_LEVEL));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn serve(config: Config) -> Result<()> {
    let service = config.service();

    // A bad folder path is fatal; an unreachable Outlook is not.
    match service.folder().await {
        Ok(folder) => tracing::info!(folder = %folder.path, "using tasks folder"),
        Err(e @ (TaskError::FolderNotFound(_) | TaskError::Config(_))) => {
            return Err(e).context(format!(
                "Tasks folder '{}' could not be resolved",
                service.folder_path()
            ));
        }
        Err(e) => tracing::warn!(
            error = %e,
            "Outlook unavailable at startup; requests will fail until it is reachable"
        ),
    }

    let app = routes::app(AppState::new(service));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("outlook-tasks listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}

async fn folders(service: TaskService) -> Result<()> {
    let default = service
        .default_folder()
        .await
        .context("Failed to read the default Tasks folder")?;
    println!("Default Tasks: {}", default.path);

    match service.folder().await {
        Ok(folder) => println!("Configured ({}): {}", service.folder_path(), folder.path),
        Err(e) => println!("Configured ({}): not found ({})", service.folder_path(), e),
    }

    Ok(())
}

async fn list(service: TaskService) -> Result<()> {
    let tasks = service.list().await?;

    if tasks.is_empty() {
        println!("No incomplete tasks found.");
        return Ok(());
    }

    for task in tasks {
        let due = task
            .due_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "none".to_string());
        println!(
            "- {} (Due: {}, Status: {:?}) [{}]",
            task.subject, due, task.status, task.task_id
        );
    }

    Ok(())
}
