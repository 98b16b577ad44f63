//! Todo CRUD service.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────────┐
//!                    │                     TODO SERVICE                     │
//!                    │                                                      │
//!   Client Request   │  ┌─────────┐   ┌────────────┐   ┌────────────┐       │
//!   ─────────────────┼─▶│   net   │──▶│    http    │──▶│ controller │       │
//!                    │  │listener │   │ middleware │   │            │       │
//!                    │  └─────────┘   └────────────┘   └─────┬──────┘       │
//!                    │                                      ▼               │
//!                    │                               ┌────────────┐         │
//!                    │                               │  usecase   │         │
//!                    │                               └─────┬──────┘         │
//!                    │                                     ▼               │
//!   Client Response  │                               ┌────────────┐         │
//!   ◀────────────────┼───────────────────────────────│ repository │◀──▶ DB  │
//!                    │                               └────────────┘         │
//!                    │  ┌────────────────────────────────────────────────┐  │
//!                    │  │ config │ observability │ lifecycle (shutdown)  │  │
//!                    │  └────────────────────────────────────────────────┘  │
//!                    └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use todo_api::config::{load_config, StorageBackend};
use todo_api::lifecycle::{signals, Application, Shutdown};
use todo_api::observability::logging;

#[derive(Parser)]
#[command(name = "todo-api")]
#[command(about = "CRUD HTTP service for todo items", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Use the in-memory backend instead of PostgreSQL.
    #[arg(long)]
    in_memory: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if cli.in_memory {
        config.storage.backend = StorageBackend::InMemory;
    }

    logging::init(&config.observability);
    logging::install_panic_hook();

    tracing::info!("todo-api v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend = ?config.storage.backend,
        read_header_timeout_secs = config.timeouts.read_header_secs,
        shutdown_drain_secs = config.timeouts.shutdown_drain_secs,
        "Configuration loaded"
    );

    let app = match Application::build(config).await {
        Ok(app) => app,
        Err(err) => {
            tracing::error!(error = %err, "Failed to initialize application");
            return Err(err.into());
        }
    };

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    if let Err(err) = app.run(shutdown).await {
        tracing::error!(error = %err, "Server terminated with error");
        return Err(err.into());
    }

    tracing::info!("Server exiting");
    Ok(())
}
