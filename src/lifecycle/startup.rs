//! Startup and run orchestration.
//!
//! # Responsibilities
//! - Open the storage backend selected by configuration
//! - Bind the listener and serve on a background task
//! - On shutdown: drain in-flight requests, then release storage
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal, no retry
//! - Storage is released even when the drain times out
//! - Teardown failures are logged and returned, never panicked on

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;

use crate::config::AppConfig;
use crate::domain::{RepositoryError, SharedRepository};
use crate::http::{DrainOutcome, HttpServer};
use crate::lifecycle::{LifecycleState, Shutdown, StateTracker};
use crate::net::{Listener, ListenerError};
use crate::persistence;
use crate::usecase::TodoUseCases;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to open storage: {0}")]
    Storage(#[from] RepositoryError),

    #[error(transparent)]
    Listener(#[from] ListenerError),
}

#[derive(Debug, Error)]
pub enum ShutdownError {
    #[error("drain timed out with {remaining} connection(s) still open")]
    DrainTimeout { remaining: u64 },

    #[error("server task failed: {0}")]
    Server(String),

    #[error("failed to close storage: {0}")]
    StorageClose(#[source] RepositoryError),

    #[error("closing storage timed out after {0:?}")]
    StorageCloseTimeout(Duration),
}

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Startup(#[from] StartupError),

    #[error(transparent)]
    Shutdown(#[from] ShutdownError),
}

/// The assembled service: configuration, storage handle and lifecycle state.
pub struct Application {
    config: AppConfig,
    repository: SharedRepository,
    state: StateTracker,
}

impl Application {
    /// Open storage per configuration.
    pub async fn build(config: AppConfig) -> Result<Self, StartupError> {
        let repository = persistence::open(&config.storage).await?;
        Ok(Self::with_repository(config, repository))
    }

    /// Use an already-open repository.
    pub fn with_repository(config: AppConfig, repository: SharedRepository) -> Self {
        Self {
            config,
            repository,
            state: StateTracker::new(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn state(&self) -> watch::Receiver<LifecycleState> {
        self.state.subscribe()
    }

    /// Bind the configured listener.
    pub async fn bind(&self) -> Result<Listener, StartupError> {
        Ok(Listener::bind(&self.config.listener).await?)
    }

    /// Bind, serve until `shutdown` fires, then tear down.
    ///
    /// A bind failure still releases the storage handle before returning.
    pub async fn run(self, shutdown: Shutdown) -> Result<(), LifecycleError> {
        let listener = match self.bind().await {
            Ok(listener) => listener,
            Err(err) => {
                tracing::error!(error = %err, "Failed to start server");
                // Already reported by close_storage; the bind error takes precedence.
                let _ = self.close_storage().await;
                self.state.advance(LifecycleState::Closed);
                return Err(err.into());
            }
        };
        self.serve(listener, shutdown).await?;
        Ok(())
    }

    /// Serve on an already-bound listener until `shutdown` fires.
    pub async fn serve(self, listener: Listener, shutdown: Shutdown) -> Result<(), ShutdownError> {
        let address: Option<SocketAddr> = listener.local_addr().ok();
        let use_cases = TodoUseCases::new(self.repository.clone());
        let server = HttpServer::new(&self.config, use_cases);

        let server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));
        self.state.advance(LifecycleState::Listening);
        tracing::info!(
            address = ?address,
            backend = self.repository.backend(),
            base_path = %self.config.listener.base_path,
            "Server listening"
        );

        shutdown.wait().await;
        self.state.advance(LifecycleState::ShuttingDown);
        tracing::info!("Shutting down server");

        let drained = match server_task.await {
            Ok(DrainOutcome::Completed) => Ok(()),
            Ok(DrainOutcome::TimedOut { remaining }) => {
                Err(ShutdownError::DrainTimeout { remaining })
            }
            Err(err) => {
                tracing::error!(error = %err, "Server task failed");
                Err(ShutdownError::Server(err.to_string()))
            }
        };

        let closed = self.close_storage().await;
        self.state.advance(LifecycleState::Closed);
        tracing::info!("Server closed");

        drained.and(closed)
    }

    async fn close_storage(&self) -> Result<(), ShutdownError> {
        let limit = self.config.timeouts.storage_close();
        match tokio::time::timeout(limit, self.repository.close()).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => {
                tracing::error!(error = %err, "Failed to close storage");
                Err(ShutdownError::StorageClose(err))
            }
            Err(_) => {
                tracing::error!(timeout_secs = limit.as_secs(), "Closing storage timed out");
                Err(ShutdownError::StorageCloseTimeout(limit))
            }
        }
    }
}
