//! Storage backends implementing [`TodoRepository`](crate::domain::TodoRepository).
//!
//! # Data Flow
//! ```text
//! StorageConfig.backend
//!     → postgres.rs (sqlx pool, one statement per operation)
//!     → in_memory.rs (RwLock-guarded Vec, linear scan)
//!     → SharedRepository handed to the use cases
//! ```
//!
//! # Design Decisions
//! - Backends are chosen at startup, never swapped at runtime
//! - The connection handle is owned by the repository and released through
//!   `TodoRepository::close`, driven by the lifecycle manager

pub mod in_memory;
pub mod postgres;

use std::sync::Arc;

use crate::config::{StorageBackend, StorageConfig};
use crate::domain::{RepositoryError, SharedRepository};

pub use in_memory::InMemoryTodoRepository;
pub use postgres::PostgresTodoRepository;

/// Open the backend selected by configuration.
pub async fn open(config: &StorageConfig) -> Result<SharedRepository, RepositoryError> {
    match config.backend {
        StorageBackend::Postgres => {
            let repo = PostgresTodoRepository::connect(config).await?;
            Ok(Arc::new(repo))
        }
        StorageBackend::InMemory => {
            tracing::info!(seed = config.seed, "Using in-memory storage");
            let repo = if config.seed {
                InMemoryTodoRepository::with_seed_data()
            } else {
                InMemoryTodoRepository::new()
            };
            Ok(Arc::new(repo))
        }
    }
}
