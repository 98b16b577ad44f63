//! Storage contract for todo items.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::error::RepositoryError;
use crate::domain::model::{StatusFilter, TodoItem, TodoPayload};

/// Handle shared between the use cases and the lifecycle manager.
pub type SharedRepository = Arc<dyn TodoRepository>;

/// Polymorphic storage backend.
///
/// Every implementation must report a missing identifier as
/// [`RepositoryError::NotFound`] and any other fault as
/// [`RepositoryError::Storage`].
#[async_trait]
pub trait TodoRepository: Send + Sync + 'static {
    /// Short backend name for logs.
    fn backend(&self) -> &'static str;

    /// All items matching `filter`. Order is unspecified.
    async fn find_all(&self, filter: StatusFilter) -> Result<Vec<TodoItem>, RepositoryError>;

    async fn find_by_id(&self, id: &str) -> Result<TodoItem, RepositoryError>;

    /// Persist a new item under a freshly minted identifier.
    async fn create(&self, payload: TodoPayload) -> Result<TodoItem, RepositoryError>;

    /// Replace title, content and done wholesale, keeping `id`.
    async fn update(&self, id: &str, payload: TodoPayload) -> Result<TodoItem, RepositoryError>;

    async fn delete(&self, id: &str) -> Result<(), RepositoryError>;

    /// Release the backend connection.
    async fn close(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
