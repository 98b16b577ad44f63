//! In-process reference backend.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{RepositoryError, StatusFilter, TodoItem, TodoPayload, TodoRepository};

/// Todo storage held in a single ordered collection.
///
/// Lookups are linear scans. All access goes through one `RwLock`, so the
/// position found by a scan is still valid when it is used.
#[derive(Debug, Default)]
pub struct InMemoryTodoRepository {
    todos: RwLock<Vec<TodoItem>>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-populated with three demo items.
    pub fn with_seed_data() -> Self {
        Self::from_items(vec![
            TodoItem {
                id: "00000000-0000-4000-a000-000000000001".to_string(),
                title: "Cleaning".to_string(),
                content: "Clean the house".to_string(),
                done: true,
            },
            TodoItem {
                id: "00000000-0000-4000-a000-000000000002".to_string(),
                title: "Laundry".to_string(),
                content: "Do the laundry".to_string(),
                done: false,
            },
            TodoItem {
                id: "00000000-0000-4000-a000-000000000003".to_string(),
                title: "Cooking".to_string(),
                content: "Cook dinner".to_string(),
                done: false,
            },
        ])
    }

    pub fn from_items(items: Vec<TodoItem>) -> Self {
        Self {
            todos: RwLock::new(items),
        }
    }

    pub async fn len(&self) -> usize {
        self.todos.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.todos.read().await.is_empty()
    }
}

fn position(todos: &[TodoItem], id: &str) -> Result<usize, RepositoryError> {
    todos
        .iter()
        .position(|t| t.id == id)
        .ok_or(RepositoryError::NotFound)
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    fn backend(&self) -> &'static str {
        "in_memory"
    }

    async fn find_all(&self, filter: StatusFilter) -> Result<Vec<TodoItem>, RepositoryError> {
        let todos = self.todos.read().await;
        Ok(todos.iter().filter(|t| filter.matches(t)).cloned().collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<TodoItem, RepositoryError> {
        let todos = self.todos.read().await;
        let i = position(&todos, id)?;
        Ok(todos[i].clone())
    }

    async fn create(&self, payload: TodoPayload) -> Result<TodoItem, RepositoryError> {
        let item = payload.into_item(Uuid::new_v4().to_string());
        self.todos.write().await.push(item.clone());
        Ok(item)
    }

    async fn update(&self, id: &str, payload: TodoPayload) -> Result<TodoItem, RepositoryError> {
        let mut todos = self.todos.write().await;
        let i = position(&todos, id)?;
        todos[i] = payload.into_item(id);
        Ok(todos[i].clone())
    }

    async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        let mut todos = self.todos.write().await;
        let i = position(&todos, id)?;
        todos.remove(i);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_mints_fresh_id() {
        let repo = InMemoryTodoRepository::new();
        let mut payload = TodoPayload::new("a", "b", false);
        payload.id = Some("client-chosen".to_string());

        let created = repo.create(payload).await.unwrap();
        assert_ne!(created.id, "client-chosen");
        assert!(!created.id.is_empty());

        let fetched = repo.find_by_id(&created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn update_keeps_identifier() {
        let repo = InMemoryTodoRepository::with_seed_data();
        let id = "00000000-0000-4000-a000-000000000002";
        let mut payload = TodoPayload::new("c", "d", true);
        payload.id = Some("other".to_string());

        let updated = repo.update(id, payload).await.unwrap();
        assert_eq!(updated.id, id);
        assert_eq!(updated.title, "c");
        assert!(updated.done);
        assert!(repo.find_by_id("other").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn repeated_delete_reports_not_found() {
        let repo = InMemoryTodoRepository::with_seed_data();
        let id = "00000000-0000-4000-a000-000000000003";

        repo.delete(id).await.unwrap();
        assert!(repo.delete(id).await.unwrap_err().is_not_found());
        assert!(repo.delete(id).await.unwrap_err().is_not_found());
        assert_eq!(repo.len().await, 2);
    }

    #[tokio::test]
    async fn delete_last_item_leaves_empty_collection() {
        let repo = InMemoryTodoRepository::new();
        let item = repo.create(TodoPayload::new("x", "y", false)).await.unwrap();
        repo.delete(&item.id).await.unwrap();
        assert!(repo.is_empty().await);
        assert!(repo.update(&item.id, TodoPayload::default()).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn find_all_applies_status_filter() {
        let repo = InMemoryTodoRepository::with_seed_data();

        assert_eq!(repo.find_all(StatusFilter::Any).await.unwrap().len(), 3);

        let done = repo.find_all(StatusFilter::Done).await.unwrap();
        assert_eq!(done.len(), 1);
        assert!(done.iter().all(|t| t.done));

        let open = repo.find_all(StatusFilter::NotDone).await.unwrap();
        assert_eq!(open.len(), 2);
        assert!(open.iter().all(|t| !t.done));
    }

    #[tokio::test]
    async fn concurrent_creates_are_all_kept() {
        let repo = std::sync::Arc::new(InMemoryTodoRepository::new());
        let mut handles = Vec::new();
        for i in 0..32 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                repo.create(TodoPayload::new(format!("t{i}"), "", false)).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        assert_eq!(repo.len().await, 32);
    }
}
