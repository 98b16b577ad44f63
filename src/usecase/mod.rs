//! Use-case layer.
//!
//! One operation object per CRUD verb. Each wraps exactly one repository
//! call and returns its outcome unchanged; this is the seam where the storage
//! backend is swapped without touching the HTTP layer.

use crate::domain::{
    RepositoryError, SharedRepository, StatusFilter, TodoItem, TodoPayload,
};

/// Lists items matching a status filter.
#[derive(Clone)]
pub struct ListTodos {
    repo: SharedRepository,
}

impl ListTodos {
    pub fn new(repo: SharedRepository) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, filter: StatusFilter) -> Result<Vec<TodoItem>, RepositoryError> {
        self.repo.find_all(filter).await
    }
}

/// Fetches one item by identifier.
#[derive(Clone)]
pub struct GetTodo {
    repo: SharedRepository,
}

impl GetTodo {
    pub fn new(repo: SharedRepository) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, id: &str) -> Result<TodoItem, RepositoryError> {
        self.repo.find_by_id(id).await
    }
}

#[derive(Clone)]
pub struct CreateTodo {
    repo: SharedRepository,
}

impl CreateTodo {
    pub fn new(repo: SharedRepository) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, payload: TodoPayload) -> Result<TodoItem, RepositoryError> {
        self.repo.create(payload).await
    }
}

#[derive(Clone)]
pub struct UpdateTodo {
    repo: SharedRepository,
}

impl UpdateTodo {
    pub fn new(repo: SharedRepository) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, id: &str, payload: TodoPayload) -> Result<TodoItem, RepositoryError> {
        self.repo.update(id, payload).await
    }
}

#[derive(Clone)]
pub struct DeleteTodo {
    repo: SharedRepository,
}

impl DeleteTodo {
    pub fn new(repo: SharedRepository) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, id: &str) -> Result<(), RepositoryError> {
        self.repo.delete(id).await
    }
}

/// All five use cases, wired to the same repository.
///
/// Injected into the controller as router state.
#[derive(Clone)]
pub struct TodoUseCases {
    pub list: ListTodos,
    pub get: GetTodo,
    pub create: CreateTodo,
    pub update: UpdateTodo,
    pub delete: DeleteTodo,
}

impl TodoUseCases {
    pub fn new(repo: SharedRepository) -> Self {
        Self {
            list: ListTodos::new(repo.clone()),
            get: GetTodo::new(repo.clone()),
            create: CreateTodo::new(repo.clone()),
            update: UpdateTodo::new(repo.clone()),
            delete: DeleteTodo::new(repo),
        }
    }
}
