//! Todo resource routes.
//!
//! ```text
//! GET    /todos?status=   → ListTodos    200
//! POST   /todos           → CreateTodo   201
//! GET    /todos/{id}      → GetTodo      200
//! PUT    /todos/{id}      → UpdateTodo   200
//! DELETE /todos/{id}      → DeleteTodo   204
//! ```

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::domain::{TodoItem, TodoPayload, TodoQuery};
use crate::http::error::ApiError;
use crate::usecase::TodoUseCases;

/// Build the resource router. Paths are relative to the base path.
pub fn routes(use_cases: TodoUseCases) -> Router {
    Router::new()
        .route("/todos", get(list).post(create))
        .route("/todos/{id}", get(read).put(update).delete(remove))
        .with_state(use_cases)
}

/// Fallback for paths outside the resource group.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

async fn list(
    State(use_cases): State<TodoUseCases>,
    query: Result<Query<TodoQuery>, QueryRejection>,
) -> Result<Json<Vec<TodoItem>>, ApiError> {
    let Query(query) = query?;
    let filter = query
        .filter()
        .map_err(|status| ApiError::Validation(format!("unknown status filter '{status}'")))?;

    let todos = use_cases.list.execute(filter).await?;
    Ok(Json(todos))
}

async fn create(
    State(use_cases): State<TodoUseCases>,
    payload: Result<Json<TodoPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<TodoItem>), ApiError> {
    let Json(payload) = payload?;
    let todo = use_cases.create.execute(payload).await?;
    tracing::debug!(id = %todo.id, "Todo created");
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn read(
    State(use_cases): State<TodoUseCases>,
    Path(id): Path<String>,
) -> Result<Json<TodoItem>, ApiError> {
    let todo = use_cases.get.execute(&id).await?;
    Ok(Json(todo))
}

async fn update(
    State(use_cases): State<TodoUseCases>,
    Path(id): Path<String>,
    payload: Result<Json<TodoPayload>, JsonRejection>,
) -> Result<Json<TodoItem>, ApiError> {
    let Json(payload) = payload?;
    let todo = use_cases.update.execute(&id, payload).await?;
    Ok(Json(todo))
}

async fn remove(
    State(use_cases): State<TodoUseCases>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    use_cases.delete.execute(&id).await?;
    tracing::debug!(id = %id, "Todo deleted");
    Ok(StatusCode::NO_CONTENT)
}
