//! Typed HTTP client for the todo API.

mod client;

pub use client::{ClientError, NewTodo, Todo, TodoClient};
