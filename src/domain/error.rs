//! Repository outcomes shared by every backend.

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure of a repository operation.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No item carries the requested identifier.
    #[error("not found")]
    NotFound,

    /// The backend failed (unreachable, query error, timeout).
    #[error("storage failure: {0}")]
    Storage(#[source] BoxError),
}

impl RepositoryError {
    pub fn storage(err: impl Into<BoxError>) -> Self {
        Self::Storage(err.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound,
            other => Self::Storage(Box::new(other)),
        }
    }
}
