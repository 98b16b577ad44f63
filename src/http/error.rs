//! Mapping of domain outcomes to HTTP responses.
//!
//! This is the single place where failures become status codes. Bodies are
//! always `{"error": <message>}`; storage and internal faults expose a fixed
//! message and log the underlying cause.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::domain::error::BoxError;
use crate::domain::RepositoryError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed query or body. Always client-caused.
    #[error("{0}")]
    Validation(String),

    #[error("not found")]
    NotFound,

    #[error("storage failure")]
    Storage(#[source] BoxError),

    /// The request outlived its deadline.
    #[error("request timed out")]
    Timeout,

    /// Recovered panic; detail is logged, never returned.
    #[error("internal server error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Storage(_) | ApiError::Timeout | ApiError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ApiError::NotFound,
            RepositoryError::Storage(source) => ApiError::Storage(source),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Storage(source) = &self {
            tracing::error!(error = %source, "Storage operation failed");
        }
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
