//! Request body capture.
//!
//! Buffers the body of requests that carry one, logs it (as JSON when it
//! parses, raw text otherwise) and hands the handler a fresh body holding the
//! same bytes.

use axum::{
    body::{Body, Bytes},
    extract::{Request, State},
    http::{header, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::http::error::ApiError;

/// Largest body the capture stage will buffer.
#[derive(Debug, Clone, Copy)]
pub struct BodyLimit(pub usize);

pub async fn capture_request_body(
    State(BodyLimit(limit)): State<BodyLimit>,
    request: Request,
    next: Next,
) -> Response {
    if !carries_body(&request) {
        return next.run(request).await;
    }

    let (parts, body) = request.into_parts();
    let bytes = match axum::body::to_bytes(body, limit).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(error = %err, limit, "Failed to read request body");
            return ApiError::Validation(format!("failed to read request body: {err}"))
                .into_response();
        }
    };

    log_body(&bytes);

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

fn carries_body(request: &Request) -> bool {
    if matches!(*request.method(), Method::POST | Method::PUT | Method::PATCH) {
        return true;
    }
    request
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .is_some_and(|len| len > 0)
}

fn log_body(bytes: &Bytes) {
    match serde_json::from_slice::<serde_json::Value>(bytes) {
        Ok(value) => tracing::info!(request_body = %value, "Request body"),
        Err(_) => {
            tracing::info!(request_body = %String::from_utf8_lossy(bytes), "Request body")
        }
    }
}
