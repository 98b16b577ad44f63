//! Panic recovery.
//!
//! Used as the custom handler of `tower_http::catch_panic::CatchPanicLayer`.
//! The panic payload is logged in full; the client only sees a generic 500.

use std::any::Any;

use axum::response::{IntoResponse, Response};

use crate::http::error::ApiError;
use crate::observability::logging::panic_message;

pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic_message(&*payload);
    tracing::error!(panic = %message, "Recovered from panic while handling request");
    ApiError::Internal.into_response()
}
