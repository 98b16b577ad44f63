//! Request middleware pipeline.
//!
//! # Data Flow
//! ```text
//! Incoming request
//!     → trace_context.rs (traceparent → span + extension)
//!     → TraceLayer (request/response logging)
//!     → timeout.rs (request deadline → JSON 500)
//!     → request_body.rs (buffer, log, restore body)
//!     → recover.rs (panic → 500)
//!     → controller
//! ```
//!
//! # Design Decisions
//! - Trace context is established before anything logs, so every event is
//!   correlated
//! - Panic recovery is the innermost wrap around the handler
//! - Body capture runs before the handler consumes the body

pub mod recover;
pub mod request_body;
pub mod timeout;
pub mod trace_context;

use axum::{middleware, Router};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::config::AppConfig;

pub use recover::handle_panic;
pub use request_body::{capture_request_body, BodyLimit};
pub use timeout::{enforce_request_timeout, RequestTimeout};
pub use trace_context::{propagate_trace_context, TraceContext, TRACEPARENT_HEADER};

/// Wrap `router` in the full pipeline.
pub fn apply(router: Router, config: &AppConfig) -> Router {
    let body_limit = BodyLimit(config.limits.max_body_bytes);
    let request_timeout = RequestTimeout(config.timeouts.request());

    router.layer(
        ServiceBuilder::new()
            .layer(middleware::from_fn(propagate_trace_context))
            .layer(TraceLayer::new_for_http())
            .layer(middleware::from_fn_with_state(request_timeout, enforce_request_timeout))
            .layer(middleware::from_fn_with_state(body_limit, capture_request_body))
            .layer(CatchPanicLayer::custom(handle_panic)),
    )
}
