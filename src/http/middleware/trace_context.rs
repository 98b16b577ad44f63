//! W3C trace-context extraction.
//!
//! Parses `traceparent` (`{version}-{trace-id}-{parent-id}-{flags}`) and
//! runs the rest of the chain inside a span carrying the ids. Requests
//! without a valid header pass through untouched.

use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use tracing::Instrument;

/// The W3C Trace Context header for trace propagation.
pub const TRACEPARENT_HEADER: &str = "traceparent";

/// Trace identifiers propagated by the caller.
///
/// Inserted into request extensions for handlers that need it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceContext {
    /// 32 lowercase hex chars.
    pub trace_id: String,
    /// 16 lowercase hex chars.
    pub span_id: String,
    pub sampled: bool,
}

impl TraceContext {
    /// Parse a `traceparent` header value. Only version `00` is accepted.
    pub fn parse(value: &str) -> Option<Self> {
        let mut parts = value.trim().split('-');
        let (version, trace_id, span_id, flags) =
            (parts.next()?, parts.next()?, parts.next()?, parts.next()?);
        if parts.next().is_some() || version != "00" {
            return None;
        }
        if !is_hex_id(trace_id, 32) || !is_hex_id(span_id, 16) {
            return None;
        }
        if flags.len() != 2 {
            return None;
        }
        let flags = u8::from_str_radix(flags, 16).ok()?;

        Some(Self {
            trace_id: trace_id.to_ascii_lowercase(),
            span_id: span_id.to_ascii_lowercase(),
            sampled: flags & 0x01 == 0x01,
        })
    }

    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let value = headers.get(TRACEPARENT_HEADER)?.to_str().ok()?;
        Self::parse(value)
    }
}

/// Hex of the given length that is not all zeros (the W3C invalid value).
fn is_hex_id(value: &str, len: usize) -> bool {
    value.len() == len
        && value.chars().all(|c| c.is_ascii_hexdigit())
        && value.chars().any(|c| c != '0')
}

pub async fn propagate_trace_context(mut request: Request, next: Next) -> Response {
    let Some(context) = TraceContext::from_headers(request.headers()) else {
        return next.run(request).await;
    };

    let span = tracing::info_span!(
        "trace_context",
        trace_id = %context.trace_id,
        span_id = %context.span_id,
        sampled = context.sampled,
    );
    request.extensions_mut().insert(context);

    next.run(request).instrument(span).await
}
