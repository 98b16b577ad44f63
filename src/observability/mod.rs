//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields
//!     → nested in the trace_context span when the caller sent `traceparent`
//!
//! logging.rs:
//!     → EnvFilter (RUST_LOG or configured level)
//!     → JSON (production) or pretty (development) formatter on stdout
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Panics are routed through tracing so they land in the same log stream

pub mod logging;
