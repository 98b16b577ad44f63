//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection (net::Listener)
//!     → server.rs (hyper connection, header-read timeout, graceful watch)
//!     → middleware/ (trace context, logging, body capture, panic recovery)
//!     → controller.rs (route → use case)
//!     → error.rs (outcome → status code + JSON body)
//!     → Send to client
//! ```

pub mod controller;
pub mod error;
pub mod middleware;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, DrainOutcome, HttpServer};
