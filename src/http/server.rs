//! HTTP server setup and connection serving.
//!
//! # Responsibilities
//! - Create the Axum router with the resource routes and middleware
//! - Serve each accepted connection on its own task (HTTP/1.1 and HTTP/2)
//! - Bound the wait for the first byte and for request headers, so silent or
//!   slow-header clients cannot hold connection slots
//! - Stop accepting on shutdown and drain in-flight connections with a bound

use std::time::Duration;

use axum::{extract::Request, Router};
use hyper::body::Incoming;
use hyper_util::{
    rt::{TokioExecutor, TokioIo, TokioTimer},
    server::{conn::auto, graceful::GracefulShutdown},
};
use tokio::net::TcpStream;
use tower::ServiceExt;

use crate::config::{AppConfig, TimeoutConfig};
use crate::http::{controller, middleware};
use crate::lifecycle::ShutdownSignal;
use crate::net::{ConnectionTracker, Listener};
use crate::usecase::TodoUseCases;

/// Build the application router: resource routes under the base path,
/// JSON 404 fallback, wrapped by the middleware pipeline.
pub fn build_router(config: &AppConfig, use_cases: TodoUseCases) -> Router {
    let router = Router::new()
        .nest(&config.listener.base_path, controller::routes(use_cases))
        .fallback(controller::not_found);
    middleware::apply(router, config)
}

/// Wait up to `limit` for the client to send anything.
///
/// Returns `false` on timeout, EOF or a socket error.
async fn first_byte(stream: &TcpStream, limit: Duration) -> bool {
    let mut buf = [0u8; 1];
    matches!(
        tokio::time::timeout(limit, stream.peek(&mut buf)).await,
        Ok(Ok(n)) if n > 0
    )
}

/// Result of the drain phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    /// Every connection finished within the drain window.
    Completed,
    /// The window expired with connections still open.
    TimedOut { remaining: u64 },
}

/// HTTP server for the todo API.
pub struct HttpServer {
    router: Router,
    read_header_timeout: Duration,
    drain_timeout: Duration,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: &AppConfig, use_cases: TodoUseCases) -> Self {
        Self::with_router(build_router(config, use_cases), &config.timeouts)
    }

    /// Serve an arbitrary, already-layered router.
    pub fn with_router(router: Router, timeouts: &TimeoutConfig) -> Self {
        Self {
            router,
            read_header_timeout: timeouts.read_header(),
            drain_timeout: timeouts.shutdown_drain(),
        }
    }

    /// Accept connections until `shutdown` fires, then drain.
    pub async fn run(self, listener: Listener, mut shutdown: ShutdownSignal) -> DrainOutcome {
        let graceful = GracefulShutdown::new();
        let tracker = ConnectionTracker::new();

        let mut builder = auto::Builder::new(TokioExecutor::new());
        builder
            .http1()
            .timer(TokioTimer::new())
            .header_read_timeout(self.read_header_timeout);

        if let Ok(addr) = listener.local_addr() {
            tracing::info!(address = %addr, "HTTP server starting");
        }

        loop {
            tokio::select! {
                biased;

                _ = shutdown.wait() => {
                    tracing::info!("Stopped accepting connections");
                    break;
                }
                accepted = listener.accept() => {
                    let (stream, peer_addr, permit) = match accepted {
                        Ok(conn) => conn,
                        Err(err) => {
                            tracing::warn!(error = %err, "Accept failed");
                            continue;
                        }
                    };

                    let router = self.router.clone();
                    let service = hyper::service::service_fn(move |request: Request<Incoming>| {
                        router.clone().oneshot(request)
                    });

                    let builder = builder.clone();
                    let watcher = graceful.watcher();
                    let mut shutdown = shutdown.clone();
                    let first_byte_timeout = self.read_header_timeout;
                    let guard = tracker.track();

                    tokio::spawn(async move {
                        let _guard = guard;
                        let _permit = permit;

                        // Protocol detection has no timer of its own.
                        tokio::select! {
                            ready = first_byte(&stream, first_byte_timeout) => {
                                if !ready {
                                    tracing::debug!(peer_addr = %peer_addr, "Closing idle connection");
                                    return;
                                }
                            }
                            _ = shutdown.wait() => return,
                        }

                        let connection = builder.serve_connection(TokioIo::new(stream), service);
                        if let Err(err) = watcher.watch(connection).await {
                            tracing::debug!(peer_addr = %peer_addr, error = %err, "Connection error");
                        }
                    });
                }
            }
        }

        drop(listener);

        tracing::info!(
            connections = tracker.active_count(),
            timeout_secs = self.drain_timeout.as_secs(),
            "Draining connections"
        );

        match tokio::time::timeout(self.drain_timeout, graceful.shutdown()).await {
            Ok(()) => {
                tracing::info!("HTTP server stopped");
                DrainOutcome::Completed
            }
            Err(_) => {
                let remaining = tracker.active_count();
                tracing::warn!(remaining, "Drain timed out with connections still open");
                DrainOutcome::TimedOut { remaining }
            }
        }
    }
}
