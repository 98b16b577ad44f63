//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tower::ServiceExt;

use todo_api::config::{AppConfig, StorageBackend};
use todo_api::domain::SharedRepository;
use todo_api::http::build_router;
use todo_api::lifecycle::{Application, LifecycleState, Shutdown, ShutdownError};
use todo_api::persistence::InMemoryTodoRepository;
use todo_api::usecase::TodoUseCases;

/// In-memory configuration bound to an ephemeral local port.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.storage.backend = StorageBackend::InMemory;
    config.timeouts.shutdown_drain_secs = 2;
    config.timeouts.storage_close_secs = 1;
    config
}

pub fn in_memory_repo() -> SharedRepository {
    Arc::new(InMemoryTodoRepository::new())
}

/// Full application router over a fresh in-memory repository.
pub fn test_router() -> Router {
    build_router(&test_config(), TodoUseCases::new(in_memory_repo()))
}

/// Send one request through `router` and decode the JSON body (Null if empty).
pub async fn send(router: &Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(text) => {
            builder = builder.header("content-type", "application/json");
            Body::from(text.to_string())
        }
        None => Body::empty(),
    };
    let response = router.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// A live server on an ephemeral port.
pub struct RunningServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub state: watch::Receiver<LifecycleState>,
    pub handle: JoinHandle<Result<(), ShutdownError>>,
}

impl RunningServer {
    pub fn base_url(&self) -> String {
        format!("http://{}/api/v1", self.addr)
    }

    /// Trigger shutdown and wait for the server to finish.
    pub async fn stop(self) -> Result<(), ShutdownError> {
        self.shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(10), self.handle)
            .await
            .expect("server did not stop")
            .expect("server task panicked")
    }
}

pub async fn start_server(config: AppConfig, repo: SharedRepository) -> RunningServer {
    let app = Application::with_repository(config, repo);
    let mut state = app.state();
    let listener = app.bind().await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let handle = tokio::spawn(app.serve(listener, shutdown.clone()));

    state
        .wait_for(|s| *s == LifecycleState::Listening)
        .await
        .unwrap();

    RunningServer {
        addr,
        shutdown,
        state,
        handle,
    }
}

pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
