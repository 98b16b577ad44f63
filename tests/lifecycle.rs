//! Live-server tests: startup, client round trips, graceful drain, teardown.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{routing::get, Router};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use todo_api::config::TimeoutConfig;
use todo_api::domain::{RepositoryError, StatusFilter, TodoItem, TodoPayload, TodoRepository};
use todo_api::http::{DrainOutcome, HttpServer};
use todo_api::lifecycle::{
    Application, LifecycleError, LifecycleState, Shutdown, ShutdownError, StartupError,
};
use todo_api::net::{Listener, ListenerError};
use todo_api::persistence::InMemoryTodoRepository;
use todo_sdk::{ClientError, NewTodo, TodoClient};

mod common;
use common::{http_client, in_memory_repo, start_server, test_config};

#[derive(Clone, Copy)]
enum CloseBehavior {
    Ok,
    Fail,
    Hang,
}

/// In-memory store whose `close` is observable and scriptable.
struct ScriptedClose {
    inner: InMemoryTodoRepository,
    behavior: CloseBehavior,
    closed: Arc<AtomicBool>,
}

impl ScriptedClose {
    fn new(behavior: CloseBehavior) -> (Self, Arc<AtomicBool>) {
        let closed = Arc::new(AtomicBool::new(false));
        let repo = Self {
            inner: InMemoryTodoRepository::new(),
            behavior,
            closed: closed.clone(),
        };
        (repo, closed)
    }
}

#[async_trait]
impl TodoRepository for ScriptedClose {
    fn backend(&self) -> &'static str {
        "scripted"
    }

    async fn find_all(&self, filter: StatusFilter) -> Result<Vec<TodoItem>, RepositoryError> {
        self.inner.find_all(filter).await
    }

    async fn find_by_id(&self, id: &str) -> Result<TodoItem, RepositoryError> {
        self.inner.find_by_id(id).await
    }

    async fn create(&self, payload: TodoPayload) -> Result<TodoItem, RepositoryError> {
        self.inner.create(payload).await
    }

    async fn update(&self, id: &str, payload: TodoPayload) -> Result<TodoItem, RepositoryError> {
        self.inner.update(id, payload).await
    }

    async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        self.inner.delete(id).await
    }

    async fn close(&self) -> Result<(), RepositoryError> {
        match self.behavior {
            CloseBehavior::Ok => {
                self.closed.store(true, Ordering::SeqCst);
                Ok(())
            }
            CloseBehavior::Fail => Err(RepositoryError::storage("connection reset")),
            CloseBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            }
        }
    }
}

#[tokio::test]
async fn sdk_round_trip_then_clean_shutdown() {
    let (repo, closed) = ScriptedClose::new(CloseBehavior::Ok);
    let server = start_server(test_config(), Arc::new(repo)).await;
    let client = TodoClient::with_client(http_client(), &server.base_url());

    let created = client
        .create(&NewTodo::new("write tests", "for the lifecycle", false))
        .await
        .unwrap();
    assert_eq!(created.title, "write tests");

    let fetched = client.get(&created.id).await.unwrap();
    assert_eq!(fetched, created);

    let updated = client
        .update(&created.id, &NewTodo::new("write tests", "done now", true))
        .await
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert!(updated.done);

    let done = client.list(Some("done")).await.unwrap();
    assert_eq!(done.len(), 1);
    assert!(client.list(Some("undone")).await.unwrap().is_empty());

    client.delete(&created.id).await.unwrap();
    assert!(matches!(
        client.get(&created.id).await,
        Err(ClientError::NotFound)
    ));

    let mut state = server.state.clone();
    server.stop().await.unwrap();
    assert_eq!(*state.borrow_and_update(), LifecycleState::Closed);
    assert!(closed.load(Ordering::SeqCst));
}

#[tokio::test]
async fn stops_accepting_after_shutdown() {
    let server = start_server(test_config(), in_memory_repo()).await;
    let url = format!("{}/todos", server.base_url());
    let client = http_client();

    assert!(client.get(&url).send().await.unwrap().status().is_success());

    server.stop().await.unwrap();
    assert!(client.get(&url).send().await.is_err());
}

#[tokio::test]
async fn shutdown_trigger_is_idempotent() {
    let server = start_server(test_config(), in_memory_repo()).await;
    assert!(server.shutdown.trigger());
    assert!(!server.shutdown.trigger());
    server.stop().await.unwrap();
}

fn slow_router(delay: Duration) -> Router {
    Router::new().route(
        "/slow",
        get(move || async move {
            tokio::time::sleep(delay).await;
            "finished"
        }),
    )
}

async fn spawn_server(
    router: Router,
    drain_secs: u64,
) -> (std::net::SocketAddr, Shutdown, tokio::task::JoinHandle<DrainOutcome>) {
    let config = test_config();
    let timeouts = TimeoutConfig {
        shutdown_drain_secs: drain_secs,
        ..config.timeouts.clone()
    };
    let listener = Listener::bind(&config.listener).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = HttpServer::with_router(router, &timeouts);
    let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));
    (addr, shutdown, handle)
}

#[tokio::test]
async fn drain_lets_in_flight_request_finish() {
    let (addr, shutdown, handle) = spawn_server(slow_router(Duration::from_millis(500)), 5).await;

    let request = tokio::spawn(async move {
        http_client()
            .get(format!("http://{addr}/slow"))
            .send()
            .await?
            .text()
            .await
    });

    tokio::time::sleep(Duration::from_millis(150)).await;
    shutdown.trigger();

    let body = request.await.unwrap().unwrap();
    assert_eq!(body, "finished");
    assert_eq!(handle.await.unwrap(), DrainOutcome::Completed);
}

#[tokio::test]
async fn drain_gives_up_after_timeout() {
    let (addr, shutdown, handle) = spawn_server(slow_router(Duration::from_secs(30)), 1).await;

    let _request = tokio::spawn(async move {
        http_client().get(format!("http://{addr}/slow")).send().await
    });

    tokio::time::sleep(Duration::from_millis(150)).await;
    let started = tokio::time::Instant::now();
    shutdown.trigger();

    let outcome = handle.await.unwrap();
    assert_eq!(outcome, DrainOutcome::TimedOut { remaining: 1 });
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn storage_close_failure_is_reported() {
    let (repo, _) = ScriptedClose::new(CloseBehavior::Fail);
    let server = start_server(test_config(), Arc::new(repo)).await;
    let mut state = server.state.clone();

    let result = server.stop().await;
    assert!(matches!(result, Err(ShutdownError::StorageClose(_))));
    assert_eq!(*state.borrow_and_update(), LifecycleState::Closed);
}

#[tokio::test]
async fn storage_close_timeout_is_reported() {
    let (repo, _) = ScriptedClose::new(CloseBehavior::Hang);
    let server = start_server(test_config(), Arc::new(repo)).await;

    let result = server.stop().await;
    assert!(matches!(
        result,
        Err(ShutdownError::StorageCloseTimeout(limit)) if limit == Duration::from_secs(1)
    ));
}

#[tokio::test]
async fn bind_conflict_fails_startup_and_releases_storage() {
    let occupied = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let mut config = test_config();
    config.listener.bind_address = occupied.local_addr().unwrap().to_string();

    let (repo, closed) = ScriptedClose::new(CloseBehavior::Ok);
    let app = Application::with_repository(config, Arc::new(repo));
    let state = app.state();

    let result = app.run(Shutdown::new()).await;
    assert!(matches!(
        result,
        Err(LifecycleError::Startup(StartupError::Listener(ListenerError::Bind { .. })))
    ));
    assert!(closed.load(Ordering::SeqCst));
    assert_eq!(*state.borrow(), LifecycleState::Closed);
}

#[tokio::test]
async fn shutdown_before_listening_still_closes() {
    let (repo, closed) = ScriptedClose::new(CloseBehavior::Ok);
    let app = Application::with_repository(test_config(), Arc::new(repo));
    let state = app.state();
    let shutdown = Shutdown::new();
    shutdown.trigger();

    tokio::time::timeout(Duration::from_secs(5), app.run(shutdown))
        .await
        .unwrap()
        .unwrap();
    assert!(closed.load(Ordering::SeqCst));
    assert_eq!(*state.borrow(), LifecycleState::Closed);
}

/// Reads until EOF or error; `None` if the peer kept the socket open past `wait`.
async fn closed_within(stream: &mut TcpStream, wait: Duration) -> Option<Duration> {
    let started = tokio::time::Instant::now();
    let mut buf = [0u8; 256];
    let outcome = tokio::time::timeout(wait, async {
        loop {
            match stream.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(_) => continue,
            }
        }
    })
    .await;
    outcome.ok().map(|_| started.elapsed())
}

#[tokio::test]
async fn silent_connection_is_closed_after_header_timeout() {
    let mut config = test_config();
    config.timeouts.read_header_secs = 1;
    let server = start_server(config, in_memory_repo()).await;

    let mut silent = TcpStream::connect(server.addr).await.unwrap();
    let elapsed = closed_within(&mut silent, Duration::from_secs(4))
        .await
        .expect("silent connection was not closed");
    assert!(elapsed >= Duration::from_millis(900));

    server.stop().await.unwrap();
}

#[tokio::test]
async fn stalled_headers_are_closed_after_header_timeout() {
    let mut config = test_config();
    config.timeouts.read_header_secs = 1;
    let server = start_server(config, in_memory_repo()).await;

    let mut partial = TcpStream::connect(server.addr).await.unwrap();
    partial
        .write_all(b"GET /api/v1/todos HTTP/1.1\r\nHost: localhost\r\n")
        .await
        .unwrap();
    assert!(closed_within(&mut partial, Duration::from_secs(4)).await.is_some());

    server.stop().await.unwrap();
}

#[tokio::test]
async fn idle_connections_release_their_slots() {
    let mut config = test_config();
    config.timeouts.read_header_secs = 1;
    config.listener.max_connections = 2;
    let server = start_server(config, in_memory_repo()).await;

    let _first = TcpStream::connect(server.addr).await.unwrap();
    let _second = TcpStream::connect(server.addr).await.unwrap();

    let url = format!("{}/todos", server.base_url());
    let response = tokio::time::timeout(Duration::from_secs(5), http_client().get(&url).send())
        .await
        .expect("request starved by idle connections")
        .unwrap();
    assert!(response.status().is_success());

    server.stop().await.unwrap();
}
