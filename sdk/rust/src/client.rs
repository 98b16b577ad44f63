use reqwest::{Client, Response, StatusCode, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

/// A todo item as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: String,
    pub title: String,
    pub content: String,
    pub done: bool,
}

/// Body for create and update calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTodo {
    pub title: String,
    pub content: String,
    pub done: bool,
}

impl NewTodo {
    pub fn new(title: impl Into<String>, content: impl Into<String>, done: bool) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            done,
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("not found")]
    NotFound,

    #[error("invalid base URL: {0}")]
    InvalidUrl(String),

    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },
}

/// Client bound to an API base URL such as `http://localhost:8080/api/v1`.
#[derive(Debug, Clone)]
pub struct TodoClient {
    client: Client,
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// List todos, optionally filtered by status (`done` / `undone`).
    pub async fn list(&self, status: Option<&str>) -> Result<Vec<Todo>, ClientError> {
        let mut request = self.client.get(self.todos_url(None)?);
        if let Some(status) = status {
            request = request.query(&[("status", status)]);
        }
        let resp = request.send().await?;
        decode(resp, StatusCode::OK).await
    }

    pub async fn get(&self, id: &str) -> Result<Todo, ClientError> {
        let resp = self
            .client
            .get(self.todos_url(Some(id))?)
            .send()
            .await?;
        decode(resp, StatusCode::OK).await
    }

    pub async fn create(&self, todo: &NewTodo) -> Result<Todo, ClientError> {
        let resp = self
            .client
            .post(self.todos_url(None)?)
            .json(todo)
            .send()
            .await?;
        decode(resp, StatusCode::CREATED).await
    }

    pub async fn update(&self, id: &str, todo: &NewTodo) -> Result<Todo, ClientError> {
        let resp = self
            .client
            .put(self.todos_url(Some(id))?)
            .json(todo)
            .send()
            .await?;
        decode(resp, StatusCode::OK).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ClientError> {
        let resp = self
            .client
            .delete(self.todos_url(Some(id))?)
            .send()
            .await?;
        check(resp, StatusCode::NO_CONTENT).await?;
        Ok(())
    }

    /// `{base}/todos` or `{base}/todos/{id}`, with `id` percent-encoded as a
    /// single path segment.
    fn todos_url(&self, id: Option<&str>) -> Result<Url, ClientError> {
        let invalid = || ClientError::InvalidUrl(self.base_url.clone());
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        {
            let mut segments = url.path_segments_mut().map_err(|_| invalid())?;
            segments.pop_if_empty().push("todos");
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }
}

async fn check(resp: Response, expected: StatusCode) -> Result<Response, ClientError> {
    let status = resp.status();
    if status == expected {
        return Ok(resp);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(ClientError::NotFound);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ClientError::UnexpectedStatus { status, body })
}

async fn decode<T: DeserializeOwned>(resp: Response, expected: StatusCode) -> Result<T, ClientError> {
    let resp = check(resp, expected).await?;
    Ok(resp.json::<T>().await?)
}
