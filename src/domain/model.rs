//! Todo resource model.

use serde::{Deserialize, Serialize};

/// A persisted todo item.
///
/// The identifier is minted by the backend on creation and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: String,
    pub title: String,
    pub content: String,
    pub done: bool,
}

/// Client-supplied fields for create and update.
///
/// An `id` in the payload is accepted and discarded; missing fields take their
/// zero values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TodoPayload {
    #[serde(skip_serializing)]
    pub id: Option<String>,
    pub title: String,
    pub content: String,
    pub done: bool,
}

impl TodoPayload {
    pub fn new(title: impl Into<String>, content: impl Into<String>, done: bool) -> Self {
        Self {
            id: None,
            title: title.into(),
            content: content.into(),
            done,
        }
    }

    /// Attach an identifier, producing the stored form.
    pub fn into_item(self, id: impl Into<String>) -> TodoItem {
        TodoItem {
            id: id.into(),
            title: self.title,
            content: self.content,
            done: self.done,
        }
    }
}

/// Query string accepted by the list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TodoQuery {
    pub status: Option<String>,
}

impl TodoQuery {
    pub fn with_status(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
        }
    }

    /// Resolve the free-form status into a filter.
    ///
    /// Returns the offending value when it is not recognised.
    pub fn filter(&self) -> Result<StatusFilter, String> {
        StatusFilter::parse(self.status.as_deref().unwrap_or_default())
    }
}

/// Status filter applied by every backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    /// No filtering.
    #[default]
    Any,
    Done,
    NotDone,
}

impl StatusFilter {
    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" => Ok(Self::Any),
            "done" => Ok(Self::Done),
            "undone" | "not_done" | "not-done" => Ok(Self::NotDone),
            other => Err(other.to_string()),
        }
    }

    pub fn matches(&self, item: &TodoItem) -> bool {
        match self {
            Self::Any => true,
            Self::Done => item.done,
            Self::NotDone => !item.done,
        }
    }

    /// The `done` value to bind in SQL, `None` meaning unfiltered.
    pub fn as_done(&self) -> Option<bool> {
        match self {
            Self::Any => None,
            Self::Done => Some(true),
            Self::NotDone => Some(false),
        }
    }
}
