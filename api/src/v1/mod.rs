pub mod board;

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use board::Board;

/// Opaque record identifier. Fresh ids are random v4 UUIDs, but any string
/// read back from storage is accepted as-is.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for TodoId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for TodoId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TodoStatus {
    #[serde(rename = "task", alias = "active")]
    Active,
    #[serde(rename = "deleted")]
    SoftDeleted,
    #[serde(rename = "completed")]
    Completed,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub text: String,
    pub status: TodoStatus,
}

impl Todo {
    /// Creates an active todo with a fresh id. Returns `None` when `text` is
    /// blank; surrounding whitespace is stripped otherwise.
    pub fn new(text: &str) -> Option<Self> {
        let text = text.trim();

        if text.is_empty() {
            return None;
        }

        Some(Self {
            id: TodoId::new(),
            text: text.to_owned(),
            status: TodoStatus::Active,
        })
    }
}

/// Sets `status` on every todo with the given id, returning whether any
/// matched. Everything else, order included, is left alone.
pub fn set_status(todos: &mut [Todo], id: &TodoId, status: TodoStatus) -> bool {
    let mut found = false;

    for todo in todos.iter_mut().filter(|todo| todo.id == *id) {
        todo.status = status;
        found = true;
    }

    found
}
