//! Todo records and the in-memory todo cache.
//!
//! The reminders exporter is the source of truth: it writes a snapshot
//! sorted by priority (no-priority last, top 10). API mutations only touch
//! the in-memory cache and are overwritten by the next sync; they are kept
//! so the dashboard stays interactive, and each one logs that it will not
//! be written back to the reminders source.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::snapshot::SnapshotCell;

pub const PLACEHOLDER_TEXT: &str = "No reminders found";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Todo {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Shared todo state: the synced snapshot plus local-only mutations.
#[derive(Clone, Default)]
pub struct TodoCache {
    cell: SnapshotCell<Vec<Todo>>,
}

impl TodoCache {
    /// Replace the cache with a fresh sync result.
    pub fn publish(&self, todos: Vec<Todo>) {
        self.cell.store(todos);
    }

    /// Current todos, falling back to a single placeholder when the
    /// snapshot is empty or absent.
    pub fn list(&self) -> Vec<Todo> {
        let todos = self.cell.load();
        if todos.is_empty() {
            return vec![Todo {
                id: "placeholder".to_string(),
                text: PLACEHOLDER_TEXT.to_string(),
                completed: false,
                list: None,
                priority: None,
                created_at: None,
            }];
        }
        todos.as_ref().clone()
    }

    /// Add a local todo. Not written back to the reminders source.
    pub fn add(&self, text: String) -> Todo {
        let todo = Todo {
            id: Uuid::new_v4().to_string(),
            text,
            completed: false,
            list: None,
            priority: None,
            created_at: Some(Utc::now()),
        };
        eprintln!("Todo '{}' added locally; not written back to reminders", todo.text);
        self.cell.update(|todos| todos.push(todo.clone()));
        todo
    }

    /// Toggle completion on a cached todo. Not written back.
    pub fn set_completed(&self, id: &str, completed: bool) -> Option<Todo> {
        self.cell.update(|todos| {
            let todo = todos.iter_mut().find(|t| t.id == id)?;
            todo.completed = completed;
            Some(todo.clone())
        })
    }

    /// Remove a cached todo. Not written back.
    pub fn remove(&self, id: &str) -> bool {
        self.cell.update(|todos| {
            let before = todos.len();
            todos.retain(|t| t.id != id);
            todos.len() != before
        })
    }
}
