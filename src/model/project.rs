use chrono::{DateTime, Local};
use serde::Serialize;

/// Identity of the permanent default project
pub const INBOX_PROJECT_ID: i64 = 1;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Local>,
    /// Number of top-level tasks in the project
    pub task_count: i64,
    pub done_count: i64,
}

impl Project {
    pub fn is_inbox(&self) -> bool {
        self.id == INBOX_PROJECT_ID
    }
}
