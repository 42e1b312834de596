use chrono::{DateTime, Local};
use serde::Serialize;

use super::{ParseError, Recurrence, Tag};

/// Workflow status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Todo,
    Doing,
    Done,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Todo, Status::Doing, Status::Done];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Todo => "todo",
            Status::Doing => "doing",
            Status::Done => "done",
        }
    }

    /// Column / heading label
    pub fn label(self) -> &'static str {
        match self {
            Status::Todo => "Todo",
            Status::Doing => "Doing",
            Status::Done => "Done",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Status::Todo => "\u{25CB}",  // ○
            Status::Doing => "\u{25D0}", // ◐
            Status::Done => "\u{25CF}",  // ●
        }
    }

    pub fn parse(s: &str) -> Result<Status, ParseError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "todo" => Ok(Status::Todo),
            "doing" => Ok(Status::Doing),
            "done" => Ok(Status::Done),
            _ => Err(ParseError::Status(s.to_string())),
        }
    }
}

/// Task priority, stored as 0..=3
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    None,
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_i64(self) -> i64 {
        match self {
            Priority::None => 0,
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
        }
    }

    pub fn from_i64(n: i64) -> Option<Priority> {
        match n {
            0 => Some(Priority::None),
            1 => Some(Priority::Low),
            2 => Some(Priority::Medium),
            3 => Some(Priority::High),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::None => "None",
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }

    /// Arrow glyph; empty for `None`
    pub fn icon(self) -> &'static str {
        match self {
            Priority::None => "",
            Priority::Low => "\u{2193}",    // ↓
            Priority::Medium => "\u{2192}", // →
            Priority::High => "\u{2191}",   // ↑
        }
    }

    /// Accepts full names, short forms and the digits 0-3 (low = 1).
    pub fn parse(s: &str) -> Result<Priority, ParseError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "0" => Ok(Priority::None),
            "low" | "l" | "1" => Ok(Priority::Low),
            "medium" | "med" | "m" | "2" => Ok(Priority::Medium),
            "high" | "h" | "3" => Ok(Priority::High),
            _ => Err(ParseError::Priority(s.to_string())),
        }
    }
}

/// A task row plus the associations the store joins in on reads
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    pub id: i64,
    pub project_id: Option<i64>,
    pub parent_id: Option<i64>,
    pub title: String,
    pub description: String,
    pub status: Status,
    pub priority: Priority,
    pub due_date: Option<DateTime<Local>>,
    pub created_at: DateTime<Local>,
    pub completed_at: Option<DateTime<Local>>,
    pub position: i64,
    pub tags: Vec<Tag>,
    pub recurrence: Option<Recurrence>,
}

impl Task {
    /// A fresh, unsaved todo (id 0 until the store assigns one).
    pub fn new(title: impl Into<String>, now: DateTime<Local>) -> Self {
        Task {
            id: 0,
            project_id: None,
            parent_id: None,
            title: title.into(),
            description: String::new(),
            status: Status::Todo,
            priority: Priority::None,
            due_date: None,
            created_at: now,
            completed_at: None,
            position: 0,
            tags: Vec::new(),
            recurrence: None,
        }
    }

    /// Change status, keeping `completed_at` set exactly while done.
    pub fn set_status(&mut self, status: Status, now: DateTime<Local>) {
        self.status = status;
        self.completed_at = match status {
            Status::Done => self.completed_at.or(Some(now)),
            _ => None,
        };
    }

    pub fn is_done(&self) -> bool {
        self.status == Status::Done
    }

    pub fn has_tag(&self, tag_id: i64) -> bool {
        self.tags.iter().any(|t| t.id == tag_id)
    }

    pub fn is_overdue(&self, now: DateTime<Local>) -> bool {
        match self.due_date {
            Some(due) => !self.is_done() && due < now,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 10, h, 0, 0).unwrap()
    }

    #[test]
    fn test_set_status_maintains_completed_at() {
        let mut task = Task::new("Buy milk", at(8));
        task.set_status(Status::Doing, at(9));
        assert_eq!(task.completed_at, None);

        task.set_status(Status::Done, at(10));
        assert_eq!(task.completed_at, Some(at(10)));

        task.set_status(Status::Todo, at(11));
        assert_eq!(task.status, Status::Todo);
        assert_eq!(task.completed_at, None);
    }

    #[test]
    fn test_set_done_twice_keeps_first_timestamp() {
        let mut task = Task::new("x", at(8));
        task.set_status(Status::Done, at(9));
        task.set_status(Status::Done, at(10));
        assert_eq!(task.completed_at, Some(at(9)));
    }

    #[test]
    fn test_parse_priority() {
        assert_eq!(Priority::parse("high"), Ok(Priority::High));
        assert_eq!(Priority::parse("M"), Ok(Priority::Medium));
        assert_eq!(Priority::parse("1"), Ok(Priority::Low));
        assert_eq!(Priority::parse("none"), Ok(Priority::None));
        assert!(Priority::parse("urgent").is_err());
    }

    #[test]
    fn test_parse_status() {
        assert_eq!(Status::parse("Doing"), Ok(Status::Doing));
        assert!(Status::parse("blocked").is_err());
    }

    #[test]
    fn test_priority_round_trips_through_integer() {
        for p in [Priority::None, Priority::Low, Priority::Medium, Priority::High] {
            assert_eq!(Priority::from_i64(p.as_i64()), Some(p));
        }
        assert_eq!(Priority::from_i64(7), None);
    }

    #[test]
    fn test_overdue_ignores_done_tasks() {
        let mut task = Task::new("x", at(8));
        task.due_date = Some(at(9));
        assert!(task.is_overdue(at(10)));
        task.set_status(Status::Done, at(10));
        assert!(!task.is_overdue(at(11)));
    }
}
