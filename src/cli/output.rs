use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{Priority, Project, Status, Tag, Task};
use crate::ops::dates;
use crate::util::unicode;

/// Widest title shown in the task table before truncation
const TITLE_WIDTH: usize = 40;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub id: i64,
    pub title: String,
    pub status: Status,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
    pub created: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<String>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat: Option<String>,
}

#[derive(Serialize)]
pub struct ProjectJson {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub tasks: i64,
    pub done: i64,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn task_to_json(task: &Task, projects: &[Project]) -> TaskJson {
    TaskJson {
        id: task.id,
        title: task.title.clone(),
        status: task.status,
        priority: task.priority,
        project: project_name(task, projects).map(str::to_string),
        parent_id: task.parent_id,
        description: task.description.clone(),
        due: task.due_date.map(|d| d.to_rfc3339()),
        created: task.created_at.to_rfc3339(),
        completed: task.completed_at.map(|d| d.to_rfc3339()),
        tags: task.tags.iter().map(|t| t.name.clone()).collect(),
        repeat: task.recurrence.as_ref().map(|r| r.pattern_label()),
    }
}

pub fn project_to_json(project: &Project) -> ProjectJson {
    ProjectJson {
        id: project.id,
        name: project.name.clone(),
        description: project.description.clone(),
        tasks: project.task_count,
        done: project.done_count,
    }
}

fn project_name<'a>(task: &Task, projects: &'a [Project]) -> Option<&'a str> {
    let id = task.project_id?;
    projects
        .iter()
        .find(|p| p.id == id)
        .map(|p| p.name.as_str())
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// Lay out rows as left-aligned columns separated by two spaces.
fn align_columns(rows: &[Vec<String>]) -> Vec<String> {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0usize; columns];
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(unicode::display_width(cell));
        }
    }
    rows.iter()
        .map(|row| {
            let mut line = String::new();
            for (i, cell) in row.iter().enumerate() {
                line.push_str(cell);
                if i + 1 < row.len() {
                    let pad = widths[i] - unicode::display_width(cell) + 2;
                    line.push_str(&" ".repeat(pad));
                }
            }
            line.trim_end().to_string()
        })
        .collect()
}

/// The `list` table: one row per task under a header.
pub fn format_task_table(tasks: &[Task], projects: &[Project], today: NaiveDate) -> Vec<String> {
    if tasks.is_empty() {
        return vec!["No tasks found.".to_string()];
    }
    let mut rows = vec![
        ["ID", "STATUS", "PRI", "TITLE", "PROJECT", "DUE", "TAGS"]
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>(),
    ];
    for task in tasks {
        let mut title = unicode::truncate_to_width(&task.title, TITLE_WIDTH);
        if task.recurrence.is_some() {
            title.push_str(" \u{21BB}");
        }
        let due = match (task.completed_at, task.due_date) {
            (Some(done), due) if task.is_done() => dates::completion_label(done, due),
            (_, Some(due)) => dates::due_label(due, today).0,
            _ => "-".to_string(),
        };
        let tags = if task.tags.is_empty() {
            "-".to_string()
        } else {
            task.tags
                .iter()
                .map(|t| t.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };
        let priority = match task.priority.icon() {
            "" => "-",
            icon => icon,
        };
        rows.push(vec![
            task.id.to_string(),
            task.status.icon().to_string(),
            priority.to_string(),
            title,
            project_name(task, projects).unwrap_or("-").to_string(),
            due,
            tags,
        ]);
    }
    align_columns(&rows)
}

/// The `project list` table with completion progress.
pub fn format_project_table(projects: &[Project]) -> Vec<String> {
    let mut rows = vec![vec![
        "ID".to_string(),
        "NAME".to_string(),
        "TASKS".to_string(),
        "PROGRESS".to_string(),
    ]];
    for p in projects {
        let progress = if p.task_count > 0 {
            let pct = p.done_count as f64 / p.task_count as f64 * 100.0;
            format!("{}/{} ({:.0}%)", p.done_count, p.task_count, pct)
        } else {
            "0/0".to_string()
        };
        rows.push(vec![
            p.id.to_string(),
            p.name.clone(),
            p.task_count.to_string(),
            progress,
        ]);
    }
    align_columns(&rows)
}

pub fn format_tag_table(tags: &[Tag]) -> Vec<String> {
    if tags.is_empty() {
        return vec!["No tags found.".to_string()];
    }
    let mut rows = vec![vec![
        "ID".to_string(),
        "NAME".to_string(),
        "COLOR".to_string(),
    ]];
    for t in tags {
        rows.push(vec![t.id.to_string(), t.name.clone(), t.color.clone()]);
    }
    align_columns(&rows)
}
