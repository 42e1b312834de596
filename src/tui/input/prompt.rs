use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};
use tracing::debug;

use crate::model::{INBOX_PROJECT_ID, Task};
use crate::tui::app::{App, InputPurpose, StatusKind};
use crate::tui::command::{Command, StoreCommand};

/// Keys while the single-line prompt is open
pub(super) fn handle_prompt(app: &mut App, key: KeyEvent, now: DateTime<Local>) -> Vec<Command> {
    let Some(input) = app.input.as_mut() else {
        return Vec::new();
    };
    match key.code {
        KeyCode::Esc => app.input = None,
        KeyCode::Tab => {
            input.text.fill_placeholder();
        }
        KeyCode::Enter => return submit_prompt(app, now),
        _ => {
            input.text.handle_key(key);
        }
    }
    Vec::new()
}

fn submit_prompt(app: &mut App, now: DateTime<Local>) -> Vec<Command> {
    let Some(input) = app.input.take() else {
        return Vec::new();
    };
    let value = input.text.value().trim().to_string();

    match input.purpose {
        InputPurpose::AddTask | InputPurpose::EditTask(_) if value.is_empty() => {
            app.input = Some(input);
            vec![app.set_status("Task title is required", StatusKind::Warning)]
        }
        InputPurpose::AddTask => {
            let mut task = Task::new(value, now);
            task.project_id = Some(app.project_filter.unwrap_or(INBOX_PROJECT_ID));
            vec![StoreCommand::CreateTask(task).into()]
        }
        InputPurpose::EditTask(id) => match app.tasks.iter().find(|t| t.id == id) {
            Some(task) => {
                let mut task = task.clone();
                task.title = value;
                vec![StoreCommand::UpdateTask(task).into()]
            }
            None => {
                debug!(task_id = id, "edited task is no longer loaded");
                Vec::new()
            }
        },
        InputPurpose::Search => {
            app.search = value;
            vec![app.reload_tasks()]
        }
    }
}
