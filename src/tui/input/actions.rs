use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};

use crate::model::{Priority, Status, Task};
use crate::tui::app::{App, Overlay, selected_task};
use crate::tui::command::{Command, StoreCommand};

/// Task actions shared by the list and board views. `None` when `key` is
/// not one of them.
pub(super) fn handle_task_action(
    app: &mut App,
    key: KeyEvent,
    now: DateTime<Local>,
) -> Option<Vec<Command>> {
    let mut task = selected_task(app)?.clone();
    let commands = match key.code {
        KeyCode::Enter => forward(task, now),
        KeyCode::Char('b') => backward(task, now),
        KeyCode::Char('D') => direct_done(task, now),
        KeyCode::Char(c @ '0'..='3') => {
            task.priority = match c {
                '1' => Priority::High,
                '2' => Priority::Medium,
                '3' => Priority::Low,
                _ => Priority::None,
            };
            vec![StoreCommand::UpdateTask(task).into()]
        }
        KeyCode::Char('v') => {
            app.overlay = Overlay::TaskDetail(task.id);
            Vec::new()
        }
        KeyCode::Char('x') => {
            app.overlay = Overlay::ConfirmDelete {
                task_id: task.id,
                title: task.title,
            };
            Vec::new()
        }
        _ => return None,
    };
    Some(commands)
}

/// todo -> doing is a plain update; doing -> done runs the completion
/// workflow so recurring tasks spawn their next occurrence.
fn forward(mut task: Task, now: DateTime<Local>) -> Vec<Command> {
    match task.status {
        Status::Todo => {
            task.set_status(Status::Doing, now);
            vec![StoreCommand::UpdateTask(task).into()]
        }
        Status::Doing => vec![StoreCommand::CompleteTask { id: task.id, now }.into()],
        Status::Done => Vec::new(),
    }
}

fn backward(mut task: Task, now: DateTime<Local>) -> Vec<Command> {
    let prev = match task.status {
        Status::Done => Status::Doing,
        Status::Doing => Status::Todo,
        Status::Todo => return Vec::new(),
    };
    task.set_status(prev, now);
    vec![StoreCommand::UpdateTask(task).into()]
}

fn direct_done(mut task: Task, now: DateTime<Local>) -> Vec<Command> {
    if task.is_done() {
        task.set_status(Status::Todo, now);
        vec![StoreCommand::UpdateTask(task).into()]
    } else {
        vec![StoreCommand::CompleteTask { id: task.id, now }.into()]
    }
}
