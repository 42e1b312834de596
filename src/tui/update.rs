use chrono::{DateTime, Local};
use crossterm::event::KeyEvent;
use tracing::{debug, warn};

use super::app::{App, Overlay, StatusKind};
use super::command::{Command, StoreCommand};
use super::input;
use super::message::Msg;
use super::viewport;

/// One input to the state machine
#[derive(Debug, Clone)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize(u16, u16),
    Msg(Msg),
}

/// Fold one event into the state, returning the next state and the
/// commands to dispatch. Commands may finish in any order.
pub fn update(mut app: App, event: AppEvent, now: DateTime<Local>) -> (App, Vec<Command>) {
    app.today = now.date_naive();
    let commands = match event {
        AppEvent::Key(key) => input::handle_key(&mut app, key, now),
        AppEvent::Resize(w, h) => {
            app.size = (w, h);
            Vec::new()
        }
        AppEvent::Msg(msg) => apply_msg(&mut app, msg),
    };
    viewport::sync(&mut app);
    (app, commands)
}

fn apply_msg(app: &mut App, msg: Msg) -> Vec<Command> {
    match msg {
        Msg::TasksLoaded(tasks) => {
            debug!(count = tasks.len(), "tasks loaded");
            app.tasks = tasks;
            if let Some(task_id) = app.overlay.task_id()
                && app.task(task_id).is_none()
            {
                app.overlay = Overlay::None;
            }
            Vec::new()
        }
        Msg::ProjectsLoaded(projects) => {
            app.projects = projects;
            Vec::new()
        }
        Msg::TagsLoaded(tags) => {
            app.tags = tags;
            Vec::new()
        }
        Msg::TaskCreated(task) => {
            let clear = app.set_status(format!("✓ Created: {}", task.title), StatusKind::Success);
            vec![app.reload_tasks(), StoreCommand::LoadProjects.into(), clear]
        }
        Msg::TaskUpdated(_) => {
            let clear = app.set_status("✓ Updated", StatusKind::Success);
            vec![app.reload_tasks(), StoreCommand::LoadProjects.into(), clear]
        }
        Msg::TaskCompleted(completion) => {
            if let Some(next) = &completion.spawned {
                debug!(task_id = completion.task.id, next_id = next.id, "next occurrence created");
            }
            let clear = app.set_status("✓ Completed", StatusKind::Success);
            vec![app.reload_tasks(), StoreCommand::LoadProjects.into(), clear]
        }
        Msg::TaskDeleted(_) => {
            let clear = app.set_status("✓ Deleted", StatusKind::Success);
            vec![app.reload_tasks(), StoreCommand::LoadProjects.into(), clear]
        }
        Msg::ProjectCreated(project) => {
            let clear = app.set_status(
                format!("✓ Created project: {}", project.name),
                StatusKind::Success,
            );
            vec![StoreCommand::LoadProjects.into(), clear]
        }
        Msg::ProjectDeleted(_) => {
            let clear = app.set_status(
                "✓ Project deleted (tasks moved to Inbox)",
                StatusKind::Success,
            );
            vec![StoreCommand::LoadProjects.into(), app.reload_tasks(), clear]
        }
        Msg::TagCreated(tag) => {
            let clear = app.set_status(format!("✓ Created tag: {}", tag.name), StatusKind::Success);
            vec![StoreCommand::LoadTags.into(), app.reload_tasks(), clear]
        }
        Msg::TagDeleted(_) => {
            let clear = app.set_status("✓ Tag deleted", StatusKind::Success);
            vec![StoreCommand::LoadTags.into(), app.reload_tasks(), clear]
        }
        Msg::RecurrenceSet(_) => {
            let clear = app.set_status("✓ Recurrence set", StatusKind::Success);
            vec![app.reload_tasks(), clear]
        }
        Msg::RecurrenceDeleted(_) => {
            let clear = app.set_status("✓ Recurrence removed", StatusKind::Success);
            vec![app.reload_tasks(), clear]
        }
        Msg::ConfigSaved => {
            debug!("config saved");
            Vec::new()
        }
        Msg::Error(err) => {
            warn!(error = %err, "command failed");
            vec![app.set_status(err, StatusKind::Error)]
        }
        Msg::ClearStatus(generation) => {
            if generation == app.status_generation {
                app.status = None;
            }
            Vec::new()
        }
    }
}
