use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, InputPurpose, InputState, Overlay, Section, View, selected_task};
use crate::tui::command::Command;
use crate::tui::theme::THEME_NAMES;

/// Bindings available whenever no overlay or prompt is open. `None` passes
/// the key on to the view.
pub(super) fn handle_global(app: &mut App, key: KeyEvent) -> Option<Vec<Command>> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if key.code == KeyCode::Char('c') {
            app.should_quit = true;
            return Some(Vec::new());
        }
        return None;
    }

    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.overlay = Overlay::Help,
        KeyCode::Tab => {
            app.view = match app.view {
                View::List => View::Board,
                View::Board => View::List,
            };
            return Some(vec![app.reload_tasks()]);
        }
        KeyCode::Char('a') => {
            app.input = Some(InputState::new(InputPurpose::AddTask, ""));
        }
        KeyCode::Char('e') => {
            let task = selected_task(app)?;
            let input = InputState::new(InputPurpose::EditTask(task.id), &task.title);
            app.input = Some(input);
        }
        KeyCode::Char('/') => {
            app.input = Some(InputState::new(InputPurpose::Search, &app.search));
        }
        KeyCode::Char('p') => {
            let cursor = app
                .project_filter
                .and_then(|id| app.projects.iter().position(|p| p.id == id))
                .map_or(0, |i| i + 1);
            app.overlay = Overlay::ProjectSelect { cursor };
        }
        KeyCode::Char('T') => {
            let cursor = THEME_NAMES
                .iter()
                .position(|name| *name == app.theme.key)
                .unwrap_or(0);
            app.overlay = Overlay::ThemeSelect { cursor };
        }
        KeyCode::Char('A') => {
            if app.view == View::List {
                toggle_done_section(app);
            }
        }
        KeyCode::Char('c') => {
            if app.search.is_empty() {
                return None;
            }
            app.search.clear();
            return Some(vec![app.reload_tasks()]);
        }
        KeyCode::Char('d') => {
            let task_id = selected_task(app)?.id;
            app.overlay = Overlay::DueDate { task_id, cursor: 0 };
        }
        KeyCode::Char('t') => {
            let task_id = selected_task(app)?.id;
            app.overlay = Overlay::TagSelect { task_id, cursor: 0 };
        }
        KeyCode::Char('r') => {
            let task_id = selected_task(app)?.id;
            app.overlay = Overlay::RecurrenceSelect { task_id, cursor: 0 };
        }
        _ => return None,
    }
    Some(Vec::new())
}

/// Collapse or expand the done section. Collapsing with the cursor inside
/// it moves the cursor to the last active task.
fn toggle_done_section(app: &mut App) {
    app.list.done_collapsed = !app.list.done_collapsed;
    if app.list.done_collapsed && app.list.section == Section::Done {
        app.list.section = Section::Active;
        app.list.active.cursor = app.active_tasks().len().saturating_sub(1);
    }
}
