use chrono::{DateTime, Days, Local};
use crossterm::event::{KeyCode, KeyEvent};

use crate::model::{Pattern, Recurrence};
use crate::ops::dates::{self, DuePreset};
use crate::ops::recurrence::calculate_next_due;
use crate::tui::app::{App, FormField, Overlay, ProjectForm, StatusKind};
use crate::tui::command::{Command, StoreCommand};
use crate::tui::text_input::TextInput;
use crate::tui::theme::{THEME_NAMES, Theme};

use super::*;

type Step = (Overlay, Vec<Command>);

fn stay(overlay: Overlay) -> Step {
    (overlay, Vec::new())
}

fn close() -> Step {
    (Overlay::None, Vec::new())
}

/// Keys while an overlay is open. The overlay is taken out of the app for
/// the duration and replaced by whatever the handler returns.
pub(super) fn handle_overlay(app: &mut App, key: KeyEvent, now: DateTime<Local>) -> Vec<Command> {
    let overlay = std::mem::replace(&mut app.overlay, Overlay::None);
    if let Some(task_id) = overlay.task_id()
        && app.task(task_id).is_none()
    {
        return Vec::new();
    }
    let (next, commands) = match overlay {
        Overlay::None | Overlay::Help | Overlay::TaskDetail(_) => close(),
        Overlay::ProjectSelect { cursor } => project_select(app, key, cursor),
        Overlay::ProjectCreate(form) => project_create(app, key, form),
        Overlay::ConfirmDeleteProject { project_id, cursor, .. } => {
            if is_confirm(key) {
                if app.project_filter == Some(project_id) {
                    app.project_filter = None;
                }
                (Overlay::None, vec![StoreCommand::DeleteProject(project_id).into()])
            } else {
                stay(Overlay::ProjectSelect { cursor })
            }
        }
        Overlay::TagSelect { task_id, cursor } => tag_select(app, key, task_id, cursor),
        Overlay::TagCreate {
            task_id,
            name,
            cursor,
        } => tag_create(app, key, task_id, name, cursor),
        Overlay::ConfirmDeleteTag {
            task_id,
            tag_id,
            cursor,
            ..
        } => {
            if is_confirm(key) {
                (Overlay::None, vec![StoreCommand::DeleteTag(tag_id).into()])
            } else {
                stay(Overlay::TagSelect { task_id, cursor })
            }
        }
        Overlay::ConfirmDelete { task_id, .. } => {
            if is_confirm(key) {
                (Overlay::None, vec![StoreCommand::DeleteTask(task_id).into()])
            } else {
                close()
            }
        }
        Overlay::DueDate { task_id, cursor } => due_date(app, key, task_id, cursor),
        Overlay::DueDateCustom { task_id, value } => due_date_custom(app, key, task_id, value),
        Overlay::RecurrenceSelect { task_id, cursor } => {
            recurrence_select(app, key, task_id, cursor, now)
        }
        Overlay::ThemeSelect { cursor } => theme_select(app, key, cursor),
    };
    app.overlay = next;
    commands
}

fn project_select(app: &mut App, key: KeyEvent, cursor: usize) -> Step {
    if let Some(cursor) = move_cursor(cursor, key, app.projects.len()) {
        return stay(Overlay::ProjectSelect { cursor });
    }
    match key.code {
        KeyCode::Esc => close(),
        KeyCode::Enter => {
            app.project_filter = match cursor {
                0 => None,
                i => app.projects.get(i - 1).map(|p| p.id),
            };
            (Overlay::None, vec![app.reload_tasks()])
        }
        KeyCode::Char('n') | KeyCode::Char('a') => {
            stay(Overlay::ProjectCreate(ProjectForm::default()))
        }
        KeyCode::Char('x') => {
            let refusal = match cursor.checked_sub(1).and_then(|i| app.projects.get(i)) {
                None => "Cannot delete 'All' filter",
                Some(p) if p.is_inbox() => "Cannot delete Inbox project",
                Some(p) => {
                    return stay(Overlay::ConfirmDeleteProject {
                        project_id: p.id,
                        name: p.name.clone(),
                        cursor,
                    });
                }
            };
            let clear = app.set_status(refusal, StatusKind::Warning);
            (Overlay::ProjectSelect { cursor }, vec![clear])
        }
        _ => stay(Overlay::ProjectSelect { cursor }),
    }
}

fn project_create(app: &mut App, key: KeyEvent, mut form: ProjectForm) -> Step {
    match key.code {
        KeyCode::Esc => close(),
        KeyCode::Tab | KeyCode::BackTab => {
            form.focus = match form.focus {
                FormField::Name => FormField::Description,
                FormField::Description => FormField::Name,
            };
            stay(Overlay::ProjectCreate(form))
        }
        KeyCode::Enter => {
            let name = form.name.value().trim().to_string();
            if name.is_empty() {
                let clear = app.set_status("Project name is required", StatusKind::Warning);
                return (Overlay::ProjectCreate(form), vec![clear]);
            }
            let description = form.description.value().trim().to_string();
            (
                Overlay::None,
                vec![StoreCommand::CreateProject { name, description }.into()],
            )
        }
        _ => {
            match form.focus {
                FormField::Name => form.name.handle_key(key),
                FormField::Description => form.description.handle_key(key),
            };
            stay(Overlay::ProjectCreate(form))
        }
    }
}

fn tag_select(app: &mut App, key: KeyEvent, task_id: i64, cursor: usize) -> Step {
    if let Some(cursor) = move_cursor(cursor, key, app.tags.len()) {
        return stay(Overlay::TagSelect { task_id, cursor });
    }
    match key.code {
        KeyCode::Esc => close(),
        KeyCode::Enter => match app.tags.get(cursor) {
            None => stay(Overlay::TagCreate {
                task_id,
                name: TextInput::new("", "Tag name..."),
                cursor,
            }),
            Some(tag) => {
                let tag_id = tag.id;
                let attached = app.task(task_id).is_some_and(|t| t.has_tag(tag_id));
                let cmd = if attached {
                    StoreCommand::RemoveTag { task_id, tag_id }
                } else {
                    StoreCommand::AddTag { task_id, tag_id }
                };
                (Overlay::TagSelect { task_id, cursor }, vec![cmd.into()])
            }
        },
        KeyCode::Char('x') => match app.tags.get(cursor) {
            Some(tag) => stay(Overlay::ConfirmDeleteTag {
                task_id,
                tag_id: tag.id,
                name: tag.name.clone(),
                cursor,
            }),
            None => stay(Overlay::TagSelect { task_id, cursor }),
        },
        _ => stay(Overlay::TagSelect { task_id, cursor }),
    }
}

fn tag_create(app: &mut App, key: KeyEvent, task_id: i64, mut name: TextInput, cursor: usize) -> Step {
    match key.code {
        KeyCode::Esc => stay(Overlay::TagSelect { task_id, cursor }),
        KeyCode::Enter => {
            let trimmed = name.value().trim().to_string();
            if trimmed.is_empty() {
                let clear = app.set_status("Tag name is required", StatusKind::Warning);
                return (
                    Overlay::TagCreate {
                        task_id,
                        name,
                        cursor,
                    },
                    vec![clear],
                );
            }
            (
                Overlay::None,
                vec![StoreCommand::CreateTag {
                    name: trimmed,
                    attach_to: Some(task_id),
                }
                .into()],
            )
        }
        _ => {
            name.handle_key(key);
            stay(Overlay::TagCreate {
                task_id,
                name,
                cursor,
            })
        }
    }
}

fn due_date(app: &mut App, key: KeyEvent, task_id: i64, cursor: usize) -> Step {
    if let Some(cursor) = move_cursor(cursor, key, DuePreset::ALL.len() - 1) {
        return stay(Overlay::DueDate { task_id, cursor });
    }
    match key.code {
        KeyCode::Esc => close(),
        KeyCode::Enter => {
            let preset = DuePreset::ALL[cursor.min(DuePreset::ALL.len() - 1)];
            if preset == DuePreset::Custom {
                let suggestion = app
                    .today
                    .checked_add_days(Days::new(3))
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default();
                return stay(Overlay::DueDateCustom {
                    task_id,
                    value: TextInput::new("", suggestion),
                });
            }
            let Some(task) = app.task(task_id) else {
                return close();
            };
            let mut task = task.clone();
            task.due_date = preset.due_date(app.today);
            (Overlay::None, vec![StoreCommand::UpdateTask(task).into()])
        }
        _ => stay(Overlay::DueDate { task_id, cursor }),
    }
}

fn due_date_custom(app: &mut App, key: KeyEvent, task_id: i64, mut value: TextInput) -> Step {
    match key.code {
        KeyCode::Esc => stay(Overlay::DueDate {
            task_id,
            cursor: DuePreset::ALL.len() - 1,
        }),
        KeyCode::Tab => {
            value.fill_placeholder();
            stay(Overlay::DueDateCustom { task_id, value })
        }
        KeyCode::Enter => {
            let date = match dates::parse_iso_date(value.value()) {
                Ok(date) => date,
                Err(err) => {
                    let clear = app.set_status(err.to_string(), StatusKind::Warning);
                    return (Overlay::DueDateCustom { task_id, value }, vec![clear]);
                }
            };
            let Some(task) = app.task(task_id) else {
                return close();
            };
            let mut task = task.clone();
            task.due_date = Some(dates::end_of_day(date));
            (Overlay::None, vec![StoreCommand::UpdateTask(task).into()])
        }
        _ => {
            value.handle_key(key);
            stay(Overlay::DueDateCustom { task_id, value })
        }
    }
}

/// Rows: the four patterns, plus "Remove recurrence" when one is set
fn recurrence_select(
    app: &mut App,
    key: KeyEvent,
    task_id: i64,
    cursor: usize,
    now: DateTime<Local>,
) -> Step {
    let Some(task) = app.task(task_id) else {
        return close();
    };
    let max = if task.recurrence.is_some() {
        Pattern::ALL.len()
    } else {
        Pattern::ALL.len() - 1
    };
    if let Some(cursor) = move_cursor(cursor, key, max) {
        return stay(Overlay::RecurrenceSelect { task_id, cursor });
    }
    match key.code {
        KeyCode::Esc => close(),
        KeyCode::Enter => {
            let cmd = match Pattern::ALL.get(cursor) {
                Some(&pattern) => {
                    let from = task.due_date.unwrap_or(now);
                    let next_due = calculate_next_due(pattern, 1, &from);
                    StoreCommand::SetRecurrence(Recurrence::new(task_id, pattern, 1, next_due))
                }
                None => StoreCommand::DeleteRecurrence(task_id),
            };
            (Overlay::None, vec![cmd.into()])
        }
        _ => stay(Overlay::RecurrenceSelect { task_id, cursor }),
    }
}

fn theme_select(app: &mut App, key: KeyEvent, cursor: usize) -> Step {
    if let Some(cursor) = move_cursor(cursor, key, THEME_NAMES.len() - 1) {
        return stay(Overlay::ThemeSelect { cursor });
    }
    match key.code {
        KeyCode::Esc => close(),
        KeyCode::Enter => {
            let key_name = THEME_NAMES[cursor.min(THEME_NAMES.len() - 1)];
            app.theme = Theme::from_config(key_name);
            app.config = app.config.with_theme(key_name);
            let clear = app.set_status(format!("Theme: {}", app.theme.name), StatusKind::Info);
            (
                Overlay::None,
                vec![Command::SaveConfig(app.config.clone()), clear],
            )
        }
        _ => stay(Overlay::ThemeSelect { cursor }),
    }
}
