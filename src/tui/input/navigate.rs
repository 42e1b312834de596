use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, Section};
use crate::tui::command::Command;

use super::*;

pub(super) fn handle_list(app: &mut App, key: KeyEvent, now: DateTime<Local>) -> Vec<Command> {
    let active_len = app.active_tasks().len();
    let done_len = app.done_tasks().len();
    let done_open = !app.list.done_collapsed && done_len > 0;
    let list = &mut app.list;

    match (key.code, list.section) {
        (KeyCode::Up | KeyCode::Char('k'), Section::Active) => {
            list.active.cursor = list.active.cursor.saturating_sub(1);
        }
        (KeyCode::Up | KeyCode::Char('k'), Section::Done) => {
            if list.done.cursor > 0 {
                list.done.cursor -= 1;
            } else if active_len > 0 {
                list.section = Section::Active;
                list.active.cursor = active_len - 1;
            }
        }
        (KeyCode::Down | KeyCode::Char('j'), Section::Active) => {
            if list.active.cursor + 1 < active_len {
                list.active.cursor += 1;
            } else if done_open {
                list.section = Section::Done;
                list.done.cursor = 0;
            }
        }
        (KeyCode::Down | KeyCode::Char('j'), Section::Done) => {
            if list.done.cursor + 1 < done_len {
                list.done.cursor += 1;
            }
        }
        (KeyCode::Char('g'), _) => {
            if active_len == 0 && done_open {
                list.section = Section::Done;
                list.done.cursor = 0;
            } else {
                list.section = Section::Active;
                list.active.cursor = 0;
            }
        }
        (KeyCode::Char('G'), _) => {
            if done_open {
                list.section = Section::Done;
                list.done.cursor = done_len - 1;
            } else {
                list.section = Section::Active;
                list.active.cursor = active_len.saturating_sub(1);
            }
        }
        _ => return handle_task_action(app, key, now).unwrap_or_default(),
    }
    Vec::new()
}

pub(super) fn handle_board(app: &mut App, key: KeyEvent, now: DateTime<Local>) -> Vec<Command> {
    let col = app.board.column.min(2);
    let len = app.column(col).len();

    match key.code {
        KeyCode::Left | KeyCode::Char('h') => {
            if col > 0 {
                focus_column(app, col - 1);
            }
        }
        KeyCode::Right | KeyCode::Char('l') => {
            if col < 2 {
                focus_column(app, col + 1);
            }
        }
        KeyCode::Up | KeyCode::Char('k') => {
            let region = &mut app.board.columns[col];
            region.cursor = region.cursor.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            let region = &mut app.board.columns[col];
            if region.cursor + 1 < len {
                region.cursor += 1;
            }
        }
        KeyCode::Char('g') => app.board.columns[col].cursor = 0,
        KeyCode::Char('G') => app.board.columns[col].cursor = len.saturating_sub(1),
        _ => return handle_task_action(app, key, now).unwrap_or_default(),
    }
    Vec::new()
}

/// Move focus to column `col`, clamping its cursor to its current length
fn focus_column(app: &mut App, col: usize) {
    let len = app.column(col).len();
    app.board.column = col;
    let region = &mut app.board.columns[col];
    region.cursor = region.cursor.min(len.saturating_sub(1));
}
