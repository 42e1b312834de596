mod actions;
mod global;
mod navigate;
mod overlay;
mod prompt;

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};

use super::app::{App, View};
use super::command::Command;

// Submodules reach each other's handlers through `use super::*;`
#[allow(unused_imports)]
use actions::*;
#[allow(unused_imports)]
use global::*;
#[allow(unused_imports)]
use navigate::*;
#[allow(unused_imports)]
use overlay::*;
#[allow(unused_imports)]
use prompt::*;

/// Route a key press to exactly one handler: the open overlay, else the
/// open prompt, else the global bindings, else the current view.
pub fn handle_key(app: &mut App, key: KeyEvent, now: DateTime<Local>) -> Vec<Command> {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return Vec::new();
    }
    app.dismiss_status();

    if app.overlay.is_open() {
        return handle_overlay(app, key, now);
    }
    if app.input.is_some() {
        return handle_prompt(app, key, now);
    }
    if let Some(commands) = handle_global(app, key) {
        return commands;
    }
    match app.view {
        View::List => handle_list(app, key, now),
        View::Board => handle_board(app, key, now),
    }
}

/// `k`/`j` and the arrow keys inside a picker with rows `0..=max`
fn move_cursor(cursor: usize, key: KeyEvent, max: usize) -> Option<usize> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(cursor.saturating_sub(1)),
        KeyCode::Down | KeyCode::Char('j') => Some((cursor + 1).min(max)),
        _ => None,
    }
}

fn is_confirm(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y'))
}
