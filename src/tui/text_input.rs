use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::util::unicode::{self, word_boundary_left, word_boundary_right};

/// Single-line editable text with a byte-offset cursor kept on grapheme
/// boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextInput {
    value: String,
    cursor: usize,
    placeholder: String,
}

impl TextInput {
    /// Input holding `value` with the cursor at its end
    pub fn new(value: impl Into<String>, placeholder: impl Into<String>) -> Self {
        let value = value.into();
        TextInput {
            cursor: value.len(),
            value,
            placeholder: placeholder.into(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Cursor position in terminal cells from the start of the value
    pub fn cursor_col(&self) -> usize {
        unicode::byte_offset_to_display_col(&self.value, self.cursor)
    }

    pub fn insert(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if let Some(prev) = unicode::prev_grapheme_boundary(&self.value, self.cursor) {
            self.value.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if let Some(next) = unicode::next_grapheme_boundary(&self.value, self.cursor) {
            self.value.drain(self.cursor..next);
        }
    }

    pub fn delete_word(&mut self) {
        let start = word_boundary_left(&self.value, self.cursor);
        self.value.drain(start..self.cursor);
        self.cursor = start;
    }

    pub fn clear_to_start(&mut self) {
        self.value.drain(..self.cursor);
        self.cursor = 0;
    }

    pub fn left(&mut self) {
        if let Some(prev) = unicode::prev_grapheme_boundary(&self.value, self.cursor) {
            self.cursor = prev;
        }
    }

    pub fn right(&mut self) {
        if let Some(next) = unicode::next_grapheme_boundary(&self.value, self.cursor) {
            self.cursor = next;
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.value.len();
    }

    /// Replace an empty value with the placeholder. Returns true if it did.
    pub fn fill_placeholder(&mut self) -> bool {
        if !self.value.is_empty() || self.placeholder.is_empty() {
            return false;
        }
        self.value = self.placeholder.clone();
        self.cursor = self.value.len();
        true
    }

    /// Apply an editing key. Returns false for keys that are not editing
    /// keys (Enter, Esc, Tab and the like), leaving the value untouched.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match (key.modifiers, key.code) {
            (m, KeyCode::Char('a')) if m.contains(KeyModifiers::CONTROL) => self.home(),
            (m, KeyCode::Char('e')) if m.contains(KeyModifiers::CONTROL) => self.end(),
            (m, KeyCode::Char('u')) if m.contains(KeyModifiers::CONTROL) => self.clear_to_start(),
            (m, KeyCode::Char('w')) if m.contains(KeyModifiers::CONTROL) => self.delete_word(),
            // Readline word movement
            (m, KeyCode::Char('b')) if m.contains(KeyModifiers::ALT) => {
                self.cursor = word_boundary_left(&self.value, self.cursor);
            }
            (m, KeyCode::Char('f')) if m.contains(KeyModifiers::ALT) => {
                self.cursor = word_boundary_right(&self.value, self.cursor);
            }
            (m, KeyCode::Left) if m.contains(KeyModifiers::ALT) => {
                self.cursor = word_boundary_left(&self.value, self.cursor);
            }
            (m, KeyCode::Right) if m.contains(KeyModifiers::ALT) => {
                self.cursor = word_boundary_right(&self.value, self.cursor);
            }
            (m, KeyCode::Left) if m.contains(KeyModifiers::CONTROL) => self.home(),
            (m, KeyCode::Right) if m.contains(KeyModifiers::CONTROL) => self.end(),
            (_, KeyCode::Left) => self.left(),
            (_, KeyCode::Right) => self.right(),
            (_, KeyCode::Home) => self.home(),
            (_, KeyCode::End) => self.end(),
            (m, KeyCode::Backspace)
                if m.contains(KeyModifiers::ALT) || m.contains(KeyModifiers::CONTROL) =>
            {
                self.delete_word();
            }
            (_, KeyCode::Backspace) => self.backspace(),
            (_, KeyCode::Delete) => self.delete(),
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => self.insert(c),
            _ => return false,
        }
        true
    }
}
