pub mod board_view;
pub mod detail;
pub mod header;
pub mod help_overlay;
pub mod helpers;
pub mod input_bar;
pub mod list_view;
pub mod overlays;
pub mod status_row;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::Block;
use regex::Regex;

use super::app::{App, Overlay, View};
use super::viewport::{HEADER_ROWS, INPUT_ROWS, STATUS_ROWS};

/// Main render function. Reads the state only; scroll offsets were settled
/// by `viewport::sync` when the last event was applied.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    let input_rows = if app.input.is_some() { INPUT_ROWS } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_ROWS),
            Constraint::Length(input_rows),
            Constraint::Min(1),
            Constraint::Length(STATUS_ROWS),
        ])
        .split(area);

    header::render_header(frame, app, chunks[0]);
    if let Some(input) = &app.input {
        input_bar::render_input_bar(frame, app, input, chunks[1]);
    }

    match app.view {
        View::List => list_view::render_list_view(frame, app, chunks[2]),
        View::Board => board_view::render_board_view(frame, app, chunks[2]),
    }

    status_row::render_status_row(frame, app, chunks[3]);

    // Overlays draw on top of everything
    match &app.overlay {
        Overlay::None => {}
        Overlay::Help => help_overlay::render_help_overlay(frame, app, area),
        Overlay::TaskDetail(task_id) => detail::render_task_detail(frame, app, *task_id, area),
        overlay => overlays::render_overlay(frame, app, overlay, area),
    }
}

/// Push spans for text with regex match highlighting. If no regex or no matches,
/// pushes a single span with `base_style`. Otherwise splits text at match boundaries.
pub(super) fn push_highlighted_spans<'a>(
    spans: &mut Vec<Span<'a>>,
    text: &str,
    base_style: Style,
    highlight_style: Style,
    search_re: Option<&Regex>,
) {
    let re = match search_re {
        Some(r) => r,
        None => {
            spans.push(Span::styled(text.to_string(), base_style));
            return;
        }
    };

    let mut last_end = 0;
    for m in re.find_iter(text) {
        if m.start() == m.end() {
            continue;
        }
        if m.start() > last_end {
            spans.push(Span::styled(
                text[last_end..m.start()].to_string(),
                base_style,
            ));
        }
        spans.push(Span::styled(
            text[m.start()..m.end()].to_string(),
            highlight_style,
        ));
        last_end = m.end();
    }
    if last_end < text.len() || last_end == 0 {
        spans.push(Span::styled(text[last_end..].to_string(), base_style));
    }
}
