use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::app::{App, InputState};
use crate::util::unicode;

/// Render the bordered single-line prompt used to add, edit and search
pub fn render_input_bar(frame: &mut Frame, app: &App, input: &InputState, area: Rect) {
    let theme = &app.theme;
    let bg = theme.background;

    let prompt = input.purpose.prompt();
    let mut spans = vec![Span::styled(
        prompt,
        Style::default()
            .fg(theme.primary)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )];
    if input.text.is_empty() {
        spans.push(Span::styled(
            input.text.placeholder().to_string(),
            Style::default().fg(theme.muted).bg(bg),
        ));
    } else {
        spans.push(Span::styled(
            input.text.value().to_string(),
            Style::default().fg(theme.foreground).bg(bg),
        ));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.primary).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);

    let col = unicode::display_width(prompt) + input.text.cursor_col();
    let x = (area.x + 1 + col as u16).min(area.right().saturating_sub(2));
    frame.set_cursor_position(Position::new(x, area.y + 1));
}
