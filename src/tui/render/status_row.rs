use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::helpers::spans_width;
use crate::tui::app::{App, StatusKind};

const HINTS: [(&str, &str); 7] = [
    ("\u{2191}\u{2193}", "move"),
    ("\u{23CE}", "status"),
    ("a", "add"),
    ("e", "edit"),
    ("x", "del"),
    ("p", "project"),
    ("?", "help"),
];

/// Render the status row (bottom of screen): key hints on the left, the
/// transient banner on the right
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let bg = theme.background;
    let width = area.width as usize;

    let key_style = Style::default().fg(theme.primary).bg(bg);
    let desc_style = Style::default().fg(theme.muted).bg(bg);

    let mut spans: Vec<Span> = vec![Span::styled(" ", desc_style)];
    for (i, (key, desc)) in HINTS.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ", desc_style));
        }
        spans.push(Span::styled(*key, key_style));
        spans.push(Span::styled(format!(":{}", desc), desc_style));
    }

    if let Some(banner) = &app.status {
        let color = match banner.kind {
            StatusKind::Success => theme.secondary,
            StatusKind::Info => theme.info,
            StatusKind::Warning | StatusKind::Error => theme.danger,
        };
        let banner_span = Span::styled(
            format!("{} ", banner.text),
            Style::default()
                .fg(color)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        );
        let banner_w = spans_width(std::slice::from_ref(&banner_span));
        let hints_w = spans_width(&spans);
        if hints_w + banner_w + 2 <= width {
            spans.push(Span::styled(
                " ".repeat(width - hints_w - banner_w),
                Style::default().bg(bg),
            ));
        } else {
            // Not enough room for both; the banner wins
            spans = vec![Span::styled(" ", Style::default().bg(bg))];
        }
        spans.push(banner_span);
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
