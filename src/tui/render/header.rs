use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::helpers::spans_width;
use crate::tui::app::{App, View};

/// Render the header: title, view tabs and the filter summary, with a
/// separator line below
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title + tabs
            Constraint::Length(1), // separator
        ])
        .split(area);

    render_title_row(frame, app, chunks[0]);

    let sep = "\u{2500}".repeat(chunks[1].width as usize);
    let sep_widget =
        Paragraph::new(sep).style(Style::default().fg(app.theme.border).bg(app.theme.background));
    frame.render_widget(sep_widget, chunks[1]);
}

fn render_title_row(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let bg = theme.background;
    let width = area.width as usize;

    let mut left: Vec<Span> = vec![
        Span::styled(
            " tsk ",
            Style::default()
                .fg(theme.background)
                .bg(theme.primary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("  ", Style::default().bg(bg)),
    ];
    for (label, view) in [(" List ", View::List), (" Board ", View::Board)] {
        left.push(Span::styled(label, tab_style(app, app.view == view)));
    }

    let mut right: Vec<Span> = vec![Span::styled(
        format!(" {} ", app.project_filter_name()),
        Style::default().fg(theme.foreground).bg(theme.surface),
    )];
    if !app.search.is_empty() {
        right.push(Span::styled(" ", Style::default().bg(bg)));
        right.push(Span::styled(
            format!("/{}", app.search),
            Style::default().fg(theme.accent).bg(bg),
        ));
    }
    let active = app.active_tasks().len();
    let done = app.done_tasks().len();
    let count = if done > 0 {
        format!(" {} tasks, {} done ", active, done)
    } else {
        format!(" {} tasks ", active)
    };
    right.push(Span::styled(count, Style::default().fg(theme.muted).bg(bg)));

    // Right side is dropped entirely rather than overlapping the tabs
    let gap = width.saturating_sub(spans_width(&left) + spans_width(&right));
    let mut spans = left;
    if gap >= 2 {
        spans.push(Span::styled(" ".repeat(gap), Style::default().bg(bg)));
        spans.extend(right);
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

/// Style for a tab: highlighted if current, normal otherwise
fn tab_style(app: &App, is_current: bool) -> Style {
    if is_current {
        Style::default()
            .fg(app.theme.foreground)
            .bg(app.theme.surface)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.muted).bg(app.theme.background)
    }
}
