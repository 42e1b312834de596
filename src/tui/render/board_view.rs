use chrono::{DateTime, Local};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use regex::Regex;

use super::helpers::{pad_to_width, spans_width};
use super::push_highlighted_spans;
use crate::model::{Status, Task};
use crate::ops::dates::{self, SHORT_DATE};
use crate::tui::app::App;
use crate::tui::viewport;
use crate::util::unicode;

/// Render the board: one bordered column per status, side by side
pub fn render_board_view(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let search_re = app.search_regex();
    for (idx, status) in Status::ALL.iter().enumerate() {
        render_column(frame, app, idx, *status, chunks[idx], search_re.as_ref());
    }
}

fn render_column(
    frame: &mut Frame,
    app: &App,
    idx: usize,
    status: Status,
    area: Rect,
    search_re: Option<&Regex>,
) {
    let theme = &app.theme;
    let bg = theme.background;
    let focused = app.board.column == idx;
    let tasks = app.column(idx);
    let region = &app.board.columns[idx];

    let border_color = if focused { theme.primary } else { theme.border };
    let title = Span::styled(
        format!(" {} ({}) ", status.label(), tasks.len()),
        Style::default()
            .fg(theme.status_color(status))
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color).bg(bg))
        .title(title)
        .style(Style::default().bg(bg));

    let inner_w = area.width.saturating_sub(2) as usize;
    let rows = viewport::board_rows(area.height as usize);
    let muted = Style::default().fg(theme.muted).bg(bg);

    let mut lines: Vec<Line> = Vec::new();
    if tasks.is_empty() {
        lines.push(Line::from(Span::styled(" No tasks", muted)));
    } else {
        let window = viewport::window(region.cursor, rows, tasks.len(), region.offset);
        for (i, task) in tasks
            .iter()
            .enumerate()
            .take(window.end)
            .skip(window.start)
        {
            let selected = focused && i == region.cursor;
            lines.push(board_item(app, task, selected, inner_w, search_re));
        }
        while lines.len() < rows {
            lines.push(Line::from(""));
        }
        if tasks.len() > rows {
            lines.push(Line::from(Span::styled(
                format!(" ({}/{})", region.cursor + 1, tasks.len()),
                muted,
            )));
        }
    }

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

/// One board card: priority, title, then due or completion date
fn board_item<'a>(
    app: &App,
    task: &Task,
    selected: bool,
    width: usize,
    search_re: Option<&Regex>,
) -> Line<'a> {
    let theme = &app.theme;
    let row_bg = if selected { theme.surface } else { theme.background };
    let base = Style::default().bg(row_bg);

    let mut spans: Vec<Span> = vec![Span::styled(" ", base)];
    let icon = task.priority.icon();
    if !icon.is_empty() {
        spans.push(Span::styled(
            icon,
            base.fg(theme.priority_color(task.priority)),
        ));
        spans.push(Span::styled(" ", base));
    }

    let suffix: Option<Span> = if task.is_done() {
        task.completed_at.map(|completed| {
            Span::styled(
                format!(" {}", short_completion(completed, task.due_date)),
                base.fg(theme.secondary),
            )
        })
    } else {
        task.due_date.map(|due| {
            let (label, urgency) = dates::due_label(due, app.today);
            Span::styled(format!(" \u{00B7} {}", label), base.fg(theme.due_color(urgency)))
        })
    };

    let suffix_w = suffix.as_ref().map_or(0, |s| unicode::display_width(&s.content));
    let budget = width.saturating_sub(spans_width(&spans) + suffix_w).max(5);
    let title = unicode::truncate_to_width(&task.title, budget);
    let title_style = if task.is_done() {
        base.fg(theme.muted)
    } else if selected {
        base.fg(theme.foreground).add_modifier(Modifier::BOLD)
    } else {
        base.fg(theme.foreground)
    };
    let highlight = base.fg(theme.accent).add_modifier(Modifier::BOLD);
    push_highlighted_spans(&mut spans, &title, title_style, highlight, search_re);
    spans.extend(suffix);

    if selected {
        pad_to_width(&mut spans, width, base);
    }
    Line::from(spans)
}

/// `✓ 25/3/9`, plus `+2d` / `-1d` relative to the due day
fn short_completion(completed: DateTime<Local>, due: Option<DateTime<Local>>) -> String {
    let mut text = format!("\u{2713} {}", completed.format(SHORT_DATE));
    if let Some(due) = due {
        let diff = (completed.date_naive() - due.date_naive()).num_days();
        if diff != 0 {
            text.push_str(&format!(" {:+}d", diff));
        }
    }
    text
}
