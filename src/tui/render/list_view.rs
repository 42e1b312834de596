use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use regex::Regex;

use super::helpers::{pad_to_width, spans_width};
use super::push_highlighted_spans;
use crate::model::{Status, Task};
use crate::ops::dates;
use crate::tui::app::{App, Region, Section};
use crate::tui::theme::Theme;
use crate::tui::viewport;
use crate::util::unicode;

/// Render the list view: active tasks, then the collapsible done section.
/// Every region has a fixed height so the layout does not jump as the
/// cursor moves.
pub fn render_list_view(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let bg = theme.background;
    let width = area.width as usize;
    let muted = Style::default().fg(theme.muted).bg(bg);

    let active = app.active_tasks();
    let done = app.done_tasks();

    if active.is_empty() && done.is_empty() {
        let msg = if app.search.is_empty() {
            " No tasks. Press 'a' to add one."
        } else {
            " No tasks match your search. Press 'c' to clear."
        };
        frame.render_widget(Paragraph::new(msg).style(muted), area);
        return;
    }

    let split = viewport::list_split(
        area.height as usize,
        active.len(),
        done.len(),
        app.list.done_collapsed,
    );
    let search_re = app.search_regex();
    let mut lines: Vec<Line> = Vec::new();

    // Active section
    if active.is_empty() {
        lines.push(Line::from(Span::styled(" No active tasks", muted)));
        push_blank(&mut lines, split.active_rows);
    } else {
        let in_section = app.list.section == Section::Active;
        push_region(
            &mut lines,
            app,
            &active,
            &app.list.active,
            split.active_rows,
            in_section,
            width,
            search_re.as_ref(),
            "",
        );
    }

    // Done section
    if !done.is_empty() {
        lines.push(Line::from(""));
        let icon = if app.list.done_collapsed {
            "\u{25B6}"
        } else {
            "\u{25BC}"
        };
        let header_style = if app.list.section == Section::Done {
            Style::default()
                .fg(theme.primary)
                .bg(bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.muted).bg(bg).add_modifier(Modifier::BOLD)
        };
        lines.push(Line::from(Span::styled(
            format!(" {} Done ({})", icon, done.len()),
            header_style,
        )));

        if !app.list.done_collapsed {
            let in_section = app.list.section == Section::Done;
            push_region(
                &mut lines,
                app,
                &done,
                &app.list.done,
                split.done_rows,
                in_section,
                width,
                search_re.as_ref(),
                " done",
            );
        }
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

/// Visible rows of one section, padded to `rows`, plus its indicator row
#[allow(clippy::too_many_arguments)]
fn push_region<'a>(
    lines: &mut Vec<Line<'a>>,
    app: &App,
    tasks: &[&Task],
    region: &Region,
    rows: usize,
    in_section: bool,
    width: usize,
    search_re: Option<&Regex>,
    indicator_suffix: &str,
) {
    let window = viewport::window(region.cursor, rows, tasks.len(), region.offset);
    for (i, task) in tasks
        .iter()
        .enumerate()
        .take(window.end)
        .skip(window.start)
    {
        let selected = in_section && i == region.cursor;
        lines.push(task_row(app, task, selected, width, search_re));
    }
    push_blank(lines, rows - (window.end - window.start).min(rows));

    if tasks.len() > rows {
        lines.push(Line::from(Span::styled(
            format!(" ({}/{}{})", region.cursor + 1, tasks.len(), indicator_suffix),
            Style::default().fg(app.theme.muted).bg(app.theme.background),
        )));
    } else {
        lines.push(Line::from(""));
    }
}

fn push_blank(lines: &mut Vec<Line<'_>>, n: usize) {
    for _ in 0..n {
        lines.push(Line::from(""));
    }
}

/// One task row: status icon, priority, title, then due or completion and tags
fn task_row<'a>(
    app: &App,
    task: &Task,
    selected: bool,
    width: usize,
    search_re: Option<&Regex>,
) -> Line<'a> {
    let theme = &app.theme;
    let row_bg = if selected { theme.surface } else { theme.background };
    let base = Style::default().bg(row_bg);

    let mut spans: Vec<Span> = vec![
        Span::styled(" ", base),
        Span::styled(task.status.icon(), base.fg(theme.status_color(task.status))),
        Span::styled(" ", base),
    ];
    let priority = match task.priority.icon() {
        "" => " ",
        icon => icon,
    };
    spans.push(Span::styled(
        priority,
        base.fg(theme.priority_color(task.priority)),
    ));
    spans.push(Span::styled(" ", base));

    let suffix = row_suffix(app, theme, task, base);
    let title_budget = width
        .saturating_sub(spans_width(&spans) + spans_width(&suffix) + 1)
        .max(10);
    let title = unicode::truncate_to_width(&task.title, title_budget);

    let title_style = if task.status == Status::Done {
        base.fg(theme.muted).add_modifier(Modifier::CROSSED_OUT)
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

fn row_suffix<'a>(app: &App, theme: &Theme, task: &Task, base: Style) -> Vec<Span<'a>> {
    let mut spans = Vec::new();
    if task.is_done() {
        if let Some(completed) = task.completed_at {
            spans.push(Span::styled(" ", base));
            spans.push(Span::styled(
                dates::completion_label(completed, task.due_date),
                base.fg(theme.secondary),
            ));
        }
    } else if let Some(due) = task.due_date {
        let (label, urgency) = dates::due_label(due, app.today);
        spans.push(Span::styled(" ", base));
        spans.push(Span::styled(label, base.fg(theme.due_color(urgency))));
    }
    if task.recurrence.is_some() {
        spans.push(Span::styled(" \u{21BB}", base.fg(theme.info)));
    }
    for tag in &task.tags {
        spans.push(Span::styled(" ", base));
        spans.push(Span::styled(
            format!("#{}", tag.name),
            base.fg(theme.tag_color(tag)),
        ));
    }
    spans
}
