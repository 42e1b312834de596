use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::helpers::centered_rect_fixed;
use crate::model::{Priority, Task};
use crate::tui::app::App;

const LABEL_W: usize = 14;

/// Render the read-only detail popup for task `task_id`
pub fn render_task_detail(frame: &mut Frame, app: &App, task_id: i64, area: Rect) {
    let Some(task) = app.task(task_id) else {
        return;
    };
    let theme = &app.theme;
    let bg = theme.background;
    let label_style = Style::default()
        .fg(theme.muted)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let value_style = Style::default().fg(theme.foreground).bg(bg);

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            " Task Detail",
            Style::default()
                .fg(theme.primary)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for (label, value, color) in detail_rows(app, task) {
        lines.push(Line::from(vec![
            Span::styled(format!(" {:<width$}", label, width = LABEL_W), label_style),
            Span::styled(value, color.map_or(value_style, |c| value_style.fg(c))),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " Press any key to close",
        Style::default().fg(theme.muted).bg(bg),
    )));

    let popup_w = 60.min(area.width);
    let popup_area = centered_rect_fixed(popup_w, lines.len() as u16 + 2, area);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.primary).bg(bg))
        .style(Style::default().bg(bg));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, popup_area);
}

type Row = (&'static str, String, Option<ratatui::style::Color>);

fn detail_rows(app: &App, task: &Task) -> Vec<Row> {
    let theme = &app.theme;
    let project = task
        .project_id
        .and_then(|id| app.project_name(id))
        .unwrap_or("Inbox")
        .to_string();

    let priority = match task.priority {
        Priority::None => "- None".to_string(),
        p => format!("{} {}", p.icon(), p.label()),
    };

    let due = task.due_date.map_or_else(
        || "Not set".to_string(),
        |d| d.format("%Y-%m-%d (%a)").to_string(),
    );

    let recurrence = task
        .recurrence
        .as_ref()
        .map_or_else(|| "None".to_string(), |r| r.pattern_label());

    let tags = if task.tags.is_empty() {
        "No tags".to_string()
    } else {
        task.tags
            .iter()
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut rows: Vec<Row> = vec![
        ("Project", project, None),
        ("Title", task.title.clone(), None),
        (
            "Status",
            format!("{} {}", task.status.icon(), task.status.label()),
            Some(theme.status_color(task.status)),
        ),
        (
            "Priority",
            priority,
            Some(theme.priority_color(task.priority)),
        ),
        ("Due Date", due, None),
        ("Recurrence", recurrence, None),
    ];
    if let Some(completed) = task.completed_at {
        rows.push(("Completed At", completed_text(task, completed), None));
    }
    rows.push(("Tags", tags, None));
    if !task.description.is_empty() {
        rows.push(("Description", task.description.clone(), None));
    }
    rows.push((
        "Created At",
        task.created_at.format("%Y-%m-%d %H:%M").to_string(),
        None,
    ));
    rows
}

/// Completion time plus how it compares with the due day
fn completed_text(task: &Task, completed: chrono::DateTime<chrono::Local>) -> String {
    let mut text = completed.format("%Y-%m-%d %H:%M").to_string();
    if let Some(due) = task.due_date {
        let diff = (completed.date_naive() - due.date_naive()).num_days();
        let note = match diff {
            d if d > 0 => format!(" ({} days late)", d),
            d if d < 0 => format!(" ({} days early)", -d),
            _ => " (On time)".to_string(),
        };
        text.push_str(&note);
    }
    text
}
