//! Pickers, forms and confirmation popups. Each one is a small bordered
//! box centered over the view: title in the border, a blank line, the
//! body, a blank line and a one-line key hint.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::helpers::{centered_rect_fixed, hint_line, pad_to_width, picker_row};
use crate::model::Pattern;
use crate::ops::dates::DuePreset;
use crate::tui::app::{App, FormField, Overlay, ProjectForm};
use crate::tui::text_input::TextInput;
use crate::tui::theme::{THEME_NAMES, Theme};

const POPUP_W: u16 = 46;

/// Render whichever picker or confirmation `overlay` is
pub fn render_overlay(frame: &mut Frame, app: &App, overlay: &Overlay, area: Rect) {
    let inner_w = POPUP_W.min(area.width).saturating_sub(2) as usize;
    let theme = &app.theme;
    let (title, body, hint) = match overlay {
        Overlay::ProjectSelect { cursor } => (
            "Select Project",
            project_rows(app, *cursor, inner_w),
            "Enter: select  n: new  x: delete  Esc: cancel",
        ),
        Overlay::ProjectCreate(form) => (
            "Create Project",
            project_form(theme, form),
            "Tab: switch  Enter: create  Esc: cancel",
        ),
        Overlay::ConfirmDeleteProject { name, .. } => (
            "Delete Project?",
            confirm_body(theme, name, "Tasks will be moved to Inbox."),
            "y: yes  n: no",
        ),
        Overlay::TagSelect { task_id, cursor } => (
            "Select Tags",
            tag_rows(app, *task_id, *cursor, inner_w),
            "Enter: toggle  x: delete  Esc: cancel",
        ),
        Overlay::TagCreate { name, .. } => (
            "Create Tag",
            vec![Line::from(input_spans(theme, name, true))],
            "Enter: create  Esc: back",
        ),
        Overlay::ConfirmDeleteTag { name, .. } => (
            "Delete Tag?",
            confirm_body(
                theme,
                &format!("#{}", name),
                "This will remove the tag from all tasks.",
            ),
            "y: yes  n: no",
        ),
        Overlay::ConfirmDelete { title, .. } => (
            "Delete Task?",
            confirm_body(theme, title, ""),
            "y: yes  n: no",
        ),
        Overlay::DueDate { cursor, .. } => {
            let rows = DuePreset::ALL
                .iter()
                .enumerate()
                .map(|(i, preset)| {
                    let label = Span::styled(preset.label(), text_style(theme));
                    picker_row(theme, i == *cursor, vec![label], inner_w)
                })
                .collect();
            ("Set Due Date", rows, "Enter: select  Esc: cancel")
        }
        Overlay::DueDateCustom { value, .. } => {
            let mut body = vec![Line::from(Span::styled(
                " Format: YYYY-MM-DD",
                Style::default().fg(theme.muted).bg(theme.background),
            ))];
            body.push(Line::from(""));
            body.push(Line::from(input_spans(theme, value, true)));
            (
                "Custom Due Date",
                body,
                "Tab: autocomplete  Enter: confirm  Esc: back",
            )
        }
        Overlay::RecurrenceSelect { task_id, cursor } => (
            "Set Recurrence",
            recurrence_rows(app, *task_id, *cursor, inner_w),
            "\u{2191}/\u{2193}: select  Enter: confirm  Esc: cancel",
        ),
        Overlay::ThemeSelect { cursor } => (
            "Select Theme",
            theme_rows(app, *cursor, inner_w),
            "\u{2191}/\u{2193}: select  Enter: apply  Esc: cancel",
        ),
        Overlay::None | Overlay::Help | Overlay::TaskDetail(_) => return,
    };

    let border = match overlay {
        Overlay::ConfirmDelete { .. }
        | Overlay::ConfirmDeleteTag { .. }
        | Overlay::ConfirmDeleteProject { .. } => theme.danger,
        _ => theme.primary,
    };
    render_popup(frame, theme, title, body, hint, border, area);
}

/// Draw a bordered popup sized to its content
pub(super) fn render_popup(
    frame: &mut Frame,
    theme: &Theme,
    title: &str,
    body: Vec<Line>,
    hint: &str,
    border: Color,
    area: Rect,
) {
    let bg = theme.background;
    let mut lines: Vec<Line> = vec![Line::from("")];
    lines.extend(body);
    lines.push(Line::from(""));
    lines.push(hint_line(theme, hint));

    let popup_h = lines.len() as u16 + 2;
    let popup_area = centered_rect_fixed(POPUP_W, popup_h, area);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border).bg(bg))
        .title(Span::styled(
            format!(" {} ", title),
            Style::default()
                .fg(border)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, popup_area);
}

fn text_style(theme: &Theme) -> Style {
    Style::default().fg(theme.foreground).bg(theme.background)
}

fn project_rows(app: &App, cursor: usize, inner_w: usize) -> Vec<Line<'static>> {
    let theme = &app.theme;
    let mut rows = vec![picker_row(
        theme,
        cursor == 0,
        vec![Span::styled("All Projects", text_style(theme))],
        inner_w,
    )];
    for (i, project) in app.projects.iter().enumerate() {
        let content = vec![
            Span::styled(project.name.clone(), text_style(theme)),
            Span::styled(
                format!(" ({}/{})", project.done_count, project.task_count),
                Style::default().fg(theme.muted),
            ),
        ];
        rows.push(picker_row(theme, cursor == i + 1, content, inner_w));
    }
    rows
}

fn project_form(theme: &Theme, form: &ProjectForm) -> Vec<Line<'static>> {
    let field = |label: &'static str, input: &TextInput, focused: bool| {
        let label_style = if focused {
            Style::default()
                .fg(theme.primary)
                .bg(theme.background)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.muted).bg(theme.background)
        };
        let mut spans = vec![Span::styled(format!("  {}: ", label), label_style)];
        spans.extend(input_spans(theme, input, focused).into_iter().skip(1));
        Line::from(spans)
    };
    vec![
        field("Name", &form.name, form.focus == FormField::Name),
        Line::from(""),
        field(
            "Description",
            &form.description,
            form.focus == FormField::Description,
        ),
    ]
}

/// " value▌", or the placeholder (or `_`) when empty
fn input_spans(theme: &Theme, input: &TextInput, focused: bool) -> Vec<Span<'static>> {
    let bg = theme.background;
    let mut spans = vec![Span::styled(" ", Style::default().bg(bg))];
    if input.is_empty() {
        let placeholder = match input.placeholder() {
            "" => "_".to_string(),
            p => p.to_string(),
        };
        spans.push(Span::styled(
            placeholder,
            Style::default().fg(theme.muted).bg(bg),
        ));
    } else {
        spans.push(Span::styled(
            input.value().to_string(),
            Style::default().fg(theme.foreground).bg(bg),
        ));
    }
    if focused {
        spans.push(Span::styled(
            "\u{258C}",
            Style::default().fg(theme.primary).bg(bg),
        ));
    }
    spans
}

fn confirm_body(theme: &Theme, subject: &str, note: &str) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        format!(" {}", subject),
        Style::default()
            .fg(theme.foreground)
            .bg(theme.background)
            .add_modifier(Modifier::BOLD),
    ))];
    if !note.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", note),
            Style::default().fg(theme.muted).bg(theme.background),
        )));
    }
    lines
}

fn tag_rows(app: &App, task_id: i64, cursor: usize, inner_w: usize) -> Vec<Line<'static>> {
    let theme = &app.theme;
    let task = app.task(task_id);
    let mut rows: Vec<Line> = app
        .tags
        .iter()
        .enumerate()
        .map(|(i, tag)| {
            let checked = task.is_some_and(|t| t.has_tag(tag.id));
            let content = vec![
                Span::styled(
                    if checked { "\u{2713} " } else { "  " },
                    Style::default().fg(theme.secondary),
                ),
                Span::styled(tag.name.clone(), Style::default().fg(theme.tag_color(tag))),
            ];
            picker_row(theme, i == cursor, content, inner_w)
        })
        .collect();
    let new_row = Span::styled("+ New tag...", Style::default().fg(theme.muted));
    rows.push(picker_row(
        theme,
        cursor == app.tags.len(),
        vec![new_row],
        inner_w,
    ));
    rows
}

fn recurrence_rows(app: &App, task_id: i64, cursor: usize, inner_w: usize) -> Vec<Line<'static>> {
    let theme = &app.theme;
    let current = app.task(task_id).and_then(|t| t.recurrence.as_ref());
    let current_label = current.map_or_else(|| "None".to_string(), |r| r.pattern_label());

    let mut rows = vec![
        Line::from(Span::styled(
            format!(" Current: {}", current_label),
            Style::default().fg(theme.muted).bg(theme.background),
        )),
        Line::from(""),
    ];
    for (i, pattern) in Pattern::ALL.iter().enumerate() {
        let label = Span::styled(pattern.label(), text_style(theme));
        rows.push(picker_row(theme, i == cursor, vec![label], inner_w));
    }
    if current.is_some() {
        let mut sep = vec![Span::styled(
            "   \u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}",
            Style::default().fg(theme.border).bg(theme.background),
        )];
        pad_to_width(&mut sep, inner_w, Style::default().bg(theme.background));
        rows.push(Line::from(sep));
        let remove = Span::styled("Remove", Style::default().fg(theme.danger));
        rows.push(picker_row(
            theme,
            cursor == Pattern::ALL.len(),
            vec![remove],
            inner_w,
        ));
    }
    rows
}

fn theme_rows(app: &App, cursor: usize, inner_w: usize) -> Vec<Line<'static>> {
    let theme = &app.theme;
    THEME_NAMES
        .iter()
        .enumerate()
        .map(|(i, key)| {
            let candidate = Theme::from_config(key);
            let current = app.theme.key == *key;
            let content = vec![
                Span::styled(
                    if current { "\u{2713} " } else { "  " },
                    Style::default().fg(theme.secondary),
                ),
                Span::styled("\u{25CF} ", Style::default().fg(candidate.primary)),
                Span::styled(candidate.name, text_style(theme)),
            ];
            picker_row(theme, i == cursor, content, inner_w)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Recurrence, Status};
    use crate::tui::render::test_helpers::*;

    fn overlay_text(app: &App) -> String {
        render_app(app)
    }

    #[test]
    fn test_project_select() {
        let mut app = app_with_tasks(Vec::new());
        app.projects[1].task_count = 4;
        app.projects[1].done_count = 1;
        app.overlay = Overlay::ProjectSelect { cursor: 2 };
        let out = overlay_text(&app);
        assert!(out.contains(" Select Project "));
        assert!(out.contains("   All Projects"));
        assert!(out.contains(" \u{25B6} Work (1/4)"));
        assert!(out.contains("Enter: select  n: new  x: delete  Esc: cancel"));
    }

    #[test]
    fn test_project_create_form() {
        let mut app = app_with_tasks(Vec::new());
        app.overlay = Overlay::ProjectCreate(ProjectForm::default());
        let out = overlay_text(&app);
        assert!(out.contains("  Name: _\u{258C}"));
        assert!(out.contains("  Description: (optional)"));
    }

    #[test]
    fn test_confirm_delete_task() {
        let mut app = app_with_tasks(vec![task(1, "write report", Status::Todo)]);
        app.overlay = Overlay::ConfirmDelete {
            task_id: 1,
            title: "write report".into(),
        };
        let out = overlay_text(&app);
        assert!(out.contains(" Delete Task? "));
        assert!(out.contains("y: yes  n: no"));
    }

    #[test]
    fn test_tag_select_marks_attached_tags() {
        let mut app = app_with_tasks(vec![task(1, "write report", Status::Todo)]);
        app.tags = vec![tag(1, "home"), tag(2, "work")];
        app.tasks[0].tags = vec![tag(2, "work")];
        app.overlay = Overlay::TagSelect { task_id: 1, cursor: 2 };
        let out = overlay_text(&app);
        assert!(out.contains("     home"));
        assert!(out.contains("   \u{2713} work"));
        assert!(out.contains(" \u{25B6} + New tag..."));
    }

    #[test]
    fn test_due_date_custom() {
        let mut app = app_with_tasks(vec![task(1, "write report", Status::Todo)]);
        app.overlay = Overlay::DueDateCustom {
            task_id: 1,
            value: TextInput::new("", "2025-03-15"),
        };
        let out = overlay_text(&app);
        assert!(out.contains("Format: YYYY-MM-DD"));
        assert!(out.contains(" 2025-03-15\u{258C}"));
    }

    #[test]
    fn test_recurrence_remove_row() {
        let mut app = app_with_tasks(vec![task(1, "stretch", Status::Todo)]);
        app.overlay = Overlay::RecurrenceSelect { task_id: 1, cursor: 0 };
        let out = overlay_text(&app);
        assert!(out.contains("Current: None"));
        assert!(!out.contains("Remove"));

        app.tasks[0].recurrence = Some(Recurrence::new(1, Pattern::Weekly, 2, now()));
        let out = overlay_text(&app);
        assert!(out.contains("Current: every 2 weeks"));
        assert!(out.contains("Remove"));
    }

    #[test]
    fn test_theme_select_marks_current() {
        let mut app = app_with_tasks(Vec::new());
        app.overlay = Overlay::ThemeSelect { cursor: 1 };
        let out = overlay_text(&app);
        assert!(out.contains("\u{2713} \u{25CF} Purple"));
        assert!(out.contains(" \u{25B6}   \u{25CF} Ocean"));
    }
}
