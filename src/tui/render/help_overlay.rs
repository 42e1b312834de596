use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::helpers::centered_rect_fixed;
use crate::tui::app::App;

const SECTIONS: [(&str, &[(&str, &str)]); 5] = [
    (
        "Navigation",
        &[
            ("\u{2191}/k, \u{2193}/j", "Move up/down"),
            ("\u{2190}/h, \u{2192}/l", "Move between columns (board)"),
            ("Tab", "Switch view (List/Board)"),
        ],
    ),
    (
        "Status",
        &[
            ("Enter", "Forward (todo \u{2192} doing \u{2192} done)"),
            ("b", "Backward (done \u{2192} doing \u{2192} todo)"),
        ],
    ),
    (
        "Actions",
        &[
            ("a", "Add new task"),
            ("e", "Edit task title"),
            ("D", "Toggle done"),
            ("x", "Delete task"),
            ("d", "Set due date"),
            ("t", "Set tags"),
            ("r", "Set recurrence"),
            ("1/2/3/0", "Set priority (high/med/low/none)"),
            ("v", "View task detail"),
        ],
    ),
    (
        "Filter & Search",
        &[
            ("/", "Search tasks"),
            ("p", "Select project"),
            ("A", "Toggle Done section"),
            ("c", "Clear search"),
        ],
    ),
    (
        "General",
        &[
            ("T", "Select theme"),
            ("?", "Show this help"),
            ("q", "Quit"),
        ],
    ),
];

/// Render the help overlay (toggled with ?)
pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;

    let key_style = Style::default()
        .fg(app.theme.primary)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(app.theme.foreground).bg(bg);
    let header_style = Style::default()
        .fg(app.theme.accent)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(" Keyboard Shortcuts", header_style)));

    for (title, bindings) in SECTIONS {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!(" {}", title), header_style)));
        for (key, desc) in bindings {
            add_binding(&mut lines, key, desc, key_style, desc_style);
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " Press any key to close",
        Style::default().fg(app.theme.muted).bg(bg),
    )));

    let overlay_area = centered_rect_fixed(54, lines.len() as u16 + 2, area);
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.primary).bg(bg))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));

    frame.render_widget(paragraph, overlay_area);
}

fn add_binding<'a>(
    lines: &mut Vec<Line<'a>>,
    key: &'a str,
    desc: &'a str,
    key_style: Style,
    desc_style: Style,
) {
    let key_width = 14;
    let padded_key = format!("   {:<width$}", key, width = key_width - 3);
    lines.push(Line::from(vec![
        Span::styled(padded_key, key_style),
        Span::styled(desc, desc_style),
    ]));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn test_help_lists_every_section() {
        let mut app = app_with_tasks(Vec::new());
        app.size = (TERM_W, 40);
        let out = render_to_string(TERM_W, 40, |frame, area| {
            render_help_overlay(frame, &app, area)
        });
        assert!(out.contains("Keyboard Shortcuts"));
        for section in ["Navigation", "Status", "Actions", "Filter & Search", "General"] {
            assert!(out.contains(section), "missing {section}");
        }
        assert!(out.contains("1/2/3/0    Set priority (high/med/low/none)"));
        assert!(out.contains("Press any key to close"));
    }
}
