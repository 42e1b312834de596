use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::tui::theme::Theme;
use crate::util::unicode;

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum()
}

/// Pad a row with `style` out to `width` cells
pub(super) fn pad_to_width(spans: &mut Vec<Span<'_>>, width: usize, style: Style) {
    let used = spans_width(spans);
    if used < width {
        spans.push(Span::styled(" ".repeat(width - used), style));
    }
}

/// Fixed-size rectangle centered in `area`, shrunk to fit
pub(super) fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

/// One picker row: " ▶ " and the surface background on the cursor row
pub(super) fn picker_row<'a>(
    theme: &Theme,
    selected: bool,
    content: Vec<Span<'a>>,
    inner_w: usize,
) -> Line<'a> {
    let row_bg = if selected { theme.surface } else { theme.background };
    let row_style = Style::default().bg(row_bg);
    let indicator_style = if selected {
        Style::default()
            .fg(theme.primary)
            .bg(row_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        row_style
    };

    let mut spans = vec![Span::styled(
        if selected { " \u{25B6} " } else { "   " },
        indicator_style,
    )];
    for span in content {
        let style = span.style.bg(row_bg);
        spans.push(span.style(style));
    }
    pad_to_width(&mut spans, inner_w, row_style);
    Line::from(spans)
}

/// Dim one-line hint shown at the bottom of a popup
pub(super) fn hint_line(theme: &Theme, text: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!(" {}", text),
        Style::default().fg(theme.muted).bg(theme.background),
    ))
}
