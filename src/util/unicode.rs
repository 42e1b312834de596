use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Width of `s` in terminal cells
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Cut `s` to at most `max_cells` cells, ending in `…` when anything was
/// dropped. Never splits a grapheme cluster.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    if max_cells == 0 {
        return String::new();
    }
    let budget = max_cells - 1;
    let mut width = 0;
    let mut out = String::new();
    for g in s.graphemes(true) {
        let gw = display_width(g);
        if width + gw > budget {
            break;
        }
        width += gw;
        out.push_str(g);
    }
    out.push('\u{2026}');
    out
}

/// Byte offset of the grapheme boundary after `offset`, or `None` at the end
pub fn next_grapheme_boundary(s: &str, offset: usize) -> Option<usize> {
    let rest = s.get(offset..).filter(|r| !r.is_empty())?;
    let step = rest
        .grapheme_indices(true)
        .nth(1)
        .map_or(rest.len(), |(i, _)| i);
    Some(offset + step)
}

/// Byte offset of the grapheme boundary before `offset`, or `None` at the start
pub fn prev_grapheme_boundary(s: &str, offset: usize) -> Option<usize> {
    let head = s.get(..offset).filter(|h| !h.is_empty())?;
    head.grapheme_indices(true).last().map(|(i, _)| i)
}

/// Cells covered by the first `offset` bytes of `s`
pub fn byte_offset_to_display_col(s: &str, offset: usize) -> usize {
    display_width(&s[..offset.min(s.len())])
}

fn is_blank(g: &str) -> bool {
    g.chars().all(char::is_whitespace)
}

/// Start of the word at or before `offset`, skipping any whitespace first.
pub fn word_boundary_left(s: &str, offset: usize) -> usize {
    let graphemes: Vec<(usize, &str)> = s[..offset.min(s.len())].grapheme_indices(true).collect();
    let mut idx = graphemes.len();
    while idx > 0 && is_blank(graphemes[idx - 1].1) {
        idx -= 1;
    }
    while idx > 0 && !is_blank(graphemes[idx - 1].1) {
        idx -= 1;
    }
    graphemes.get(idx).map_or(0, |(i, _)| *i)
}

/// Start of the next word after `offset`, or the end of `s`.
pub fn word_boundary_right(s: &str, offset: usize) -> usize {
    let offset = offset.min(s.len());
    let mut graphemes = s[offset..].grapheme_indices(true).peekable();
    while graphemes.next_if(|(_, g)| !is_blank(g)).is_some() {}
    while graphemes.next_if(|(_, g)| is_blank(g)).is_some() {}
    graphemes.peek().map_or(s.len(), |(i, _)| offset + i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_width() {
        assert_eq!(display_width("buy milk"), 8);
        assert_eq!(display_width("日本語"), 6);
        assert_eq!(display_width("cafe\u{301}"), 4);
        assert_eq!(display_width(""), 0);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate_to_width("milk", 10), "milk");
        assert_eq!(truncate_to_width("milk", 4), "milk");
        assert_eq!(truncate_to_width("quarterly report", 8), "quarter\u{2026}");
        assert_eq!(truncate_to_width("日本語", 5), "日本\u{2026}");
        assert_eq!(truncate_to_width("日本語", 4), "日\u{2026}");
        assert_eq!(truncate_to_width("milk", 1), "\u{2026}");
        assert_eq!(truncate_to_width("milk", 0), "");
    }

    #[test]
    fn test_grapheme_boundaries() {
        let s = "a\u{1F389}e\u{301}";
        assert_eq!(next_grapheme_boundary(s, 0), Some(1));
        assert_eq!(next_grapheme_boundary(s, 1), Some(5));
        assert_eq!(next_grapheme_boundary(s, 5), Some(8));
        assert_eq!(next_grapheme_boundary(s, 8), None);
        assert_eq!(prev_grapheme_boundary(s, 8), Some(5));
        assert_eq!(prev_grapheme_boundary(s, 1), Some(0));
        assert_eq!(prev_grapheme_boundary(s, 0), None);
    }

    #[test]
    fn test_display_col() {
        assert_eq!(byte_offset_to_display_col("日本", 3), 2);
        assert_eq!(byte_offset_to_display_col("milk", 99), 4);
    }

    #[test]
    fn test_word_boundaries() {
        let s = "buy oat milk";
        assert_eq!(word_boundary_left(s, 12), 8);
        assert_eq!(word_boundary_left(s, 8), 4);
        assert_eq!(word_boundary_left(s, 2), 0);
        assert_eq!(word_boundary_left(s, 0), 0);
        assert_eq!(word_boundary_right(s, 0), 4);
        assert_eq!(word_boundary_right(s, 5), 8);
        assert_eq!(word_boundary_right(s, 8), 12);
        assert_eq!(word_boundary_right(s, 12), 12);
    }
}
