//! Scroll windows for the list sections and board columns.
//!
//! Offsets live in the app state and are recomputed after every event from
//! the recorded terminal size, so rendering never has to mutate anything.

use super::app::{App, Section};

/// Rows above the content area: header line plus separator
pub const HEADER_ROWS: u16 = 2;
/// Rows below the content area
pub const STATUS_ROWS: u16 = 1;
/// Height of the bordered text prompt while input mode is open
pub const INPUT_ROWS: u16 = 3;

/// Blank line plus the "Done (N)" header between the list sections
const DONE_HEADER_ROWS: usize = 2;
/// Smallest active section while the done section is expanded
const MIN_ACTIVE_ROWS: usize = 3;

/// Visible slice `start..end` of a scrollable region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: usize,
    pub end: usize,
}

/// Smallest scroll from `prev_start` that keeps `cursor` visible.
///
/// Guarantees `start <= cursor < end` and `end - start <= visible` whenever
/// `count > 0`, and leaves `start` alone while the cursor is already inside
/// the window.
pub fn window(cursor: usize, visible: usize, count: usize, prev_start: usize) -> Window {
    if count == 0 {
        return Window { start: 0, end: 0 };
    }
    let visible = visible.max(1);
    let cursor = cursor.min(count - 1);
    let mut start = prev_start.min(count.saturating_sub(visible));
    if cursor < start {
        start = cursor;
    } else if cursor >= start + visible {
        start = cursor + 1 - visible;
    }
    Window {
        start,
        end: count.min(start + visible),
    }
}

/// Item rows given to each list section. Every section also owns one
/// indicator row below its items, so the layout height is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListSplit {
    pub active_rows: usize,
    pub done_rows: usize,
}

/// Divide `height` content rows between the active and done sections.
pub fn list_split(height: usize, active_count: usize, done_count: usize, collapsed: bool) -> ListSplit {
    if done_count == 0 {
        return ListSplit {
            active_rows: height.saturating_sub(1).max(1),
            done_rows: 0,
        };
    }
    let avail = height.saturating_sub(DONE_HEADER_ROWS);
    if collapsed {
        return ListSplit {
            active_rows: avail.saturating_sub(1).max(1),
            done_rows: 0,
        };
    }

    // Two indicator rows, one per section
    let rows = avail.saturating_sub(2);
    let active_needed = active_count.min(rows / 2);
    let mut done = (rows - active_needed).min(done_count);
    let mut active = rows - done;
    if active < MIN_ACTIVE_ROWS {
        active = MIN_ACTIVE_ROWS.min(rows);
        done = rows - active;
    }
    ListSplit {
        active_rows: active.max(1),
        done_rows: done,
    }
}

/// Rows between the header and the status row
pub fn content_height(app: &App) -> usize {
    let input = if app.input.is_some() { INPUT_ROWS } else { 0 };
    app.size
        .1
        .saturating_sub(HEADER_ROWS + STATUS_ROWS + input) as usize
}

/// Item rows inside one board column: borders and the indicator row excluded
pub fn board_rows(content_height: usize) -> usize {
    content_height.saturating_sub(3).max(1)
}

/// Clamp every cursor to its region and scroll each region just enough to
/// keep its cursor visible.
pub fn sync(app: &mut App) {
    let height = content_height(app);
    let active_count = app.active_tasks().len();
    let done_count = app.done_tasks().len();

    let list = &mut app.list;
    if list.section == Section::Done && (done_count == 0 || list.done_collapsed) {
        list.section = Section::Active;
    }
    list.active.cursor = list.active.cursor.min(active_count.saturating_sub(1));
    list.done.cursor = list.done.cursor.min(done_count.saturating_sub(1));

    let split = list_split(height, active_count, done_count, list.done_collapsed);
    list.active.offset =
        window(list.active.cursor, split.active_rows, active_count, list.active.offset).start;
    list.done.offset =
        window(list.done.cursor, split.done_rows, done_count, list.done.offset).start;

    let counts: Vec<usize> = (0..3).map(|i| app.column(i).len()).collect();
    let rows = board_rows(height);
    app.board.column = app.board.column.min(2);
    for (region, count) in app.board.columns.iter_mut().zip(counts) {
        region.cursor = region.cursor.min(count.saturating_sub(1));
        region.offset = window(region.cursor, rows, count, region.offset).start;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Status;
    use crate::tui::render::test_helpers::{app_with_tasks, many_tasks, task};

    #[test]
    fn test_window_keeps_cursor_visible() {
        for count in 0..12 {
            for visible in 1..8 {
                for prev in 0..12 {
                    for cursor in 0..count {
                        let w = window(cursor, visible, count, prev);
                        assert!(w.start <= cursor && cursor < w.end, "{cursor} {visible} {count} {prev}");
                        assert!(w.end - w.start <= visible);
                        assert!(w.end <= count);
                    }
                }
            }
        }
        assert_eq!(window(0, 5, 0, 3), Window { start: 0, end: 0 });
    }

    #[test]
    fn test_window_does_not_scroll_inside_range() {
        // Window 4..9 of 20; every cursor inside keeps start at 4
        for cursor in 4..9 {
            assert_eq!(window(cursor, 5, 20, 4).start, 4);
        }
    }

    #[test]
    fn test_window_scrolls_minimally() {
        assert_eq!(window(9, 5, 20, 4).start, 5);
        assert_eq!(window(3, 5, 20, 4).start, 3);
        assert_eq!(window(19, 5, 20, 0), Window { start: 15, end: 20 });
    }

    #[test]
    fn test_window_pulls_back_when_list_shrinks() {
        // Previously scrolled to 15 of 20, list now has 6 items
        assert_eq!(window(5, 5, 6, 15), Window { start: 1, end: 6 });
    }

    #[test]
    fn test_list_split_without_done() {
        let split = list_split(20, 30, 0, false);
        assert_eq!(split, ListSplit { active_rows: 19, done_rows: 0 });
    }

    #[test]
    fn test_list_split_collapsed() {
        let split = list_split(20, 30, 10, true);
        assert_eq!(split.active_rows, 17);
        assert_eq!(split.done_rows, 0);
    }

    #[test]
    fn test_list_split_expanded_shares_rows() {
        // 20 - 2 header rows - 2 indicator rows = 16 item rows
        let split = list_split(20, 30, 30, false);
        assert_eq!(split.active_rows + split.done_rows, 16);
        assert_eq!(split.active_rows, 8);

        // Done capped at its own count
        let split = list_split(20, 30, 2, false);
        assert_eq!(split, ListSplit { active_rows: 14, done_rows: 2 });
    }

    #[test]
    fn test_list_split_active_floor() {
        let split = list_split(20, 0, 50, false);
        assert_eq!(split.active_rows, 3);
        assert_eq!(split.done_rows, 13);

        let split = list_split(20, 1, 50, false);
        assert!(split.active_rows >= 3);
    }

    #[test]
    fn test_sync_leaves_collapsed_done_section() {
        let mut tasks = many_tasks(3);
        tasks.push(task(10, "filed taxes", Status::Done));
        let mut app = app_with_tasks(tasks);
        app.list.section = Section::Done;
        app.list.done_collapsed = true;
        sync(&mut app);
        assert_eq!(app.list.section, Section::Active);
    }

    #[test]
    fn test_sync_clamps_cursor_after_reload() {
        let mut app = app_with_tasks(many_tasks(40));
        app.list.active.cursor = 39;
        sync(&mut app);
        // 24 rows - 3 chrome = 21, minus the indicator row
        assert_eq!(app.list.active.offset, 40 - 20);

        app.tasks.truncate(5);
        sync(&mut app);
        assert_eq!(app.list.active.cursor, 4);
        assert_eq!(app.list.active.offset, 0);
    }

    #[test]
    fn test_sync_accounts_for_input_box() {
        let mut app = app_with_tasks(many_tasks(40));
        assert_eq!(content_height(&app), 21);
        app.input = Some(crate::tui::app::InputState::new(
            crate::tui::app::InputPurpose::Search,
            "",
        ));
        assert_eq!(content_height(&app), 18);
    }

    #[test]
    fn test_sync_scrolls_board_columns_independently() {
        let mut app = app_with_tasks(many_tasks(40));
        app.board.columns[0].cursor = 30;
        sync(&mut app);
        let rows = board_rows(21);
        assert_eq!(app.board.columns[0].offset, 31 - rows);
        assert_eq!(app.board.columns[1], Default::default());
    }
}
