use chrono::{DateTime, Local, NaiveDate, TimeZone};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::model::{Config, INBOX_PROJECT_ID, Project, Status, Tag, Task};
use crate::tui::app::App;
use crate::tui::viewport;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Render the whole app at the standard test size.
pub fn render_app(app: &App) -> String {
    render_to_string(app.size.0, app.size.1, |frame, _| {
        crate::tui::render::render(frame, app)
    })
}

/// Wednesday 2025-03-12, 09:00 local
pub fn now() -> DateTime<Local> {
    Local.with_ymd_and_hms(2025, 3, 12, 9, 0, 0).unwrap()
}

pub fn today() -> NaiveDate {
    now().date_naive()
}

/// A stored task in the Inbox. Done tasks get a completion time.
pub fn task(id: i64, title: &str, status: Status) -> Task {
    let mut task = Task::new(title, now());
    task.id = id;
    task.project_id = Some(INBOX_PROJECT_ID);
    task.set_status(status, now());
    task
}

pub fn tag(id: i64, name: &str) -> Tag {
    Tag {
        id,
        name: name.to_string(),
        color: "#22AA88".to_string(),
    }
}

pub fn project(id: i64, name: &str) -> Project {
    Project {
        id,
        name: name.to_string(),
        description: String::new(),
        created_at: now(),
        task_count: 0,
        done_count: 0,
    }
}

/// An app at 80x24 holding `tasks`, with Inbox and Work projects loaded.
pub fn app_with_tasks(tasks: Vec<Task>) -> App {
    let mut app = App::new(Config::default());
    app.size = (TERM_W, TERM_H);
    app.today = today();
    app.tasks = tasks;
    app.projects = vec![project(INBOX_PROJECT_ID, "Inbox"), project(2, "Work")];
    viewport::sync(&mut app);
    app
}

/// `n` todo tasks titled "task 1" .. "task n"
pub fn many_tasks(n: i64) -> Vec<Task> {
    (1..=n)
        .map(|i| task(i, &format!("task {}", i), Status::Todo))
        .collect()
}
