use std::error::Error;
use std::io;
use std::path::Path;
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{Local, NaiveDate};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    self, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use regex::Regex;
use tracing::info;

use super::command::{Command, Dispatcher, StoreCommand};
use super::message::Msg;
use super::render;
use super::text_input::TextInput;
use super::theme::Theme;
use super::update::{AppEvent, update};
use crate::io::{config_io, paths};
use crate::model::{Config, Project, Status, Tag, Task};
use crate::store::{Gateway, SqliteStore, TaskFilter};

/// Which presentation of the task list is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    List,
    Board,
}

/// The two sections of the list view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Active,
    Done,
}

/// Cursor and scroll offset of one scrollable region
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Region {
    pub cursor: usize,
    /// Index of the first visible item
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListState {
    pub section: Section,
    pub active: Region,
    pub done: Region,
    pub done_collapsed: bool,
}

impl Default for ListState {
    fn default() -> Self {
        ListState {
            section: Section::Active,
            active: Region::default(),
            done: Region::default(),
            done_collapsed: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardState {
    /// Focused column, indexing `Status::ALL`
    pub column: usize,
    pub columns: [Region; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Info,
    /// Rejected input; styled as an error but short-lived
    Warning,
    Error,
}

impl StatusKind {
    /// How long a banner of this kind stays up
    pub fn duration(self) -> Duration {
        match self {
            StatusKind::Success => Duration::from_millis(1500),
            StatusKind::Info | StatusKind::Warning => Duration::from_secs(2),
            StatusKind::Error => Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBanner {
    pub text: String,
    pub kind: StatusKind,
}

/// What the open text prompt will do on Enter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputPurpose {
    AddTask,
    EditTask(i64),
    Search,
}

impl InputPurpose {
    pub fn prompt(self) -> &'static str {
        match self {
            InputPurpose::AddTask => "New task: ",
            InputPurpose::EditTask(_) => "Edit: ",
            InputPurpose::Search => "Search: ",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            InputPurpose::AddTask => "Enter task title...",
            InputPurpose::EditTask(_) => "Enter new title...",
            InputPurpose::Search => "Search tasks...",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputState {
    pub purpose: InputPurpose,
    pub text: TextInput,
}

impl InputState {
    pub fn new(purpose: InputPurpose, value: &str) -> Self {
        InputState {
            purpose,
            text: TextInput::new(value, purpose.placeholder()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Description,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectForm {
    pub name: TextInput,
    pub description: TextInput,
    pub focus: FormField,
}

impl Default for ProjectForm {
    fn default() -> Self {
        ProjectForm {
            name: TextInput::new("", ""),
            description: TextInput::new("", "(optional)"),
            focus: FormField::Name,
        }
    }
}

/// Modal sub-interactions. Each variant carries its own cursor or buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    None,
    Help,
    /// Cursor 0 is "All Projects", `i + 1` is `projects[i]`
    ProjectSelect { cursor: usize },
    ProjectCreate(ProjectForm),
    ConfirmDeleteProject {
        project_id: i64,
        name: String,
        /// ProjectSelect cursor to return to
        cursor: usize,
    },
    /// Cursor `tags.len()` is the "+ New tag..." row
    TagSelect { task_id: i64, cursor: usize },
    TagCreate {
        task_id: i64,
        name: TextInput,
        cursor: usize,
    },
    ConfirmDeleteTag {
        task_id: i64,
        tag_id: i64,
        name: String,
        cursor: usize,
    },
    ConfirmDelete { task_id: i64, title: String },
    /// Cursor indexes `DuePreset::ALL`
    DueDate { task_id: i64, cursor: usize },
    DueDateCustom { task_id: i64, value: TextInput },
    RecurrenceSelect { task_id: i64, cursor: usize },
    TaskDetail(i64),
    /// Cursor indexes `THEME_NAMES`
    ThemeSelect { cursor: usize },
}

impl Overlay {
    pub fn is_open(&self) -> bool {
        !matches!(self, Overlay::None)
    }

    /// The task this overlay was opened for, if it acts on one
    pub fn task_id(&self) -> Option<i64> {
        match self {
            Overlay::TagSelect { task_id, .. }
            | Overlay::TagCreate { task_id, .. }
            | Overlay::ConfirmDeleteTag { task_id, .. }
            | Overlay::ConfirmDelete { task_id, .. }
            | Overlay::DueDate { task_id, .. }
            | Overlay::DueDateCustom { task_id, .. }
            | Overlay::RecurrenceSelect { task_id, .. }
            | Overlay::TaskDetail(task_id) => Some(*task_id),
            _ => None,
        }
    }
}

/// Complete interactive state. Transitions go through `update::update`.
#[derive(Debug, Clone)]
pub struct App {
    pub view: View,
    pub overlay: Overlay,
    pub input: Option<InputState>,

    /// Tasks matching the current project filter and search
    pub tasks: Vec<Task>,
    pub projects: Vec<Project>,
    pub tags: Vec<Tag>,

    /// `None` shows every project
    pub project_filter: Option<i64>,
    pub search: String,

    pub list: ListState,
    pub board: BoardState,

    pub status: Option<StatusBanner>,
    /// Bumped whenever the banner changes so stale clears are ignored
    pub status_generation: u64,

    pub theme: Theme,
    pub config: Config,

    /// Terminal size in cells, as last reported
    pub size: (u16, u16),
    /// Local date of the most recent event, for due labels
    pub today: NaiveDate,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: Config) -> Self {
        App {
            view: View::List,
            overlay: Overlay::None,
            input: None,
            tasks: Vec::new(),
            projects: Vec::new(),
            tags: Vec::new(),
            project_filter: None,
            search: String::new(),
            list: ListState::default(),
            board: BoardState::default(),
            status: None,
            status_generation: 0,
            theme: Theme::from_config(&config.theme),
            config,
            size: (80, 24),
            today: Local::now().date_naive(),
            should_quit: false,
        }
    }

    /// Commands issued once at startup
    pub fn init_commands(&self) -> Vec<Command> {
        vec![
            StoreCommand::LoadTasks(self.task_filter()).into(),
            StoreCommand::LoadProjects.into(),
            StoreCommand::LoadTags.into(),
        ]
    }

    pub fn task_filter(&self) -> TaskFilter {
        TaskFilter {
            project_id: self.project_filter,
            search: (!self.search.is_empty()).then(|| self.search.clone()),
            ..TaskFilter::default()
        }
    }

    pub fn reload_tasks(&self) -> Command {
        StoreCommand::LoadTasks(self.task_filter()).into()
    }

    /// Todo and doing tasks, in store order
    pub fn active_tasks(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| !t.is_done()).collect()
    }

    pub fn done_tasks(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.is_done()).collect()
    }

    /// Board column `idx` (Todo, Doing, Done)
    pub fn column(&self, idx: usize) -> Vec<&Task> {
        let status = Status::ALL[idx.min(Status::ALL.len() - 1)];
        self.tasks.iter().filter(|t| t.status == status).collect()
    }

    pub fn task(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn project_name(&self, id: i64) -> Option<&str> {
        self.projects
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.name.as_str())
    }

    /// Label of the current project filter
    pub fn project_filter_name(&self) -> &str {
        match self.project_filter {
            Some(id) => self.project_name(id).unwrap_or("All"),
            None => "All",
        }
    }

    /// Case-insensitive highlighter for the active search query, matching
    /// it as literal text the way the store filters
    pub fn search_regex(&self) -> Option<Regex> {
        if self.search.is_empty() {
            return None;
        }
        Regex::new(&format!("(?i){}", regex::escape(&self.search))).ok()
    }

    /// Show a banner and schedule its removal. A newer banner supersedes
    /// this one's pending clear.
    pub fn set_status(&mut self, text: impl Into<String>, kind: StatusKind) -> Command {
        self.status_generation += 1;
        self.status = Some(StatusBanner {
            text: text.into(),
            kind,
        });
        Command::ClearStatus {
            generation: self.status_generation,
            after: kind.duration(),
        }
    }

    /// Drop the current banner, if any
    pub fn dismiss_status(&mut self) {
        if self.status.take().is_some() {
            self.status_generation += 1;
        }
    }
}

/// The task under the cursor in whichever view is showing.
pub fn selected_task(app: &App) -> Option<&Task> {
    match app.view {
        View::List => match app.list.section {
            Section::Active => app.active_tasks().get(app.list.active.cursor).copied(),
            Section::Done if !app.list.done_collapsed => {
                app.done_tasks().get(app.list.done.cursor).copied()
            }
            Section::Done => None,
        },
        View::Board => {
            let col = app.board.column.min(2);
            app.column(col)
                .get(app.board.columns[col].cursor)
                .copied()
        }
    }
}

// ---------------------------------------------------------------------------
// Terminal loop
// ---------------------------------------------------------------------------

/// Run the TUI application
pub fn run(db_flag: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let config_path = paths::config_path();
    let config = config_io::load_config(&config_path)?;
    let db_path = paths::resolve_db_path(db_flag, &config);
    let store = SqliteStore::open(&db_path)?;
    info!(db = %db_path.display(), "starting interactive session");

    let store: Arc<Mutex<dyn Gateway + Send>> = Arc::new(Mutex::new(store));
    let (tx, rx) = mpsc::channel();
    let dispatcher = Dispatcher::new(store, config_path, tx);

    let mut app = App::new(config);
    app.size = terminal::size()?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    for cmd in app.init_commands() {
        dispatcher.dispatch(cmd);
    }

    let result = run_event_loop(&mut terminal, app, &dispatcher, &rx);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
    dispatcher: &Dispatcher,
    rx: &Receiver<Msg>,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, &app))?;

        let mut events = Vec::new();
        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    events.push(AppEvent::Key(key));
                }
                Event::Resize(w, h) => events.push(AppEvent::Resize(w, h)),
                _ => {}
            }
        }
        events.extend(rx.try_iter().map(AppEvent::Msg));

        for ev in events {
            let (next, commands) = update(app, ev, Local::now());
            app = next;
            for cmd in commands {
                dispatcher.dispatch(cmd);
            }
        }

        if app.should_quit {
            break;
        }
    }
    info!("interactive session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::{app_with_tasks, task};

    #[test]
    fn test_selected_task_follows_view() {
        let mut app = app_with_tasks(vec![
            task(1, "write report", Status::Todo),
            task(2, "review PR", Status::Doing),
            task(3, "buy milk", Status::Done),
        ]);
        assert_eq!(selected_task(&app).map(|t| t.id), Some(1));

        app.list.section = Section::Done;
        assert_eq!(selected_task(&app).map(|t| t.id), Some(3));

        app.list.done_collapsed = true;
        assert_eq!(selected_task(&app), None);

        app.view = View::Board;
        app.board.column = 1;
        assert_eq!(selected_task(&app).map(|t| t.id), Some(2));
    }

    #[test]
    fn test_set_status_bumps_generation() {
        let mut app = app_with_tasks(Vec::new());
        let first = app.set_status("one", StatusKind::Success);
        let second = app.set_status("two", StatusKind::Error);
        assert_eq!(
            first,
            Command::ClearStatus {
                generation: 1,
                after: Duration::from_millis(1500)
            }
        );
        assert_eq!(
            second,
            Command::ClearStatus {
                generation: 2,
                after: Duration::from_secs(5)
            }
        );
        app.dismiss_status();
        assert!(app.status.is_none());
        assert_eq!(app.status_generation, 3);
        app.dismiss_status();
        assert_eq!(app.status_generation, 3);
    }

    #[test]
    fn test_search_regex_matches_literally() {
        let mut app = app_with_tasks(Vec::new());
        assert!(app.search_regex().is_none());
        app.search = "(milk".into();
        let re = app.search_regex().unwrap();
        assert!(re.is_match("buy (MILK"));

        app.search = "a.c".into();
        let re = app.search_regex().unwrap();
        assert!(!re.is_match("abc"));
        assert!(re.is_match("see A.C. docs"));
    }

    #[test]
    fn test_task_filter_carries_project_and_search() {
        let mut app = app_with_tasks(Vec::new());
        assert_eq!(app.task_filter(), TaskFilter::default());
        app.project_filter = Some(2);
        app.search = "milk".into();
        let filter = app.task_filter();
        assert_eq!(filter.project_id, Some(2));
        assert_eq!(filter.search.as_deref(), Some("milk"));
    }
}
