use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tsk", about = concat!("tsk v", env!("CARGO_PKG_VERSION"), " - tasks in a list or on a board"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Database file (default: ~/.local/share/tsk/tsk.db)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new task
    Add(AddArgs),
    /// List tasks (done tasks are hidden unless --all)
    #[command(visible_alias = "ls")]
    List(ListArgs),
    /// Mark a task as done, creating its next occurrence if it repeats
    Done(IdArg),
    /// Mark a task as in progress
    Doing(IdArg),
    /// Remove a task
    #[command(visible_alias = "remove")]
    Rm(RmArgs),
    /// Manage projects
    Project(ProjectCmd),
    /// Manage tags
    Tag(TagCmd),
    /// Manage task recurrence
    Recurrence(RecurrenceCmd),
}

// ---------------------------------------------------------------------------
// Task args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Task title (words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    pub title: Vec<String>,
    /// Project name (default: Inbox)
    #[arg(short, long)]
    pub project: Option<String>,
    /// Tag to attach; created if it does not exist (repeatable)
    #[arg(short, long = "tag")]
    pub tags: Vec<String>,
    /// Priority (none, low, medium, high)
    #[arg(long)]
    pub priority: Option<String>,
    /// Due date (today, tomorrow, "next week", 3d, fri, YYYY-MM-DD, MM-DD)
    #[arg(short, long)]
    pub due: Option<String>,
    /// Repeat pattern: daily, weekly, monthly, yearly, or e.g. daily:2
    #[arg(short, long)]
    pub repeat: Option<String>,
    /// Longer description
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Filter by status (todo, doing, done)
    #[arg(short, long)]
    pub status: Option<String>,
    /// Filter by project name
    #[arg(short, long)]
    pub project: Option<String>,
    /// Filter by tag name
    #[arg(short, long)]
    pub tag: Option<String>,
    /// Include done tasks
    #[arg(short, long)]
    pub all: bool,
    /// Only tasks whose title or description contains this text
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Args)]
pub struct IdArg {
    /// Task ID
    pub id: i64,
}

#[derive(Args)]
pub struct RmArgs {
    /// Task ID
    pub id: i64,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub force: bool,
}

// ---------------------------------------------------------------------------
// Project / tag / recurrence management
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ProjectCmd {
    #[command(subcommand)]
    pub action: Option<ProjectAction>,
}

#[derive(Subcommand)]
pub enum ProjectAction {
    /// List projects with progress (default)
    #[command(visible_alias = "ls")]
    List,
    /// Create a project
    Add(ProjectAddArgs),
    /// Delete a project; its tasks move to the Inbox
    #[command(visible_alias = "remove")]
    Rm(NameArg),
}

#[derive(Args)]
pub struct ProjectAddArgs {
    /// Project name (words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    pub name: Vec<String>,
    /// Project description
    #[arg(short, long, default_value = "")]
    pub description: String,
}

#[derive(Args)]
pub struct NameArg {
    pub name: String,
}

#[derive(Args)]
pub struct TagCmd {
    #[command(subcommand)]
    pub action: Option<TagAction>,
}

#[derive(Subcommand)]
pub enum TagAction {
    /// List tags (default)
    #[command(visible_alias = "ls")]
    List,
    /// Create a tag
    Add(TagAddArgs),
    /// Delete a tag and remove it from every task
    #[command(visible_alias = "remove")]
    Rm(TagRmArgs),
}

#[derive(Args)]
pub struct TagAddArgs {
    pub name: String,
    /// Hex color such as #FF0000
    #[arg(short, long)]
    pub color: Option<String>,
}

#[derive(Args)]
pub struct TagRmArgs {
    pub name: String,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args)]
pub struct RecurrenceCmd {
    #[command(subcommand)]
    pub action: RecurrenceAction,
}

#[derive(Subcommand)]
pub enum RecurrenceAction {
    /// Stop a task from repeating
    #[command(visible_alias = "remove")]
    Rm(IdArg),
}
