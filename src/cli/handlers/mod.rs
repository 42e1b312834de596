use std::io::{BufRead, Write};

use chrono::Local;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::{config_io, paths};
use crate::model::{
    DEFAULT_TAG_COLOR, INBOX_PROJECT_ID, Priority, Project, Recurrence, Status, Task, parse_repeat,
};
use crate::ops::{dates, recurrence};
use crate::store::{Gateway, SqliteStore, TaskFilter};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Run one subcommand. `command` is never `None` here; the TUI path is
/// handled in main.
pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let Some(command) = cli.command else {
        return Ok(());
    };
    let store = open_store(cli.db.as_deref())?;

    match command {
        Commands::Add(args) => cmd_add(&store, args),
        Commands::List(args) => cmd_list(&store, args, json),
        Commands::Done(args) => cmd_done(&store, args.id),
        Commands::Doing(args) => cmd_doing(&store, args.id),
        Commands::Rm(args) => cmd_rm(&store, args),
        Commands::Project(cmd) => match cmd.action.unwrap_or(ProjectAction::List) {
            ProjectAction::List => cmd_project_list(&store, json),
            ProjectAction::Add(args) => cmd_project_add(&store, args),
            ProjectAction::Rm(args) => cmd_project_rm(&store, &args.name),
        },
        Commands::Tag(cmd) => match cmd.action.unwrap_or(TagAction::List) {
            TagAction::List => cmd_tag_list(&store, json),
            TagAction::Add(args) => cmd_tag_add(&store, args),
            TagAction::Rm(args) => cmd_tag_rm(&store, args),
        },
        Commands::Recurrence(cmd) => match cmd.action {
            RecurrenceAction::Rm(args) => cmd_recurrence_rm(&store, args.id),
        },
    }
}

/// Open the database the flags, environment and config point at.
pub fn open_store(flag: Option<&std::path::Path>) -> Result<SqliteStore, Box<dyn std::error::Error>> {
    let config = config_io::load_config(&paths::config_path())?;
    let path = paths::resolve_db_path(flag, &config);
    tracing::debug!(path = %path.display(), "opening database");
    Ok(SqliteStore::open(&path)?)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Case-insensitive project lookup by name
fn find_project(store: &dyn Gateway, name: &str) -> Result<Project, Box<dyn std::error::Error>> {
    let wanted = name.trim();
    store
        .list_projects()?
        .into_iter()
        .find(|p| p.name.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| format!("project not found: {}", wanted).into())
}

/// Ask a yes/no question on stdin; only `y`/`yes` counts as yes.
fn confirm(prompt: &str) -> Result<bool, std::io::Error> {
    print!("{}", prompt);
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

// ---------------------------------------------------------------------------
// Task commands
// ---------------------------------------------------------------------------

fn cmd_add(store: &SqliteStore, args: AddArgs) -> CmdResult {
    let title = args.title.join(" ").trim().to_string();
    if title.is_empty() {
        return Err("task title is required".into());
    }
    let now = Local::now();
    let mut task = Task::new(title, now);

    task.project_id = Some(match args.project.as_deref() {
        Some(name) => find_project(store, name)?.id,
        None => INBOX_PROJECT_ID,
    });
    if let Some(p) = args.priority.as_deref() {
        task.priority = Priority::parse(p)?;
    }
    if let Some(due) = args.due.as_deref() {
        task.due_date = Some(dates::end_of_day(dates::parse_due_date(
            due,
            now.date_naive(),
        )?));
    }
    if let Some(desc) = args.description {
        task.description = desc;
    }
    let repeat = args.repeat.as_deref().map(parse_repeat).transpose()?;

    let created = store.create_task(&task)?;
    for name in &args.tags {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        let tag = match store.get_tag_by_name(name)? {
            Some(tag) => tag,
            None => store.create_tag(name, DEFAULT_TAG_COLOR)?,
        };
        store.add_tag_to_task(created.id, tag.id)?;
    }
    if let Some((pattern, interval)) = repeat {
        let from = created.due_date.unwrap_or(now);
        let next = recurrence::calculate_next_due(pattern, interval, &from);
        store.set_recurrence(&Recurrence::new(created.id, pattern, interval, next))?;
    }

    println!("Created task #{}: {}", created.id, created.title);
    Ok(())
}

fn cmd_list(store: &SqliteStore, args: ListArgs, json: bool) -> CmdResult {
    let status = args.status.as_deref().map(Status::parse).transpose()?;
    let mut filter = TaskFilter {
        status,
        search: args.search.clone(),
        ..TaskFilter::default()
    };
    if let Some(name) = args.project.as_deref() {
        filter.project_id = Some(find_project(store, name)?.id);
    }
    if let Some(name) = args.tag.as_deref() {
        match store.get_tag_by_name(name.trim())? {
            Some(tag) => filter.tag_ids.push(tag.id),
            None => return Err(format!("tag not found: {}", name.trim()).into()),
        }
    }

    let mut tasks = store.list_tasks(&filter)?;
    if !args.all && status.is_none() {
        tasks.retain(|t| !t.is_done());
    }
    let projects = store.list_projects()?;

    if json {
        let items: Vec<TaskJson> = tasks.iter().map(|t| task_to_json(t, &projects)).collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        for line in format_task_table(&tasks, &projects, Local::now().date_naive()) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_done(store: &SqliteStore, id: i64) -> CmdResult {
    let completion = store.complete_task(id, Local::now())?;
    match completion.spawned {
        Some(next) => {
            let due = next
                .due_date
                .map(|d| d.format(dates::SHORT_DATE).to_string())
                .unwrap_or_default();
            println!(
                "Completed task #{}: {} (next occurrence created: #{} due {})",
                completion.task.id, completion.task.title, next.id, due
            );
        }
        None => println!(
            "Completed task #{}: {}",
            completion.task.id, completion.task.title
        ),
    }
    Ok(())
}

fn cmd_doing(store: &SqliteStore, id: i64) -> CmdResult {
    let mut task = store.get_task(id)?;
    task.set_status(Status::Doing, Local::now());
    store.update_task(&task)?;
    println!("Started task #{}: {}", task.id, task.title);
    Ok(())
}

fn cmd_rm(store: &SqliteStore, args: RmArgs) -> CmdResult {
    let task = store.get_task(args.id)?;
    if !args.force && !confirm(&format!("Delete task #{}: {}? [y/N] ", task.id, task.title))? {
        println!("Cancelled.");
        return Ok(());
    }
    store.delete_task(task.id)?;
    println!("Deleted task #{}: {}", task.id, task.title);
    Ok(())
}

// ---------------------------------------------------------------------------
// Project commands
// ---------------------------------------------------------------------------

fn cmd_project_list(store: &SqliteStore, json: bool) -> CmdResult {
    let projects = store.list_projects()?;
    if json {
        let items: Vec<ProjectJson> = projects.iter().map(project_to_json).collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        for line in format_project_table(&projects) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_project_add(store: &SqliteStore, args: ProjectAddArgs) -> CmdResult {
    let name = args.name.join(" ");
    let project = store.create_project(name.trim(), &args.description)?;
    println!("Created project #{}: {}", project.id, project.name);
    Ok(())
}

fn cmd_project_rm(store: &SqliteStore, name: &str) -> CmdResult {
    let project = find_project(store, name)?;
    store.delete_project(project.id)?;
    println!("Deleted project: {} (tasks moved to Inbox)", project.name);
    Ok(())
}

// ---------------------------------------------------------------------------
// Tag commands
// ---------------------------------------------------------------------------

fn cmd_tag_list(store: &SqliteStore, json: bool) -> CmdResult {
    let tags = store.list_tags()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&tags)?);
    } else {
        for line in format_tag_table(&tags) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_tag_add(store: &SqliteStore, args: TagAddArgs) -> CmdResult {
    let color = args.color.as_deref().unwrap_or(DEFAULT_TAG_COLOR);
    let tag = store.create_tag(args.name.trim(), color)?;
    println!("Created tag #{}: {}", tag.id, tag.name);
    Ok(())
}

fn cmd_tag_rm(store: &SqliteStore, args: TagRmArgs) -> CmdResult {
    let name = args.name.trim();
    let tag = store
        .get_tag_by_name(name)?
        .ok_or_else(|| format!("tag not found: {}", name))?;
    if !args.force && !confirm(&format!("Delete tag '{}'? [y/N] ", tag.name))? {
        println!("Cancelled.");
        return Ok(());
    }
    store.delete_tag(tag.id)?;
    println!("Deleted tag: {}", tag.name);
    Ok(())
}

// ---------------------------------------------------------------------------
// Recurrence commands
// ---------------------------------------------------------------------------

fn cmd_recurrence_rm(store: &SqliteStore, task_id: i64) -> CmdResult {
    let task = store.get_task(task_id)?;
    if store.get_recurrence(task.id)?.is_none() {
        return Err(format!("task #{} has no recurrence", task.id).into());
    }
    store.delete_recurrence(task.id)?;
    println!("Removed recurrence from task #{}: {}", task.id, task.title);
    Ok(())
}
