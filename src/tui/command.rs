use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Local};
use tracing::{debug, warn};

use super::message::Msg;
use crate::io::config_io;
use crate::model::{Config, DEFAULT_TAG_COLOR, Recurrence, Task};
use crate::store::{Gateway, StoreError, TaskFilter};

/// Side effect requested by a state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Store(StoreCommand),
    SaveConfig(Config),
    /// Send `Msg::ClearStatus(generation)` once `after` has elapsed
    ClearStatus { generation: u64, after: Duration },
}

/// A unit of work against the gateway
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCommand {
    LoadTasks(TaskFilter),
    LoadProjects,
    LoadTags,
    CreateTask(Task),
    UpdateTask(Task),
    CompleteTask { id: i64, now: DateTime<Local> },
    DeleteTask(i64),
    CreateProject { name: String, description: String },
    DeleteProject(i64),
    /// Create a tag, attaching it to a task when one is given
    CreateTag { name: String, attach_to: Option<i64> },
    DeleteTag(i64),
    AddTag { task_id: i64, tag_id: i64 },
    RemoveTag { task_id: i64, tag_id: i64 },
    SetRecurrence(Recurrence),
    DeleteRecurrence(i64),
}

impl From<StoreCommand> for Command {
    fn from(cmd: StoreCommand) -> Self {
        Command::Store(cmd)
    }
}

// ---------------------------------------------------------------------------
// Execution
// ---------------------------------------------------------------------------

/// Run one store command to completion. Every outcome, success or failure,
/// becomes exactly one message.
pub fn execute(gw: &dyn Gateway, cmd: StoreCommand) -> Msg {
    debug!(?cmd, "executing store command");
    match run(gw, cmd) {
        Ok(msg) => msg,
        Err(err) => {
            warn!(error = %err, "store command failed");
            Msg::Error(err.to_string())
        }
    }
}

fn run(gw: &dyn Gateway, cmd: StoreCommand) -> Result<Msg, StoreError> {
    let msg = match cmd {
        StoreCommand::LoadTasks(filter) => Msg::TasksLoaded(gw.list_tasks(&filter)?),
        StoreCommand::LoadProjects => Msg::ProjectsLoaded(gw.list_projects()?),
        StoreCommand::LoadTags => Msg::TagsLoaded(gw.list_tags()?),
        StoreCommand::CreateTask(task) => Msg::TaskCreated(gw.create_task(&task)?),
        StoreCommand::UpdateTask(task) => {
            gw.update_task(&task)?;
            Msg::TaskUpdated(gw.get_task(task.id)?)
        }
        StoreCommand::CompleteTask { id, now } => Msg::TaskCompleted(gw.complete_task(id, now)?),
        StoreCommand::DeleteTask(id) => {
            gw.delete_task(id)?;
            Msg::TaskDeleted(id)
        }
        StoreCommand::CreateProject { name, description } => {
            Msg::ProjectCreated(gw.create_project(&name, &description)?)
        }
        StoreCommand::DeleteProject(id) => {
            gw.delete_project(id)?;
            Msg::ProjectDeleted(id)
        }
        StoreCommand::CreateTag { name, attach_to } => {
            let tag = gw.create_tag(&name, DEFAULT_TAG_COLOR)?;
            if let Some(task_id) = attach_to {
                gw.add_tag_to_task(task_id, tag.id)?;
            }
            Msg::TagCreated(tag)
        }
        StoreCommand::DeleteTag(id) => {
            gw.delete_tag(id)?;
            Msg::TagDeleted(id)
        }
        StoreCommand::AddTag { task_id, tag_id } => {
            gw.add_tag_to_task(task_id, tag_id)?;
            Msg::TaskUpdated(gw.get_task(task_id)?)
        }
        StoreCommand::RemoveTag { task_id, tag_id } => {
            gw.remove_tag_from_task(task_id, tag_id)?;
            Msg::TaskUpdated(gw.get_task(task_id)?)
        }
        StoreCommand::SetRecurrence(rec) => Msg::RecurrenceSet(gw.set_recurrence(&rec)?),
        StoreCommand::DeleteRecurrence(task_id) => {
            gw.delete_recurrence(task_id)?;
            Msg::RecurrenceDeleted(task_id)
        }
    };
    Ok(msg)
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Runs each command on its own thread and reports back over a channel.
///
/// The control loop never waits on a command; results arrive as `Msg`s in
/// whatever order the threads finish.
pub struct Dispatcher {
    store: Arc<Mutex<dyn Gateway + Send>>,
    config_path: PathBuf,
    tx: Sender<Msg>,
}

impl Dispatcher {
    pub fn new(store: Arc<Mutex<dyn Gateway + Send>>, config_path: PathBuf, tx: Sender<Msg>) -> Self {
        Dispatcher {
            store,
            config_path,
            tx,
        }
    }

    pub fn dispatch(&self, cmd: Command) {
        let tx = self.tx.clone();
        match cmd {
            Command::ClearStatus { generation, after } => {
                thread::spawn(move || {
                    thread::sleep(after);
                    let _ = tx.send(Msg::ClearStatus(generation));
                });
            }
            Command::SaveConfig(config) => {
                let path = self.config_path.clone();
                thread::spawn(move || {
                    let msg = match config_io::save_config(&path, &config) {
                        Ok(()) => Msg::ConfigSaved,
                        Err(err) => Msg::Error(format!("Failed to save config: {}", err)),
                    };
                    let _ = tx.send(msg);
                });
            }
            Command::Store(cmd) => {
                let store = Arc::clone(&self.store);
                thread::spawn(move || {
                    // Send under the lock so results arrive in the order the
                    // store saw them; the receiver is gone once the UI exits
                    match store.lock() {
                        Ok(gw) => {
                            let _ = tx.send(execute(&*gw, cmd));
                        }
                        Err(_) => {
                            let _ = tx.send(Msg::Error("database is unavailable".into()));
                        }
                    }
                });
            }
        }
    }
}
