mod projects;
mod recurrences;
mod tags;
mod tasks;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::{Connection, ToSql, params};
use tracing::{debug, info};

use crate::model::{INBOX_PROJECT_ID, Pattern, Priority, Project, Recurrence, Status, Tag, Task};
use crate::ops::recurrence::{self, Completion};

/// Current schema version written to `schema_version`
const SCHEMA_VERSION: i64 = 1;

const SCHEMA_V1: &str = include_str!("schema.sql");

/// Errors surfaced by the persistence gateway
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: i64 },
    #[error("{0}")]
    Constraint(String),
    #[error("{0}")]
    Validation(String),
    #[error("database error: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error("cannot create {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl StoreError {
    /// True when the failure is a missing record rather than a storage problem
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Selection criteria for [`Gateway::list_tasks`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    pub project_id: Option<i64>,
    pub status: Option<Status>,
    /// Children of this task only. Without it only top-level tasks are listed
    /// unless `include_subtasks` is set.
    pub parent_id: Option<i64>,
    pub include_subtasks: bool,
    pub has_due: Option<bool>,
    /// Substring matched against title and description
    pub search: Option<String>,
    /// Match tasks carrying any of these tags
    pub tag_ids: Vec<i64>,
    pub limit: Option<usize>,
}

/// The storage verbs the tracker depends on.
///
/// Implementations must be safe for sequential, non-overlapping calls. All
/// reads of tasks populate their tags and recurrence.
pub trait Gateway {
    fn create_task(&self, task: &Task) -> Result<Task, StoreError>;
    fn get_task(&self, id: i64) -> Result<Task, StoreError>;
    fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, StoreError>;
    fn update_task(&self, task: &Task) -> Result<(), StoreError>;
    fn delete_task(&self, id: i64) -> Result<(), StoreError>;

    fn create_project(&self, name: &str, description: &str) -> Result<Project, StoreError>;
    fn get_project(&self, id: i64) -> Result<Project, StoreError>;
    fn list_projects(&self) -> Result<Vec<Project>, StoreError>;
    /// Moves the project's tasks to the Inbox, then deletes it. The Inbox
    /// itself is refused.
    fn delete_project(&self, id: i64) -> Result<(), StoreError>;

    fn create_tag(&self, name: &str, color: &str) -> Result<Tag, StoreError>;
    fn get_tag_by_name(&self, name: &str) -> Result<Option<Tag>, StoreError>;
    fn list_tags(&self) -> Result<Vec<Tag>, StoreError>;
    fn delete_tag(&self, id: i64) -> Result<(), StoreError>;
    fn add_tag_to_task(&self, task_id: i64, tag_id: i64) -> Result<(), StoreError>;
    fn remove_tag_from_task(&self, task_id: i64, tag_id: i64) -> Result<(), StoreError>;

    /// Insert or replace the recurrence keyed by its task.
    fn set_recurrence(&self, rec: &Recurrence) -> Result<Recurrence, StoreError>;
    fn get_recurrence(&self, task_id: i64) -> Result<Option<Recurrence>, StoreError>;
    fn delete_recurrence(&self, task_id: i64) -> Result<(), StoreError>;
    fn list_recurrences(&self) -> Result<Vec<Recurrence>, StoreError>;

    /// Mark a task done and spawn its successor when it recurs.
    fn complete_task(&self, id: i64, now: DateTime<Local>) -> Result<Completion, StoreError> {
        recurrence::complete_task_with_recurrence(self, id, now)
    }
}

// ---------------------------------------------------------------------------
// SQLite implementation
// ---------------------------------------------------------------------------

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `path` and migrate it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
        {
            std::fs::create_dir_all(dir).map_err(|source| StoreError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        let conn = Connection::open(&path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        let store = SqliteStore { conn };
        store.migrate()?;
        Ok(store)
    }

    /// A private database that disappears with the connection
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let store = SqliteStore {
            conn: Connection::open_in_memory()?,
        };
        store.migrate()?;
        Ok(store)
    }

    fn schema_version(&self) -> Result<i64, StoreError> {
        let version: Option<i64> =
            self.conn
                .query_row("SELECT MAX(version) FROM schema_version", [], |row| {
                    row.get(0)
                })?;
        Ok(version.unwrap_or(0))
    }

    fn migrate(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            r#"
            PRAGMA foreign_keys=ON;

            CREATE TABLE IF NOT EXISTS schema_version (
              version INTEGER NOT NULL
            );
            "#,
        )?;

        let version = self.schema_version()?;
        if version < 1 {
            let tx = self.conn.unchecked_transaction()?;
            tx.execute_batch(SCHEMA_V1)?;
            tx.execute(
                "INSERT OR IGNORE INTO projects (id, name, description, created_at)
                 VALUES (?1, 'Inbox', 'Default project', ?2)",
                params![INBOX_PROJECT_ID, Local::now()],
            )?;
            tx.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![SCHEMA_VERSION],
            )?;
            tx.commit()?;
            info!(version = SCHEMA_VERSION, "database schema created");
        } else {
            debug!(version, "database schema up to date");
        }
        Ok(())
    }
}

impl Gateway for SqliteStore {
    fn create_task(&self, task: &Task) -> Result<Task, StoreError> {
        tasks::insert(&self.conn, task)
    }

    fn get_task(&self, id: i64) -> Result<Task, StoreError> {
        tasks::get(&self.conn, id)
    }

    fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, StoreError> {
        tasks::list(&self.conn, filter)
    }

    fn update_task(&self, task: &Task) -> Result<(), StoreError> {
        tasks::update(&self.conn, task)
    }

    fn delete_task(&self, id: i64) -> Result<(), StoreError> {
        tasks::delete(&self.conn, id)
    }

    fn create_project(&self, name: &str, description: &str) -> Result<Project, StoreError> {
        projects::insert(&self.conn, name, description)
    }

    fn get_project(&self, id: i64) -> Result<Project, StoreError> {
        projects::get(&self.conn, id)
    }

    fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
        projects::list(&self.conn)
    }

    fn delete_project(&self, id: i64) -> Result<(), StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        projects::delete(&tx, id)?;
        tx.commit()?;
        Ok(())
    }

    fn create_tag(&self, name: &str, color: &str) -> Result<Tag, StoreError> {
        tags::insert(&self.conn, name, color)
    }

    fn get_tag_by_name(&self, name: &str) -> Result<Option<Tag>, StoreError> {
        tags::get_by_name(&self.conn, name)
    }

    fn list_tags(&self) -> Result<Vec<Tag>, StoreError> {
        tags::list(&self.conn)
    }

    fn delete_tag(&self, id: i64) -> Result<(), StoreError> {
        tags::delete(&self.conn, id)
    }

    fn add_tag_to_task(&self, task_id: i64, tag_id: i64) -> Result<(), StoreError> {
        tags::attach(&self.conn, task_id, tag_id)
    }

    fn remove_tag_from_task(&self, task_id: i64, tag_id: i64) -> Result<(), StoreError> {
        tags::detach(&self.conn, task_id, tag_id)
    }

    fn set_recurrence(&self, rec: &Recurrence) -> Result<Recurrence, StoreError> {
        recurrences::upsert(&self.conn, rec)
    }

    fn get_recurrence(&self, task_id: i64) -> Result<Option<Recurrence>, StoreError> {
        recurrences::get_for_task(&self.conn, task_id)
    }

    fn delete_recurrence(&self, task_id: i64) -> Result<(), StoreError> {
        recurrences::delete_for_task(&self.conn, task_id)
    }

    fn list_recurrences(&self) -> Result<Vec<Recurrence>, StoreError> {
        recurrences::list(&self.conn)
    }

    /// Runs the whole completion in one transaction, so a failure while
    /// spawning the successor also rolls back the status change.
    fn complete_task(&self, id: i64, now: DateTime<Local>) -> Result<Completion, StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        let completion = recurrence::complete_task_with_recurrence(self, id, now)?;
        tx.commit()?;
        Ok(completion)
    }
}

// ---------------------------------------------------------------------------
// Column conversions
// ---------------------------------------------------------------------------

impl ToSql for Status {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Status {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        Status::parse(s).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

impl ToSql for Priority {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_i64()))
    }
}

impl FromSql for Priority {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let n = value.as_i64()?;
        Priority::from_i64(n).ok_or(FromSqlError::OutOfRange(n))
    }
}

impl ToSql for Pattern {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Pattern {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        Pattern::parse(s).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// Map a UNIQUE/CHECK violation to a readable constraint error.
fn constraint_violation(err: rusqlite::Error, message: impl FnOnce() -> String) -> StoreError {
    match err {
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation => {
            StoreError::Constraint(message())
        }
        other => StoreError::Sql(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_directory_and_seeds_inbox() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/dir/tsk.db");
        let store = SqliteStore::open(&path).unwrap();
        assert!(path.exists());
        let projects = store.list_projects().unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].id, INBOX_PROJECT_ID);
        assert_eq!(projects[0].name, "Inbox");
    }

    #[test]
    fn test_reopen_does_not_reseed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tsk.db");
        {
            let store = SqliteStore::open(&path).unwrap();
            store.create_project("Work", "").unwrap();
        }
        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.schema_version().unwrap(), SCHEMA_VERSION);
        let names: Vec<String> = store
            .list_projects()
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Inbox".to_string(), "Work".to_string()]);
    }

    #[test]
    fn test_complete_rolls_back_when_successor_fails() {
        use crate::model::Recurrence;

        let store = SqliteStore::open_in_memory().unwrap();
        let task = store.create_task(&Task::new("rent", Local::now())).unwrap();
        store
            .set_recurrence(&Recurrence::new(task.id, Pattern::Monthly, 1, Local::now()))
            .unwrap();
        store
            .conn
            .execute_batch(
                "CREATE TRIGGER no_repoint BEFORE UPDATE ON recurrences
                 BEGIN SELECT RAISE(ABORT, 'repoint refused'); END;",
            )
            .unwrap();

        assert!(store.complete_task(task.id, Local::now()).is_err());

        let after = store.get_task(task.id).unwrap();
        assert_eq!(after.status, Status::Todo);
        assert_eq!(after.completed_at, None);
        assert_eq!(store.list_tasks(&TaskFilter::default()).unwrap().len(), 1);
        assert!(store.get_recurrence(task.id).unwrap().is_some());
    }
}
