use chrono::Local;
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::info;

use super::StoreError;
use crate::model::{INBOX_PROJECT_ID, Project};

const PROJECT_QUERY: &str = "
    SELECT p.id, p.name, p.description, p.created_at,
           COUNT(t.id),
           SUM(CASE WHEN t.status = 'done' THEN 1 ELSE 0 END)
    FROM projects p
    LEFT JOIN tasks t ON p.id = t.project_id AND t.parent_id IS NULL";

fn parse_row(row: &Row) -> rusqlite::Result<Project> {
    let done: Option<i64> = row.get(5)?;
    Ok(Project {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        created_at: row.get(3)?,
        task_count: row.get(4)?,
        done_count: done.unwrap_or(0),
    })
}

pub(super) fn insert(conn: &Connection, name: &str, description: &str) -> Result<Project, StoreError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(StoreError::Validation("project name is required".into()));
    }
    conn.execute(
        "INSERT INTO projects (name, description, created_at) VALUES (?1, ?2, ?3)",
        params![name, description.trim(), Local::now()],
    )?;
    get(conn, conn.last_insert_rowid())
}

pub(super) fn get(conn: &Connection, id: i64) -> Result<Project, StoreError> {
    let sql = format!("{PROJECT_QUERY} WHERE p.id = ?1 GROUP BY p.id");
    conn.query_row(&sql, params![id], parse_row)
        .optional()?
        .ok_or(StoreError::NotFound {
            kind: "project",
            id,
        })
}

pub(super) fn list(conn: &Connection) -> Result<Vec<Project>, StoreError> {
    let sql = format!("{PROJECT_QUERY} GROUP BY p.id ORDER BY p.id");
    let mut stmt = conn.prepare(&sql)?;
    let projects = stmt
        .query_map([], parse_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(projects)
}

pub(super) fn delete(conn: &Connection, id: i64) -> Result<(), StoreError> {
    if id == INBOX_PROJECT_ID {
        return Err(StoreError::Constraint(
            "cannot delete the Inbox project".into(),
        ));
    }
    let moved = conn.execute(
        "UPDATE tasks SET project_id = ?1 WHERE project_id = ?2",
        params![INBOX_PROJECT_ID, id],
    )?;
    let changed = conn.execute("DELETE FROM projects WHERE id = ?1", params![id])?;
    if changed == 0 {
        return Err(StoreError::NotFound {
            kind: "project",
            id,
        });
    }
    info!(project_id = id, moved, "project deleted, tasks moved to inbox");
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::model::{INBOX_PROJECT_ID, Status, Task};
    use crate::store::{Gateway, SqliteStore, StoreError, TaskFilter};
    use chrono::Local;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_counts_cover_top_level_tasks() {
        let store = SqliteStore::open_in_memory().unwrap();
        let work = store.create_project("Work", "day job").unwrap();
        assert_eq!((work.task_count, work.done_count), (0, 0));

        let mut a = Task::new("a", Local::now());
        a.project_id = Some(work.id);
        let a = store.create_task(&a).unwrap();
        let mut b = Task::new("b", Local::now());
        b.project_id = Some(work.id);
        b.set_status(Status::Done, Local::now());
        store.create_task(&b).unwrap();
        let mut sub = Task::new("sub", Local::now());
        sub.project_id = Some(work.id);
        sub.parent_id = Some(a.id);
        store.create_task(&sub).unwrap();

        let work = store.get_project(work.id).unwrap();
        assert_eq!(work.description, "day job");
        assert_eq!((work.task_count, work.done_count), (2, 1));
    }

    #[test]
    fn test_delete_moves_tasks_to_inbox() {
        let store = SqliteStore::open_in_memory().unwrap();
        let errands = store.create_project("Errands", "").unwrap();
        let mut t = Task::new("Buy stamps", Local::now());
        t.project_id = Some(errands.id);
        let t = store.create_task(&t).unwrap();

        store.delete_project(errands.id).unwrap();

        assert!(store.get_project(errands.id).unwrap_err().is_not_found());
        let moved = store.get_task(t.id).unwrap();
        assert_eq!(moved.project_id, Some(INBOX_PROJECT_ID));
        let inbox = store
            .list_tasks(&TaskFilter {
                project_id: Some(INBOX_PROJECT_ID),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(inbox.len(), 1);
    }

    #[test]
    fn test_inbox_cannot_be_deleted() {
        let store = SqliteStore::open_in_memory().unwrap();
        let err = store.delete_project(INBOX_PROJECT_ID).unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));
        assert_eq!(store.list_projects().unwrap().len(), 1);
    }

    #[test]
    fn test_blank_name_rejected() {
        let store = SqliteStore::open_in_memory().unwrap();
        let err = store.create_project("   ", "").unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }
}
