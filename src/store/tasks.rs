use rusqlite::{Connection, OptionalExtension, Row, ToSql, params};
use tracing::debug;

use super::{StoreError, TaskFilter, recurrences, tags};
use crate::model::Task;

const TASK_COLUMNS: &str = "t.id, t.project_id, t.parent_id, t.title, t.description, \
     t.status, t.priority, t.due_date, t.created_at, t.completed_at, t.position";

fn parse_row(row: &Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        project_id: row.get(1)?,
        parent_id: row.get(2)?,
        title: row.get(3)?,
        description: row.get(4)?,
        status: row.get(5)?,
        priority: row.get(6)?,
        due_date: row.get(7)?,
        created_at: row.get(8)?,
        completed_at: row.get(9)?,
        position: row.get(10)?,
        tags: Vec::new(),
        recurrence: None,
    })
}

/// Fill in the joined associations of a freshly scanned task
fn hydrate(conn: &Connection, mut task: Task) -> Result<Task, StoreError> {
    task.tags = tags::for_task(conn, task.id)?;
    task.recurrence = recurrences::get_for_task(conn, task.id)?;
    Ok(task)
}

pub(super) fn insert(conn: &Connection, task: &Task) -> Result<Task, StoreError> {
    conn.execute(
        "INSERT INTO tasks (project_id, parent_id, title, description, status, priority,
                            due_date, created_at, completed_at, position)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            task.project_id,
            task.parent_id,
            task.title,
            task.description,
            task.status,
            task.priority,
            task.due_date,
            task.created_at,
            task.completed_at,
            task.position,
        ],
    )?;
    let id = conn.last_insert_rowid();
    debug!(task_id = id, title = %task.title, "task inserted");
    get(conn, id)
}

pub(super) fn get(conn: &Connection, id: i64) -> Result<Task, StoreError> {
    let sql = format!("SELECT {TASK_COLUMNS} FROM tasks t WHERE t.id = ?1");
    let task = conn
        .query_row(&sql, params![id], parse_row)
        .optional()?
        .ok_or(StoreError::NotFound { kind: "task", id })?;
    hydrate(conn, task)
}

pub(super) fn list(conn: &Connection, filter: &TaskFilter) -> Result<Vec<Task>, StoreError> {
    let mut conditions: Vec<String> = Vec::new();
    let mut values: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(project_id) = filter.project_id {
        conditions.push("t.project_id = ?".into());
        values.push(Box::new(project_id));
    }
    if let Some(status) = filter.status {
        conditions.push("t.status = ?".into());
        values.push(Box::new(status));
    }
    if let Some(parent_id) = filter.parent_id {
        conditions.push("t.parent_id = ?".into());
        values.push(Box::new(parent_id));
    } else if !filter.include_subtasks {
        conditions.push("t.parent_id IS NULL".into());
    }
    match filter.has_due {
        Some(true) => conditions.push("t.due_date IS NOT NULL".into()),
        Some(false) => conditions.push("t.due_date IS NULL".into()),
        None => {}
    }
    if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
        conditions.push(
            "(t.title LIKE ? ESCAPE '\\' OR t.description LIKE ? ESCAPE '\\')".into(),
        );
        let pattern = format!("%{}%", escape_like(search));
        values.push(Box::new(pattern.clone()));
        values.push(Box::new(pattern));
    }
    if !filter.tag_ids.is_empty() {
        let placeholders = vec!["?"; filter.tag_ids.len()].join(", ");
        conditions.push(format!(
            "EXISTS (SELECT 1 FROM task_tags tt WHERE tt.task_id = t.id AND tt.tag_id IN ({placeholders}))"
        ));
        for tag_id in &filter.tag_ids {
            values.push(Box::new(*tag_id));
        }
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };
    let mut sql = format!(
        "SELECT {TASK_COLUMNS} FROM tasks t {where_clause}
         ORDER BY t.position ASC, t.created_at DESC, t.id DESC"
    );
    if let Some(limit) = filter.limit {
        sql.push_str(" LIMIT ?");
        values.push(Box::new(limit as i64));
    }

    let params: Vec<&dyn ToSql> = values.iter().map(AsRef::as_ref).collect();
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params.as_slice(), parse_row)?
        .collect::<Result<Vec<_>, _>>()?;
    rows.into_iter().map(|task| hydrate(conn, task)).collect()
}

/// Make `%`, `_` and `\` match literally under `ESCAPE '\'`
fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

pub(super) fn update(conn: &Connection, task: &Task) -> Result<(), StoreError> {
    let changed = conn.execute(
        "UPDATE tasks SET project_id = ?1, parent_id = ?2, title = ?3, description = ?4,
                          status = ?5, priority = ?6, due_date = ?7, completed_at = ?8,
                          position = ?9
         WHERE id = ?10",
        params![
            task.project_id,
            task.parent_id,
            task.title,
            task.description,
            task.status,
            task.priority,
            task.due_date,
            task.completed_at,
            task.position,
            task.id,
        ],
    )?;
    if changed == 0 {
        return Err(StoreError::NotFound {
            kind: "task",
            id: task.id,
        });
    }
    Ok(())
}

pub(super) fn delete(conn: &Connection, id: i64) -> Result<(), StoreError> {
    let changed = conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
    if changed == 0 {
        return Err(StoreError::NotFound { kind: "task", id });
    }
    debug!(task_id = id, "task deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::escape_like;
    use crate::model::{Priority, Status, Task};
    use crate::store::{Gateway, SqliteStore, TaskFilter};
    use chrono::{Duration, Local};
    use pretty_assertions::assert_eq;

    fn store() -> SqliteStore {
        SqliteStore::open_in_memory().unwrap()
    }

    fn add(store: &SqliteStore, title: &str) -> Task {
        store.create_task(&Task::new(title, Local::now())).unwrap()
    }

    fn titles(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.title.as_str()).collect()
    }

    #[test]
    fn test_create_and_get() {
        let store = store();
        let mut task = Task::new("Write report", Local::now());
        task.priority = Priority::High;
        task.description = "quarterly numbers".into();
        let created = store.create_task(&task).unwrap();
        assert!(created.id > 0);

        let fetched = store.get_task(created.id).unwrap();
        assert_eq!(fetched.title, "Write report");
        assert_eq!(fetched.priority, Priority::High);
        assert_eq!(fetched.status, Status::Todo);
        assert_eq!(fetched.description, "quarterly numbers");
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let err = store().get_task(99).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "task not found: 99");
    }

    #[test]
    fn test_update_and_delete() {
        let store = store();
        let mut task = add(&store, "Draft");
        task.title = "Final".into();
        task.set_status(Status::Done, Local::now());
        store.update_task(&task).unwrap();

        let fetched = store.get_task(task.id).unwrap();
        assert_eq!(fetched.title, "Final");
        assert!(fetched.completed_at.is_some());

        store.delete_task(task.id).unwrap();
        assert!(store.get_task(task.id).unwrap_err().is_not_found());
        assert!(store.delete_task(task.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_list_orders_by_position_then_newest() {
        let store = store();
        let now = Local::now();
        let mut old = Task::new("old", now - Duration::minutes(5));
        old.position = 0;
        let mut new = Task::new("new", now);
        new.position = 0;
        let mut pinned = Task::new("later position", now);
        pinned.position = 1;
        store.create_task(&pinned).unwrap();
        store.create_task(&old).unwrap();
        store.create_task(&new).unwrap();

        let tasks = store.list_tasks(&TaskFilter::default()).unwrap();
        assert_eq!(titles(&tasks), vec!["new", "old", "later position"]);
    }

    #[test]
    fn test_list_hides_subtasks_by_default() {
        let store = store();
        let parent = add(&store, "parent");
        let mut child = Task::new("child", Local::now());
        child.parent_id = Some(parent.id);
        store.create_task(&child).unwrap();

        let top = store.list_tasks(&TaskFilter::default()).unwrap();
        assert_eq!(titles(&top), vec!["parent"]);

        let children = store
            .list_tasks(&TaskFilter {
                parent_id: Some(parent.id),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(titles(&children), vec!["child"]);

        let all = store
            .list_tasks(&TaskFilter {
                include_subtasks: true,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_list_search_matches_title_and_description() {
        let store = store();
        add(&store, "Buy milk");
        let mut t = Task::new("Errands", Local::now());
        t.description = "pick up MILK and bread".into();
        store.create_task(&t).unwrap();
        add(&store, "Call mom");

        let found = store
            .list_tasks(&TaskFilter {
                search: Some("milk".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_list_search_is_literal() {
        let store = store();
        add(&store, "50% off coupons");
        add(&store, "500 word essay");
        add(&store, "rename file_name");
        add(&store, "filename cleanup");

        let search = |q: &str| {
            store
                .list_tasks(&TaskFilter {
                    search: Some(q.into()),
                    ..Default::default()
                })
                .unwrap()
                .into_iter()
                .map(|t| t.title)
                .collect::<Vec<_>>()
        };
        assert_eq!(search("50%"), vec!["50% off coupons"]);
        assert_eq!(search("file_name"), vec!["rename file_name"]);
        assert!(search("\\").is_empty());
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("a%b_c\\d"), "a\\%b\\_c\\\\d");
        assert_eq!(escape_like("milk"), "milk");
    }

    #[test]
    fn test_list_by_status_project_and_tags() {
        let store = store();
        let work = store.create_project("Work", "").unwrap();
        let urgent = store.create_tag("urgent", "#ff0000").unwrap();
        let home = store.create_tag("home", "#00ff00").unwrap();

        let mut a = Task::new("a", Local::now());
        a.project_id = Some(work.id);
        let a = store.create_task(&a).unwrap();
        let b = add(&store, "b");
        let c = add(&store, "c");
        store.add_tag_to_task(a.id, urgent.id).unwrap();
        store.add_tag_to_task(b.id, home.id).unwrap();
        store.add_tag_to_task(b.id, urgent.id).unwrap();

        let mut done = store.get_task(c.id).unwrap();
        done.set_status(Status::Done, Local::now());
        store.update_task(&done).unwrap();

        let in_work = store
            .list_tasks(&TaskFilter {
                project_id: Some(work.id),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(titles(&in_work), vec!["a"]);

        let mut tagged = store
            .list_tasks(&TaskFilter {
                tag_ids: vec![urgent.id, home.id],
                ..Default::default()
            })
            .unwrap();
        tagged.sort_by_key(|t| t.id);
        assert_eq!(titles(&tagged), vec!["a", "b"]);

        let finished = store
            .list_tasks(&TaskFilter {
                status: Some(Status::Done),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(titles(&finished), vec!["c"]);

        let limited = store
            .list_tasks(&TaskFilter {
                limit: Some(1),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[test]
    fn test_reads_include_tags_and_recurrence() {
        use crate::model::{Pattern, Recurrence};
        let store = store();
        let task = add(&store, "water plants");
        let tag = store.create_tag("home", "#00ff00").unwrap();
        store.add_tag_to_task(task.id, tag.id).unwrap();
        store
            .set_recurrence(&Recurrence::new(task.id, Pattern::Weekly, 1, Local::now()))
            .unwrap();

        let fetched = store.get_task(task.id).unwrap();
        assert_eq!(fetched.tags, vec![tag]);
        assert_eq!(
            fetched.recurrence.map(|r| r.pattern),
            Some(Pattern::Weekly)
        );
    }
}
