use rusqlite::{Connection, OptionalExtension, Row, params};

use super::{StoreError, constraint_violation};
use crate::model::{DEFAULT_TAG_COLOR, Tag};

fn parse_row(row: &Row) -> rusqlite::Result<Tag> {
    Ok(Tag {
        id: row.get(0)?,
        name: row.get(1)?,
        color: row.get(2)?,
    })
}

pub(super) fn insert(conn: &Connection, name: &str, color: &str) -> Result<Tag, StoreError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(StoreError::Validation("tag name is required".into()));
    }
    let color = if color.trim().is_empty() {
        DEFAULT_TAG_COLOR
    } else {
        color.trim()
    };
    conn.execute(
        "INSERT INTO tags (name, color) VALUES (?1, ?2)",
        params![name, color],
    )
    .map_err(|e| constraint_violation(e, || format!("tag already exists: {}", name)))?;
    Ok(Tag {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
        color: color.to_string(),
    })
}

pub(super) fn get_by_name(conn: &Connection, name: &str) -> Result<Option<Tag>, StoreError> {
    let tag = conn
        .query_row(
            "SELECT id, name, color FROM tags WHERE name = ?1",
            params![name.trim()],
            parse_row,
        )
        .optional()?;
    Ok(tag)
}

pub(super) fn list(conn: &Connection) -> Result<Vec<Tag>, StoreError> {
    let mut stmt = conn.prepare("SELECT id, name, color FROM tags ORDER BY name")?;
    let tags = stmt
        .query_map([], parse_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tags)
}

pub(super) fn for_task(conn: &Connection, task_id: i64) -> Result<Vec<Tag>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT g.id, g.name, g.color FROM tags g
         JOIN task_tags tt ON tt.tag_id = g.id
         WHERE tt.task_id = ?1
         ORDER BY g.name",
    )?;
    let tags = stmt
        .query_map(params![task_id], parse_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tags)
}

pub(super) fn delete(conn: &Connection, id: i64) -> Result<(), StoreError> {
    let changed = conn.execute("DELETE FROM tags WHERE id = ?1", params![id])?;
    if changed == 0 {
        return Err(StoreError::NotFound { kind: "tag", id });
    }
    Ok(())
}

pub(super) fn attach(conn: &Connection, task_id: i64, tag_id: i64) -> Result<(), StoreError> {
    conn.execute(
        "INSERT OR IGNORE INTO task_tags (task_id, tag_id) VALUES (?1, ?2)",
        params![task_id, tag_id],
    )
    .map_err(|e| {
        constraint_violation(e, || format!("cannot tag task {} with tag {}", task_id, tag_id))
    })?;
    Ok(())
}

pub(super) fn detach(conn: &Connection, task_id: i64, tag_id: i64) -> Result<(), StoreError> {
    conn.execute(
        "DELETE FROM task_tags WHERE task_id = ?1 AND tag_id = ?2",
        params![task_id, tag_id],
    )?;
    Ok(())
}
