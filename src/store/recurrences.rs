use rusqlite::{Connection, OptionalExtension, Row, params};

use super::StoreError;
use crate::model::Recurrence;

fn parse_row(row: &Row) -> rusqlite::Result<Recurrence> {
    Ok(Recurrence {
        id: row.get(0)?,
        task_id: row.get(1)?,
        pattern: row.get(2)?,
        interval: row.get(3)?,
        next_due: row.get(4)?,
    })
}

pub(super) fn upsert(conn: &Connection, rec: &Recurrence) -> Result<Recurrence, StoreError> {
    // Repointing an existing series moves its row to the new task id.
    if rec.id > 0 {
        let changed = conn.execute(
            "UPDATE recurrences SET task_id = ?1, pattern = ?2, interval = ?3, next_due = ?4
             WHERE id = ?5",
            params![rec.task_id, rec.pattern, rec.interval.max(1), rec.next_due, rec.id],
        )?;
        if changed > 0 {
            return get_for_task(conn, rec.task_id)?.ok_or(StoreError::NotFound {
                kind: "recurrence",
                id: rec.id,
            });
        }
    }
    conn.execute(
        "INSERT INTO recurrences (task_id, pattern, interval, next_due)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(task_id) DO UPDATE SET
             pattern = excluded.pattern,
             interval = excluded.interval,
             next_due = excluded.next_due",
        params![rec.task_id, rec.pattern, rec.interval.max(1), rec.next_due],
    )?;
    get_for_task(conn, rec.task_id)?.ok_or(StoreError::NotFound {
        kind: "recurrence for task",
        id: rec.task_id,
    })
}

pub(super) fn get_for_task(conn: &Connection, task_id: i64) -> Result<Option<Recurrence>, StoreError> {
    let rec = conn
        .query_row(
            "SELECT id, task_id, pattern, interval, next_due FROM recurrences WHERE task_id = ?1",
            params![task_id],
            parse_row,
        )
        .optional()?;
    Ok(rec)
}

pub(super) fn list(conn: &Connection) -> Result<Vec<Recurrence>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, task_id, pattern, interval, next_due FROM recurrences ORDER BY next_due, id",
    )?;
    let rows = stmt.query_map([], parse_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

pub(super) fn delete_for_task(conn: &Connection, task_id: i64) -> Result<(), StoreError> {
    let changed = conn.execute(
        "DELETE FROM recurrences WHERE task_id = ?1",
        params![task_id],
    )?;
    if changed == 0 {
        return Err(StoreError::NotFound {
            kind: "recurrence for task",
            id: task_id,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::model::{Pattern, Recurrence, Task};
    use crate::store::{Gateway, SqliteStore};
    use chrono::Local;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_list_orders_by_next_due() {
        let store = SqliteStore::open_in_memory().unwrap();
        let now = Local::now();
        let a = store.create_task(&Task::new("water plants", now)).unwrap();
        let b = store.create_task(&Task::new("pay rent", now)).unwrap();
        store
            .set_recurrence(&Recurrence::new(a.id, Pattern::Weekly, 1, now + chrono::Days::new(7)))
            .unwrap();
        store
            .set_recurrence(&Recurrence::new(b.id, Pattern::Daily, 1, now + chrono::Days::new(1)))
            .unwrap();
        let ids: Vec<i64> = store.list_recurrences().unwrap().iter().map(|r| r.task_id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }

    #[test]
    fn test_set_replaces_existing_for_task() {
        let store = SqliteStore::open_in_memory().unwrap();
        let task = store.create_task(&Task::new("gym", Local::now())).unwrap();
        let first = store
            .set_recurrence(&Recurrence::new(task.id, Pattern::Daily, 1, Local::now()))
            .unwrap();
        let second = store
            .set_recurrence(&Recurrence::new(task.id, Pattern::Weekly, 2, Local::now()))
            .unwrap();
        assert_eq!(first.id, second.id);
        let got = store.get_recurrence(task.id).unwrap().unwrap();
        assert_eq!((got.pattern, got.interval), (Pattern::Weekly, 2));
    }

    #[test]
    fn test_missing_recurrence_is_none() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.get_recurrence(42).unwrap(), None);
        assert!(store.delete_recurrence(42).unwrap_err().is_not_found());
    }

    #[test]
    fn test_deleting_task_drops_its_recurrence() {
        let store = SqliteStore::open_in_memory().unwrap();
        let task = store.create_task(&Task::new("rent", Local::now())).unwrap();
        store
            .set_recurrence(&Recurrence::new(task.id, Pattern::Monthly, 1, Local::now()))
            .unwrap();
        store.delete_task(task.id).unwrap();
        assert_eq!(store.get_recurrence(task.id).unwrap(), None);
    }
}
