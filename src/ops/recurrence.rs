use chrono::{DateTime, Datelike, Days, Local, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeZone};
use tracing::{debug, info};

use crate::model::{Pattern, Status, Task};
use crate::store::{Gateway, StoreError};

/// Outcome of completing a task
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// The task as persisted after being marked done
    pub task: Task,
    /// The next occurrence, when the task belonged to a recurring series
    pub spawned: Option<Task>,
}

/// Next due date of a series after `from`.
///
/// Calendar arithmetic happens on the local wall clock. Month and year steps
/// roll an overflowing day-of-month into the following month, so Jan 31 plus
/// one month is Mar 3 (Mar 2 in a leap year) and Feb 29 plus one year is Mar 1.
pub fn calculate_next_due<Tz: TimeZone>(
    pattern: Pattern,
    interval: u32,
    from: &DateTime<Tz>,
) -> DateTime<Tz> {
    let interval = interval.max(1);
    let local = from.naive_local();
    let shifted = match pattern {
        Pattern::Daily => local.checked_add_days(Days::new(u64::from(interval))),
        Pattern::Weekly => local.checked_add_days(Days::new(7 * u64::from(interval))),
        Pattern::Monthly => add_months_rolling(local, i64::from(interval)),
        Pattern::Yearly => add_months_rolling(local, 12 * i64::from(interval)),
    };
    match shifted {
        Some(naive) => resolve_local(from, naive),
        None => from.clone(),
    }
}

/// Add whole months, carrying surplus days into the next month.
fn add_months_rolling(local: NaiveDateTime, months: i64) -> Option<NaiveDateTime> {
    let date = local.date();
    let total = i64::from(date.year()) * 12 + i64::from(date.month0()) + months;
    let year = i32::try_from(total.div_euclid(12)).ok()?;
    let month = u32::try_from(total.rem_euclid(12)).ok()? + 1;
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let day = first.checked_add_days(Days::new(u64::from(date.day0())))?;
    Some(day.and_time(local.time()))
}

/// Map a wall-clock time back into `from`'s zone. Skipped local times keep
/// `from`'s offset; ambiguous ones take the earlier instant.
fn resolve_local<Tz: TimeZone>(from: &DateTime<Tz>, naive: NaiveDateTime) -> DateTime<Tz> {
    let tz = from.timezone();
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            let offset = from.offset().fix();
            tz.from_utc_datetime(&(naive - offset))
        }
    }
}

/// Mark `task_id` done and, when it recurs, create the next occurrence.
///
/// Steps: persist the completed task; look up its recurrence; create a copy
/// due at the next date with the same tags; move the recurrence onto the
/// copy. Callers that need all-or-nothing behavior run this inside a
/// transaction (see `SqliteStore::complete_task`).
pub fn complete_task_with_recurrence<G: Gateway + ?Sized>(
    gateway: &G,
    task_id: i64,
    now: DateTime<Local>,
) -> Result<Completion, StoreError> {
    let mut task = gateway.get_task(task_id)?;
    task.set_status(Status::Done, now);
    gateway.update_task(&task)?;

    let Some(mut rec) = gateway.get_recurrence(task_id)? else {
        debug!(task_id, "task completed");
        return Ok(Completion {
            task,
            spawned: None,
        });
    };

    let next_due = calculate_next_due(rec.pattern, rec.interval, &now);
    let mut next = Task::new(task.title.clone(), now);
    next.project_id = task.project_id;
    next.parent_id = task.parent_id;
    next.description = task.description.clone();
    next.priority = task.priority;
    next.position = task.position;
    next.due_date = Some(next_due);
    let created = gateway.create_task(&next)?;

    for tag in &task.tags {
        gateway.add_tag_to_task(created.id, tag.id)?;
    }

    rec.task_id = created.id;
    rec.next_due = next_due;
    gateway.set_recurrence(&rec)?;

    info!(
        task_id,
        next_task_id = created.id,
        next_due = %next_due,
        "recurring task completed, next occurrence created"
    );

    task.recurrence = None;
    let spawned = gateway.get_task(created.id)?;
    Ok(Completion {
        task,
        spawned: Some(spawned),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Priority, Recurrence};
    use crate::store::{SqliteStore, TaskFilter};
    use chrono::{Duration, Utc};
    use pretty_assertions::assert_eq;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_daily_advances_one_day() {
        let from = utc(2025, 3, 10, 9, 30);
        assert_eq!(
            calculate_next_due(Pattern::Daily, 1, &from),
            utc(2025, 3, 11, 9, 30)
        );
        assert_eq!(
            calculate_next_due(Pattern::Daily, 3, &from),
            utc(2025, 3, 13, 9, 30)
        );
    }

    #[test]
    fn test_weekly_interval_two_is_fourteen_days() {
        let from = utc(2025, 12, 25, 23, 59);
        let next = calculate_next_due(Pattern::Weekly, 2, &from);
        assert_eq!(next - from, Duration::days(14));
        assert_eq!(next, utc(2026, 1, 8, 23, 59));
    }

    #[test]
    fn test_monthly_rolls_overflowing_day_forward() {
        assert_eq!(
            calculate_next_due(Pattern::Monthly, 1, &utc(2025, 1, 31, 8, 0)),
            utc(2025, 3, 3, 8, 0)
        );
        assert_eq!(
            calculate_next_due(Pattern::Monthly, 1, &utc(2024, 1, 31, 8, 0)),
            utc(2024, 3, 2, 8, 0)
        );
        assert_eq!(
            calculate_next_due(Pattern::Monthly, 1, &utc(2025, 3, 31, 8, 0)),
            utc(2025, 5, 1, 8, 0)
        );
        assert_eq!(
            calculate_next_due(Pattern::Monthly, 1, &utc(2025, 1, 15, 8, 0)),
            utc(2025, 2, 15, 8, 0)
        );
        assert_eq!(
            calculate_next_due(Pattern::Monthly, 14, &utc(2025, 11, 5, 8, 0)),
            utc(2027, 1, 5, 8, 0)
        );
    }

    #[test]
    fn test_yearly_advances_one_year() {
        assert_eq!(
            calculate_next_due(Pattern::Yearly, 1, &utc(2025, 6, 1, 12, 0)),
            utc(2026, 6, 1, 12, 0)
        );
        assert_eq!(
            calculate_next_due(Pattern::Yearly, 1, &utc(2024, 2, 29, 12, 0)),
            utc(2025, 3, 1, 12, 0)
        );
    }

    #[test]
    fn test_next_due_is_deterministic() {
        let from = utc(2025, 1, 31, 8, 0);
        for pattern in Pattern::ALL {
            let a = calculate_next_due(pattern, 2, &from);
            let b = calculate_next_due(pattern, 2, &from);
            assert_eq!(a, b);
            assert!(a > from);
        }
    }

    #[test]
    fn test_zero_interval_treated_as_one() {
        let from = utc(2025, 3, 10, 0, 0);
        assert_eq!(
            calculate_next_due(Pattern::Daily, 0, &from),
            utc(2025, 3, 11, 0, 0)
        );
    }

    #[test]
    fn test_complete_plain_task() {
        let store = SqliteStore::open_in_memory().unwrap();
        let task = store.create_task(&Task::new("Buy milk", Local::now())).unwrap();
        let now = Local::now();

        let done = complete_task_with_recurrence(&store, task.id, now).unwrap();
        assert_eq!(done.spawned, None);
        assert_eq!(done.task.status, Status::Done);
        assert_eq!(done.task.completed_at, Some(now));

        let all = store
            .list_tasks(&TaskFilter::default())
            .unwrap();
        assert_eq!(all.len(), 1);
    }

    #[test]
    fn test_complete_recurring_task_spawns_successor() {
        let store = SqliteStore::open_in_memory().unwrap();
        let now = Local::now();
        let project = store.create_project("Home", "").unwrap();

        let mut task = Task::new("Water plants", now);
        task.project_id = Some(project.id);
        task.description = "the ferns too".into();
        task.priority = Priority::Medium;
        task.position = 4;
        task.due_date = Some(now);
        let task = store.create_task(&task).unwrap();

        let garden = store.create_tag("garden", "").unwrap();
        let chores = store.create_tag("chores", "").unwrap();
        store.add_tag_to_task(task.id, garden.id).unwrap();
        store.add_tag_to_task(task.id, chores.id).unwrap();
        let rec = store
            .set_recurrence(&Recurrence::new(task.id, Pattern::Daily, 1, now))
            .unwrap();

        let done = store.complete_task(task.id, now).unwrap();
        let next = done.spawned.expect("successor task");

        assert_eq!(done.task.status, Status::Done);
        assert!(store.get_task(task.id).unwrap().completed_at.is_some());

        assert_ne!(next.id, task.id);
        assert_eq!(next.status, Status::Todo);
        assert_eq!(next.completed_at, None);
        assert_eq!(next.title, "Water plants");
        assert_eq!(next.description, "the ferns too");
        assert_eq!(next.priority, Priority::Medium);
        assert_eq!(next.position, 4);
        assert_eq!(next.project_id, Some(project.id));
        assert_eq!(next.due_date, Some(calculate_next_due(Pattern::Daily, 1, &now)));
        assert_eq!(
            next.due_date.map(|d| d.date_naive()),
            now.date_naive().succ_opt()
        );
        let mut tag_names: Vec<_> = next.tags.iter().map(|t| t.name.as_str()).collect();
        tag_names.sort();
        assert_eq!(tag_names, vec!["chores", "garden"]);

        assert_eq!(store.get_recurrence(task.id).unwrap(), None);
        let moved = store.get_recurrence(next.id).unwrap().unwrap();
        assert_eq!(moved.id, rec.id);
        assert_eq!(Some(moved.next_due), next.due_date);
    }

    #[test]
    fn test_complete_missing_task_fails_without_side_effects() {
        let store = SqliteStore::open_in_memory().unwrap();
        let err = store.complete_task(7, Local::now()).unwrap_err();
        assert!(err.is_not_found());
        assert!(store.list_tasks(&TaskFilter::default()).unwrap().is_empty());
    }
}
