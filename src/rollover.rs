//! Week rollover: open tasks propagate into the next week, completed tasks
//! stay behind.

use rusqlite::{params, Connection};
use tracing::info;

use crate::db::task_repo;
use crate::error::WeekloadError;
use crate::week;

/// Copy every non-completed task of the source week into the destination
/// week. Copies keep name, notes, assignment, deadline, estimate and type;
/// workload restarts at 0 and completion is cleared. Returns the number of
/// tasks created.
///
/// Read and insert run inside one transaction, so a crash mid-rollover
/// leaves the destination week untouched. There is no duplicate detection:
/// running the same rollover twice duplicates tasks, and callers that care
/// must check the destination week first.
pub fn rollover(
    conn: &Connection,
    from_week: u32,
    from_year: i32,
    to_week: u32,
    to_year: i32,
) -> Result<usize, WeekloadError> {
    task_repo::validate_week(from_week)?;
    task_repo::validate_week(to_week)?;

    conn.execute_batch("BEGIN IMMEDIATE")?;
    let result = copy_open_tasks(conn, from_week, from_year, to_week, to_year);
    match result {
        Ok(count) => {
            conn.execute_batch("COMMIT")?;
            info!(from_week, from_year, to_week, to_year, count, "week rollover");
            Ok(count)
        }
        Err(e) => {
            let _ = conn.execute_batch("ROLLBACK");
            Err(e)
        }
    }
}

fn copy_open_tasks(
    conn: &Connection,
    from_week: u32,
    from_year: i32,
    to_week: u32,
    to_year: i32,
) -> Result<usize, WeekloadError> {
    let count = conn.execute(
        "INSERT INTO tasks (name, notes, resource_id, client_id, deadline,
                            workload, estimated_days, task_type, is_completed,
                            week_number, year)
         SELECT name, notes, resource_id, client_id, deadline,
                0, estimated_days, task_type, 0,
                ?3, ?4
         FROM tasks
         WHERE week_number = ?1 AND year = ?2 AND is_completed = 0",
        params![from_week, from_year, to_week, to_year],
    )?;
    Ok(count)
}

/// Startup/cron guard: if the current week has no tasks yet, roll over from
/// the previous week (wrapping across the year boundary). Returns whether a
/// rollover happened. Safe to call repeatedly, unlike `rollover` itself.
pub fn check_and_reset_week(
    conn: &Connection,
    current_week: u32,
    current_year: i32,
) -> Result<bool, WeekloadError> {
    task_repo::validate_week(current_week)?;
    if task_repo::count_by_week(conn, current_week, current_year)? > 0 {
        return Ok(false);
    }

    let (prev_week, prev_year) = week::previous_week(current_week, current_year);
    let count = rollover(conn, prev_week, prev_year, current_week, current_year)?;
    info!(current_week, current_year, count, "auto-reset populated week");
    Ok(true)
}
