use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};

use crate::error::WeekloadError;
use crate::models::{Task, TaskInput, TaskPatch, TaskType};

use super::{client_repo, resource_repo};

const TASK_COLUMNS: &str = "id, name, notes, resource_id, client_id, deadline, workload,
        estimated_days, task_type, is_completed, is_archived, week_number, year,
        created_at, updated_at";

pub fn validate_week(week_number: u32) -> Result<(), WeekloadError> {
    if !(1..=52).contains(&week_number) {
        return Err(WeekloadError::validation(format!(
            "Week number must be in 1..=52, got {week_number}"
        )));
    }
    Ok(())
}

fn validate_input(conn: &Connection, input: &TaskInput) -> Result<(), WeekloadError> {
    if input.name.trim().is_empty() {
        return Err(WeekloadError::validation("Task name must not be empty"));
    }
    if input.workload < 0 {
        return Err(WeekloadError::validation("Workload must be >= 0 half-days"));
    }
    if input.estimated_days < 0 {
        return Err(WeekloadError::validation("Estimated days must be >= 0"));
    }
    validate_week(input.week_number)?;
    // Referential integrity lives here, not in the schema.
    if !resource_repo::resource_exists(conn, input.resource_id)? {
        return Err(WeekloadError::resource_not_found(input.resource_id));
    }
    if !client_repo::client_exists(conn, input.client_id)? {
        return Err(WeekloadError::client_not_found(input.client_id));
    }
    Ok(())
}

pub fn create_task(conn: &Connection, input: &TaskInput) -> Result<Task, WeekloadError> {
    validate_input(conn, input)?;
    conn.execute(
        "INSERT INTO tasks (name, notes, resource_id, client_id, deadline, workload,
                            estimated_days, task_type, week_number, year)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            input.name,
            input.notes,
            input.resource_id,
            input.client_id,
            input.deadline.map(|d| d.to_string()),
            input.workload,
            input.estimated_days,
            input.task_type.as_str(),
            input.week_number,
            input.year,
        ],
    )?;
    get_task(conn, conn.last_insert_rowid())
}

pub fn get_task(conn: &Connection, id: i64) -> Result<Task, WeekloadError> {
    conn.query_row(
        &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
        params![id],
        row_to_task,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => WeekloadError::task_not_found(id),
        _ => WeekloadError::from(e),
    })
}

/// Tasks of one weekly board, oldest first.
pub fn list_by_week(conn: &Connection, week_number: u32, year: i32) -> Result<Vec<Task>, WeekloadError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks
         WHERE week_number = ?1 AND year = ?2
         ORDER BY created_at ASC, id ASC"
    ))?;
    let tasks = stmt
        .query_map(params![week_number, year], row_to_task)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tasks)
}

/// Apply a partial update. Only supplied fields are written; `updated_at`
/// is always bumped. Unknown ids fail, even for an empty patch.
pub fn update_task(conn: &Connection, id: i64, patch: &TaskPatch) -> Result<(), WeekloadError> {
    // Existence check up front so empty patches still report NotFound.
    get_task(conn, id)?;

    let mut sets: Vec<&'static str> = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    if let Some(ref name) = patch.name {
        if name.trim().is_empty() {
            return Err(WeekloadError::validation("Task name must not be empty"));
        }
        sets.push("name");
        values.push(Value::Text(name.clone()));
    }
    if let Some(ref notes) = patch.notes {
        sets.push("notes");
        values.push(match notes {
            Some(n) => Value::Text(n.clone()),
            None => Value::Null,
        });
    }
    if let Some(resource_id) = patch.resource_id {
        if !resource_repo::resource_exists(conn, resource_id)? {
            return Err(WeekloadError::resource_not_found(resource_id));
        }
        sets.push("resource_id");
        values.push(Value::Integer(resource_id));
    }
    if let Some(client_id) = patch.client_id {
        if !client_repo::client_exists(conn, client_id)? {
            return Err(WeekloadError::client_not_found(client_id));
        }
        sets.push("client_id");
        values.push(Value::Integer(client_id));
    }
    if let Some(deadline) = patch.deadline {
        sets.push("deadline");
        values.push(match deadline {
            Some(d) => Value::Text(d.to_string()),
            None => Value::Null,
        });
    }
    if let Some(workload) = patch.workload {
        if workload < 0 {
            return Err(WeekloadError::validation("Workload must be >= 0 half-days"));
        }
        sets.push("workload");
        values.push(Value::Integer(workload));
    }
    if let Some(estimated_days) = patch.estimated_days {
        if estimated_days < 0 {
            return Err(WeekloadError::validation("Estimated days must be >= 0"));
        }
        sets.push("estimated_days");
        values.push(Value::Integer(estimated_days));
    }
    if let Some(task_type) = patch.task_type {
        sets.push("task_type");
        values.push(Value::Text(task_type.as_str().to_string()));
    }
    if let Some(is_completed) = patch.is_completed {
        sets.push("is_completed");
        values.push(Value::Integer(is_completed as i64));
    }
    if let Some(is_archived) = patch.is_archived {
        sets.push("is_archived");
        values.push(Value::Integer(is_archived as i64));
    }

    if sets.is_empty() {
        return Ok(());
    }

    let assignments: Vec<String> = sets
        .iter()
        .enumerate()
        .map(|(i, col)| format!("{col} = ?{}", i + 1))
        .collect();
    let sql = format!(
        "UPDATE tasks SET {}, updated_at = datetime('now') WHERE id = ?{}",
        assignments.join(", "),
        values.len() + 1
    );
    values.push(Value::Integer(id));
    conn.execute(&sql, params_from_iter(values))?;
    Ok(())
}

/// Strict delete: removing an unknown id is an error, consistent with
/// `update_task`.
pub fn delete_task(conn: &Connection, id: i64) -> Result<(), WeekloadError> {
    let affected = conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
    if affected == 0 {
        return Err(WeekloadError::task_not_found(id));
    }
    Ok(())
}

pub fn count_by_week(conn: &Connection, week_number: u32, year: i32) -> Result<i64, WeekloadError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM tasks WHERE week_number = ?1 AND year = ?2",
        params![week_number, year],
        |row| row.get(0),
    )?;
    Ok(count)
}

fn row_to_task(row: &rusqlite::Row) -> rusqlite::Result<Task> {
    let deadline: Option<String> = row.get(5)?;
    let task_type: String = row.get(8)?;
    Ok(Task {
        id: row.get(0)?,
        name: row.get(1)?,
        notes: row.get(2)?,
        resource_id: row.get(3)?,
        client_id: row.get(4)?,
        deadline: deadline.and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
        workload: row.get(6)?,
        estimated_days: row.get(7)?,
        task_type: TaskType::from_str(&task_type).unwrap_or(TaskType::Oneshot),
        is_completed: row.get(9)?,
        is_archived: row.get(10)?,
        week_number: row.get(11)?,
        year: row.get(12)?,
        created_at: row.get(13)?,
        updated_at: row.get(14)?,
    })
}
