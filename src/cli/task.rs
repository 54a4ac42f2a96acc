use chrono::NaiveDate;
use serde_json::json;

use crate::cli::commands::TaskCommands;
use crate::db::{connection, task_repo};
use crate::error::{ErrorCode, WeekloadError};
use crate::models::{TaskInput, TaskPatch, TaskType};
use crate::output;
use crate::week;

pub fn run(cmd: TaskCommands, json_output: bool) -> i32 {
    let result = match cmd {
        TaskCommands::Add {
            name,
            resource,
            client,
            notes,
            deadline,
            workload,
            estimated_days,
            task_type,
            week,
            year,
        } => run_add(
            &name,
            resource,
            client,
            notes,
            deadline,
            workload,
            estimated_days,
            &task_type,
            week,
            year,
            json_output,
        ),
        TaskCommands::List { week, year } => run_list(week, year, json_output),
        TaskCommands::Show { id } => run_show(id, json_output),
        TaskCommands::Update {
            id,
            name,
            notes,
            resource,
            client,
            deadline,
            clear_deadline,
            workload,
            estimated_days,
            task_type,
            archived,
        } => {
            let task_type = match task_type {
                Some(ref raw) => match TaskType::from_str(raw) {
                    Some(t) => Some(t),
                    None => {
                        return report(
                            WeekloadError::validation(format!(
                                "Task type must be oneshot or recurring, got {raw}"
                            )),
                            json_output,
                        )
                    }
                },
                None => None,
            };
            let patch = TaskPatch {
                name,
                notes: notes.map(Some),
                resource_id: resource,
                client_id: client,
                deadline: if clear_deadline {
                    Some(None)
                } else {
                    deadline.map(Some)
                },
                workload,
                estimated_days,
                task_type,
                is_completed: None,
                is_archived: archived,
            };
            run_update(id, &patch, json_output)
        }
        TaskCommands::Done { id } => run_update(
            id,
            &TaskPatch {
                is_completed: Some(true),
                ..TaskPatch::default()
            },
            json_output,
        ),
        TaskCommands::Reopen { id } => run_update(
            id,
            &TaskPatch {
                is_completed: Some(false),
                ..TaskPatch::default()
            },
            json_output,
        ),
        TaskCommands::Delete { id } => run_delete(id, json_output),
    };
    match result {
        Ok(code) => code,
        Err(e) => report(e, json_output),
    }
}

fn report(e: WeekloadError, json_output: bool) -> i32 {
    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::error(&e)).unwrap()
        );
    } else {
        eprintln!("Error: {}", e.message);
    }
    1
}

fn week_or_current(week: Option<u32>, year: Option<i32>) -> (u32, i32) {
    let (current_week, current_year) = week::current_week();
    (week.unwrap_or(current_week), year.unwrap_or(current_year))
}

#[allow(clippy::too_many_arguments)]
fn run_add(
    name: &str,
    resource_id: i64,
    client_id: i64,
    notes: Option<String>,
    deadline: Option<NaiveDate>,
    workload: i64,
    estimated_days: i64,
    task_type: &str,
    week: Option<u32>,
    year: Option<i32>,
    json_output: bool,
) -> Result<i32, WeekloadError> {
    let task_type = TaskType::from_str(task_type).ok_or_else(|| {
        WeekloadError::validation(format!(
            "Task type must be oneshot or recurring, got {task_type}"
        ))
    })?;
    let (week_number, year) = week_or_current(week, year);

    let conn = connection::open_db()?;
    let task = task_repo::create_task(
        &conn,
        &TaskInput {
            name: name.to_string(),
            notes,
            resource_id,
            client_id,
            deadline,
            workload,
            estimated_days,
            task_type,
            week_number,
            year,
        },
    )?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "task": output::json::task_json(&task)
            })))
            .unwrap()
        );
    } else {
        println!(
            "Added task: {} (#{}) in {}/{}",
            task.name,
            task.id,
            week::format_week(task.week_number),
            task.year
        );
    }
    Ok(0)
}

fn run_list(week: Option<u32>, year: Option<i32>, json_output: bool) -> Result<i32, WeekloadError> {
    let (week_number, year) = week_or_current(week, year);
    task_repo::validate_week(week_number)?;

    // Reads degrade gracefully when the store is unreachable.
    let conn = match connection::open_db() {
        Ok(conn) => conn,
        Err(e) if e.code == ErrorCode::StoreUnavailable => {
            return empty_list(week_number, year, json_output)
        }
        Err(e) => return Err(e),
    };
    let tasks = task_repo::list_by_week(&conn, week_number, year)?;

    if json_output {
        let rows: Vec<_> = tasks.iter().map(output::json::task_json).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "week_number": week_number,
                "year": year,
                "tasks": rows
            })))
            .unwrap()
        );
    } else {
        println!("Tasks for {}/{year}:", week::format_week(week_number));
        output::text::print_task_list(&tasks);
    }
    Ok(0)
}

fn empty_list(week_number: u32, year: i32, json_output: bool) -> Result<i32, WeekloadError> {
    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "week_number": week_number,
                "year": year,
                "tasks": []
            })))
            .unwrap()
        );
    } else {
        println!("No tasks found.");
    }
    Ok(0)
}

fn run_show(id: i64, json_output: bool) -> Result<i32, WeekloadError> {
    let conn = connection::open_db()?;
    let task = task_repo::get_task(&conn, id)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "task": output::json::task_json(&task)
            })))
            .unwrap()
        );
    } else {
        output::text::print_task(&task);
    }
    Ok(0)
}

fn run_update(id: i64, patch: &TaskPatch, json_output: bool) -> Result<i32, WeekloadError> {
    let conn = connection::open_db()?;
    task_repo::update_task(&conn, id, patch)?;
    let task = task_repo::get_task(&conn, id)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "task": output::json::task_json(&task)
            })))
            .unwrap()
        );
    } else {
        println!("Updated task #{id}");
    }
    Ok(0)
}

fn run_delete(id: i64, json_output: bool) -> Result<i32, WeekloadError> {
    let conn = connection::open_db()?;
    task_repo::delete_task(&conn, id)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({ "deleted": id })))
                .unwrap()
        );
    } else {
        println!("Deleted task #{id}");
    }
    Ok(0)
}
