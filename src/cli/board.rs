//! Interactive weekly board: a line-oriented session over one week's tasks
//! with undo/redo. Every mutation issued here records its delta in the
//! session's action log; `undo`/`redo` replay through the same store. The
//! log dies with the session.

use std::io::{self, BufRead, Write};

use rusqlite::Connection;

use crate::db::{connection, report_repo, resource_repo, task_repo};
use crate::error::WeekloadError;
use crate::models::{TaskInput, TaskPatch, TaskType};
use crate::output;
use crate::undo::{Action, ActionLog};
use crate::week;

pub fn run(week_arg: Option<u32>, year_arg: Option<i32>, _json_output: bool) -> i32 {
    let (current_week, current_year) = week::current_week();
    let mut board_week = week_arg.unwrap_or(current_week);
    let mut board_year = year_arg.unwrap_or(current_year);

    let mut conn = match connection::open_db() {
        Ok(conn) => conn,
        Err(e) => {
            eprintln!("Error: {}", e.message);
            return 1;
        }
    };
    let mut log = ActionLog::new();

    println!(
        "weekload board {}/{board_year} (type `help` for commands)",
        week::format_week(board_week)
    );

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{}> ", week::format_week(board_week));
        let _ = io::stdout().flush();

        let line = match lines.next() {
            Some(Ok(line)) => line,
            _ => break,
        };
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, args)) = tokens.split_first() else {
            continue;
        };

        match command {
            "quit" | "exit" | "q" => break,
            "help" => print_help(),
            "next" => {
                (board_week, board_year) = week::next_week(board_week, board_year);
            }
            "prev" => {
                (board_week, board_year) = week::previous_week(board_week, board_year);
            }
            _ => {
                let result = dispatch(
                    command, args, &mut conn, &mut log, board_week, board_year,
                );
                if let Err(e) = result {
                    eprintln!("Error: {}", e.message);
                }
            }
        }
    }
    0
}

fn dispatch(
    command: &str,
    args: &[&str],
    conn: &mut Connection,
    log: &mut ActionLog,
    board_week: u32,
    board_year: i32,
) -> Result<(), WeekloadError> {
    match command {
        "list" => {
            let tasks = task_repo::list_by_week(conn, board_week, board_year)?;
            output::text::print_task_list(&tasks);
            Ok(())
        }
        "totals" => {
            let totals = report_repo::weekly_totals(conn, board_week, board_year)?;
            let resources = resource_repo::list_resources(conn)?;
            output::text::print_weekly_totals(board_week, board_year, &resources, &totals);
            Ok(())
        }
        "add" => cmd_add(args, conn, log, board_week, board_year),
        "edit" => cmd_edit(args, conn, log),
        "done" => cmd_toggle(args, conn, log, true),
        "reopen" => cmd_toggle(args, conn, log, false),
        "log" => cmd_log(args, conn, log),
        "del" => cmd_del(args, conn, log),
        "undo" | "u" => {
            if log.undo(conn)? {
                println!("Undone.");
            } else {
                println!("Nothing to undo.");
            }
            Ok(())
        }
        "redo" | "r" => {
            if log.redo(conn)? {
                println!("Redone.");
            } else {
                println!("Nothing to redo.");
            }
            Ok(())
        }
        other => Err(WeekloadError::validation(format!(
            "Unknown command: {other} (try `help`)"
        ))),
    }
}

/// `add -r <resource> -c <client> [-e <days>] <name...>`
fn cmd_add(
    args: &[&str],
    conn: &mut Connection,
    log: &mut ActionLog,
    board_week: u32,
    board_year: i32,
) -> Result<(), WeekloadError> {
    let mut resource_id: Option<i64> = None;
    let mut client_id: Option<i64> = None;
    let mut estimated_days: i64 = 0;
    let mut name_tokens: Vec<&str> = Vec::new();

    let mut iter = args.iter();
    while let Some(&token) = iter.next() {
        match token {
            "-r" => resource_id = Some(parse_id(iter.next().copied())?),
            "-c" => client_id = Some(parse_id(iter.next().copied())?),
            "-e" => estimated_days = parse_id(iter.next().copied())?,
            other => name_tokens.push(other),
        }
    }

    let resource_id =
        resource_id.ok_or_else(|| WeekloadError::validation("Missing -r <resource-id>"))?;
    let client_id =
        client_id.ok_or_else(|| WeekloadError::validation("Missing -c <client-id>"))?;
    if name_tokens.is_empty() {
        return Err(WeekloadError::validation("Missing task name"));
    }

    let task = task_repo::create_task(
        conn,
        &TaskInput {
            name: name_tokens.join(" "),
            notes: None,
            resource_id,
            client_id,
            deadline: None,
            workload: 0,
            estimated_days,
            task_type: TaskType::Oneshot,
            week_number: board_week,
            year: board_year,
        },
    )?;
    log.record(Action::created(&task));
    println!("Added #{}: {}", task.id, task.name);
    Ok(())
}

/// `edit <id> <name...>`: rename a task.
fn cmd_edit(args: &[&str], conn: &mut Connection, log: &mut ActionLog) -> Result<(), WeekloadError> {
    let id = parse_id(args.first().copied())?;
    let name = args[1..].join(" ");
    if name.is_empty() {
        return Err(WeekloadError::validation("Missing new task name"));
    }

    let before = task_repo::get_task(conn, id)?;
    task_repo::update_task(
        conn,
        id,
        &TaskPatch {
            name: Some(name),
            ..TaskPatch::default()
        },
    )?;
    let after = task_repo::get_task(conn, id)?;
    log.record(Action::updated(&before, &after));
    println!("#{id} renamed to {}", after.name);
    Ok(())
}

fn cmd_toggle(
    args: &[&str],
    conn: &mut Connection,
    log: &mut ActionLog,
    completed: bool,
) -> Result<(), WeekloadError> {
    let id = parse_id(args.first().copied())?;
    let before = task_repo::get_task(conn, id)?;
    task_repo::update_task(
        conn,
        id,
        &TaskPatch {
            is_completed: Some(completed),
            ..TaskPatch::default()
        },
    )?;
    let after = task_repo::get_task(conn, id)?;
    log.record(Action::updated(&before, &after));
    println!("#{} {}", id, if completed { "done" } else { "reopened" });
    Ok(())
}

/// `log <id> <+n|-n>`: adjust logged workload by half-day units, floored
/// at zero.
fn cmd_log(args: &[&str], conn: &mut Connection, log: &mut ActionLog) -> Result<(), WeekloadError> {
    let id = parse_id(args.first().copied())?;
    let delta: i64 = args
        .get(1)
        .and_then(|raw| raw.parse().ok())
        .ok_or_else(|| WeekloadError::validation("Expected a half-day delta, e.g. +1 or -2"))?;

    let before = task_repo::get_task(conn, id)?;
    let workload = (before.workload + delta).max(0);
    task_repo::update_task(
        conn,
        id,
        &TaskPatch {
            workload: Some(workload),
            ..TaskPatch::default()
        },
    )?;
    let after = task_repo::get_task(conn, id)?;
    log.record(Action::updated(&before, &after));
    println!("#{id} workload: {:.1}d", after.workload_days());
    Ok(())
}

fn cmd_del(args: &[&str], conn: &mut Connection, log: &mut ActionLog) -> Result<(), WeekloadError> {
    let id = parse_id(args.first().copied())?;
    let before = task_repo::get_task(conn, id)?;
    task_repo::delete_task(conn, id)?;
    log.record(Action::deleted(&before));
    println!("Deleted #{id}");
    Ok(())
}

fn parse_id(raw: Option<&str>) -> Result<i64, WeekloadError> {
    raw.and_then(|raw| raw.parse().ok())
        .ok_or_else(|| WeekloadError::validation("Expected a numeric id"))
}

fn print_help() {
    println!(
        "Commands:
  list                     show this week's tasks
  add -r <id> -c <id> [-e <days>] <name...>
  edit <id> <name...>      rename a task
  done <id> | reopen <id>  toggle completion
  log <id> <+n|-n>         adjust workload in half-days
  del <id>                 delete a task
  totals                   per-resource totals
  next | prev              change week (wraps 1..52)
  undo | u                 revert the last mutation
  redo | r                 replay an undone mutation
  quit"
    );
}
