use serde_json::json;

use crate::cli::commands::WeekCommands;
use crate::db::{connection, report_repo, resource_repo, task_repo};
use crate::error::{ErrorCode, WeekloadError};
use crate::output;
use crate::rollover;
use crate::week;

pub fn run(cmd: WeekCommands, json_output: bool) -> i32 {
    let result = match cmd {
        WeekCommands::Totals { week, year } => run_totals(week, year, json_output),
        WeekCommands::Kpis { week, year } => run_kpis(week, year, json_output),
        WeekCommands::Reset {
            from_week,
            from_year,
            to_week,
            to_year,
            force,
        } => run_reset(from_week, from_year, to_week, to_year, force, json_output),
        WeekCommands::Check => run_check(json_output),
    };
    match result {
        Ok(code) => code,
        Err(e) => {
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
    }
}

fn week_or_current(week: Option<u32>, year: Option<i32>) -> (u32, i32) {
    let (current_week, current_year) = week::current_week();
    (week.unwrap_or(current_week), year.unwrap_or(current_year))
}

fn run_totals(week: Option<u32>, year: Option<i32>, json_output: bool) -> Result<i32, WeekloadError> {
    let (week_number, year) = week_or_current(week, year);
    task_repo::validate_week(week_number)?;

    let conn = match connection::open_db() {
        Ok(conn) => conn,
        Err(e) if e.code == ErrorCode::StoreUnavailable => {
            return degrade(json_output, json!({ "totals": [] }), "No totals available.")
        }
        Err(e) => return Err(e),
    };
    let totals = report_repo::weekly_totals(&conn, week_number, year)?;
    let resources = resource_repo::list_resources(&conn)?;

    if json_output {
        let rows: Vec<_> = totals.iter().map(output::json::weekly_total_json).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "week_number": week_number,
                "year": year,
                "totals": rows
            })))
            .unwrap()
        );
    } else {
        output::text::print_weekly_totals(week_number, year, &resources, &totals);
    }
    Ok(0)
}

fn run_kpis(week: Option<u32>, year: Option<i32>, json_output: bool) -> Result<i32, WeekloadError> {
    let (week_number, year) = week_or_current(week, year);
    task_repo::validate_week(week_number)?;

    let conn = match connection::open_db() {
        Ok(conn) => conn,
        Err(e) if e.code == ErrorCode::StoreUnavailable => {
            return degrade(
                json_output,
                json!({
                    "kpis": { "total_estimated": 0.0, "total_actual": 0.0, "variance": 0.0 }
                }),
                "No KPIs available.",
            )
        }
        Err(e) => return Err(e),
    };
    let kpis = report_repo::weekly_kpis(&conn, week_number, year)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "week_number": week_number,
                "year": year,
                "kpis": output::json::kpis_json(&kpis)
            })))
            .unwrap()
        );
    } else {
        output::text::print_kpis(week_number, year, &kpis);
    }
    Ok(0)
}

fn run_reset(
    from_week: u32,
    from_year: i32,
    to_week: u32,
    to_year: i32,
    force: bool,
    json_output: bool,
) -> Result<i32, WeekloadError> {
    let conn = connection::open_db()?;

    // The engine performs no duplicate detection; the guard lives here.
    if !force {
        let existing = task_repo::count_by_week(&conn, to_week, to_year)?;
        if existing > 0 {
            return Err(WeekloadError::validation(format!(
                "Destination week {}/{to_year} already has {existing} task(s); \
                 re-run with --force to duplicate into it",
                week::format_week(to_week)
            )));
        }
    }

    let count = rollover::rollover(&conn, from_week, from_year, to_week, to_year)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({ "count": count })))
                .unwrap()
        );
    } else {
        println!(
            "Rolled over {count} task(s) from {}/{from_year} to {}/{to_year}",
            week::format_week(from_week),
            week::format_week(to_week)
        );
    }
    Ok(0)
}

fn run_check(json_output: bool) -> Result<i32, WeekloadError> {
    let conn = connection::open_db()?;
    let (current_week, current_year) = week::current_week();
    let reset = rollover::check_and_reset_week(&conn, current_week, current_year)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "week_number": current_week,
                "year": current_year,
                "reset": reset
            })))
            .unwrap()
        );
    } else if reset {
        println!(
            "Populated {}/{current_year} from the previous week",
            week::format_week(current_week)
        );
    } else {
        println!(
            "{}/{current_year} already has tasks; nothing to do",
            week::format_week(current_week)
        );
    }
    Ok(0)
}

fn degrade(json_output: bool, data: serde_json::Value, message: &str) -> Result<i32, WeekloadError> {
    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(data)).unwrap()
        );
    } else {
        println!("{message}");
    }
    Ok(0)
}
