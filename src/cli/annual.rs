use serde_json::json;

use crate::cli::commands::AnnualCommands;
use crate::db::{client_repo, connection, report_repo, resource_repo};
use crate::error::{ErrorCode, WeekloadError};
use crate::output;

pub fn run(cmd: AnnualCommands, json_output: bool) -> i32 {
    let result = match cmd {
        AnnualCommands::ByClient { year, all } => run_by_client(year, all, json_output),
        AnnualCommands::ByResource { year } => run_by_resource(year, json_output),
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

fn run_by_client(year: i32, all: bool, json_output: bool) -> Result<i32, WeekloadError> {
    let conn = match connection::open_db() {
        Ok(conn) => conn,
        Err(e) if e.code == ErrorCode::StoreUnavailable => {
            return degrade(json_output, json!({ "year": year, "rows": [] }))
        }
        Err(e) => return Err(e),
    };
    let rows = report_repo::annual_by_client(&conn, year)?;
    let clients = client_repo::list_clients(&conn)?;

    if json_output {
        let rows_json: Vec<_> = rows.iter().map(output::json::annual_client_row_json).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "year": year,
                "rows": rows_json
            })))
            .unwrap()
        );
    } else {
        output::text::print_annual_by_client(year, &clients, &rows, all);
    }
    Ok(0)
}

fn run_by_resource(year: i32, json_output: bool) -> Result<i32, WeekloadError> {
    let conn = match connection::open_db() {
        Ok(conn) => conn,
        Err(e) if e.code == ErrorCode::StoreUnavailable => {
            return degrade(json_output, json!({ "year": year, "rows": [] }))
        }
        Err(e) => return Err(e),
    };
    let rows = report_repo::annual_by_resource(&conn, year)?;
    let resources = resource_repo::list_resources(&conn)?;

    if json_output {
        let rows_json: Vec<_> = rows
            .iter()
            .map(output::json::annual_resource_row_json)
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "year": year,
                "rows": rows_json
            })))
            .unwrap()
        );
    } else {
        output::text::print_annual_by_resource(year, &resources, &rows);
    }
    Ok(0)
}

fn degrade(json_output: bool, data: serde_json::Value) -> Result<i32, WeekloadError> {
    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(data)).unwrap()
        );
    } else {
        println!("No data available.");
    }
    Ok(0)
}
