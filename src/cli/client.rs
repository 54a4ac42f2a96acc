use serde_json::json;

use crate::cli::commands::ClientCommands;
use crate::db::{client_repo, connection};
use crate::error::WeekloadError;
use crate::output;

pub fn run(cmd: ClientCommands, json_output: bool) -> i32 {
    let result = match cmd {
        ClientCommands::Add { name, color } => run_add(&name, &color, json_output),
        ClientCommands::List { all } => run_list(all, json_output),
        ClientCommands::Active { id, is_active } => run_active(id, is_active, json_output),
        ClientCommands::Color { id, color } => run_color(id, &color, json_output),
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

fn run_add(name: &str, color: &str, json_output: bool) -> Result<i32, WeekloadError> {
    connection::ensure_admin("add a client")?;
    let conn = connection::open_db()?;
    let client = client_repo::create_client(&conn, name, color)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "client": output::json::client_json(&client)
            })))
            .unwrap()
        );
    } else {
        println!("Added client: {} (#{})", client.name, client.id);
    }
    Ok(0)
}

fn run_list(all: bool, json_output: bool) -> Result<i32, WeekloadError> {
    let conn = connection::open_db()?;
    let mut clients = client_repo::list_clients(&conn)?;
    if !all {
        clients.retain(|c| c.is_active);
    }

    if json_output {
        let rows: Vec<_> = clients.iter().map(output::json::client_json).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({ "clients": rows })))
                .unwrap()
        );
    } else {
        output::text::print_client_list(&clients);
    }
    Ok(0)
}

fn run_active(id: i64, is_active: bool, json_output: bool) -> Result<i32, WeekloadError> {
    connection::ensure_admin("change client activity")?;
    let conn = connection::open_db()?;
    client_repo::set_client_active(&conn, id, is_active)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "id": id,
                "is_active": is_active
            })))
            .unwrap()
        );
    } else {
        println!("Client #{id} active set to {is_active}");
    }
    Ok(0)
}

fn run_color(id: i64, color: &str, json_output: bool) -> Result<i32, WeekloadError> {
    connection::ensure_admin("change client color")?;
    let conn = connection::open_db()?;
    client_repo::set_client_color(&conn, id, color)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "id": id,
                "color": color
            })))
            .unwrap()
        );
    } else {
        println!("Client #{id} color set to {color}");
    }
    Ok(0)
}
