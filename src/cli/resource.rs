use serde_json::json;

use crate::cli::commands::ResourceCommands;
use crate::db::{connection, resource_repo};
use crate::error::WeekloadError;
use crate::output;

pub fn run(cmd: ResourceCommands, json_output: bool) -> i32 {
    let result = match cmd {
        ResourceCommands::Add {
            name,
            color,
            photo_url,
            no_dashboard,
        } => run_add(&name, &color, photo_url.as_deref(), !no_dashboard, json_output),
        ResourceCommands::List => run_list(json_output),
        ResourceCommands::Dashboard { id, show } => run_dashboard(id, show, json_output),
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

fn run_add(
    name: &str,
    color: &str,
    photo_url: Option<&str>,
    show_on_dashboard: bool,
    json_output: bool,
) -> Result<i32, WeekloadError> {
    connection::ensure_admin("add a resource")?;
    let conn = connection::open_db()?;
    let resource = resource_repo::create_resource(&conn, name, color, photo_url, show_on_dashboard)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "resource": output::json::resource_json(&resource)
            })))
            .unwrap()
        );
    } else {
        println!("Added resource: {} (#{})", resource.name, resource.id);
    }
    Ok(0)
}

fn run_list(json_output: bool) -> Result<i32, WeekloadError> {
    let conn = connection::open_db()?;
    let resources = resource_repo::list_resources(&conn)?;

    if json_output {
        let rows: Vec<_> = resources.iter().map(output::json::resource_json).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({ "resources": rows })))
                .unwrap()
        );
    } else {
        output::text::print_resource_list(&resources);
    }
    Ok(0)
}

fn run_dashboard(id: i64, show: bool, json_output: bool) -> Result<i32, WeekloadError> {
    connection::ensure_admin("change dashboard visibility")?;
    let conn = connection::open_db()?;
    resource_repo::set_dashboard(&conn, id, show)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "id": id,
                "show_on_dashboard": show
            })))
            .unwrap()
        );
    } else {
        println!("Resource #{id} dashboard visibility set to {show}");
    }
    Ok(0)
}
