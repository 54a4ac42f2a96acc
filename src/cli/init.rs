use serde_json::json;

use crate::db::connection::{self, Role};
use crate::error::WeekloadError;
use crate::output;

pub fn run(role: &str, json_output: bool) -> i32 {
    let result = run_inner(role, json_output);
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

fn run_inner(role: &str, json_output: bool) -> Result<i32, WeekloadError> {
    let role = match role {
        "admin" => Role::Admin,
        "user" => Role::User,
        other => {
            return Err(WeekloadError::validation(format!(
                "Role must be admin or user, got {other}"
            )))
        }
    };
    let path = connection::init_db(role)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "path": path.to_string_lossy()
            })))
            .unwrap()
        );
    } else {
        println!("Initialized weekload at {}", path.display());
    }
    Ok(0)
}
