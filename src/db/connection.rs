use std::env;
use std::fs;
use std::path::PathBuf;

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::error::WeekloadError;

use super::migrations;

const DATA_DIR: &str = ".weekload";
const DB_FILE: &str = "weekload.db";
const CONFIG_FILE: &str = "config.json";

/// Find the `.weekload` data directory by walking up from the current
/// directory.
pub fn find_data_dir() -> Result<PathBuf, WeekloadError> {
    let mut dir = env::current_dir().map_err(|e| WeekloadError::database(e.to_string()))?;
    loop {
        let candidate = dir.join(DATA_DIR);
        if candidate.is_dir() {
            return Ok(candidate);
        }
        if !dir.pop() {
            return Err(WeekloadError::not_initialized());
        }
    }
}

pub fn db_path() -> Result<PathBuf, WeekloadError> {
    Ok(find_data_dir()?.join(DB_FILE))
}

pub fn config_path() -> Result<PathBuf, WeekloadError> {
    Ok(find_data_dir()?.join(CONFIG_FILE))
}

/// Open a connection to the board database. Missing data dir means the
/// tool was never initialized; a present but unopenable database surfaces
/// as the store being unavailable.
pub fn open_db() -> Result<Connection, WeekloadError> {
    let path = db_path()?;
    if !path.exists() {
        return Err(WeekloadError::not_initialized());
    }
    let conn =
        Connection::open(&path).map_err(|e| WeekloadError::store_unavailable(e.to_string()))?;
    configure_connection(&conn)?;
    Ok(conn)
}

/// Initialize the database in the current directory: create the data
/// directory, run migrations, and write the config file.
pub fn init_db(role: Role) -> Result<PathBuf, WeekloadError> {
    let cwd = env::current_dir().map_err(|e| WeekloadError::database(e.to_string()))?;
    let data_dir = cwd.join(DATA_DIR);
    fs::create_dir_all(&data_dir).map_err(|e| WeekloadError::database(e.to_string()))?;

    let path = data_dir.join(DB_FILE);
    let conn =
        Connection::open(&path).map_err(|e| WeekloadError::store_unavailable(e.to_string()))?;
    configure_connection(&conn)?;
    migrations::run_migrations(&conn)?;

    let config = Config { role };
    let raw = serde_json::to_string_pretty(&config)
        .map_err(|e| WeekloadError::database(e.to_string()))?;
    fs::write(data_dir.join(CONFIG_FILE), raw)
        .map_err(|e| WeekloadError::database(e.to_string()))?;

    Ok(path)
}

fn configure_connection(conn: &Connection) -> Result<(), WeekloadError> {
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA busy_timeout=5000;
         PRAGMA foreign_keys=ON;",
    )?;
    Ok(())
}

/// Caller role, pre-validated at init time. Resource and client mutations
/// are admin-only; task operations are open to both roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub role: Role,
}

pub fn load_config() -> Result<Config, WeekloadError> {
    let path = config_path()?;
    let raw = fs::read_to_string(&path).map_err(|_| WeekloadError::not_initialized())?;
    serde_json::from_str(&raw)
        .map_err(|e| WeekloadError::database(format!("invalid config: {e}")))
}

pub fn ensure_admin(action: &str) -> Result<(), WeekloadError> {
    match load_config()?.role {
        Role::Admin => Ok(()),
        Role::User => Err(WeekloadError::unauthorized(action)),
    }
}
