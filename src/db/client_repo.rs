use rusqlite::{params, Connection};

use crate::error::WeekloadError;
use crate::models::Client;

pub fn create_client(conn: &Connection, name: &str, color: &str) -> Result<Client, WeekloadError> {
    if name.trim().is_empty() {
        return Err(WeekloadError::validation("Client name must not be empty"));
    }
    conn.execute(
        "INSERT INTO clients (name, color) VALUES (?1, ?2)",
        params![name, color],
    )?;
    get_client(conn, conn.last_insert_rowid())
}

pub fn get_client(conn: &Connection, id: i64) -> Result<Client, WeekloadError> {
    conn.query_row(
        "SELECT id, name, color, is_active, created_at FROM clients WHERE id = ?1",
        params![id],
        row_to_client,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => WeekloadError::client_not_found(id),
        _ => WeekloadError::from(e),
    })
}

/// All clients, alphabetized. Inactive clients are filtered at the display
/// layer so history keeps resolving.
pub fn list_clients(conn: &Connection) -> Result<Vec<Client>, WeekloadError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, color, is_active, created_at FROM clients ORDER BY name ASC",
    )?;
    let clients = stmt
        .query_map([], row_to_client)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(clients)
}

pub fn set_client_active(conn: &Connection, id: i64, is_active: bool) -> Result<(), WeekloadError> {
    let affected = conn.execute(
        "UPDATE clients SET is_active = ?1 WHERE id = ?2",
        params![is_active as i64, id],
    )?;
    if affected == 0 {
        return Err(WeekloadError::client_not_found(id));
    }
    Ok(())
}

pub fn set_client_color(conn: &Connection, id: i64, color: &str) -> Result<(), WeekloadError> {
    let affected = conn.execute(
        "UPDATE clients SET color = ?1 WHERE id = ?2",
        params![color, id],
    )?;
    if affected == 0 {
        return Err(WeekloadError::client_not_found(id));
    }
    Ok(())
}

pub fn client_exists(conn: &Connection, id: i64) -> Result<bool, WeekloadError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM clients WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn row_to_client(row: &rusqlite::Row) -> rusqlite::Result<Client> {
    Ok(Client {
        id: row.get(0)?,
        name: row.get(1)?,
        color: row.get(2)?,
        is_active: row.get(3)?,
        created_at: row.get(4)?,
    })
}
