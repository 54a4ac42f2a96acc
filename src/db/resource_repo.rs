use rusqlite::{params, Connection};

use crate::error::WeekloadError;
use crate::models::Resource;

pub fn create_resource(
    conn: &Connection,
    name: &str,
    color: &str,
    photo_url: Option<&str>,
    show_on_dashboard: bool,
) -> Result<Resource, WeekloadError> {
    if name.trim().is_empty() {
        return Err(WeekloadError::validation("Resource name must not be empty"));
    }
    conn.execute(
        "INSERT INTO resources (name, color, photo_url, show_on_dashboard)
         VALUES (?1, ?2, ?3, ?4)",
        params![name, color, photo_url, show_on_dashboard as i64],
    )?;
    get_resource(conn, conn.last_insert_rowid())
}

pub fn get_resource(conn: &Connection, id: i64) -> Result<Resource, WeekloadError> {
    conn.query_row(
        "SELECT id, name, color, photo_url, show_on_dashboard, created_at
         FROM resources WHERE id = ?1",
        params![id],
        row_to_resource,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => WeekloadError::resource_not_found(id),
        _ => WeekloadError::from(e),
    })
}

/// All resources, alphabetized for display.
pub fn list_resources(conn: &Connection) -> Result<Vec<Resource>, WeekloadError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, color, photo_url, show_on_dashboard, created_at
         FROM resources ORDER BY name ASC",
    )?;
    let resources = stmt
        .query_map([], row_to_resource)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(resources)
}

pub fn set_dashboard(conn: &Connection, id: i64, show: bool) -> Result<(), WeekloadError> {
    let affected = conn.execute(
        "UPDATE resources SET show_on_dashboard = ?1 WHERE id = ?2",
        params![show as i64, id],
    )?;
    if affected == 0 {
        return Err(WeekloadError::resource_not_found(id));
    }
    Ok(())
}

pub fn resource_exists(conn: &Connection, id: i64) -> Result<bool, WeekloadError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM resources WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn row_to_resource(row: &rusqlite::Row) -> rusqlite::Result<Resource> {
    Ok(Resource {
        id: row.get(0)?,
        name: row.get(1)?,
        color: row.get(2)?,
        photo_url: row.get(3)?,
        show_on_dashboard: row.get(4)?,
        created_at: row.get(5)?,
    })
}
