use rusqlite::Connection;

use crate::error::WeekloadError;

pub fn run_migrations(conn: &Connection) -> Result<(), WeekloadError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS resources (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            color TEXT NOT NULL,
            photo_url TEXT,
            show_on_dashboard INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS clients (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            color TEXT NOT NULL DEFAULT '#808080',
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS tasks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            notes TEXT,
            resource_id INTEGER NOT NULL,
            client_id INTEGER NOT NULL,
            deadline TEXT,
            workload INTEGER NOT NULL DEFAULT 0,
            estimated_days INTEGER NOT NULL DEFAULT 0,
            task_type TEXT NOT NULL DEFAULT 'oneshot'
                CHECK (task_type IN ('oneshot', 'recurring')),
            is_completed INTEGER NOT NULL DEFAULT 0,
            is_archived INTEGER NOT NULL DEFAULT 0,
            week_number INTEGER NOT NULL,
            year INTEGER NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_tasks_week ON tasks(week_number, year);
        CREATE INDEX IF NOT EXISTS idx_tasks_year ON tasks(year);
        ",
    )?;
    Ok(())
}
