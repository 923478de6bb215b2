use anyhow::{Context, Result};
use rusqlite::Connection;

use super::migrations;

pub fn initialize_schema(conn: &Connection) -> Result<()> {
    create_shifts_table(conn)?;
    run_shift_migrations(conn)?;
    create_shift_indexes(conn)?;
    Ok(())
}

fn create_shifts_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS shifts (
            id TEXT PRIMARY KEY,
            employee_id TEXT NOT NULL,
            shift_date TEXT NOT NULL,
            start_time TEXT NOT NULL,
            end_time TEXT NOT NULL,
            shift_type TEXT NOT NULL DEFAULT 'trivia',
            theme TEXT,
            location TEXT NOT NULL,
            notes TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("Failed to create shifts table")?;

    Ok(())
}

fn run_shift_migrations(conn: &Connection) -> Result<()> {
    migrations::ensure_column(
        conn,
        "shifts",
        "theme",
        "ALTER TABLE shifts ADD COLUMN theme TEXT",
    )?;
    migrations::ensure_column(
        conn,
        "shifts",
        "created_at",
        "ALTER TABLE shifts ADD COLUMN created_at TEXT",
    )?;
    migrations::ensure_column(
        conn,
        "shifts",
        "updated_at",
        "ALTER TABLE shifts ADD COLUMN updated_at TEXT",
    )?;
    Ok(())
}

fn create_shift_indexes(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_shifts_employee_date
         ON shifts (employee_id, shift_date)",
        [],
    )
    .context("Failed to create shift index")?;
    Ok(())
}
