//! `notes` table definition and readiness checks.
//!
//! # Invariants
//! - `init_schema` is idempotent (`CREATE TABLE IF NOT EXISTS`).
//! - `AUTOINCREMENT` keeps ids monotonic until `sqlite_sequence` is reset.

use super::DbResult;
use log::info;
use rusqlite::Connection;

/// Name of the single application table.
pub const NOTES_TABLE: &str = "notes";

/// Columns the repository reads and writes.
pub const NOTES_COLUMNS: &[&str] = &["id", "note", "tags"];

const CREATE_NOTES_SQL: &str = "CREATE TABLE IF NOT EXISTS notes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    note TEXT NOT NULL,
    tags TEXT
);";

/// Creates the `notes` table when absent. Safe to call repeatedly.
pub fn init_schema(conn: &Connection) -> DbResult<()> {
    let existed = table_exists(conn, NOTES_TABLE)?;
    conn.execute_batch(CREATE_NOTES_SQL)?;
    info!(
        "event=schema_init module=db status=ok table={} created={}",
        NOTES_TABLE, !existed
    );
    Ok(())
}

/// Returns whether `table` exists in the connected database.
pub fn table_exists(conn: &Connection, table: &str) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

/// Returns whether `table` declares `column`.
pub fn table_has_column(conn: &Connection, table: &str, column: &str) -> DbResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
