use crate::errors::AppResult;
use rusqlite::Connection;

/// Create the schema. Safe to run on an already initialized database.
pub fn init_db(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS member (
            member_id TEXT PRIMARY KEY NOT NULL,
            money     INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}
