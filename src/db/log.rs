use crate::db::translate::translate;
use crate::errors::AppResult;
use crate::models::log_entry::LogEntry;
use chrono::Local;
use rusqlite::{Connection, params};

const INSERT_SQL: &str = "INSERT INTO log (date, operation, target, message) VALUES (?1, ?2, ?3, ?4)";
const SELECT_SQL: &str = "SELECT id, date, operation, target, message FROM log ORDER BY id ASC";

/// Write an audit line into the `log` table through `conn`.
///
/// Inside a unit of work the line shares the fate of the surrounding
/// transaction.
pub fn audit(conn: &Connection, operation: &str, target: &str, message: &str) -> AppResult<()> {
    let now = Local::now().to_rfc3339();

    let mut stmt = conn
        .prepare_cached(INSERT_SQL)
        .map_err(|e| translate("audit", INSERT_SQL, e))?;
    stmt.execute(params![now, operation, target, message])
        .map_err(|e| translate("audit", INSERT_SQL, e))?;

    Ok(())
}

pub fn load_log(conn: &Connection) -> AppResult<Vec<LogEntry>> {
    let mut stmt = conn
        .prepare_cached(SELECT_SQL)
        .map_err(|e| translate("load_log", SELECT_SQL, e))?;

    let rows = stmt
        .query_map([], |row| {
            Ok(LogEntry {
                id: row.get(0)?,
                date: row.get(1)?,
                operation: row.get(2)?,
                target: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                message: row.get(4)?,
            })
        })
        .map_err(|e| translate("load_log", SELECT_SQL, e))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r.map_err(|e| translate("load_log", SELECT_SQL, e))?);
    }
    Ok(out)
}
