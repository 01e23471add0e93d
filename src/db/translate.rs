//! Translate SQLite driver errors into store-agnostic `AppError`s.

use crate::errors::AppError;
use rusqlite::ErrorCode;
use rusqlite::ffi;

/// Map a driver error raised by `operation` (running `sql`) to an AppError.
///
/// Primary key and unique constraint violations become `DuplicateKey`, so the
/// caller can retry with another key; everything else is a `Statement` failure.
pub fn translate(operation: &str, sql: &str, err: rusqlite::Error) -> AppError {
    let duplicate = match &err {
        rusqlite::Error::SqliteFailure(e, _) => {
            e.code == ErrorCode::ConstraintViolation
                && (e.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                    || e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE)
        }
        _ => false,
    };

    if duplicate {
        AppError::DuplicateKey {
            operation: operation.to_string(),
            sql: sql.to_string(),
            message: err.to_string(),
        }
    } else {
        AppError::Statement {
            operation: operation.to_string(),
            sql: sql.to_string(),
            message: err.to_string(),
        }
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        translate("sqlite", "", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use rusqlite::Connection;

    #[test]
    fn primary_key_violation_becomes_duplicate_key() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (k TEXT PRIMARY KEY);")
            .unwrap();
        conn.execute("INSERT INTO t (k) VALUES ('a')", []).unwrap();

        let sql = "INSERT INTO t (k) VALUES ('a')";
        let err = conn.execute(sql, []).unwrap_err();
        let translated = translate("save", sql, err);

        assert_eq!(translated.kind(), ErrorKind::DuplicateKey);
        match translated {
            AppError::DuplicateKey { operation, sql: s, .. } => {
                assert_eq!(operation, "save");
                assert_eq!(s, sql);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn other_failures_become_statement_errors() {
        let conn = Connection::open_in_memory().unwrap();
        let err = conn.execute("SELEC nonsense", []).unwrap_err();

        let translated = translate("find_all", "SELEC nonsense", err);
        assert_eq!(translated.kind(), ErrorKind::Statement);
        assert!(translated.to_string().contains("find_all"));
    }

    #[test]
    fn not_null_violation_is_not_a_duplicate() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (k TEXT PRIMARY KEY, v INTEGER NOT NULL);")
            .unwrap();
        let err = conn
            .execute("INSERT INTO t (k, v) VALUES ('a', NULL)", [])
            .unwrap_err();

        assert_eq!(translate("save", "", err).kind(), ErrorKind::Statement);
    }
}
