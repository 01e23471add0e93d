//! CRUD statements for the `member` table.
//!
//! Every function takes the connection explicitly: inside a unit of work pass
//! `ctx.conn()`, outside use `DbPool::with_conn`. Driver errors are translated
//! before they leave this module.

use crate::db::translate::translate;
use crate::errors::{AppError, AppResult};
use crate::models::member::Member;
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, error, info};

const SAVE_SQL: &str = "INSERT INTO member (member_id, money) VALUES (?1, ?2)";
const FIND_BY_ID_SQL: &str = "SELECT member_id, money FROM member WHERE member_id = ?1";
const FIND_ALL_SQL: &str = "SELECT member_id, money FROM member ORDER BY member_id ASC";
const UPDATE_SQL: &str = "UPDATE member SET money = ?1 WHERE member_id = ?2";
const DELETE_SQL: &str = "DELETE FROM member WHERE member_id = ?1";
const CLEAR_SQL: &str = "DELETE FROM member";

pub fn save(conn: &Connection, member: &Member) -> AppResult<Member> {
    match conn.execute(SAVE_SQL, params![member.member_id, member.money]) {
        Ok(inserted) => {
            info!(member_id = %member.member_id, inserted, "member saved");
            Ok(member.clone())
        }
        Err(e) => {
            error!(member_id = %member.member_id, error = %e, "member save failed");
            Err(translate("save", SAVE_SQL, e))
        }
    }
}

/// Fetch one member. An absent key is `NotFound`, never a store failure.
pub fn find_by_id(conn: &Connection, member_id: &str) -> AppResult<Member> {
    let found = conn
        .query_row(FIND_BY_ID_SQL, [member_id], Member::map_row)
        .optional()
        .map_err(|e| {
            error!(member_id, error = %e, "member lookup failed");
            translate("find_by_id", FIND_BY_ID_SQL, e)
        })?;

    found.ok_or_else(|| AppError::NotFound(member_id.to_string()))
}

pub fn find_all(conn: &Connection) -> AppResult<Vec<Member>> {
    let mut stmt = conn
        .prepare(FIND_ALL_SQL)
        .map_err(|e| translate("find_all", FIND_ALL_SQL, e))?;

    let rows = stmt
        .query_map([], Member::map_row)
        .map_err(|e| translate("find_all", FIND_ALL_SQL, e))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r.map_err(|e| translate("find_all", FIND_ALL_SQL, e))?);
    }
    debug!(count = out.len(), "members loaded");
    Ok(out)
}

/// Set the balance of `member_id`. Returns the number of rows updated.
pub fn update_by_id(conn: &Connection, member_id: &str, money: i64) -> AppResult<usize> {
    let updated = conn
        .execute(UPDATE_SQL, params![money, member_id])
        .map_err(|e| {
            error!(member_id, error = %e, "member update failed");
            translate("update_by_id", UPDATE_SQL, e)
        })?;
    info!(member_id, money, updated, "member updated");
    Ok(updated)
}

pub fn delete_by_id(conn: &Connection, member_id: &str) -> AppResult<usize> {
    let deleted = conn
        .execute(DELETE_SQL, [member_id])
        .map_err(|e| translate("delete_by_id", DELETE_SQL, e))?;
    info!(member_id, deleted, "member deleted");
    Ok(deleted)
}

pub fn clear_all(conn: &Connection) -> AppResult<usize> {
    let deleted = conn
        .execute(CLEAR_SQL, [])
        .map_err(|e| translate("clear_all", CLEAR_SQL, e))?;
    info!(deleted, "members cleared");
    Ok(deleted)
}
