#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use rledger::config::PoolConfig;
use rledger::db::initialize::init_db;
use rledger::db::member_repo;
use rledger::db::pool::DbPool;
use rledger::models::member::Member;
use std::sync::Arc;
use tempfile::TempDir;

pub const MEMBER_A: &str = "memberA";
pub const MEMBER_B: &str = "memberB";
pub const MEMBER_EX: &str = "ex";

pub fn rl() -> Command {
    cargo_bin_cmd!("rledger")
}

/// Temp directory plus a database path inside it. Keep the dir alive for the test.
pub fn setup_test_db(name: &str) -> (TempDir, String) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join(format!("{name}_rledger.sqlite"));
    (dir, path.to_string_lossy().to_string())
}

/// Initialized pool over a fresh database.
pub fn fresh_pool(dir: &TempDir, max_size: usize, acquire_timeout_ms: u64) -> Arc<DbPool> {
    let config = PoolConfig {
        max_size,
        acquire_timeout_ms,
        ..PoolConfig::default()
    };
    let pool = DbPool::with_config(dir.path().join("ledger.sqlite"), config).expect("pool");
    pool.with_conn(init_db).expect("init db");
    Arc::new(pool)
}

pub fn seed(pool: &DbPool, members: &[(&str, i64)]) {
    pool.with_conn(|conn| {
        for (id, money) in members {
            member_repo::save(conn, &Member::new(*id, *money))?;
        }
        Ok(())
    })
    .expect("seed members");
}

pub fn balance(pool: &DbPool, id: &str) -> i64 {
    pool.with_conn(|conn| member_repo::find_by_id(conn, id))
        .expect("member exists")
        .money
}

pub fn clear(pool: &DbPool) {
    pool.with_conn(member_repo::clear_all).expect("clear members");
}

/// Every acquired handle has been released and nothing is checked out.
pub fn assert_all_released(pool: &DbPool) {
    let stats = pool.stats();
    assert_eq!(stats.acquired, stats.released, "stats: {stats:?}");
    assert_eq!(stats.in_use, 0, "stats: {stats:?}");
}
