use crate::config::Config;
use crate::db::member_repo::clear_all;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::success;

pub fn handle(cfg: &Config) -> AppResult<()> {
    let pool = DbPool::from_config(cfg)?;
    let deleted = pool.with_conn(clear_all)?;
    success(format!("{deleted} member(s) deleted"));
    Ok(())
}
