use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::member_repo::update_by_id;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Update { id, money } = cmd {
        let pool = DbPool::from_config(cfg)?;
        let updated = pool.with_conn(|conn| update_by_id(conn, id, *money))?;
        if updated == 0 {
            return Err(AppError::NotFound(id.clone()));
        }
        success(format!("Balance of '{id}' set to {money}"));
    }
    Ok(())
}
