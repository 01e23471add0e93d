use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::member_repo::delete_by_id;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Del { id } = cmd {
        let pool = DbPool::from_config(cfg)?;
        let deleted = pool.with_conn(|conn| delete_by_id(conn, id))?;
        if deleted == 0 {
            return Err(AppError::NotFound(id.clone()));
        }
        success(format!("Member '{id}' deleted"));
    }
    Ok(())
}
