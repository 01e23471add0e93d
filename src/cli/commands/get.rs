use crate::cli::commands::list::print_members;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::member_repo::find_by_id;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Get { id } = cmd {
        let pool = DbPool::from_config(cfg)?;
        let member = pool.with_conn(|conn| find_by_id(conn, id))?;
        print_members(&[member]);
    }
    Ok(())
}
