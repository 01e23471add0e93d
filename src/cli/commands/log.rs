use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::load_log;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::info;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if matches!(cmd, Commands::Log { print: true }) {
        let pool = DbPool::from_config(cfg)?;
        let entries = pool.with_conn(load_log)?;

        if entries.is_empty() {
            info("Internal log is empty.");
            return Ok(());
        }

        for e in entries {
            let op_target = if e.target.is_empty() {
                e.operation.clone()
            } else {
                format!("{} ({})", e.operation, e.target)
            };
            println!("{:>4}  {}  {:<28}  {}", e.id, e.date, op_target, e.message);
        }
    }
    Ok(())
}
