use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::transfer::TransferService;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Transfer { from, to, amount } = cmd {
        let pool = DbPool::from_config(cfg)?;
        let service = TransferService::new(pool, cfg.blocked_members.clone());
        service.account_transfer(from, to, *amount)?;
        success(format!("Transferred {amount} from '{from}' to '{to}'"));
    }
    Ok(())
}
