use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::create::MemberCreator;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Add {
        id,
        money,
        retry_on_duplicate,
    } = cmd
    {
        let pool = DbPool::from_config(cfg)?;
        let member = MemberCreator::create(&pool, id, *money, *retry_on_duplicate)?;
        success(format!(
            "Member '{}' created with balance {}",
            member.member_id, member.money
        ));
    }
    Ok(())
}
