use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::member_repo::find_all;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::member::Member;
use crate::ui::messages::info;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List { json } = cmd {
        let pool = DbPool::from_config(cfg)?;
        let members = pool.with_conn(find_all)?;

        if *json {
            let out = serde_json::to_string_pretty(&members)
                .map_err(|e| AppError::Config(format!("JSON serialization failed: {e}")))?;
            println!("{out}");
        } else if members.is_empty() {
            info("No members found.");
        } else {
            print_members(&members);
        }
    }
    Ok(())
}

/// Two-column table: id, balance.
pub fn print_members(members: &[Member]) {
    let width = members
        .iter()
        .map(|m| m.member_id.chars().count())
        .max()
        .unwrap_or(0)
        .max("MEMBER".len());

    println!("{:<width$}  {:>12}", "MEMBER", "MONEY");
    for m in members {
        println!("{:<width$}  {:>12}", m.member_id, m.money);
    }
}
