use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::log;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};

/// Handle the `init` command
///
/// This initializes:
///  - the configuration file (skipped in test mode)
///  - the SQLite database file
///  - the `member` and `log` tables
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let db_path = Config::init_all(cli.db.clone(), cli.test)?;

    let cfg = Config {
        database: db_path.to_string_lossy().to_string(),
        ..cfg.clone()
    };
    let pool = DbPool::from_config(&cfg)?;

    pool.with_conn(|conn| {
        init_db(conn)?;

        // audit failure does not fail init
        let message = format!("database initialized at {}", cfg.database);
        if let Err(e) = log::audit(conn, "init", "", &message) {
            warning(format!("Failed to write internal log: {e}"));
        }
        Ok(())
    })?;

    if !cli.test {
        success(format!("Config file : {}", Config::config_file().display()));
    }
    success(format!("Database initialized at {}", cfg.database));
    Ok(())
}
