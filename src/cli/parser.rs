use clap::{Parser, Subcommand};

/// Command-line interface definition for rledger
#[derive(Parser)]
#[command(
    name = "rledger",
    version = env!("CARGO_PKG_VERSION"),
    about = "A small member ledger: balances and atomic transfers over SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Print debug logs on stderr
    #[arg(global = true, long = "verbose", short = 'v')]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Create a member
    Add {
        /// Member id
        id: String,

        /// Initial balance
        money: i64,

        #[arg(
            long = "retry-on-duplicate",
            help = "If the id is taken, retry once with a random numeric suffix"
        )]
        retry_on_duplicate: bool,
    },

    /// Show one member
    Get { id: String },

    /// List all members
    List {
        #[arg(long = "json", help = "Print members as JSON")]
        json: bool,
    },

    /// Set the balance of a member
    Update { id: String, money: i64 },

    /// Delete a member
    Del { id: String },

    /// Delete all members
    Clear,

    /// Move money between two members atomically
    Transfer {
        from: String,
        to: String,
        amount: i64,
    },

    /// Show the effective configuration
    Config {
        #[arg(long = "print", help = "Print the effective configuration")]
        print_config: bool,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}
