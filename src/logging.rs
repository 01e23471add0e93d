//! Tracing setup for the rledger binary.
//!
//!   rledger --verbose ...          # debug output from the pool and units of work
//!   RUST_LOG=rledger=trace rledger # fine-grained control, wins over --verbose
//!
//! Logs go to stderr so command output on stdout stays parseable.

use tracing_subscriber::EnvFilter;

pub fn init_tracing(verbose: bool) -> Result<(), String> {
    let default = if verbose { "rledger=debug" } else { "rledger=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|err| err.to_string())
}
