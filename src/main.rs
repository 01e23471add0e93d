//! rledger main entrypoint.

use rledger::run;
use rledger::ui::messages;

fn main() {
    if let Err(e) = run() {
        messages::error(format!("Error: {e}"));
        std::process::exit(1);
    }
}
