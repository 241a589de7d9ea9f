//! # Fare Collector Entry Point
//!
//! ```text
//! $ fare-collector
//! Fare collector. Type 'help' for commands.
//! No trip running. Use 'start <fare>' to begin.
//! > start 15
//! > add
//! > pay 1 50
//! #1   paid      50 Br   CHANGE 35 Br to return
//! ```
//!
//! The actual setup is in lib.rs for testability.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match fare_collector::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("fare-collector: {}", e);
            ExitCode::FAILURE
        }
    }
}
