//! # Fare Collector Library
//!
//! Terminal front end for the minibus fare collector. Wires configuration,
//! storage and the ledger together and hands them to the shell.
//!
//! ## Module Organization
//! ```text
//! fare_collector/
//! ├── lib.rs           ◄─── You are here (startup & shutdown)
//! ├── state/
//! │   ├── config.rs    ◄─── ConfigState (COLLECTOR_* variables)
//! │   ├── db.rs        ◄─── DbState (SQLite or memory store)
//! │   └── ledger.rs    ◄─── LedgerState (open TripSession)
//! ├── commands/
//! │   ├── trip.rs      ◄─── start / end / new
//! │   ├── passenger.rs ◄─── add / pay / quick / reset / return / remove
//! │   └── summary.rs   ◄─── totals / summary
//! ├── shell/           ◄─── line parsing, confirmation, text rendering
//! └── error.rs         ◄─── ApiError for commands
//! ```

pub mod commands;
pub mod error;
pub mod shell;
pub mod state;

use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

use error::ApiError;
use shell::Shell;
use state::{ConfigState, DbState, LedgerState};

/// Runs the collector on stdin/stdout.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Initialize Logging ──► tracing-subscriber, RUST_LOG overrides      │
/// │  2. Read Configuration ──► ConfigState::from_env()                     │
/// │  3. Open Storage ────────► SQLite (WAL, migrations) or memory store    │
/// │  4. Open Session ────────► load + validate saved trip (load barrier)   │
/// │  5. Run Shell ───────────► until 'quit' or end of input                │
/// │  6. Shut Down ───────────► final snapshot flush, then close the pool   │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> Result<(), ApiError> {
    init_tracing();

    info!("Starting fare collector");

    let config = ConfigState::from_env();
    let db = DbState::open(&config).await?;
    let ledger = LedgerState::open(db.store()).await;

    let mut shell = Shell::new(
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        ledger,
        config,
    );
    let outcome = shell.run().await;

    // Flush even if the shell failed
    let (ledger, _) = shell.into_parts();
    shutdown(ledger, db).await?;

    info!("Fare collector stopped");
    outcome
}

/// Final flush, then close the pool. The pool is closed even when the
/// flush fails.
async fn shutdown(ledger: LedgerState, db: DbState) -> Result<(), ApiError> {
    let flushed = ledger.close().await;
    db.close().await;
    flushed
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so they never interleave with shell output.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=fare=trace` - Show trace for fare crates only
/// - Default: `info,fare=debug,sqlx=warn`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,fare=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
