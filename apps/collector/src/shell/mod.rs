//! # Shell
//!
//! Line-oriented front end over stdin/stdout (or any async reader/writer,
//! which is how the tests drive it).
//!
//! ## Loop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  prompt "> "                                                           │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  read line ── EOF ─────────────────────────────────────► stop          │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  parse_line ── Err ──► "! message"                                      │
//! │     │                                                                   │
//! │     ├── quit ───────────────────────────────────────────► stop          │
//! │     ├── end / new ──► "End trip? [y/N]" ── no ──► "Cancelled."         │
//! │     ▼                                                                   │
//! │  commands::* ── Err ──► "! message"                                     │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  render ──► output                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Confirmation lives here, not in the ledger: `end_trip` and `reset_app`
//! apply immediately when called.

mod parse;
mod render;

pub use parse::{is_yes, parse_line, ShellCommand};

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use crate::commands::{passenger, summary, trip};
use crate::error::ApiError;
use crate::state::{ConfigState, LedgerState};

/// What to do after a line.
enum Flow {
    Continue,
    Quit,
}

pub struct Shell<R, W> {
    input: R,
    output: W,
    ledger: LedgerState,
    config: ConfigState,
}

impl<R, W> Shell<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(input: R, output: W, ledger: LedgerState, config: ConfigState) -> Self {
        Shell {
            input,
            output,
            ledger,
            config,
        }
    }

    /// Runs until `quit` or end of input.
    pub async fn run(&mut self) -> Result<(), ApiError> {
        let banner = render::trip(&trip::get_trip(&self.ledger), &self.config);
        self.say(&format!("Fare collector. Type 'help' for commands.\n{}", banner))
            .await?;

        loop {
            self.output.write_all(b"> ").await?;
            self.output.flush().await?;

            let Some(line) = self.read_line().await? else {
                debug!("Input closed");
                break;
            };

            match self.handle_line(&line).await? {
                Flow::Continue => {}
                Flow::Quit => break,
            }
        }

        info!("Shell stopped");
        Ok(())
    }

    /// Hands back the ledger (for the final flush) and the output.
    pub fn into_parts(self) -> (LedgerState, W) {
        (self.ledger, self.output)
    }

    async fn handle_line(&mut self, line: &str) -> Result<Flow, ApiError> {
        let command = match parse_line(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(Flow::Continue),
            Err(e) => {
                self.say(&format!("! {}", e)).await?;
                return Ok(Flow::Continue);
            }
        };

        let confirmed = match command {
            ShellCommand::Quit => return Ok(Flow::Quit),
            ShellCommand::End { confirmed: false } => self.confirm("End trip?").await?,
            ShellCommand::New { confirmed: false } => {
                self.confirm("Discard this trip and start over?").await?
            }
            _ => true,
        };
        if !confirmed {
            self.say("Cancelled.").await?;
            return Ok(Flow::Continue);
        }

        let reply = match self.execute(command) {
            Ok(text) => text,
            Err(e) => format!("! {}", e),
        };
        self.say(&reply).await?;
        Ok(Flow::Continue)
    }

    /// Runs one command and renders its result.
    fn execute(&mut self, command: ShellCommand) -> Result<String, ApiError> {
        let config = &self.config;
        let state = &mut self.ledger;

        let text = match command {
            ShellCommand::Start(fare) => render::trip(&trip::start_trip(state, fare)?, config),
            ShellCommand::Fares => render::fares(&trip::common_fares()),
            ShellCommand::Add => {
                let added = passenger::add_passenger(state)?;
                format!("Added {}", render::passenger(&added, config))
            }
            ShellCommand::Pay { number, amount } => {
                render::passenger(&passenger::pay(state, number, amount)?, config)
            }
            ShellCommand::Quick { number, choice } => {
                render::passenger(&passenger::quick_pay(state, number, choice)?, config)
            }
            ShellCommand::Reset(number) => {
                render::passenger(&passenger::reset_payment(state, number)?, config)
            }
            ShellCommand::Return(number) => {
                render::passenger(&passenger::return_change(state, number)?, config)
            }
            ShellCommand::Remove(number) => {
                passenger::remove_passenger(state, number)?;
                format!("Removed #{}", number)
            }
            ShellCommand::List => render::passengers(&passenger::list_passengers(state), config),
            ShellCommand::Totals => render::totals(&summary::get_totals(state), config),
            ShellCommand::End { .. } => render::summary(&trip::end_trip(state)?, config),
            ShellCommand::Summary => render::summary(&summary::get_summary(state)?, config),
            ShellCommand::New { .. } => render::trip(&trip::new_trip(state)?, config),
            ShellCommand::Help => render::HELP.to_string(),
            ShellCommand::Quit => String::new(),
        };
        Ok(text)
    }

    async fn confirm(&mut self, question: &str) -> Result<bool, ApiError> {
        self.output
            .write_all(format!("{} [y/N] ", question).as_bytes())
            .await?;
        self.output.flush().await?;
        Ok(self.read_line().await?.map(|a| is_yes(&a)).unwrap_or(false))
    }

    async fn read_line(&mut self) -> Result<Option<String>, ApiError> {
        let mut line = String::new();
        let read = self.input.read_line(&mut line).await?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    async fn say(&mut self, text: &str) -> Result<(), ApiError> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.write_all(b"\n").await?;
        self.output.flush().await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use fare_core::snapshot::decode_snapshot;
    use fare_core::{Money, TripStatus, SNAPSHOT_KEY};
    use fare_db::MemoryStore;
    use std::sync::Arc;

    /// Runs a script against `store` and returns the transcript.
    async fn run_script(store: &MemoryStore, script: &str) -> String {
        let ledger = LedgerState::open(Arc::new(store.clone())).await;
        let mut shell = Shell::new(
            script.as_bytes(),
            Vec::new(),
            ledger,
            ConfigState::default(),
        );
        shell.run().await.unwrap();

        let (ledger, output) = shell.into_parts();
        ledger.close().await.unwrap();
        String::from_utf8(output).unwrap()
    }

    #[tokio::test]
    async fn test_full_trip_transcript() {
        let store = MemoryStore::new();
        let out = run_script(
            &store,
            "start 15\nadd\nadd\npay 1 15\nquick 2 2\nreturn 2\nlist\nend\ny\nquit\n",
        )
        .await;

        assert!(out.contains("Trip active since"));
        assert!(out.contains("CHANGE 35 Br to return"));
        assert!(out.contains("change returned"));
        assert!(out.contains("End trip? [y/N]"));
        assert!(out.contains("BALANCED"));

        let saved = decode_snapshot(&store.get(SNAPSHOT_KEY).unwrap()).unwrap();
        assert_eq!(saved.status, TripStatus::Summary);
        assert_eq!(saved.total_collected(), Money::from_units(65));
    }

    #[tokio::test]
    async fn test_declined_confirmation_keeps_trip() {
        let store = MemoryStore::new();
        let out = run_script(&store, "start 10\nadd\nend\nn\nnew\n\n").await;

        assert!(out.contains("Cancelled."));
        let saved = decode_snapshot(&store.get(SNAPSHOT_KEY).unwrap()).unwrap();
        assert_eq!(saved.status, TripStatus::Active);
        assert_eq!(saved.passenger_count(), 1);
    }

    #[tokio::test]
    async fn test_errors_are_reported_and_shell_continues() {
        let store = MemoryStore::new();
        let out = run_script(&store, "fly\nadd\nstart 20\npay 9 10\nend!\nsummary\n").await;

        assert!(out.contains("! Unknown command 'fly'"));
        assert!(out.contains("! trip is Start, command needs an active trip"));
        assert!(out.contains("! Passenger not found: #9"));
        assert!(out.contains("== Trip summary =="));
    }

    #[tokio::test]
    async fn test_trip_survives_restart() {
        let store = MemoryStore::new();
        run_script(&store, "start 25\nadd\npay 1 30\n").await;

        let out = run_script(&store, "list\nadd\n").await;
        assert!(out.contains("Trip active since"));
        assert!(out.contains("#1"));
        assert!(out.contains("Added #2"));
    }
}
