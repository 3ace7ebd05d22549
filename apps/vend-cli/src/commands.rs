//! # Console Commands
//!
//! Parses one input line into a [`Command`] and runs it against the
//! machine. Nothing here decides anything about coins; every rule lives in
//! vend-core.
//!
//! ## Command Language
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  deposit <coin>        deposit 50p, deposit £2                          │
//! │  producecoins <pence>  producecoins 748   (= £7.48)                     │
//! │  check [json]          show coins held and total                        │
//! │  exit                  leave the console                                │
//! │                                                                         │
//! │  Keywords are case-insensitive. Empty lines are ignored.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::debug;
use vend_core::validation::parse_pence;
use vend_core::{format_coins, Pence};

use crate::error::CliError;
use crate::state::MachineState;

/// Help text shown on start-up and after unrecognised input.
pub const USAGE: &str =
    "Please enter one of the following actions: deposit <coin>, producecoins <value>, check, exit";

/// One parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Deposit a coin by name.
    Deposit(String),

    /// Pay out change for an amount in pence (still unparsed text).
    ProduceCoins(String),

    /// Show the inventory, optionally as JSON.
    Check { json: bool },

    /// Leave the console.
    Exit,

    /// Blank line.
    Empty,

    /// Anything else.
    Unknown(String),
}

impl Command {
    /// Parses one line of input.
    ///
    /// The whole line is lowercased first, matching how coins are named
    /// (`10P` becomes `10p`; `£` is unaffected).
    pub fn parse(line: &str) -> Command {
        let line = line.trim().to_lowercase();
        let mut parts = line.splitn(2, char::is_whitespace);
        let keyword = parts.next().unwrap_or_default();
        let arg = parts.next().map(str::trim).unwrap_or_default().to_string();

        match keyword {
            "" => Command::Empty,
            "exit" | "quit" => Command::Exit,
            "deposit" => Command::Deposit(arg),
            "producecoins" => Command::ProduceCoins(arg),
            "check" => Command::Check { json: arg == "json" },
            _ => Command::Unknown(line.clone()),
        }
    }
}

/// What the loop should print, and whether it should stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub exit: bool,
}

impl Reply {
    fn print(text: impl Into<String>) -> Self {
        Reply {
            text: text.into(),
            exit: false,
        }
    }

    fn silent() -> Self {
        Reply::print(String::new())
    }
}

/// Options that shape the reply text.
#[derive(Debug, Clone, Copy)]
pub struct ReplyOptions {
    /// Append the session's coin lists to deposit/change replies.
    pub echo_ledger: bool,
}

/// Runs one command.
pub fn execute(state: &MachineState, command: Command, opts: ReplyOptions) -> Result<Reply, CliError> {
    debug!(?command, "Executing command");

    match command {
        Command::Empty => Ok(Reply::silent()),

        Command::Exit => Ok(Reply {
            text: "Terminating Vending Machine...\nBye!".to_string(),
            exit: true,
        }),

        Command::Unknown(_) => Ok(Reply::print(USAGE)),

        Command::Deposit(token) => {
            let (coin, deposited) = state.deposit(&token)?;
            let mut text = format!("Coin deposited: {}", coin);
            if opts.echo_ledger {
                text.push_str(&format!("\nAll coins deposited: {}", format_coins(&deposited)));
            }
            Ok(Reply::print(text))
        }

        Command::ProduceCoins(amount) => {
            let requested = parse_pence(&amount).map_err(|_| {
                CliError::invalid_input(format!(
                    "Cannot process input: {}, please provide value in pence, e.g. £1 = 100",
                    amount
                ))
            })?;

            let receipt = state.produce_coins(requested)?;
            let mut text = format!(
                "For amount: {}, Coins dispensed: {}",
                Pence::new(receipt.requested),
                format_coins(&receipt.coins)
            );
            if opts.echo_ledger {
                text.push_str(&format!(
                    "\nSession deposited: {}",
                    format_coins(&receipt.closed_session.deposited)
                ));
            }
            Ok(Reply::print(text))
        }

        Command::Check { json } => {
            let summary = state.summary()?;
            let text = if json {
                serde_json::to_string_pretty(&summary)
                    .map_err(|e| CliError::internal(format!("Failed to encode summary: {}", e)))?
            } else {
                summary.to_string()
            };
            Ok(Reply::print(text))
        }
    }
}
