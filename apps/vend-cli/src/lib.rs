//! # Coin Vend Console
//!
//! Interactive front-end for the vend-core change engine.
//!
//! ## Module Organization
//! ```text
//! vend_cli/
//! ├── lib.rs          ◄─── You are here (start-up & line loop)
//! ├── config.rs       ◄─── MachineConfig (defaults, vend.toml, VEND_*)
//! ├── state.rs        ◄─── MachineState (Arc<Mutex<ChangeEngine>>)
//! ├── commands.rs     ◄─── Line parsing & command execution
//! └── error.rs        ◄─── CliError for console replies
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Console Startup                                   │
//! │                                                                         │
//! │  1. Initialize Logging ───────────────────────────────────────────────► │
//! │     • tracing-subscriber with env filter, written to stderr             │
//! │     • Default: warn, info for vend crates; override with RUST_LOG       │
//! │                                                                         │
//! │  2. Load Configuration ───────────────────────────────────────────────► │
//! │     • defaults < vend.toml < VEND_* environment                         │
//! │                                                                         │
//! │  3. Build Engine ─────────────────────────────────────────────────────► │
//! │     • ChangeEngine::new(initial_coins), wrapped in MachineState         │
//! │                                                                         │
//! │  4. Line Loop ────────────────────────────────────────────────────────► │
//! │     • stdin lines until `exit`, EOF, Ctrl+C or a fatal error            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod state;

use std::path::PathBuf;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use vend_core::ChangeEngine;

use commands::{execute, Command, ReplyOptions, USAGE};
use config::MachineConfig;
use error::CliError;
use state::MachineState;

/// Parsed command-line arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliArgs {
    /// `--config <path>`
    pub config_path: Option<PathBuf>,

    /// `--help`
    pub help: bool,
}

impl CliArgs {
    /// Parses arguments, skipping the program name.
    pub fn parse<I>(args: I) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = CliArgs::default();
        let mut args = args.into_iter().skip(1);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" | "-c" => {
                    let path = args.next().ok_or_else(|| {
                        CliError::invalid_input("--config needs a file path")
                    })?;
                    parsed.config_path = Some(PathBuf::from(path));
                }
                "--help" | "-h" => parsed.help = true,
                other => {
                    return Err(CliError::invalid_input(format!(
                        "Unknown argument: {}",
                        other
                    )))
                }
            }
        }

        Ok(parsed)
    }
}

/// Printed for `--help`.
pub const HELP: &str = "\
Coin Vend - vending machine change console

Usage: vend [OPTIONS]

Options:
  -c, --config <PATH>  Config file (default: platform config dir/vend.toml)
  -h, --help           Show this help message

Environment:
  VEND_INITIAL_COINS   Comma-separated counts for 1p,2p,5p,10p,20p,50p,£1,£2,£5
  VEND_PROMPT          Prompt text
  VEND_ECHO_LEDGER     Show session coin lists (true/false)
  RUST_LOG             Log filter (logs go to stderr)";

/// Runs the console against stdin/stdout until exit or Ctrl+C.
pub async fn run(args: CliArgs) -> Result<(), CliError> {
    if args.help {
        println!("{}", HELP);
        return Ok(());
    }

    let config = MachineConfig::load(args.config_path)?;
    let engine = ChangeEngine::new(&config.initial_coins)?;
    let state = MachineState::new(engine);

    info!("Starting up Vending Machine");

    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();

    tokio::select! {
        result = run_loop(&state, &config, stdin, stdout) => result,
        _ = shutdown_signal() => {
            info!("Interrupted, terminating Vending Machine");
            Ok(())
        }
    }
}

/// Reads commands from `reader` and writes replies to `writer`.
///
/// Ends on `exit`, end of input, or a fatal engine error (returned as `Err`).
/// A line that is not valid UTF-8 is rejected like any other bad input.
pub async fn run_loop<R, W>(
    state: &MachineState,
    config: &MachineConfig,
    mut reader: R,
    mut writer: W,
) -> Result<(), CliError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let opts = ReplyOptions {
        echo_ledger: config.echo_ledger,
    };

    let banner = format!(
        "Starting up Vending Machine...\n{}\n\n{}\n",
        state.summary()?,
        USAGE
    );
    writer.write_all(banner.as_bytes()).await?;

    let mut raw = Vec::new();
    loop {
        writer.write_all(config.prompt.as_bytes()).await?;
        writer.flush().await?;

        raw.clear();
        if reader.read_until(b'\n', &mut raw).await? == 0 {
            break;
        }

        let outcome = decode_line(&raw).and_then(|line| execute(state, Command::parse(line), opts));
        match outcome {
            Ok(reply) => {
                if !reply.text.is_empty() {
                    writer.write_all(format!("{}\n", reply.text).as_bytes()).await?;
                }
                if reply.exit {
                    break;
                }
            }
            Err(e) if e.is_fatal() => {
                writer.write_all(format!("{}\n", e).as_bytes()).await?;
                writer.flush().await?;
                return Err(e);
            }
            Err(e) => {
                warn!(code = ?e.code, "Command rejected");
                writer.write_all(format!("{}\n", e).as_bytes()).await?;
            }
        }
    }

    writer.flush().await?;
    Ok(())
}

/// Interprets one raw console line as text.
fn decode_line(raw: &[u8]) -> Result<&str, CliError> {
    std::str::from_utf8(raw).map_err(|_| {
        CliError::invalid_input("Cannot read input: please type plain UTF-8 text, e.g. deposit £1")
    })
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show every coin the change walk considers
/// - `RUST_LOG=vend_core=trace` - Core crate only
/// - Default: warn, with info for the vend crates
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,vend_core=info,vend_cli=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolves on Ctrl+C (or SIGTERM on unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
