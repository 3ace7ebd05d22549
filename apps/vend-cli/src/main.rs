//! # Coin Vend Console
//!
//! Entry point for the `vend` binary. Everything interesting lives in the
//! library so it can be driven from tests with in-memory input.

use vend_cli::{init_tracing, run, CliArgs};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = CliArgs::parse(std::env::args())?;
    run(args).await?;

    Ok(())
}
