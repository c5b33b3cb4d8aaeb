use std::process::ExitCode;

use clap::Parser;
use tracing::Level;
use upload_guard::GuardConfig;

mod cli;

use cli::{execute_command, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    let config = GuardConfig::load(cli.config.as_deref())?;

    execute_command(&config, cli.command).await
}
