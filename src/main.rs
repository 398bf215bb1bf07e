//! moviedb - browse the TMDB movie catalog from the terminal
//!
//! # Usage
//!
//! ```bash
//! export TMDB_API_KEY=...
//! moviedb discover --pages 2
//! moviedb detail 550
//! ```

use clap::Parser;
use tracing_subscriber::EnvFilter;

use moviedb::cli::{Cli, Command, ExitCode, Output};
use moviedb::commands;
use moviedb::config::Config;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    let output = Output::new(&cli);
    let config = match &cli.config {
        Some(path) => match Config::load_from(path) {
            Ok(config) => config,
            Err(e) => return output.error(format!("{:#}", e), ExitCode::InvalidArgs).into(),
        },
        None => Config::load(),
    };

    let code = match cli.command {
        Command::Discover(cmd) => commands::discover_cmd(cmd, &config, &output).await,
        Command::Detail(cmd) => commands::detail_cmd(cmd, &config, &output).await,
    };
    code.into()
}

/// Log to stderr so JSON on stdout stays parseable
fn init_tracing(cli: &Cli) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| cli.log_filter().into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
