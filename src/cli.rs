//! CLI - Command Line Interface for moviedb
//!
//! Scriptable front end over the catalog and detail loaders.
//! Output is JSON when requested or when stdout is not a terminal.
//!
//! # Examples
//!
//! ```bash
//! # First two pages of the catalog
//! moviedb discover --pages 2
//!
//! # Detail, reviews and trailer for one movie
//! moviedb detail 550 --json
//! ```

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::io::IsTerminal;
use std::path::PathBuf;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments or configuration
    InvalidArgs = 2,
    /// Network error
    NetworkError = 3,
    /// Movie not found
    NotFound = 4,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// moviedb - browse the TMDB movie catalog from the terminal
#[derive(Parser, Debug)]
#[command(
    name = "moviedb",
    version,
    about = "Browse the TMDB movie catalog",
    after_help = "EXAMPLES:\n\
                  moviedb discover                 First page of the catalog\n\
                  moviedb discover --pages 3       Scroll through three pages\n\
                  moviedb detail 550 --json        Detail, reviews and trailer"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Log loader and HTTP activity to stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }

    /// Default log filter when RUST_LOG is unset
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "moviedb=debug"
        } else {
            "warn"
        }
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List movies from the discover catalog, page by page
    #[command(visible_alias = "ls")]
    Discover(DiscoverCmd),

    /// Show detail, reviews and trailer for a movie
    #[command(visible_alias = "i")]
    Detail(DetailCmd),
}

#[derive(Args, Debug)]
pub struct DiscoverCmd {
    /// Number of pages to load
    #[arg(long, short = 'p', default_value = "1", value_parser = clap::value_parser!(u32).range(1..=500))]
    pub pages: u32,

    /// Maximum number of movies to print
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

#[derive(Args, Debug)]
pub struct DetailCmd {
    /// TMDB movie id
    pub id: u64,

    /// Maximum number of reviews to print
    #[arg(long, short = 'r', default_value = "3")]
    pub reviews: usize,
}

// =============================================================================
// Output Formatting
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

/// Output helper that respects --json and --quiet
#[derive(Debug, Clone)]
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print data as a JSON envelope, or as the given text for terminals
    pub fn print<T: Serialize>(&self, data: T, text: impl Display) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(data);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", text);
        }
        Ok(())
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}
