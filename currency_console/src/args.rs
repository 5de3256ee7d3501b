//! Command-line arguments for the interactive converter.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use clap::Parser;
use currency_common::DEFAULT_RATES_FILE;
use currency_common::refresh::{DEFAULT_INTERPRETER, DEFAULT_SCRIPT};

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the JSON file with a top-level `rates` object.
    /// Refreshing runs the fetch script from this file's directory, so the
    /// file name must match the one the script writes.
    #[clap(long, env = "CURRENCY_RATES", default_value = DEFAULT_RATES_FILE)]
    pub rates: String,

    /// Number of rates printed at startup.
    #[clap(long, default_value_t = 5)]
    pub preview: usize,

    /// Decimal places for converted amounts. Full precision when omitted.
    #[clap(long)]
    pub precision: Option<usize>,

    /// Fetch script run by the "Refresh rates" menu entry, relative to the current directory.
    #[clap(long, env = "CURRENCY_REFRESH_SCRIPT", default_value = DEFAULT_SCRIPT)]
    pub script: String,

    /// Interpreter used to run the fetch script.
    #[clap(long, default_value = DEFAULT_INTERPRETER)]
    pub interpreter: String,
}
