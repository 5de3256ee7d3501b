//! Currency Console — an interactive menu for converting amounts between currencies.
//!
//! It loads a JSON rates file (`{"rates": {"USD": 1.0, "EUR": 0.9, ...}}`), prints
//! the first few rates, then loops over a small menu: convert, search codes,
//! refresh the rates via the external fetch script, exit.
//!
//! Usage example (CLI):
//! ```bash
//! currency_console --rates ./currency_rates.json --precision 2
//! ```
//!
//! Diagnostics go to stderr through `env_logger` (`RUST_LOG=debug` for more detail);
//! the menu itself is written to stdout.
#![warn(missing_docs)]
mod args;
mod menu;
mod session;

use crate::args::Args;
use crate::session::Session;
use clap::Parser;
use currency_common::paths::{is_regular_file, normalize_path};
use currency_common::{ConverterError, RateTable, Result, ScriptRefresher};
use log::{error, info, warn};
use std::io;

fn main() -> Result<(), ConverterError> {
    init_logger();
    let args = Args::parse();

    let rates_path = normalize_path(&args.rates);
    let table = match RateTable::load_file(&rates_path) {
        Ok(table) => table,
        Err(e) => {
            error!("Failed to load currency rates: {}", e);
            return Err(e);
        }
    };
    info!(
        "Loaded {} currency rates from {}",
        table.len(),
        rates_path.display()
    );

    let script_path = normalize_path(&args.script);
    if !is_regular_file(&script_path) {
        warn!(
            "Refresh script {} not found; refreshing rates will fail",
            script_path.display()
        );
    }
    let refresher = ScriptRefresher::new(script_path, &rates_path).with_interpreter(&args.interpreter);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = Session::new(stdin.lock(), stdout.lock(), table, refresher)
        .with_preview(args.preview)
        .with_precision(args.precision);

    if let Err(e) = session.run() {
        error!("Console session failed: {}", e);
        return Err(e);
    }
    Ok(())
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
