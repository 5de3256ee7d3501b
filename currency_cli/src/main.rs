//! Currency CLI — one-shot conversions, code lookup and rate refresh from the shell.
//!
//! Every invocation loads the rates file, performs one command and exits:
//! - `convert` — convert an amount between two currencies.
//! - `list` — print codes and rates, optionally filtered by a fragment.
//! - `refresh` — run the fetch script for a date and reload the file it writes.
//!
//! Usage example (CLI):
//! ```bash
//! currency_cli --rates ./currency_rates.json convert --from usd --to eur --amount 100 --precision 2
//! currency_cli list --filter eu
//! currency_cli refresh --date 2023-10-05 --interpreter python3
//! ```
#![warn(missing_docs)]
mod args;
mod commands;

use crate::args::{Args, Command};
use clap::Parser;
use currency_common::paths::normalize_path;
use currency_common::{ConverterError, RateTable, Result, ScriptRefresher};
use log::{error, info};
use std::io::{self, Write};
use std::path::Path;

fn main() -> Result<(), ConverterError> {
    init_logger();
    let args = Args::parse();
    let rates_path = normalize_path(&args.rates);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let outcome = run(&mut out, &rates_path, args.command);
    out.flush()?;

    if let Err(ref e) = outcome {
        error!("{}", e);
    }
    outcome
}

fn run<W: Write>(out: &mut W, rates_path: &Path, command: Command) -> Result<()> {
    match command {
        Command::Convert {
            from,
            to,
            amount,
            precision,
            json,
        } => {
            let table = RateTable::load_file(rates_path)?;
            commands::run_convert(out, &table, &from, &to, &amount, precision, json)
        }
        Command::List { filter, limit } => {
            let table = RateTable::load_file(rates_path)?;
            commands::run_list(out, &table, filter.as_deref(), limit)
        }
        Command::Refresh {
            date,
            script,
            interpreter,
        } => {
            let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());
            let refresher = ScriptRefresher::new(normalize_path(&script), rates_path)
                .with_interpreter(&interpreter)
                .with_date(date);
            info!(
                "Refreshing rates for {} into {}",
                date,
                refresher.rates_path().display()
            );
            commands::run_refresh(out, &refresher)
        }
    }
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
