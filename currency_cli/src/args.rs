//! Command-line arguments for the one-shot converter.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use currency_common::DEFAULT_RATES_FILE;
use currency_common::refresh::{DEFAULT_INTERPRETER, DEFAULT_SCRIPT};

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the JSON file with a top-level `rates` object.
    /// Refreshing runs the fetch script from this file's directory, so the
    /// file name must match the one the script writes.
    #[clap(long, global = true, env = "CURRENCY_RATES", default_value = DEFAULT_RATES_FILE)]
    pub rates: String,

    #[command(subcommand)]
    pub command: Command,
}

/// What to do with the rates file.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Convert an amount from one currency to another.
    Convert {
        /// Source currency code (case-insensitive).
        #[clap(long)]
        from: String,

        /// Target currency code (case-insensitive).
        #[clap(long)]
        to: String,

        /// Amount in the source currency. Negative values are allowed.
        #[clap(long, allow_hyphen_values = true)]
        amount: String,

        /// Decimal places for the printed amounts. Full precision when omitted.
        #[clap(long)]
        precision: Option<usize>,

        /// Print the result as a JSON object instead of a sentence.
        #[clap(long)]
        json: bool,
    },

    /// List currency codes and their rates in file order.
    List {
        /// Only show codes containing this fragment (case-insensitive).
        #[clap(long)]
        filter: Option<String>,

        /// Show at most this many entries.
        #[clap(long)]
        limit: Option<usize>,
    },

    /// Run the fetch script and reload the rates file it writes.
    Refresh {
        /// Date passed to the script, `YYYY-MM-DD`. Defaults to today.
        #[clap(long)]
        date: Option<NaiveDate>,

        /// Fetch script to run, relative to the current directory.
        #[clap(long, env = "CURRENCY_REFRESH_SCRIPT", default_value = DEFAULT_SCRIPT)]
        script: String,

        /// Interpreter used to run the fetch script.
        #[clap(long, default_value = DEFAULT_INTERPRETER)]
        interpreter: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_convert_with_negative_amount() {
        let args = Args::try_parse_from([
            "currency_cli", "convert", "--from", "usd", "--to", "eur", "--amount", "-5",
        ])
        .unwrap();
        match args.command {
            Command::Convert { from, to, amount, precision, json } => {
                assert_eq!((from.as_str(), to.as_str(), amount.as_str()), ("usd", "eur", "-5"));
                assert_eq!(precision, None);
                assert!(!json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_refresh_date() {
        let args = Args::try_parse_from([
            "currency_cli", "--rates", "r.json", "refresh", "--date", "2023-10-05",
        ])
        .unwrap();
        assert_eq!(args.rates, "r.json");
        match args.command {
            Command::Refresh { date, .. } => {
                assert_eq!(date, NaiveDate::from_ymd_opt(2023, 10, 5));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_bad_date() {
        assert!(Args::try_parse_from(["currency_cli", "refresh", "--date", "05/10/2023"]).is_err());
    }
}
