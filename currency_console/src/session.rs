//! Interactive menu loop.
//!
//! A `Session` owns the current `RateTable` and talks to the user through any
//! `BufRead`/`Write` pair (stdin/stdout in production, buffers in tests). A
//! refresh replaces the table wholesale; a failed refresh keeps the old one.
use std::io::{BufRead, Write};

use currency_common::converter::{ConversionRequest, parse_amount};
use currency_common::rates::normalize_code;
use currency_common::{ConverterError, RateRefresher, RateTable, Result};
use log::{debug, info, warn};

use crate::menu::MenuChoice;

/// Whether the loop should keep going after a step.
#[derive(Debug, PartialEq, Eq)]
enum Step {
    Continue,
    Quit,
}

/// One interactive conversion session.
pub struct Session<R, W, F> {
    input: R,
    output: W,
    table: RateTable,
    refresher: F,
    preview: usize,
    precision: Option<usize>,
}

impl<R: BufRead, W: Write, F: RateRefresher> Session<R, W, F> {
    /// Creates a session over `table`, using `refresher` for the refresh entry.
    pub fn new(input: R, output: W, table: RateTable, refresher: F) -> Self {
        Self {
            input,
            output,
            table,
            refresher,
            preview: 5,
            precision: None,
        }
    }

    /// Number of rates printed when the session starts.
    pub fn with_preview(mut self, preview: usize) -> Self {
        self.preview = preview;
        self
    }

    /// Decimal places for converted amounts.
    pub fn with_precision(mut self, precision: Option<usize>) -> Self {
        self.precision = precision;
        self
    }

    /// The table conversions currently run against.
    pub fn table(&self) -> &RateTable {
        &self.table
    }

    /// Prints the rate preview, then serves the menu until Exit or end of input.
    ///
    /// Only terminal I/O errors end the loop with an error; conversion and
    /// refresh failures are reported to the user and the menu is shown again.
    pub fn run(&mut self) -> Result<()> {
        self.print_preview()?;

        loop {
            writeln!(self.output, "\nCurrency Conversion Menu:")?;
            for line in MenuChoice::lines() {
                writeln!(self.output, "{}", line)?;
            }
            let Some(input) = self.prompt("Enter your choice: ")? else {
                break;
            };

            let step = match MenuChoice::from_input(&input) {
                Some(MenuChoice::Convert) => self.convert()?,
                Some(MenuChoice::Search) => self.search()?,
                Some(MenuChoice::Refresh) => self.refresh()?,
                Some(MenuChoice::Exit) => Step::Quit,
                None => {
                    debug!("Invalid menu input: {:?}", input.trim());
                    writeln!(
                        self.output,
                        "Invalid choice. Please select 1-{}.",
                        MenuChoice::count()
                    )?;
                    Step::Continue
                }
            };
            if step == Step::Quit {
                break;
            }
        }

        writeln!(self.output, "Goodbye!")?;
        self.output.flush()?;
        Ok(())
    }

    fn print_preview(&mut self) -> Result<()> {
        writeln!(
            self.output,
            "First {} currency exchange rates:",
            self.preview.min(self.table.len())
        )?;
        for (code, rate) in self.table.preview(self.preview) {
            writeln!(self.output, "{}: {}", code, rate)?;
        }
        Ok(())
    }

    fn convert(&mut self) -> Result<Step> {
        let Some(source) = self.prompt("Enter the source currency code (e.g., USD, EUR): ")?
        else {
            return Ok(Step::Quit);
        };
        let Some(target) = self.prompt("Enter the target currency code (e.g., EUR, JPY): ")?
        else {
            return Ok(Step::Quit);
        };

        // Both codes are checked before the amount is asked for.
        for code in [&source, &target] {
            if !self.table.contains(code) {
                let err = ConverterError::UnknownCurrency(normalize_code(code));
                return self.report(err);
            }
        }

        let Some(amount) = self.prompt("Enter the amount to convert: ")? else {
            return Ok(Step::Quit);
        };
        let amount = match parse_amount(&amount) {
            Ok(amount) => amount,
            Err(err) => return self.report(err),
        };

        match ConversionRequest::new(&source, &target, amount).execute(&self.table) {
            Ok(result) => {
                match self.precision {
                    Some(p) => writeln!(self.output, "{:.*}", p, result)?,
                    None => writeln!(self.output, "{}", result)?,
                }
                Ok(Step::Continue)
            }
            Err(err) => self.report(err),
        }
    }

    fn search(&mut self) -> Result<Step> {
        let Some(fragment) = self.prompt("Enter part of a currency code: ")? else {
            return Ok(Step::Quit);
        };
        let matches = self.table.search(&fragment);
        if matches.is_empty() {
            writeln!(
                self.output,
                "No currency codes match '{}'.",
                fragment.trim()
            )?;
        } else {
            writeln!(self.output, "{}", matches.join(", "))?;
        }
        Ok(Step::Continue)
    }

    fn refresh(&mut self) -> Result<Step> {
        match self.refresher.refresh() {
            Ok(table) => {
                info!("Replacing rate table: {} -> {} entries", self.table.len(), table.len());
                self.table = table;
                writeln!(
                    self.output,
                    "Rates refreshed: {} currencies loaded.",
                    self.table.len()
                )?;
            }
            Err(err) => {
                warn!("Refresh failed, keeping current rates: {}", err);
                writeln!(self.output, "Error: {}", err)?;
            }
        }
        Ok(Step::Continue)
    }

    /// Shows a recoverable error and returns to the menu.
    fn report(&mut self, err: ConverterError) -> Result<Step> {
        match err {
            ConverterError::Io(e) => Err(ConverterError::Io(e)),
            err => {
                writeln!(self.output, "Error: {}", err)?;
                Ok(Step::Continue)
            }
        }
    }

    /// Writes `text`, then reads one line. `None` means the input is closed.
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use currency_common::FileRefresher;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    /// Refresher returning a fixed outcome.
    struct FixedRefresher(Option<Vec<(&'static str, f64)>>);

    impl RateRefresher for FixedRefresher {
        fn refresh(&self) -> Result<RateTable> {
            match self.0 {
                Some(ref pairs) => RateTable::from_pairs(pairs.iter().copied()),
                None => Err(ConverterError::Refresh("script exited with 1: offline".into())),
            }
        }
    }

    fn table() -> RateTable {
        RateTable::from_pairs([
            ("USD", 1.0),
            ("EUR", 0.9),
            ("JPY", 110.0),
            ("GBP", 0.8),
            ("CHF", 0.88),
            ("AUD", 1.5),
        ])
        .unwrap()
    }

    fn run_with(
        input: &str,
        refresher: FixedRefresher,
        precision: Option<usize>,
    ) -> (String, RateTable) {
        let mut output = Vec::new();
        let mut session = Session::new(Cursor::new(input.as_bytes()), &mut output, table(), refresher)
            .with_precision(precision);
        session.run().unwrap();
        let table = session.table().clone();
        drop(session);
        (String::from_utf8(output).unwrap(), table)
    }

    #[test]
    fn prints_preview_then_exits() {
        let (out, _) = run_with("4\n", FixedRefresher(None), None);
        assert!(out.starts_with("First 5 currency exchange rates:\nUSD: 1\nEUR: 0.9\n"));
        assert!(out.contains("CHF: 0.88\n"));
        assert!(!out.contains("AUD: 1.5"));
        assert!(out.contains("1. Convert from one currency to another\n"));
        assert!(out.ends_with("Goodbye!\n"));
    }

    #[test]
    fn converts_with_lowercase_codes() {
        let (out, _) = run_with("1\nusd\neur\n100\n4\n", FixedRefresher(None), Some(2));
        assert!(out.contains("100.00 USD is equal to 90.00 EUR\n"), "{out}");
    }

    #[test]
    fn unknown_code_is_reported_before_amount() {
        let (out, _) = run_with("1\nUSD\nXYZ\n4\n", FixedRefresher(None), None);
        assert!(out.contains("Error: Unknown currency code: XYZ\n"), "{out}");
        assert!(!out.contains("Enter the amount"));
        assert!(out.ends_with("Goodbye!\n"));
    }

    #[test]
    fn bad_amount_returns_to_menu() {
        let (out, _) = run_with("1\nUSD\nJPY\nten\n1\nUSD\nJPY\n10\n4\n", FixedRefresher(None), None);
        assert!(out.contains("Error: Invalid amount: 'ten' is not a number\n"), "{out}");
        assert!(out.contains("10 USD is equal to 1100 JPY\n"), "{out}");
    }

    #[test]
    fn invalid_choice_is_reported() {
        let (out, _) = run_with("9\n4\n", FixedRefresher(None), None);
        assert!(out.contains("Invalid choice. Please select 1-4.\n"));
    }

    #[test]
    fn end_of_input_exits() {
        let (out, _) = run_with("1\nUSD\n", FixedRefresher(None), None);
        assert!(out.ends_with("Goodbye!\n"));
    }

    #[test]
    fn search_lists_matching_codes() {
        let (out, _) = run_with("2\nu\n2\nqq\n4\n", FixedRefresher(None), None);
        assert!(out.contains("USD, EUR, AUD\n"), "{out}");
        assert!(out.contains("No currency codes match 'qq'.\n"), "{out}");
    }

    #[test]
    fn refresh_replaces_table() {
        let refresher = FixedRefresher(Some(vec![("USD", 1.0), ("EUR", 0.5)]));
        let (out, table) = run_with("3\n1\nUSD\nEUR\n10\n4\n", refresher, None);
        assert!(out.contains("Rates refreshed: 2 currencies loaded.\n"));
        assert!(out.contains("10 USD is equal to 5 EUR\n"), "{out}");
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn refresh_rereads_rates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("currency_rates.json");
        fs::write(&path, r#"{"rates": {"USD": 1, "EUR": 0.9}}"#).unwrap();
        let initial = RateTable::load_file(&path).unwrap();
        fs::write(&path, r#"{"rates": {"USD": 1, "EUR": 0.8, "PLN": 4.1}}"#).unwrap();

        let mut output = Vec::new();
        let input = Cursor::new("1\nusd\neur\n10\n3\n1\nusd\neur\n10\n4\n".as_bytes());
        let mut session = Session::new(input, &mut output, initial, FileRefresher::new(&path));
        session.run().unwrap();
        assert!(session.table().contains("PLN"));
        drop(session);

        let out = String::from_utf8(output).unwrap();
        assert!(out.contains("10 USD is equal to 9 EUR\n"), "{out}");
        assert!(out.contains("Rates refreshed: 3 currencies loaded.\n"), "{out}");
        assert!(out.contains("10 USD is equal to 8 EUR\n"), "{out}");
    }

    #[test]
    fn refresh_of_broken_file_keeps_old_table() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("currency_rates.json");
        fs::write(&path, r#"{"error": true, "message": "invalid_app_id"}"#).unwrap();

        let mut output = Vec::new();
        let input = Cursor::new("3\n4\n".as_bytes());
        let mut session = Session::new(input, &mut output, table(), FileRefresher::new(&path));
        session.run().unwrap();
        assert_eq!(session.table(), &table());
        drop(session);

        let out = String::from_utf8(output).unwrap();
        assert!(out.contains("Error: Malformed rates document: 'rates' field not found\n"), "{out}");
    }

    #[test]
    fn failed_refresh_keeps_old_table() {
        let (out, table) = run_with("3\n4\n", FixedRefresher(None), None);
        assert!(out.contains("Error: Refresh failed: script exited with 1: offline\n"));
        assert_eq!(table, self::table());
    }
}
