//! Subcommand handlers.
//!
//! Each handler takes the already-loaded inputs plus a writer, so `main` only
//! wires arguments to them and tests can capture the output.
use std::io::Write;

use currency_common::{RateRefresher, RateTable, Result, convert, parse_amount};
use log::debug;

/// `convert`: one conversion, printed as a sentence or as JSON.
pub fn run_convert<W: Write>(
    out: &mut W,
    table: &RateTable,
    from: &str,
    to: &str,
    amount: &str,
    precision: Option<usize>,
    json: bool,
) -> Result<()> {
    let amount = parse_amount(amount)?;
    let result = convert(table, from, to, amount)?;

    if json {
        writeln!(out, "{}", serde_json::to_string(&result)?)?;
    } else {
        match precision {
            Some(p) => writeln!(out, "{:.*}", p, result)?,
            None => writeln!(out, "{}", result)?,
        }
    }
    Ok(())
}

/// `list`: `CODE: rate` lines in file order, optionally filtered and truncated.
pub fn run_list<W: Write>(
    out: &mut W,
    table: &RateTable,
    filter: Option<&str>,
    limit: Option<usize>,
) -> Result<()> {
    let fragment = filter.unwrap_or("");
    let codes = table.search(fragment);
    debug!("{} of {} codes match {:?}", codes.len(), table.len(), fragment);

    if codes.is_empty() {
        writeln!(out, "No currency codes match '{}'.", fragment.trim())?;
        return Ok(());
    }
    for code in codes.into_iter().take(limit.unwrap_or(usize::MAX)) {
        if let Some(rate) = table.rate(code) {
            writeln!(out, "{}: {}", code, rate)?;
        }
    }
    Ok(())
}

/// `refresh`: runs the refresher and reports how many rates the new file holds.
pub fn run_refresh<W: Write, F: RateRefresher>(out: &mut W, refresher: &F) -> Result<()> {
    let table = refresher.refresh()?;
    writeln!(out, "Rates refreshed: {} currencies loaded.", table.len())?;
    Ok(())
}
