//! Conversion between two currencies of a `RateTable`.
//!
//! Both rates are expressed against the same base currency, so converting is a
//! single ratio: `effective_rate = rate[target] / rate[source]`. Results are
//! returned at full precision; rounding is left to whoever displays them.
use std::fmt;

use log::debug;
use serde::Serialize;

use crate::error::ConverterError;
use crate::rates::{RateTable, normalize_code};
use crate::result::Result;

/// A single conversion as entered by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    /// Source currency code, as typed.
    pub source: String,
    /// Target currency code, as typed.
    pub target: String,
    /// Amount in the source currency.
    pub amount: f64,
}

impl ConversionRequest {
    /// Creates a new request.
    pub fn new(source: &str, target: &str, amount: f64) -> Self {
        ConversionRequest {
            source: String::from(source),
            target: String::from(target),
            amount,
        }
    }

    /// Runs the request against `table`.
    pub fn execute(&self, table: &RateTable) -> Result<ConversionResult> {
        convert(table, &self.source, &self.target, self.amount)
    }
}

/// Outcome of a successful conversion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionResult {
    /// Canonical source code.
    pub source: String,
    /// Canonical target code.
    pub target: String,
    /// Amount in the source currency.
    pub amount: f64,
    /// Amount in the target currency.
    pub converted_amount: f64,
    /// Multiplier applied to `amount` (target rate / source rate).
    pub effective_rate: f64,
}

/// Renders `"<amount> <SRC> is equal to <converted> <DST>"`.
///
/// A formatter precision (`{:.2}`) applies to both amounts; without one the
/// values are printed in full.
impl fmt::Display for ConversionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match f.precision() {
            Some(p) => write!(
                f,
                "{:.*} {} is equal to {:.*} {}",
                p, self.amount, self.source, p, self.converted_amount, self.target
            ),
            None => write!(
                f,
                "{} {} is equal to {} {}",
                self.amount, self.source, self.converted_amount, self.target
            ),
        }
    }
}

/// Converts `amount` from `source` to `target` using the rates in `table`.
///
/// Codes are matched case-insensitively. Fails with `UnknownCurrency` naming
/// the first code missing from the table, with `DivisionByZero` when the
/// source rate is zero, and with `InvalidAmount` for NaN or infinite amounts.
pub fn convert(
    table: &RateTable,
    source: &str,
    target: &str,
    amount: f64,
) -> Result<ConversionResult> {
    if !amount.is_finite() {
        return Err(ConverterError::InvalidAmount(format!(
            "{} is not a finite number",
            amount
        )));
    }

    let source = normalize_code(source);
    let target = normalize_code(target);
    let rate_source = table
        .rate(&source)
        .ok_or_else(|| ConverterError::UnknownCurrency(source.clone()))?;
    let rate_target = table
        .rate(&target)
        .ok_or_else(|| ConverterError::UnknownCurrency(target.clone()))?;

    if rate_source == 0.0 {
        return Err(ConverterError::DivisionByZero(source));
    }

    let effective_rate = rate_target / rate_source;
    let converted_amount = amount * effective_rate;
    debug!(
        "Converted {} {} -> {} {} at {}",
        amount, source, converted_amount, target, effective_rate
    );

    Ok(ConversionResult {
        source,
        target,
        amount,
        converted_amount,
        effective_rate,
    })
}

/// Parses user input into a finite amount.
pub fn parse_amount(text: &str) -> Result<f64> {
    let trimmed = text.trim();
    match trimmed.parse::<f64>() {
        Ok(amount) if amount.is_finite() => Ok(amount),
        Ok(_) => Err(ConverterError::InvalidAmount(format!(
            "'{}' is not a finite number",
            trimmed
        ))),
        Err(_) => Err(ConverterError::InvalidAmount(format!(
            "'{}' is not a number",
            trimmed
        ))),
    }
}
