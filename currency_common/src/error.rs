//! Error types shared by the rate store, the converter and both front ends.
//!
//! The `ConverterError` enum unifies rate-file problems, lookup failures,
//! amount validation and refresh failures, allowing every crate in the
//! workspace to propagate a single error type.
use std::io;

use thiserror::Error;

/// Unified error type shared by the library and the binaries.
#[derive(Error, Debug)]
pub enum ConverterError {
    /// I/O error while reading the rates file or spawning the refresh script.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The rates document is not valid JSON.
    #[error("JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// The document parsed, but its `rates` structure is missing or invalid.
    #[error("Malformed rates document: {0}")]
    MalformedRates(String),

    /// A currency code is not present in the rate table.
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// The source currency has a zero rate, so no effective rate exists.
    #[error("Division by zero: rate for {0} is 0")]
    DivisionByZero(String),

    /// The amount is not a finite number.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// The external refresh script could not be run or reported failure.
    #[error("Refresh failed: {0}")]
    Refresh(String),
}
