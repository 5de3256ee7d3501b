//!
//! Core of the currency converter shared by the console and CLI front ends.
//!
//! This crate aggregates:
//! - `error` — unified error type `ConverterError` used across the workspace.
//! - `result` — handy `Result<T, ConverterError>` alias.
//! - `rates` — the `RateTable` and its loaders for `{"rates": {...}}` documents.
//! - `converter` — the lookup-and-multiply conversion and amount parsing.
//! - `refresh` — the `RateRefresher` capability and its file/script implementations.
//! - `paths` — normalisation of paths typed on the command line.
#![warn(missing_docs)]
pub mod converter;
pub mod error;
pub mod paths;
pub mod rates;
pub mod refresh;
pub mod result;

pub use converter::{ConversionRequest, ConversionResult, convert, parse_amount};
pub use error::ConverterError;
pub use rates::RateTable;
pub use refresh::{FileRefresher, RateRefresher, ScriptRefresher};
pub use result::Result;

/// File name the front ends read when no `--rates` path is given.
pub const DEFAULT_RATES_FILE: &str = "currency_rates.json";
