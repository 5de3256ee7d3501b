//! Rate table and the loaders that build it from a rates document.
//!
//! A rates document is any JSON object carrying a `rates` object from currency
//! code to number, e.g. the payload saved by the refresh script:
//!
//! ```json
//! {"base": "USD", "rates": {"USD": 1.0, "EUR": 0.9, "JPY": 110.0}}
//! ```
//!
//! Only `rates` is interpreted. Codes are stored in canonical (uppercase) form
//! and the file order is kept for previews.
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use log::{debug, warn};
use serde_json::Value;

use crate::error::ConverterError;
use crate::result::Result;

/// Top-level key holding the code-to-rate object.
pub const RATES_KEY: &str = "rates";

/// Canonical form of a currency code: surrounding whitespace removed, ASCII uppercase.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Immutable mapping from currency code to its rate against the base currency.
///
/// A table is never patched in place; a refresh builds a new one that replaces
/// the old value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateTable {
    /// Entries in source order.
    entries: Vec<(String, f64)>,
    /// Canonical code -> position in `entries`.
    index: HashMap<String, usize>,
}

impl RateTable {
    /// Builds a table from `(code, rate)` pairs.
    ///
    /// Codes are canonicalised; an empty code or two codes that collide after
    /// canonicalisation fail with `MalformedRates`.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let mut table = RateTable::default();
        for (code, rate) in pairs {
            table.push(code.as_ref(), rate)?;
        }
        Ok(table)
    }

    /// Projects a parsed rates document into a table.
    ///
    /// Fails with `MalformedRates` when the document is not an object, has no
    /// `rates` object, or any rate is not a number. No partial table is ever
    /// returned.
    pub fn load(document: &Value) -> Result<Self> {
        let root = document.as_object().ok_or_else(|| {
            ConverterError::MalformedRates(format!(
                "expected a JSON object at the top level, found {}",
                value_kind(document)
            ))
        })?;
        let rates = root.get(RATES_KEY).ok_or_else(|| {
            ConverterError::MalformedRates(format!("'{}' field not found", RATES_KEY))
        })?;
        let rates = rates.as_object().ok_or_else(|| {
            ConverterError::MalformedRates(format!(
                "'{}' must be an object, found {}",
                RATES_KEY,
                value_kind(rates)
            ))
        })?;

        let mut pairs = Vec::with_capacity(rates.len());
        for (code, value) in rates {
            let rate = value.as_f64().ok_or_else(|| {
                ConverterError::MalformedRates(format!(
                    "rate for '{}' is not a number: {}",
                    code, value
                ))
            })?;
            pairs.push((code.as_str(), rate));
        }

        let table = Self::from_pairs(pairs)?;
        debug!("Loaded {} currency rates", table.len());
        Ok(table)
    }

    /// Parses JSON text and loads it.
    pub fn load_str(text: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(text)?;
        Self::load(&document)
    }

    /// Reads a JSON document from `reader` and loads it.
    pub fn load_reader<R: Read>(reader: R) -> Result<Self> {
        let document: Value = serde_json::from_reader(reader)?;
        Self::load(&document)
    }

    /// Reads the rates file at `path` and loads it.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            ConverterError::Io(io::Error::new(
                e.kind(),
                format!("failed to open {}: {}", path.display(), e),
            ))
        })?;
        debug!("Reading currency rates from {}", path.display());
        Self::load_reader(BufReader::new(file))
    }

    /// Number of currencies in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no currencies.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive membership check.
    pub fn contains(&self, code: &str) -> bool {
        self.index.contains_key(&normalize_code(code))
    }

    /// Case-insensitive rate lookup.
    pub fn rate(&self, code: &str) -> Option<f64> {
        self.index
            .get(&normalize_code(code))
            .map(|&i| self.entries[i].1)
    }

    /// Canonical codes in source order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(code, _)| code.as_str())
    }

    /// `(code, rate)` pairs in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(code, rate)| (code.as_str(), *rate))
    }

    /// The first `n` entries in source order.
    pub fn preview(&self, n: usize) -> impl Iterator<Item = (&str, f64)> {
        self.iter().take(n)
    }

    /// Codes containing `fragment`, compared case-insensitively.
    ///
    /// An empty (or whitespace-only) fragment matches every code.
    pub fn search(&self, fragment: &str) -> Vec<&str> {
        let needle = normalize_code(fragment);
        self.codes().filter(|code| code.contains(&needle)).collect()
    }

    fn push(&mut self, code: &str, rate: f64) -> Result<()> {
        let canonical = normalize_code(code);
        if canonical.is_empty() {
            return Err(ConverterError::MalformedRates(
                "empty currency code".to_string(),
            ));
        }
        if self.index.contains_key(&canonical) {
            return Err(ConverterError::MalformedRates(format!(
                "duplicate currency code '{}'",
                canonical
            )));
        }
        if !(rate.is_finite() && rate > 0.0) {
            warn!(
                "Rate for {} is {}; it cannot be used as a conversion source",
                canonical, rate
            );
        }
        self.index.insert(canonical.clone(), self.entries.len());
        self.entries.push((canonical, rate));
        Ok(())
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
