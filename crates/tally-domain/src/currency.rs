//! Currency codes and static-rate conversion.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// ISO 4217 style currency code.
///
/// Codes are opaque and matched exactly against the rate table; no case
/// normalization is applied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConversionError {
    #[error("no conversion rate between {from} and {to}")]
    Unavailable { from: CurrencyCode, to: CurrencyCode },
}

/// One directed exchange rate, the serde-friendly unit the rate table and
/// configuration are built from (JSON object keys cannot be tuples).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RateEntry {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub rate: f64,
}

impl RateEntry {
    pub fn new(from: impl Into<CurrencyCode>, to: impl Into<CurrencyCode>, rate: f64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            rate,
        }
    }
}

/// Static lookup of directed exchange rates.
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    rates: HashMap<(CurrencyCode, CurrencyCode), f64>,
}

impl RateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: &[RateEntry]) -> Self {
        let mut table = Self::new();
        for entry in entries {
            table.insert(entry.from.clone(), entry.to.clone(), entry.rate);
        }
        table
    }

    pub fn insert(&mut self, from: CurrencyCode, to: CurrencyCode, rate: f64) {
        self.rates.insert((from, to), rate);
    }

    pub fn get(&self, from: &CurrencyCode, to: &CurrencyCode) -> Option<f64> {
        self.rates.get(&(from.clone(), to.clone())).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

/// Resolves conversion factors between currency codes from an injected
/// [`RateTable`], deriving the reciprocal when only the opposite direction
/// is listed.
#[derive(Debug, Clone, Default)]
pub struct CurrencyConverter {
    table: RateTable,
}

impl CurrencyConverter {
    pub fn new(table: RateTable) -> Self {
        Self { table }
    }

    /// Returns the factor that converts an amount in `from` into `to`.
    ///
    /// Identical codes convert at `1.0` without touching the table.
    pub fn rate(&self, from: &CurrencyCode, to: &CurrencyCode) -> Result<f64, ConversionError> {
        if from == to {
            return Ok(1.0);
        }
        if let Some(rate) = self.table.get(from, to) {
            return Ok(rate);
        }
        if let Some(rate) = self.table.get(to, from) {
            return Ok(1.0 / rate);
        }
        Err(ConversionError::Unavailable {
            from: from.clone(),
            to: to.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn converter() -> CurrencyConverter {
        CurrencyConverter::new(RateTable::from_entries(&[
            RateEntry::new("EUR", "USD", 1.1),
            RateEntry::new("GBP", "EUR", 1.15),
        ]))
    }

    #[test]
    fn identical_codes_convert_at_one_without_a_table() {
        let converter = CurrencyConverter::new(RateTable::new());
        let eur = CurrencyCode::new("EUR");
        assert_eq!(converter.rate(&eur, &eur), Ok(1.0));
    }

    #[test]
    fn direct_rate_is_returned_as_listed() {
        let rate = converter()
            .rate(&"EUR".into(), &"USD".into())
            .expect("direct rate");
        assert!((rate - 1.1).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_direction_falls_back_to_reciprocal() {
        let rate = converter()
            .rate(&"USD".into(), &"EUR".into())
            .expect("inverse rate");
        assert!((rate - 1.0 / 1.1).abs() < 1e-12);
    }

    #[test]
    fn round_trip_factors_multiply_to_one() {
        let converter = converter();
        for (a, b) in [("EUR", "USD"), ("GBP", "EUR")] {
            let forward = converter.rate(&a.into(), &b.into()).expect("forward");
            let back = converter.rate(&b.into(), &a.into()).expect("back");
            assert!((forward * back - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn double_miss_names_both_currencies() {
        let err = converter()
            .rate(&"USD".into(), &"JPY".into())
            .expect_err("no rate in either direction");
        assert_eq!(
            err,
            ConversionError::Unavailable {
                from: "USD".into(),
                to: "JPY".into(),
            }
        );
    }

    #[test]
    fn codes_are_matched_case_sensitively() {
        let err = converter().rate(&"eur".into(), &"USD".into());
        assert!(err.is_err());
    }
}
