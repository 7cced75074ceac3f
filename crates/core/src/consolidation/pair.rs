//! Currency pair keys.

use std::fmt;
use std::str::FromStr;

use fxconsol_shared::types::{CurrencyCode, InvalidCurrencyCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a pair key cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PairError {
    /// The key is not two concatenated three-letter codes.
    #[error("Invalid currency pair: '{0}'")]
    Malformed(String),

    /// One side of the pair is not a valid currency code.
    #[error(transparent)]
    Currency(#[from] InvalidCurrencyCode),
}

/// A local → target currency pair.
///
/// The canonical key is the uppercase concatenation of both codes with no
/// separator, e.g. `IDRUSD` converts IDR into USD. Ordering follows the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyPair {
    base: CurrencyCode,
    quote: CurrencyCode,
}

impl CurrencyPair {
    /// Creates a pair converting `base` into `quote`.
    #[must_use]
    pub const fn new(base: CurrencyCode, quote: CurrencyCode) -> Self {
        Self { base, quote }
    }

    /// Parses both codes and builds the pair.
    pub fn from_codes(base: &str, quote: &str) -> Result<Self, PairError> {
        Ok(Self::new(CurrencyCode::parse(base)?, CurrencyCode::parse(quote)?))
    }

    /// Parses a canonical six-letter key such as `idrusd`.
    pub fn parse(key: &str) -> Result<Self, PairError> {
        let trimmed = key.trim();
        if trimmed.len() != CurrencyCode::LEN * 2 || !trimmed.is_ascii() {
            return Err(PairError::Malformed(key.to_string()));
        }
        let (base, quote) = trimmed.split_at(CurrencyCode::LEN);
        Self::from_codes(base, quote)
    }

    /// Currency being converted from.
    #[must_use]
    pub const fn base(&self) -> &CurrencyCode {
        &self.base
    }

    /// Currency being converted into.
    #[must_use]
    pub const fn quote(&self) -> &CurrencyCode {
        &self.quote
    }

    /// Returns true when both sides name the same currency.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.base == self.quote
    }

    /// Returns the canonical lookup key.
    #[must_use]
    pub fn as_key(&self) -> String {
        format!("{}{}", self.base, self.quote)
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.base, self.quote)
    }
}

impl FromStr for CurrencyPair {
    type Err = PairError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CurrencyPair {
    type Error = PairError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CurrencyPair> for String {
    fn from(pair: CurrencyPair) -> Self {
        pair.as_key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_uppercase_concatenation() {
        let pair = CurrencyPair::from_codes("idr", "Usd").unwrap();
        assert_eq!(pair.as_key(), "IDRUSD");
        assert_eq!(pair.to_string(), "IDRUSD");
        assert_eq!(pair.base().as_str(), "IDR");
        assert_eq!(pair.quote().as_str(), "USD");
    }

    #[test]
    fn test_parse_canonical_key() {
        let pair: CurrencyPair = "eurusd".parse().unwrap();
        assert_eq!(pair, CurrencyPair::from_codes("EUR", "USD").unwrap());
        assert!(!pair.is_identity());
        assert!("USDUSD".parse::<CurrencyPair>().unwrap().is_identity());
    }

    #[test]
    fn test_parse_rejects_malformed_keys() {
        assert!(matches!(
            CurrencyPair::parse(""),
            Err(PairError::Malformed(_))
        ));
        assert!(matches!(
            CurrencyPair::parse("IDR/USD"),
            Err(PairError::Malformed(_))
        ));
        assert!(matches!(
            CurrencyPair::parse("ID1USD"),
            Err(PairError::Currency(_))
        ));
    }

    #[test]
    fn test_ordering_follows_key() {
        let mut pairs: Vec<CurrencyPair> = ["SGDUSD", "EURUSD", "IDRUSD", "EURJPY"]
            .iter()
            .map(|k| k.parse().unwrap())
            .collect();
        pairs.sort();
        let keys: Vec<String> = pairs.iter().map(CurrencyPair::as_key).collect();
        assert_eq!(keys, ["EURJPY", "EURUSD", "IDRUSD", "SGDUSD"]);
    }

    #[test]
    fn test_serde_round_trips_through_key() {
        let pair: CurrencyPair = serde_json::from_str("\"idrusd\"").unwrap();
        assert_eq!(serde_json::to_string(&pair).unwrap(), "\"IDRUSD\"");
    }
}
