//! FX quotes.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::method::RateMethod;
use super::pair::CurrencyPair;

/// Quotes keyed by pair, in pair order.
pub type QuoteBook = BTreeMap<CurrencyPair, Quote>;

/// The two published rates of one currency pair for one period.
///
/// The rates are independent: a quote can be usable for one method and not
/// the other. A rate is usable only when strictly positive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Period-average rate (1 base = `average` quote currency).
    pub average: Decimal,
    /// Period-end closing rate (1 base = `closing` quote currency).
    pub closing: Decimal,
}

impl Quote {
    /// Creates a quote.
    #[must_use]
    pub const fn new(average: Decimal, closing: Decimal) -> Self {
        Self { average, closing }
    }

    /// Returns the raw rate for a method.
    #[must_use]
    pub const fn rate(&self, method: RateMethod) -> Decimal {
        match method {
            RateMethod::Average => self.average,
            RateMethod::Closing => self.closing,
        }
    }

    /// Returns the rate for a method if it is usable (`> 0`).
    #[must_use]
    pub fn usable_rate(&self, method: RateMethod) -> Option<Decimal> {
        let rate = self.rate(method);
        (rate > Decimal::ZERO).then_some(rate)
    }

    /// Returns the given methods whose rates are unusable, in input order.
    pub fn unusable_methods<I>(&self, methods: I) -> Vec<RateMethod>
    where
        I: IntoIterator<Item = RateMethod>,
    {
        methods
            .into_iter()
            .filter(|m| self.usable_rate(*m).is_none())
            .collect()
    }
}
