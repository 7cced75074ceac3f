//! Consolidation domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::method::RateMethod;
use super::pair::CurrencyPair;
use super::quote::QuoteBook;

/// One statement line of a subsidiary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    /// Account code in the group chart of accounts.
    pub account_code: String,
    /// Currency of `local_amount` (empty means the reporting currency).
    #[serde(default)]
    pub local_currency: String,
    /// Amount in local currency.
    pub local_amount: Decimal,
    /// Group-currency amount. On input this is the prior translated amount,
    /// used only to compute the translation delta; on output it is the newly
    /// translated amount.
    #[serde(default)]
    pub group_amount: Decimal,
}

impl Line {
    /// Creates a line with no prior group amount.
    #[must_use]
    pub fn new(
        account_code: impl Into<String>,
        local_currency: impl Into<String>,
        local_amount: Decimal,
    ) -> Self {
        Self {
            account_code: account_code.into(),
            local_currency: local_currency.into(),
            local_amount,
            group_amount: Decimal::ZERO,
        }
    }

    /// Sets the prior group-currency amount.
    #[must_use]
    pub fn with_group_amount(mut self, group_amount: Decimal) -> Self {
        self.group_amount = group_amount;
        self
    }
}

/// Output of a successful batch conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversion {
    /// Every input line, translated into the reporting currency.
    pub lines: Vec<Line>,
    /// Sum over all lines of `new group amount - prior group amount`.
    pub delta: Decimal,
}

/// A caller-declared need for rate methods on one currency pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    /// Pair whose rates are needed.
    pub pair: CurrencyPair,
    /// Methods needed for the pair (must not be empty).
    pub methods: Vec<RateMethod>,
}

impl Requirement {
    /// Creates a requirement.
    #[must_use]
    pub fn new(pair: CurrencyPair, methods: impl Into<Vec<RateMethod>>) -> Self {
        Self {
            pair,
            methods: methods.into(),
        }
    }
}

/// Required methods of a pair that have no usable rate for the period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gap {
    /// Pair with missing rates.
    pub pair: CurrencyPair,
    /// Missing methods, in canonical order.
    pub methods: Vec<RateMethod>,
}

/// Outcome of a pre-flight rate check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Checked period: first day of the month, UTC.
    pub period: NaiveDate,
    /// Number of distinct pairs queried.
    pub checked: usize,
    /// Gaps, ordered by pair.
    pub gaps: Vec<Gap>,
    /// Every quote the provider returned, whether or not it had gaps.
    pub available: QuoteBook,
}

impl ValidationResult {
    pub(crate) fn empty(period: NaiveDate) -> Self {
        Self {
            period,
            checked: 0,
            gaps: Vec::new(),
            available: QuoteBook::new(),
        }
    }

    /// Returns true when no gaps were found, i.e. a consolidation may start.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.gaps.is_empty()
    }

    /// Flattens the gaps into (pair, method) findings for display.
    pub fn missing(&self) -> impl Iterator<Item = (&CurrencyPair, RateMethod)> + '_ {
        self.gaps
            .iter()
            .flat_map(|gap| gap.methods.iter().map(move |m| (&gap.pair, *m)))
    }
}
