//! In-memory quote provider.

use std::collections::BTreeMap;
use std::convert::Infallible;

use chrono::NaiveDate;

use super::pair::CurrencyPair;
use super::period::month_start;
use super::quote::{Quote, QuoteBook};
use super::validator::QuoteProvider;

/// Quote provider backed by a map of (period, pair) → quote.
///
/// Periods are normalized to the first of the month on insert, matching the
/// periods the validator looks up.
#[derive(Debug, Clone, Default)]
pub struct InMemoryQuoteProvider {
    quotes: BTreeMap<(NaiveDate, CurrencyPair), Quote>,
}

impl InMemoryQuoteProvider {
    /// Creates an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a quote, returning the one it replaced.
    pub fn insert(&mut self, period: NaiveDate, pair: CurrencyPair, quote: Quote) -> Option<Quote> {
        self.quotes.insert((month_start(period), pair), quote)
    }

    /// Stores a quote, builder style.
    #[must_use]
    pub fn with_quote(mut self, period: NaiveDate, pair: CurrencyPair, quote: Quote) -> Self {
        self.insert(period, pair, quote);
        self
    }

    /// Stores every quote of a book under one period.
    pub fn extend_period(&mut self, period: NaiveDate, book: QuoteBook) {
        let period = month_start(period);
        self.quotes
            .extend(book.into_iter().map(|(pair, quote)| ((period, pair), quote)));
    }

    /// Returns the quote for a pair in the month containing `period`.
    #[must_use]
    pub fn get(&self, period: NaiveDate, pair: &CurrencyPair) -> Option<Quote> {
        self.quotes.get(&(month_start(period), pair.clone())).copied()
    }

    /// Number of stored quotes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// Returns true if no quotes are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

impl QuoteProvider for InMemoryQuoteProvider {
    type Error = Infallible;

    async fn quote_for_period(
        &self,
        period: NaiveDate,
        pair: &CurrencyPair,
    ) -> Result<Option<Quote>, Self::Error> {
        Ok(self.get(period, pair))
    }
}
