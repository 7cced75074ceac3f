//! Run file describing one pre-flight check.

use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use fxconsol_core::consolidation::{CurrencyPair, InMemoryQuoteProvider, Line, Quote, Requirement};

/// A consolidation run to check, plus the rates and lines it uses.
#[derive(Debug, Deserialize)]
pub struct RunFile {
    /// Point in time the run consolidates; its month is the rate period.
    pub as_of: DateTime<Utc>,
    /// Pairs and methods the run needs.
    #[serde(default)]
    pub requirements: Vec<Requirement>,
    /// Published quotes.
    #[serde(default)]
    pub quotes: Vec<QuoteEntry>,
    /// Profit-and-loss lines to translate once validation is clean.
    #[serde(default)]
    pub profit_loss_lines: Vec<Line>,
    /// Balance-sheet lines to translate once validation is clean.
    #[serde(default)]
    pub balance_sheet_lines: Vec<Line>,
}

/// One published quote.
#[derive(Debug, Deserialize)]
pub struct QuoteEntry {
    /// Any date in the quote's month.
    pub period: NaiveDate,
    /// Pair key, e.g. `IDRUSD`.
    pub pair: CurrencyPair,
    /// Average rate.
    #[serde(default)]
    pub average: Decimal,
    /// Closing rate.
    #[serde(default)]
    pub closing: Decimal,
}

impl RunFile {
    /// Reads a TOML run file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::File::new(
                &path.to_string_lossy(),
                config::FileFormat::Toml,
            ))
            .build()
            .and_then(|config| config.try_deserialize())
            .with_context(|| format!("failed to read run file {}", path.display()))
    }

    /// Parses a run file from TOML text.
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::File::from_str(text, config::FileFormat::Toml))
            .build()
            .and_then(|config| config.try_deserialize())
            .context("failed to parse run file")
    }

    /// Builds an in-memory provider holding every quote of the file.
    pub fn provider(&self) -> InMemoryQuoteProvider {
        let mut provider = InMemoryQuoteProvider::new();
        for entry in &self.quotes {
            provider.insert(
                entry.period,
                entry.pair.clone(),
                Quote::new(entry.average, entry.closing),
            );
        }
        provider
    }

    /// Returns true if the file carries statement lines to translate.
    pub fn has_lines(&self) -> bool {
        !self.profit_loss_lines.is_empty() || !self.balance_sheet_lines.is_empty()
    }
}
