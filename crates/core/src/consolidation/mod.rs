//! Multi-currency consolidation.
//!
//! This module translates subsidiary statements into the group reporting
//! currency and checks, ahead of a consolidation run, which FX rates are
//! still missing:
//! - Conversion policy (reporting currency, rate method per statement type)
//! - FX quotes and currency pairs
//! - All-or-nothing batch conversion with translation delta
//! - Pre-flight rate-gap validation against a quote provider

pub mod converter;
pub mod error;
pub mod method;
pub mod pair;
pub mod period;
pub mod policy;
pub mod provider;
pub mod quote;
pub mod types;
pub mod validator;

#[cfg(test)]
mod props;

pub use converter::Converter;
pub use error::{BoxError, ConversionError, MissingRateError, PolicyError, ValidationError};
pub use method::{RateMethod, StatementType};
pub use pair::{CurrencyPair, PairError};
pub use period::{month_start, period_of};
pub use policy::{
    DEFAULT_BALANCE_SHEET_METHOD, DEFAULT_PROFIT_LOSS_METHOD, DEFAULT_REPORTING_CURRENCY, Policy,
};
pub use provider::InMemoryQuoteProvider;
pub use quote::{Quote, QuoteBook};
pub use types::{Conversion, Gap, Line, Requirement, ValidationResult};
pub use validator::{QuoteProvider, RateGapValidator};
