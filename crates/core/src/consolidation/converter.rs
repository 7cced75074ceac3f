//! Batch translation of statement lines into the reporting currency.

use std::collections::BTreeSet;

use fxconsol_shared::CurrencyCode;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::error::{ConversionError, MissingRateError};
use super::method::{RateMethod, StatementType};
use super::pair::CurrencyPair;
use super::policy::Policy;
use super::quote::QuoteBook;
use super::types::{Conversion, Line};

/// Translates statement lines into the group reporting currency.
///
/// A batch is converted all-or-nothing: rates for every line are resolved
/// before any amount is computed, and a single missing rate fails the whole
/// batch with every missing pair listed.
///
/// `Converter::default()` has no policy and fails every call with
/// [`ConversionError::NotConfigured`].
#[derive(Debug, Clone, Default)]
pub struct Converter {
    policy: Option<Policy>,
}

impl Converter {
    /// Creates a converter for the given policy.
    #[must_use]
    pub const fn new(policy: Policy) -> Self {
        Self {
            policy: Some(policy),
        }
    }

    /// Returns the policy, if configured.
    #[must_use]
    pub const fn policy(&self) -> Option<&Policy> {
        self.policy.as_ref()
    }

    /// Converts profit-and-loss lines with the policy's P&L method.
    ///
    /// # Errors
    ///
    /// See [`Converter::convert`].
    pub fn convert_profit_loss(
        &self,
        lines: &[Line],
        quotes: &QuoteBook,
    ) -> Result<Conversion, ConversionError> {
        self.convert(StatementType::ProfitLoss, lines, quotes)
    }

    /// Converts balance-sheet lines with the policy's balance-sheet method.
    ///
    /// # Errors
    ///
    /// See [`Converter::convert`].
    pub fn convert_balance_sheet(
        &self,
        lines: &[Line],
        quotes: &QuoteBook,
    ) -> Result<Conversion, ConversionError> {
        self.convert(StatementType::BalanceSheet, lines, quotes)
    }

    /// Converts one statement's lines.
    ///
    /// Each line's new group amount is `local_amount * rate`, where the rate
    /// is 1 for lines already in the reporting currency (or with no currency)
    /// and otherwise the quote for `local+target` under the statement's
    /// method. The delta is the sum of `new - prior` group amounts.
    ///
    /// # Errors
    ///
    /// - `NotConfigured` if the converter has no policy
    /// - `Policy` if the reporting currency is malformed
    /// - `InvalidLineCurrency` if a line's currency is malformed
    /// - `MissingRates` listing every pair without a usable rate
    /// - `AmountOverflow` if a translated amount or the delta overflows
    pub fn convert(
        &self,
        statement: StatementType,
        lines: &[Line],
        quotes: &QuoteBook,
    ) -> Result<Conversion, ConversionError> {
        let policy = self.policy.as_ref().ok_or(ConversionError::NotConfigured)?;

        if lines.is_empty() {
            return Ok(Conversion::default());
        }

        let target = policy.target_currency()?;
        let method = policy.method_for(statement);

        // Pass 1: resolve every rate before touching any amount.
        let mut rates = Vec::with_capacity(lines.len());
        let mut missing = BTreeSet::new();
        for line in lines {
            match resolve_rate(line, &target, method, quotes)? {
                Resolved::Rate(rate) => rates.push(rate),
                Resolved::Missing(pair) => {
                    missing.insert(pair);
                }
            }
        }

        if !missing.is_empty() {
            let err = MissingRateError {
                method,
                pairs: missing.into_iter().collect(),
            };
            warn!(%statement, %method, missing = %err, "conversion blocked by missing rates");
            return Err(err.into());
        }

        // Pass 2: every rate is known; only decimal overflow can still fail,
        // and nothing is returned until every line has converted.
        let mut delta = Decimal::ZERO;
        let mut converted = Vec::with_capacity(lines.len());
        for (line, rate) in lines.iter().zip(rates) {
            let overflow = || ConversionError::AmountOverflow {
                account_code: line.account_code.clone(),
            };
            let group_amount = line.local_amount.checked_mul(rate).ok_or_else(overflow)?;
            delta = group_amount
                .checked_sub(line.group_amount)
                .and_then(|change| delta.checked_add(change))
                .ok_or_else(overflow)?;
            converted.push(Line {
                group_amount,
                ..line.clone()
            });
        }

        debug!(
            %statement,
            %method,
            target = %target,
            lines = converted.len(),
            %delta,
            "converted statement lines"
        );

        Ok(Conversion {
            lines: converted,
            delta,
        })
    }
}

enum Resolved {
    Rate(Decimal),
    Missing(CurrencyPair),
}

fn resolve_rate(
    line: &Line,
    target: &CurrencyCode,
    method: RateMethod,
    quotes: &QuoteBook,
) -> Result<Resolved, ConversionError> {
    let raw = line.local_currency.trim();
    if raw.is_empty() {
        return Ok(Resolved::Rate(Decimal::ONE));
    }

    let local =
        CurrencyCode::parse(raw).map_err(|_| ConversionError::InvalidLineCurrency {
            account_code: line.account_code.clone(),
            currency: line.local_currency.clone(),
        })?;
    if &local == target {
        return Ok(Resolved::Rate(Decimal::ONE));
    }

    let pair = CurrencyPair::new(local, target.clone());
    Ok(match quotes.get(&pair).and_then(|q| q.usable_rate(method)) {
        Some(rate) => Resolved::Rate(rate),
        None => Resolved::Missing(pair),
    })
}
