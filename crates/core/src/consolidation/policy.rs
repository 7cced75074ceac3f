//! Currency-conversion policy.

use fxconsol_shared::{ConsolidationConfig, CurrencyCode};
use serde::{Deserialize, Serialize};

use super::error::PolicyError;
use super::method::{RateMethod, StatementType};

/// Reporting currency used when a policy leaves it empty.
///
/// Product has not yet decided whether an empty reporting currency should
/// instead be rejected; until then the fallback is kept.
pub const DEFAULT_REPORTING_CURRENCY: &str = "USD";

/// Method applied to profit-and-loss lines when the policy leaves it unset.
pub const DEFAULT_PROFIT_LOSS_METHOD: RateMethod = RateMethod::Average;

/// Method applied to balance-sheet lines when the policy leaves it unset.
pub const DEFAULT_BALANCE_SHEET_METHOD: RateMethod = RateMethod::Closing;

/// How subsidiary statements are translated into the group currency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// Group reporting currency (case-insensitive; empty means the fallback).
    #[serde(default)]
    pub reporting_currency: String,
    /// Method for profit-and-loss lines.
    #[serde(default)]
    pub profit_loss_method: Option<RateMethod>,
    /// Method for balance-sheet lines.
    #[serde(default)]
    pub balance_sheet_method: Option<RateMethod>,
}

impl Policy {
    /// Creates a policy reporting in `reporting_currency` with default methods.
    #[must_use]
    pub fn new(reporting_currency: impl Into<String>) -> Self {
        Self {
            reporting_currency: reporting_currency.into(),
            ..Self::default()
        }
    }

    /// Sets the profit-and-loss method.
    #[must_use]
    pub fn with_profit_loss_method(mut self, method: RateMethod) -> Self {
        self.profit_loss_method = Some(method);
        self
    }

    /// Sets the balance-sheet method.
    #[must_use]
    pub fn with_balance_sheet_method(mut self, method: RateMethod) -> Self {
        self.balance_sheet_method = Some(method);
        self
    }

    /// Builds a policy from configuration.
    ///
    /// # Errors
    ///
    /// Returns `PolicyError::UnsupportedMethod` for an unknown method name and
    /// `PolicyError::InvalidCurrency` for a malformed reporting currency.
    pub fn from_config(config: &ConsolidationConfig) -> Result<Self, PolicyError> {
        let policy = Self {
            reporting_currency: config.reporting_currency.clone(),
            profit_loss_method: parse_method(config.profit_loss_method.as_deref())?,
            balance_sheet_method: parse_method(config.balance_sheet_method.as_deref())?,
        };
        policy.target_currency()?;
        Ok(policy)
    }

    /// Resolves the normalized reporting currency, applying the fallback.
    ///
    /// # Errors
    ///
    /// Returns `PolicyError::InvalidCurrency` if a non-empty reporting
    /// currency is not a valid code.
    pub fn target_currency(&self) -> Result<CurrencyCode, PolicyError> {
        let raw = self.reporting_currency.trim();
        let raw = if raw.is_empty() {
            DEFAULT_REPORTING_CURRENCY
        } else {
            raw
        };
        CurrencyCode::parse(raw)
            .map_err(|_| PolicyError::InvalidCurrency(self.reporting_currency.clone()))
    }

    /// Resolves the method for a statement type, applying defaults.
    #[must_use]
    pub fn method_for(&self, statement: StatementType) -> RateMethod {
        match statement {
            StatementType::ProfitLoss => self
                .profit_loss_method
                .unwrap_or(DEFAULT_PROFIT_LOSS_METHOD),
            StatementType::BalanceSheet => self
                .balance_sheet_method
                .unwrap_or(DEFAULT_BALANCE_SHEET_METHOD),
        }
    }
}

fn parse_method(raw: Option<&str>) -> Result<Option<RateMethod>, PolicyError> {
    raw.map(str::parse::<RateMethod>).transpose()
}
