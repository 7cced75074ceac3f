//! Rate methods and statement types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::PolicyError;

/// Which of a quote's two rates a conversion uses.
///
/// The set is closed: parsing any other name is a configuration error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RateMethod {
    /// Period-average rate, used for flow items.
    Average,
    /// Period-end closing rate, used for stock items.
    Closing,
}

impl RateMethod {
    /// Every supported method, in canonical order.
    pub const ALL: [Self; 2] = [Self::Average, Self::Closing];

    /// Returns the canonical uppercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Average => "AVERAGE",
            Self::Closing => "CLOSING",
        }
    }
}

impl fmt::Display for RateMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RateMethod {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AVERAGE" => Ok(Self::Average),
            "CLOSING" => Ok(Self::Closing),
            _ => Err(PolicyError::UnsupportedMethod(s.to_string())),
        }
    }
}

/// Financial statement a batch of lines belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementType {
    /// Profit-and-loss (income statement) lines.
    ProfitLoss,
    /// Balance-sheet lines.
    BalanceSheet,
}

impl fmt::Display for StatementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProfitLoss => f.write_str("profit_loss"),
            Self::BalanceSheet => f.write_str("balance_sheet"),
        }
    }
}
