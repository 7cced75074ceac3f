//! Consolidation error types.
//!
//! Misuse and configuration errors indicate a caller bug and are never worth
//! retrying. `MissingRateError` and provider failures are recoverable by the
//! caller once rates are entered or the rate store is back.

use chrono::NaiveDate;
use fxconsol_shared::AppError;
use thiserror::Error;

use super::method::RateMethod;
use super::pair::CurrencyPair;

/// Boxed error returned by a quote provider.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Invalid conversion policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// Rate method outside the supported set.
    #[error("Unsupported rate method: '{0}' (expected AVERAGE or CLOSING)")]
    UnsupportedMethod(String),

    /// Reporting currency is not a valid ISO 4217 code.
    #[error("Invalid reporting currency: '{0}'")]
    InvalidCurrency(String),
}

/// Every pair in a batch that lacked a usable rate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Missing {method} rates for: {}", join_pairs(.pairs))]
pub struct MissingRateError {
    /// Method the batch was converted with.
    pub method: RateMethod,
    /// Missing pairs, sorted and deduplicated.
    pub pairs: Vec<CurrencyPair>,
}

fn join_pairs(pairs: &[CurrencyPair]) -> String {
    pairs
        .iter()
        .map(CurrencyPair::as_key)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors from batch conversion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// The converter was built without a policy.
    #[error("Converter is not configured with a policy")]
    NotConfigured,

    /// The policy itself is invalid.
    #[error(transparent)]
    Policy(#[from] PolicyError),

    /// A line carries a malformed currency code.
    #[error("Invalid currency '{currency}' on account {account_code}")]
    InvalidLineCurrency {
        /// Account code of the offending line.
        account_code: String,
        /// Raw currency value.
        currency: String,
    },

    /// At least one line had no usable rate; nothing was converted.
    #[error(transparent)]
    MissingRates(#[from] MissingRateError),

    /// A translated amount or the batch delta does not fit in a decimal.
    #[error("Amount overflow while translating account {account_code}")]
    AmountOverflow {
        /// Account code of the line that overflowed.
        account_code: String,
    },
}

impl ConversionError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotConfigured => "CONVERTER_NOT_CONFIGURED",
            Self::Policy(PolicyError::UnsupportedMethod(_)) => "UNSUPPORTED_RATE_METHOD",
            Self::Policy(PolicyError::InvalidCurrency(_)) => "INVALID_REPORTING_CURRENCY",
            Self::InvalidLineCurrency { .. } => "INVALID_LINE_CURRENCY",
            Self::MissingRates(_) => "MISSING_FX_RATES",
            Self::AmountOverflow { .. } => "AMOUNT_OVERFLOW",
        }
    }
}

/// Errors from pre-flight rate validation.
///
/// Missing rates are not errors here; they are reported as gaps.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The validator was built without a quote provider.
    #[error("Rate-gap validator has no quote provider")]
    ProviderMissing,

    /// The as-of timestamp was left at its zero value.
    #[error("Validation period is required")]
    MissingPeriod,

    /// A requirement listed no methods.
    #[error("Requirement for {pair} lists no rate methods")]
    NoMethods {
        /// Pair of the offending requirement.
        pair: CurrencyPair,
    },

    /// The caller cancelled the run, or its deadline passed.
    #[error("Rate-gap validation was cancelled")]
    Cancelled,

    /// The quote provider failed.
    #[error("Quote lookup for {pair} in period {period} failed: {source}")]
    Provider {
        /// Pair being looked up.
        pair: CurrencyPair,
        /// Normalized period being looked up.
        period: NaiveDate,
        /// Underlying provider error.
        #[source]
        source: BoxError,
    },
}

impl ValidationError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::ProviderMissing => "VALIDATOR_NOT_CONFIGURED",
            Self::MissingPeriod => "MISSING_PERIOD",
            Self::NoMethods { .. } => "REQUIREMENT_WITHOUT_METHODS",
            Self::Cancelled => "VALIDATION_CANCELLED",
            Self::Provider { .. } => "QUOTE_PROVIDER_FAILED",
        }
    }
}

impl From<PolicyError> for AppError {
    fn from(err: PolicyError) -> Self {
        Self::Configuration(err.to_string())
    }
}

impl From<ConversionError> for AppError {
    fn from(err: ConversionError) -> Self {
        match err {
            ConversionError::NotConfigured => Self::Internal(err.to_string()),
            ConversionError::Policy(policy) => policy.into(),
            ConversionError::InvalidLineCurrency { .. } | ConversionError::AmountOverflow { .. } => {
                Self::Validation(err.to_string())
            }
            ConversionError::MissingRates(_) => Self::BusinessRule(err.to_string()),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::ProviderMissing => Self::Internal(err.to_string()),
            ValidationError::MissingPeriod | ValidationError::NoMethods { .. } => {
                Self::Validation(err.to_string())
            }
            ValidationError::Cancelled => Self::Cancelled(err.to_string()),
            ValidationError::Provider { .. } => Self::ExternalService(err.to_string()),
        }
    }
}
