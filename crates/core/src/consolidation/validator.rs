//! Pre-flight rate-gap validation.
//!
//! Before a consolidation run starts, the orchestrator declares every
//! (pair, methods) combination it will need. The validator looks each
//! distinct pair up once and reports exactly which methods lack a usable
//! rate, without converting anything.

use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::error::ValidationError;
use super::method::RateMethod;
use super::pair::CurrencyPair;
use super::period::period_of;
use super::quote::Quote;
use super::types::{Gap, Requirement, ValidationResult};

/// Source of published FX quotes.
///
/// This trait is implemented by the rate-persistence layer. `Ok(None)` means
/// the pair has no quote at all for the period.
pub trait QuoteProvider: Send + Sync {
    /// Error raised when the lookup itself fails.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Looks up the quote for `pair` in the month starting at `period`.
    fn quote_for_period(
        &self,
        period: NaiveDate,
        pair: &CurrencyPair,
    ) -> impl Future<Output = Result<Option<Quote>, Self::Error>> + Send;
}

/// Reports which (pair, method) combinations have no usable rate.
///
/// The validator holds no state between calls; each call allocates a fresh
/// [`ValidationResult`]. `RateGapValidator::default()` has no provider and
/// fails every call with [`ValidationError::ProviderMissing`].
#[derive(Debug)]
pub struct RateGapValidator<P> {
    provider: Option<Arc<P>>,
}

impl<P> Default for RateGapValidator<P> {
    fn default() -> Self {
        Self { provider: None }
    }
}

impl<P> Clone for RateGapValidator<P> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
        }
    }
}

impl<P: QuoteProvider> RateGapValidator<P> {
    /// Creates a validator backed by `provider`.
    #[must_use]
    pub const fn new(provider: Arc<P>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// Checks every requirement against the period containing `as_of`.
    ///
    /// Requirements naming the same pair are merged and their methods
    /// unioned; each distinct pair is looked up exactly once, in pair order.
    /// A pair the provider does not know is a gap for all of its methods; a
    /// known pair is a gap for each method whose rate is not positive.
    ///
    /// The token is checked before every lookup, and a lookup in flight is
    /// abandoned once it fires.
    ///
    /// # Errors
    ///
    /// - `ProviderMissing`, `MissingPeriod` or `NoMethods` for invalid input,
    ///   before any lookup is made
    /// - `Cancelled` if the token fires
    /// - `Provider` for the first failing lookup; later pairs are not checked
    pub async fn validate(
        &self,
        cancel: &CancellationToken,
        as_of: DateTime<Utc>,
        requirements: &[Requirement],
    ) -> Result<ValidationResult, ValidationError> {
        let provider = self
            .provider
            .as_deref()
            .ok_or(ValidationError::ProviderMissing)?;
        if as_of == DateTime::<Utc>::default() {
            return Err(ValidationError::MissingPeriod);
        }
        let merged = merge_requirements(requirements)?;

        let period = period_of(as_of);
        let mut result = ValidationResult::empty(period);
        debug!(
            %as_of,
            %period,
            requirements = requirements.len(),
            pairs = merged.len(),
            "rate-gap validation started"
        );

        for (pair, methods) in merged {
            if cancel.is_cancelled() {
                warn!(%period, checked = result.checked, "rate-gap validation cancelled");
                return Err(ValidationError::Cancelled);
            }

            let lookup = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    warn!(%period, %pair, "rate-gap validation cancelled during lookup");
                    return Err(ValidationError::Cancelled);
                }
                lookup = provider.quote_for_period(period, &pair) => lookup,
            };
            result.checked += 1;

            match lookup {
                Err(source) => {
                    warn!(%period, %pair, error = %source, "quote lookup failed");
                    return Err(ValidationError::Provider {
                        pair,
                        period,
                        source: Box::new(source),
                    });
                }
                Ok(None) => {
                    debug!(%period, %pair, "no quote published");
                    result.gaps.push(Gap {
                        pair,
                        methods: methods.into_iter().collect(),
                    });
                }
                Ok(Some(quote)) => {
                    let missing = quote.unusable_methods(methods.iter().copied());
                    result.available.insert(pair.clone(), quote);
                    if !missing.is_empty() {
                        debug!(%period, %pair, ?missing, "quote has unusable rates");
                        result.gaps.push(Gap {
                            pair,
                            methods: missing,
                        });
                    }
                }
            }
        }

        debug!(
            %period,
            checked = result.checked,
            gaps = result.gaps.len(),
            "rate-gap validation finished"
        );
        Ok(result)
    }
}

/// Groups requirements by pair, unioning their methods.
fn merge_requirements(
    requirements: &[Requirement],
) -> Result<BTreeMap<CurrencyPair, BTreeSet<RateMethod>>, ValidationError> {
    let mut merged: BTreeMap<CurrencyPair, BTreeSet<RateMethod>> = BTreeMap::new();
    for requirement in requirements {
        if requirement.methods.is_empty() {
            return Err(ValidationError::NoMethods {
                pair: requirement.pair.clone(),
            });
        }
        merged
            .entry(requirement.pair.clone())
            .or_default()
            .extend(requirement.methods.iter().copied());
    }
    Ok(merged)
}
