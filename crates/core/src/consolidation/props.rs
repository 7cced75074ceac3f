//! Property-based tests for consolidation.
//!
//! - Reporting-currency lines convert as a no-op
//! - Conversion multiplies by exactly the method's rate
//! - Missing-rate failures are total and repeatable
//! - Validation is independent of requirement order and splitting

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;

use super::*;

const PAIRS: [&str; 4] = ["EURUSD", "IDRUSD", "JPYUSD", "SGDUSD"];

/// Strategy to generate decimal amounts (-1,000,000.00 to 1,000,000.00).
fn amount() -> impl Strategy<Value = Decimal> {
    (-100_000_000i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate positive rates (0.000001 to 100.000000).
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|v| Decimal::new(v, 6))
}

/// Strategy to generate a rate that may be unusable (zero or negative).
fn any_rate() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        Just(Decimal::ZERO),
        (1i64..1_000i64).prop_map(|v| Decimal::new(-v, 3)),
        positive_rate(),
    ]
}

/// Strategy to generate a non-empty method list.
fn methods() -> impl Strategy<Value = Vec<RateMethod>> {
    prop_oneof![
        Just(vec![RateMethod::Average]),
        Just(vec![RateMethod::Closing]),
        Just(vec![RateMethod::Average, RateMethod::Closing]),
        Just(vec![RateMethod::Closing, RateMethod::Average]),
    ]
}

/// Strategy to generate requirements over a small pool of pairs.
fn requirements() -> impl Strategy<Value = Vec<Requirement>> {
    prop::collection::vec(
        (prop::sample::select(PAIRS.to_vec()), methods())
            .prop_map(|(key, methods)| Requirement::new(key.parse().unwrap(), methods)),
        0..8,
    )
}

/// Strategy to generate a provider where each pair may be absent.
fn provider() -> impl Strategy<Value = InMemoryQuoteProvider> {
    prop::collection::vec(prop::option::of((any_rate(), any_rate())), PAIRS.len()).prop_map(
        |quotes| {
            let mut provider = InMemoryQuoteProvider::new();
            for (key, quote) in PAIRS.iter().zip(quotes) {
                if let Some((average, closing)) = quote {
                    provider.insert(period(), key.parse().unwrap(), Quote::new(average, closing));
                }
            }
            provider
        },
    )
}

fn period() -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
}

fn validate(
    provider: &Arc<InMemoryQuoteProvider>,
    requirements: &[Requirement],
) -> ValidationResult {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    let as_of = Utc.with_ymd_and_hms(2026, 6, 30, 23, 59, 59).unwrap();
    runtime
        .block_on(
            RateGapValidator::new(Arc::clone(provider)).validate(
                &CancellationToken::new(),
                as_of,
                requirements,
            ),
        )
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Lines in the reporting currency, or with no currency, keep their amount.
    #[test]
    fn prop_reporting_currency_is_noop(
        local in amount(),
        prior in amount(),
        currency in prop_oneof![Just(""), Just("USD"), Just("usd")],
    ) {
        let converter = Converter::new(Policy::new("USD"));
        let lines = [Line::new("1000", currency, local).with_group_amount(prior)];

        for statement in [StatementType::ProfitLoss, StatementType::BalanceSheet] {
            let result = converter.convert(statement, &lines, &QuoteBook::new()).unwrap();
            prop_assert_eq!(result.lines[0].group_amount, local);
            prop_assert_eq!(result.delta, local - prior);
        }
    }

    /// Conversion multiplies by exactly the method's rate.
    #[test]
    fn prop_conversion_uses_method_rate(
        local in amount(),
        prior in amount(),
        average in positive_rate(),
        closing in positive_rate(),
    ) {
        let converter = Converter::new(Policy::new("USD"));
        let mut quotes = QuoteBook::new();
        quotes.insert("IDRUSD".parse().unwrap(), Quote::new(average, closing));
        let lines = [Line::new("4000", "IDR", local).with_group_amount(prior)];

        let pl = converter.convert_profit_loss(&lines, &quotes).unwrap();
        prop_assert_eq!(pl.lines[0].group_amount, local * average);
        prop_assert_eq!(pl.delta, local * average - prior);

        let bs = converter.convert_balance_sheet(&lines, &quotes).unwrap();
        prop_assert_eq!(bs.lines[0].group_amount, local * closing);
        prop_assert_eq!(bs.delta, local * closing - prior);
    }

    /// One missing pair fails the whole batch, the same way every time.
    #[test]
    fn prop_missing_rate_fails_whole_batch(
        amounts in prop::collection::vec(amount(), 1..10),
        rate in positive_rate(),
    ) {
        let converter = Converter::new(Policy::new("USD"));
        let mut quotes = QuoteBook::new();
        quotes.insert("EURUSD".parse().unwrap(), Quote::new(rate, rate));

        let mut lines: Vec<Line> = amounts
            .iter()
            .map(|a| Line::new("4000", "EUR", *a))
            .collect();
        lines.push(Line::new("4999", "IDR", Decimal::ONE));

        let first = converter.convert_profit_loss(&lines, &quotes);
        let second = converter.convert_profit_loss(&lines, &quotes);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(
            first,
            Err(ConversionError::MissingRates(MissingRateError {
                method: RateMethod::Average,
                pairs: vec!["IDRUSD".parse().unwrap()],
            }))
        );
    }

    /// Permuting the requirements does not change the result.
    #[test]
    fn prop_validate_is_order_independent(
        (requirements, shuffled) in requirements()
            .prop_flat_map(|r| (Just(r.clone()), Just(r).prop_shuffle())),
        provider in provider(),
    ) {
        let provider = Arc::new(provider);
        let expected = validate(&provider, &requirements);

        prop_assert_eq!(&validate(&provider, &shuffled), &expected);
        prop_assert_eq!(&validate(&provider, &requirements), &expected);
    }

    /// Splitting a requirement by method does not change the result.
    #[test]
    fn prop_validate_split_requirements(
        key in prop::sample::select(PAIRS.to_vec()),
        provider in provider(),
    ) {
        let provider = Arc::new(provider);
        let pair: CurrencyPair = key.parse().unwrap();

        let combined = validate(
            &provider,
            &[Requirement::new(pair.clone(), RateMethod::ALL)],
        );
        let split = validate(
            &provider,
            &[
                Requirement::new(pair.clone(), [RateMethod::Average]),
                Requirement::new(pair, [RateMethod::Closing]),
            ],
        );

        prop_assert_eq!(split, combined);
    }

    /// Checked counts distinct pairs, not requirements.
    #[test]
    fn prop_checked_counts_distinct_pairs(
        requirements in requirements(),
        provider in provider(),
    ) {
        let provider = Arc::new(provider);
        let result = validate(&provider, &requirements);

        let distinct: std::collections::BTreeSet<&CurrencyPair> =
            requirements.iter().map(|r| &r.pair).collect();
        prop_assert_eq!(result.checked, distinct.len());
        prop_assert!(result.gaps.iter().all(|g| !g.methods.is_empty()));
        prop_assert!(result.gaps.windows(2).all(|w| w[0].pair < w[1].pair));
    }
}
