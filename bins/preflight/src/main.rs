//! Pre-flight FX rate check for a consolidation run.
//!
//! Usage:
//!   fxconsol-preflight <run-file.toml>
//!
//! Reports every (pair, method) without a usable rate for the run's period.
//! When nothing is missing, translates the run file's statement lines and
//! prints the cumulative translation delta.
//!
//! Exit status: 0 when clean, 1 when gaps were found, 2 when the check failed.

mod run;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use fxconsol_core::consolidation::{Converter, Policy, RateGapValidator, StatementType};
use fxconsol_shared::{AppConfig, AppError, LogConfig};

use crate::run::RunFile;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(&config.log);

    let path: PathBuf = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: fxconsol-preflight <run-file.toml>")?;
    let run = RunFile::load(&path)?;

    let policy = Policy::from_config(&config.consolidation).map_err(AppError::from)?;
    let reporting_currency = policy.target_currency().map_err(AppError::from)?;
    info!(
        %reporting_currency,
        profit_loss = %policy.method_for(StatementType::ProfitLoss),
        balance_sheet = %policy.method_for(StatementType::BalanceSheet),
        "Consolidation policy loaded"
    );

    let validator = RateGapValidator::new(Arc::new(run.provider()));
    let cancel = CancellationToken::new();
    let timer = spawn_deadline(
        cancel.clone(),
        Duration::from_secs(config.consolidation.provider_timeout_secs),
    );
    let outcome = validator
        .validate(&cancel, run.as_of, &run.requirements)
        .await;
    timer.abort();

    let result = match outcome {
        Ok(result) => result,
        Err(err) => {
            let err = AppError::from(err);
            error!(code = err.error_code(), retryable = err.is_retryable(), "{err}");
            return Ok(ExitCode::from(2));
        }
    };

    println!("{}", serde_json::to_string_pretty(&result)?);

    if !result.is_clean() {
        for (pair, method) in result.missing() {
            warn!(%pair, %method, period = %result.period, "Missing FX rate");
        }
        return Ok(ExitCode::from(1));
    }
    info!(
        checked = result.checked,
        period = %result.period,
        "All required FX rates are available"
    );

    if run.has_lines() {
        let converter = Converter::new(policy);
        let mut cumulative = Decimal::ZERO;
        for (statement, lines) in [
            (StatementType::ProfitLoss, &run.profit_loss_lines),
            (StatementType::BalanceSheet, &run.balance_sheet_lines),
        ] {
            if lines.is_empty() {
                continue;
            }
            match converter.convert(statement, lines, &result.available) {
                Ok(conversion) => {
                    cumulative = cumulative
                        .checked_add(conversion.delta)
                        .context("cumulative translation adjustment overflowed")?;
                    info!(
                        %statement,
                        lines = conversion.lines.len(),
                        delta = %conversion.delta,
                        "Statement translated"
                    );
                    println!("{}", serde_json::to_string_pretty(&conversion)?);
                }
                Err(err) => {
                    let code = err.error_code();
                    let err = AppError::from(err);
                    error!(%statement, code, "{err}");
                    return Ok(ExitCode::from(2));
                }
            }
        }
        info!(%cumulative, "Cumulative translation adjustment");
    }

    Ok(ExitCode::SUCCESS)
}

/// Initializes tracing; `RUST_LOG` overrides the configured filter.
fn init_tracing(log: &LogConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.filter));
    let registry = tracing_subscriber::registry().with(filter);

    if log.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Cancels `token` once `timeout` elapses.
fn spawn_deadline(token: CancellationToken, timeout: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(timeout).await;
        warn!(timeout_secs = timeout.as_secs(), "Pre-flight deadline reached");
        token.cancel();
    })
}
