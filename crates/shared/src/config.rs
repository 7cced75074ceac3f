//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Consolidation policy configuration.
    #[serde(default)]
    pub consolidation: ConsolidationConfig,
    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,
}

/// Consolidation policy configuration.
///
/// Method names are kept as raw strings here; they are parsed into the closed
/// method set when the policy is built, so a typo surfaces as a hard error.
#[derive(Debug, Clone, Deserialize)]
pub struct ConsolidationConfig {
    /// Group reporting currency (ISO 4217, case-insensitive). Empty means the
    /// built-in fallback currency.
    #[serde(default)]
    pub reporting_currency: String,
    /// Rate method for profit-and-loss lines (`AVERAGE` or `CLOSING`).
    #[serde(default)]
    pub profit_loss_method: Option<String>,
    /// Rate method for balance-sheet lines (`AVERAGE` or `CLOSING`).
    #[serde(default)]
    pub balance_sheet_method: Option<String>,
    /// Upper bound on a whole pre-flight validation run, in seconds.
    #[serde(default = "default_provider_timeout")]
    pub provider_timeout_secs: u64,
}

impl Default for ConsolidationConfig {
    fn default() -> Self {
        Self {
            reporting_currency: String::new(),
            profit_loss_method: None,
            balance_sheet_method: None,
            provider_timeout_secs: default_provider_timeout(),
        }
    }
}

fn default_provider_timeout() -> u64 {
    30
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Default `tracing` filter directive, used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON log lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

fn default_log_filter() -> String {
    "fxconsol=info".to_string()
}

impl AppConfig {
    /// Environment variable prefix for configuration overrides.
    pub const ENV_PREFIX: &'static str = "FXCONSOL";

    /// Loads configuration from environment and config files.
    ///
    /// Sources, lowest priority first: `config/default`, `config/{RUN_MODE}`,
    /// then `FXCONSOL__SECTION__KEY` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix(Self::ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        config.try_deserialize()
    }
}
