//! Configuration
//!
//! Settings read from command-line flags, falling back to environment variables (a `.env` file is
//! loaded first when present).

use std::path::PathBuf;

use clap::Args;
use rusty_money::iso::{self, Currency};
use thiserror::Error;

use crate::{commands::RepeatAddPricing, repository::DEFAULT_CART_KEY, store::StoreOptions};

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The currency code is not one the storefront prices in.
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// The cart key is blank.
    #[error("cart key must not be empty")]
    EmptyCartKey,
}

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Cart store settings.
#[derive(Debug, Args)]
pub struct StoreConfig {
    /// Directory holding the persisted cart
    #[arg(long, env = "VALISE_STORAGE_DIR", default_value = ".valise")]
    pub storage_dir: PathBuf,

    /// Key the cart is stored under
    #[arg(long, env = "VALISE_CART_KEY", default_value = DEFAULT_CART_KEY)]
    pub cart_key: String,

    /// ISO currency code used to display totals
    #[arg(long, env = "VALISE_CURRENCY", default_value = "INR")]
    pub currency: String,

    /// Price accrued into the total when an existing variant is added again
    #[arg(
        long,
        env = "VALISE_REPEAT_ADD_PRICING",
        value_enum,
        default_value_t = RepeatAddPricing::Incoming
    )]
    pub repeat_add_pricing: RepeatAddPricing,
}

impl StoreConfig {
    /// Resolves the display currency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownCurrency`] for codes other than INR, USD, GBP and EUR.
    pub fn currency(&self) -> Result<&'static Currency, ConfigError> {
        parse_currency(&self.currency)
    }

    /// Builds the store options.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyCartKey`] if the key is blank.
    pub fn store_options(&self) -> Result<StoreOptions, ConfigError> {
        let key = self.cart_key.trim();

        if key.is_empty() {
            return Err(ConfigError::EmptyCartKey);
        }

        Ok(StoreOptions {
            key: key.to_string(),
            pricing: self.repeat_add_pricing,
        })
    }
}

/// Parses a currency code. Only two-decimal currencies are accepted.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownCurrency`] if the code is not supported.
pub fn parse_currency(code: &str) -> Result<&'static Currency, ConfigError> {
    match code.trim().to_ascii_uppercase().as_str() {
        "INR" => Ok(iso::INR),
        "USD" => Ok(iso::USD),
        "GBP" => Ok(iso::GBP),
        "EUR" => Ok(iso::EUR),
        _ => Err(ConfigError::UnknownCurrency(code.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use testresult::TestResult;

    use super::*;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        store: StoreConfig,

        #[command(flatten)]
        logging: LoggingConfig,
    }

    #[test]
    fn parses_supported_currencies() -> TestResult {
        assert_eq!(parse_currency("inr")?, iso::INR);
        assert_eq!(parse_currency(" GBP ")?, iso::GBP);

        Ok(())
    }

    #[test]
    fn rejects_unknown_currency() {
        assert_eq!(
            parse_currency("JPY"),
            Err(ConfigError::UnknownCurrency("JPY".to_string()))
        );
    }

    #[test]
    fn flags_override_defaults() -> TestResult {
        let cli = TestCli::try_parse_from([
            "valise",
            "--storage-dir",
            "/tmp/carts",
            "--cart-key",
            "luggage",
            "--currency",
            "usd",
            "--repeat-add-pricing",
            "stored",
            "--log-format",
            "json",
        ])?;

        assert_eq!(cli.store.storage_dir, PathBuf::from("/tmp/carts"));
        assert_eq!(cli.store.currency()?, iso::USD);
        assert_eq!(
            cli.store.store_options()?,
            StoreOptions {
                key: "luggage".to_string(),
                pricing: RepeatAddPricing::Stored,
            }
        );
        assert_eq!(cli.logging.log_format, LogFormat::Json);

        Ok(())
    }

    #[test]
    fn blank_cart_key_is_rejected() -> TestResult {
        let cli = TestCli::try_parse_from(["valise", "--cart-key", "  "])?;

        assert_eq!(cli.store.store_options(), Err(ConfigError::EmptyCartKey));

        Ok(())
    }
}
