//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Credentials are never read from the file; they come from the configured
//! secret store at startup.
//!
//! # Example
//!
//! ```no_run
//! use tweetrade::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

use super::logging::LoggingConfig;
use super::sections::{
    ExchangeAppConfig, MediaConfig, SecretProvider, SecretsConfig, StreamAppConfig,
};
use super::telegram::TelegramAppConfig;
use crate::domain::{RouteTag, TradeParams};
use crate::error::{ConfigError, Result};

/// Largest trailing callback rate Binance accepts, in percent.
const MAX_CALLBACK_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub stream: StreamAppConfig,

    #[serde(default)]
    pub exchange: ExchangeAppConfig,

    /// Image gate; required when any rule is tagged `has-media`.
    #[serde(default)]
    pub media: Option<MediaConfig>,

    #[serde(default)]
    pub telegram: TelegramAppConfig,

    #[serde(default)]
    pub secrets: SecretsConfig,

    /// Trade parameters keyed by symbol.
    #[serde(default)]
    pub symbols: BTreeMap<String, TradeParams>,
}

impl Config {
    /// Parse and validate configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the content is malformed,
    /// or validation fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    /// Tags of symbol rules that have no `[symbols]` entry.
    pub fn unconfigured_rule_tags(&self) -> impl Iterator<Item = &str> {
        self.stream.rules.iter().filter_map(|rule| match rule.route() {
            RouteTag::Symbol(symbol) if !self.symbols.contains_key(symbol) => Some(symbol),
            _ => None,
        })
    }

    fn validate(&self) -> Result<()> {
        if self.stream.rules.is_empty() {
            return Err(ConfigError::MissingField {
                field: "stream.rules",
            }
            .into());
        }
        for rule in &self.stream.rules {
            if rule.pattern.trim().is_empty() || rule.tag.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "stream.rules",
                    reason: format!("rule {:?} needs a non-empty value and tag", rule.pattern),
                }
                .into());
            }
        }
        if self.stream.reconnect_delay_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "stream.reconnect_delay_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.exchange.recv_window_ms == 0 || self.exchange.recv_window_ms > 60_000 {
            return Err(ConfigError::InvalidValue {
                field: "exchange.recv_window_ms",
                reason: "must be between 1 and 60000".to_string(),
            }
            .into());
        }

        for (symbol, params) in &self.symbols {
            validate_params(params).map_err(|reason| ConfigError::InvalidSymbol {
                symbol: symbol.clone(),
                reason,
            })?;
        }

        self.validate_media()?;

        if self.secrets.provider == SecretProvider::Gcp
            && self
                .secrets
                .project_id
                .as_deref()
                .map_or(true, |id| id.trim().is_empty())
        {
            return Err(ConfigError::MissingField {
                field: "secrets.project_id",
            }
            .into());
        }

        Ok(())
    }

    fn validate_media(&self) -> Result<()> {
        let needs_media = self
            .stream
            .rules
            .iter()
            .any(|rule| rule.route() == RouteTag::HasMedia);

        let Some(media) = &self.media else {
            if needs_media {
                return Err(ConfigError::MissingField { field: "media" }.into());
            }
            return Ok(());
        };

        if !self.symbols.contains_key(&media.symbol) {
            return Err(ConfigError::InvalidValue {
                field: "media.symbol",
                reason: format!("{} has no [symbols] entry", media.symbol),
            }
            .into());
        }
        if media.label.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "media.label",
            }
            .into());
        }
        if !(0.0..=1.0).contains(&media.threshold) {
            return Err(ConfigError::InvalidValue {
                field: "media.threshold",
                reason: "must be between 0 and 1".to_string(),
            }
            .into());
        }
        if url::Url::parse(&media.endpoint).is_err() {
            return Err(ConfigError::InvalidValue {
                field: "media.endpoint",
                reason: format!("{:?} is not a URL", media.endpoint),
            }
            .into());
        }
        Ok(())
    }
}

fn validate_params(params: &TradeParams) -> std::result::Result<(), String> {
    if params.leverage < 1 {
        return Err("leverage must be at least 1".into());
    }
    if params.allocation <= Decimal::ZERO || params.allocation > Decimal::ONE {
        return Err("allocation must be in (0, 1]".into());
    }
    if params.limit_price_multiplier <= Decimal::ZERO {
        return Err("limit_price_multiplier must be greater than 0".into());
    }
    if params.stop_loss_multiplier <= Decimal::ZERO || params.stop_loss_multiplier >= Decimal::ONE
    {
        return Err("stop_loss_multiplier must be in (0, 1)".into());
    }
    if params.take_profit_multiplier <= Decimal::ONE {
        return Err("take_profit_multiplier must be greater than 1".into());
    }
    if params.trailing_callback_rate <= Decimal::ZERO
        || params.trailing_callback_rate > MAX_CALLBACK_RATE
    {
        return Err("trailing_callback_rate must be in (0, 5]".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const SYMBOL: &str = r#"
[[stream.rules]]
value = "from:elonmusk doge"
tag = "DOGEUSDT"

[symbols.DOGEUSDT]
leverage = 20
allocation = 0.9
limit_price_multiplier = 1.0015
stop_loss_multiplier = 0.98
take_profit_multiplier = 1.05
trailing_callback_rate = 1.0
"#;

    fn invalid_symbol(content: &str) -> String {
        match Config::parse_toml(content) {
            Err(Error::Config(ConfigError::InvalidSymbol { reason, .. })) => reason,
            other => panic!("expected InvalidSymbol, got {other:?}"),
        }
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let config = Config::parse_toml(SYMBOL).unwrap();

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.stream.reconnect_delay_secs, 5);
        assert_eq!(config.exchange.recv_window_ms, 5_000);
        assert!(config.telegram.enabled);
        assert_eq!(config.secrets.provider, SecretProvider::Env);
        assert_eq!(config.symbols["DOGEUSDT"].leverage, 20);
    }

    #[test]
    fn stop_loss_must_be_below_one() {
        let reason = invalid_symbol(&SYMBOL.replace("stop_loss_multiplier = 0.98", "stop_loss_multiplier = 1.0"));
        assert!(reason.contains("stop_loss_multiplier"));
    }

    #[test]
    fn take_profit_must_be_above_one() {
        let reason = invalid_symbol(&SYMBOL.replace("take_profit_multiplier = 1.05", "take_profit_multiplier = 0.99"));
        assert!(reason.contains("take_profit_multiplier"));
    }

    #[test]
    fn allocation_range() {
        let reason = invalid_symbol(&SYMBOL.replace("allocation = 0.9", "allocation = 1.5"));
        assert!(reason.contains("allocation"));
    }

    #[test]
    fn callback_rate_range() {
        let reason = invalid_symbol(&SYMBOL.replace("trailing_callback_rate = 1.0", "trailing_callback_rate = 7"));
        assert!(reason.contains("trailing_callback_rate"));
    }

    #[test]
    fn unknown_symbol_fields_are_rejected() {
        let content = SYMBOL.replace("leverage = 20", "leverage = 20\nlevrage = 5");
        assert!(matches!(
            Config::parse_toml(&content),
            Err(Error::Config(ConfigError::Parse(_)))
        ));
    }

    #[test]
    fn media_rule_requires_media_section() {
        let content = format!("{SYMBOL}\n[[stream.rules]]\nvalue = \"from:elonmusk has:images\"\ntag = \"has-media\"\n");
        assert!(matches!(
            Config::parse_toml(&content),
            Err(Error::Config(ConfigError::MissingField { field: "media" }))
        ));
    }

    #[test]
    fn media_symbol_must_be_configured() {
        let content = format!(
            "{SYMBOL}\n[media]\nsymbol = \"SHIBUSDT\"\nlabel = \"shiba_inu\"\nendpoint = \"http://localhost:8080/classify\"\n"
        );
        assert!(matches!(
            Config::parse_toml(&content),
            Err(Error::Config(ConfigError::InvalidValue { field: "media.symbol", .. }))
        ));
    }

    #[test]
    fn gcp_provider_requires_project() {
        let content = format!("{SYMBOL}\n[secrets]\nprovider = \"gcp\"\n");
        assert!(matches!(
            Config::parse_toml(&content),
            Err(Error::Config(ConfigError::MissingField { field: "secrets.project_id" }))
        ));
    }

    #[test]
    fn reports_rule_tags_without_symbols() {
        let content = format!("{SYMBOL}\n[[stream.rules]]\nvalue = \"btc\"\ntag = \"BTCUSDT\"\n\n[[stream.rules]]\nvalue = \"test\"\ntag = \"dev-only\"\n");
        let config = Config::parse_toml(&content).unwrap();
        assert_eq!(config.unconfigured_rule_tags().collect::<Vec<_>>(), vec!["BTCUSDT"]);
    }
}
