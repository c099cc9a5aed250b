//! Infrastructure bootstrap helpers for runtime wiring.

use std::sync::Arc;

use tracing::info;

use crate::adapter::outbound::binance::{BinanceCredentials, BinanceExchange, BinanceSettings};
use crate::adapter::outbound::classifier::HttpClassifier;
#[cfg(feature = "telegram")]
use crate::adapter::outbound::notifier::telegram::{TelegramConfig, TelegramNotifier};
use crate::adapter::outbound::secrets::{EnvSecretStore, GcpSecretStore};
use crate::application::{MediaGate, RuleDispatcher};
use crate::domain::TradeBook;
use crate::error::Result;
use crate::infrastructure::config::sections::SecretProvider;
use crate::infrastructure::config::settings::Config;
use crate::port::{ImageClassifier, LogNotifier, NotifierRegistry, SecretStore};

pub const TWITTER_BEARER_TOKEN: &str = "twitter-bearer-token";
pub const TELEGRAM_TOKEN: &str = "telegram-token";
pub const TELEGRAM_CHAT_ID: &str = "telegram-chat-id";

/// Secret names for the Binance key pair in the given run mode.
#[must_use]
pub const fn binance_secret_names(test: bool) -> (&'static str, &'static str) {
    if test {
        ("binance-testnet-api-key", "binance-testnet-api-secret")
    } else {
        ("binance-api-key", "binance-api-secret")
    }
}

/// Everything read from the secret store at startup.
pub struct Credentials {
    pub twitter_bearer_token: String,
    pub binance: BinanceCredentials,
    /// Raw bot token and chat id; present only when Telegram is enabled.
    pub telegram: Option<(String, String)>,
}

/// Build the secret store selected in `[secrets]`.
#[must_use]
pub fn build_secret_store(config: &Config) -> Arc<dyn SecretStore> {
    match (config.secrets.provider, config.secrets.project_id.as_deref()) {
        (SecretProvider::Gcp, Some(project_id)) => Arc::new(GcpSecretStore::new(project_id)),
        _ => Arc::new(EnvSecretStore),
    }
}

/// Read every credential the run needs. Any missing secret is fatal.
pub async fn load_credentials(
    store: &dyn SecretStore,
    config: &Config,
    test: bool,
) -> Result<Credentials> {
    info!(store = store.name(), test, "Loading credentials");

    let twitter_bearer_token = store.secret(TWITTER_BEARER_TOKEN).await?;
    let (key_name, secret_name) = binance_secret_names(test);
    let binance = BinanceCredentials::new(
        store.secret(key_name).await?,
        store.secret(secret_name).await?,
    );

    let telegram = if cfg!(feature = "telegram") && config.telegram.enabled {
        Some((
            store.secret(TELEGRAM_TOKEN).await?,
            store.secret(TELEGRAM_CHAT_ID).await?,
        ))
    } else {
        None
    };

    Ok(Credentials {
        twitter_bearer_token,
        binance,
        telegram,
    })
}

#[must_use]
pub fn build_exchange(config: &Config, test: bool, credentials: BinanceCredentials) -> BinanceExchange {
    let settings = BinanceSettings::for_mode(test).recv_window(config.exchange.recv_window_ms);
    info!(base_url = %settings.base_url, "Exchange configured");
    BinanceExchange::new(settings, credentials)
}

/// Build notifier registry: always logs, and sends to Telegram when enabled.
#[cfg(feature = "telegram")]
pub fn build_notifier_registry(telegram: Option<(String, String)>) -> Result<NotifierRegistry> {
    let mut registry = NotifierRegistry::new();
    registry.register(Box::new(LogNotifier));

    if let Some((bot_token, chat_id)) = telegram {
        let tg_config = TelegramConfig::from_secrets(bot_token, &chat_id)?;
        registry.register(Box::new(TelegramNotifier::new(tg_config)));
        info!("Telegram notifier enabled");
    }

    Ok(registry)
}

/// Build notifier registry (non-telegram variant).
#[cfg(not(feature = "telegram"))]
pub fn build_notifier_registry(_telegram: Option<(String, String)>) -> Result<NotifierRegistry> {
    let mut registry = NotifierRegistry::new();
    registry.register(Box::new(LogNotifier));
    Ok(registry)
}

/// Build the dispatcher, with the image gate when `[media]` is configured.
pub async fn build_dispatcher(
    config: &Config,
    store: &dyn SecretStore,
    book: Arc<TradeBook>,
) -> Result<RuleDispatcher> {
    let dispatcher = RuleDispatcher::new(book);
    let Some(media) = &config.media else {
        return Ok(dispatcher);
    };

    let api_key = match &media.api_key_secret {
        Some(name) => Some(store.secret(name).await?),
        None => None,
    };
    let classifier: Arc<dyn ImageClassifier> =
        Arc::new(HttpClassifier::new(media.endpoint.clone(), api_key));
    let gate = MediaGate {
        symbol: media.symbol.clone(),
        label: media.label.clone(),
        threshold: media.threshold,
    };
    info!(
        symbol = %gate.symbol,
        label = %gate.label,
        threshold = gate.threshold,
        classifier = classifier.name(),
        "Media gate enabled"
    );

    Ok(dispatcher.with_media_gate(gate, classifier))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_uses_testnet_keys() {
        assert_eq!(
            binance_secret_names(true),
            ("binance-testnet-api-key", "binance-testnet-api-secret")
        );
        assert_eq!(binance_secret_names(false), ("binance-api-key", "binance-api-secret"));
    }
}
