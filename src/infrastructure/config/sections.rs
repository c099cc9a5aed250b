//! Stream, exchange, media and secrets sections of the config file.

use std::time::Duration;

use serde::Deserialize;

use crate::adapter::outbound::binance::settings::DEFAULT_RECV_WINDOW_MS;
use crate::application::DEFAULT_MEDIA_THRESHOLD;
use crate::domain::Rule;

const fn default_reconnect_delay_secs() -> u64 {
    5
}

const fn default_recv_window_ms() -> u64 {
    DEFAULT_RECV_WINDOW_MS
}

const fn default_media_threshold() -> f64 {
    DEFAULT_MEDIA_THRESHOLD
}

/// Filtered stream settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StreamAppConfig {
    /// Rules installed at startup. Each tag is `dev-only`, `has-media` or a
    /// configured symbol.
    #[serde(default)]
    pub rules: Vec<Rule>,
    /// Pause before reconnecting after a refusal, error or clean close.
    #[serde(default = "default_reconnect_delay_secs")]
    pub reconnect_delay_secs: u64,
}

impl StreamAppConfig {
    #[must_use]
    pub const fn reconnect_delay(&self) -> Duration {
        Duration::from_secs(self.reconnect_delay_secs)
    }
}

impl Default for StreamAppConfig {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            reconnect_delay_secs: default_reconnect_delay_secs(),
        }
    }
}

/// Exchange request settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExchangeAppConfig {
    /// Validity window for signed requests, in milliseconds.
    #[serde(default = "default_recv_window_ms")]
    pub recv_window_ms: u64,
}

impl Default for ExchangeAppConfig {
    fn default() -> Self {
        Self {
            recv_window_ms: default_recv_window_ms(),
        }
    }
}

/// Image gate for `has-media` rules.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MediaConfig {
    /// Symbol traded when a photo qualifies.
    pub symbol: String,
    /// Label the classifier must return.
    pub label: String,
    #[serde(default = "default_media_threshold")]
    pub threshold: f64,
    /// Classification service URL.
    pub endpoint: String,
    /// Secret holding the classifier's bearer key, if it needs one.
    #[serde(default)]
    pub api_key_secret: Option<String>,
}

/// Where credentials are read from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretProvider {
    /// Environment variables (`twitter-bearer-token` → `TWITTER_BEARER_TOKEN`).
    #[default]
    Env,
    /// Google Secret Manager.
    Gcp,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecretsConfig {
    #[serde(default)]
    pub provider: SecretProvider,
    /// GCP project holding the secrets; required for the `gcp` provider.
    #[serde(default)]
    pub project_id: Option<String>,
}
