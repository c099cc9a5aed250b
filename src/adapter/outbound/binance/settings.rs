//! Connection settings and credentials for the Binance futures API.

use std::fmt;
use std::time::Duration;

/// USDⓈ-M futures production endpoint.
pub const PRODUCTION_URL: &str = "https://fapi.binance.com";

/// USDⓈ-M futures testnet endpoint.
pub const TESTNET_URL: &str = "https://testnet.binancefuture.com";

/// Default validity window for signed requests.
pub const DEFAULT_RECV_WINDOW_MS: u64 = 5_000;

/// API key pair. `Debug` never prints the secret.
#[derive(Clone)]
pub struct BinanceCredentials {
    pub api_key: String,
    pub api_secret: String,
}

impl BinanceCredentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }
}

impl fmt::Debug for BinanceCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinanceCredentials")
            .field("api_key", &"<redacted>")
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct BinanceSettings {
    pub base_url: String,
    pub recv_window_ms: u64,
    pub timeout: Duration,
}

impl BinanceSettings {
    #[must_use]
    pub fn production() -> Self {
        Self::with_base_url(PRODUCTION_URL)
    }

    #[must_use]
    pub fn testnet() -> Self {
        Self::with_base_url(TESTNET_URL)
    }

    /// Production or testnet settings depending on the run mode.
    #[must_use]
    pub fn for_mode(test: bool) -> Self {
        if test {
            Self::testnet()
        } else {
            Self::production()
        }
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            recv_window_ms: DEFAULT_RECV_WINDOW_MS,
            timeout: Duration::from_secs(10),
        }
    }

    #[must_use]
    pub const fn recv_window(mut self, recv_window_ms: u64) -> Self {
        self.recv_window_ms = recv_window_ms;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_selects_endpoint() {
        assert_eq!(BinanceSettings::for_mode(true).base_url, TESTNET_URL);
        assert_eq!(BinanceSettings::for_mode(false).base_url, PRODUCTION_URL);
    }

    #[test]
    fn debug_redacts_credentials() {
        let creds = BinanceCredentials::new("key-123", "secret-456");
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("key-123"));
        assert!(!rendered.contains("secret-456"));
    }
}
