//! Secrets from environment variables.

use async_trait::async_trait;

use crate::error::{ConfigError, Result};
use crate::port::SecretStore;

/// Reads `twitter-bearer-token` from `TWITTER_BEARER_TOKEN`, and so on.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSecretStore;

impl EnvSecretStore {
    /// Environment variable holding the named secret.
    #[must_use]
    pub fn var_name(name: &str) -> String {
        name.replace('-', "_").to_ascii_uppercase()
    }
}

#[async_trait]
impl SecretStore for EnvSecretStore {
    async fn secret(&self, name: &str) -> Result<String> {
        let var = Self::var_name(name);
        match std::env::var(&var) {
            Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
            Ok(_) => Err(ConfigError::MissingSecret {
                name: name.to_string(),
                reason: format!("{var} is empty"),
            }
            .into()),
            Err(e) => Err(ConfigError::MissingSecret {
                name: name.to_string(),
                reason: format!("{var}: {e}"),
            }
            .into()),
        }
    }

    fn name(&self) -> &'static str {
        "env"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn maps_secret_names_to_variables() {
        assert_eq!(EnvSecretStore::var_name("twitter-bearer-token"), "TWITTER_BEARER_TOKEN");
        assert_eq!(
            EnvSecretStore::var_name("binance-testnet-api-secret"),
            "BINANCE_TESTNET_API_SECRET"
        );
    }

    #[tokio::test]
    async fn reads_and_trims_variable() {
        std::env::set_var("TWEETRADE_TEST_SECRET_PRESENT", "  value\n");
        let value = EnvSecretStore.secret("tweetrade-test-secret-present").await.unwrap();
        assert_eq!(value, "value");
        std::env::remove_var("TWEETRADE_TEST_SECRET_PRESENT");
    }

    #[tokio::test]
    async fn missing_variable_is_a_config_error() {
        let err = EnvSecretStore
            .secret("tweetrade-test-secret-absent")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::MissingSecret { ref name, .. }) if name == "tweetrade-test-secret-absent"
        ));
    }
}
