//! Secret lookup port.

use async_trait::async_trait;

use crate::error::Result;

/// Source of credentials, read once at startup.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Latest value of the named secret (e.g. `twitter-bearer-token`).
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ConfigError::MissingSecret`] when the secret
    /// cannot be obtained.
    async fn secret(&self, name: &str) -> Result<String>;

    fn name(&self) -> &'static str;
}
