//! Google Secret Manager store.
//!
//! Authenticates with the instance service account through the metadata
//! server, so it only works on GCP compute (GCE, Cloud Run, GKE).

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{ConfigError, Error, Result};
use crate::port::SecretStore;

const TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";
const SECRET_MANAGER_URL: &str = "https://secretmanager.googleapis.com/v1";

#[derive(Debug)]
pub struct GcpSecretStore {
    client: Client,
    project_id: String,
}

#[derive(Deserialize)]
struct AccessToken {
    access_token: String,
}

#[derive(Deserialize)]
struct AccessResponse {
    payload: Payload,
}

#[derive(Deserialize)]
struct Payload {
    data: String,
}

impl GcpSecretStore {
    #[must_use]
    pub fn new(project_id: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                Client::new()
            });

        Self {
            client,
            project_id: project_id.into(),
        }
    }

    fn secret_url(&self, name: &str) -> String {
        format!(
            "{SECRET_MANAGER_URL}/projects/{}/secrets/{name}/versions/latest:access",
            self.project_id
        )
    }

    async fn access_token(&self) -> Result<String> {
        let token: AccessToken = self
            .client
            .get(TOKEN_URL)
            .header("Metadata-Flavor", "Google")
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::Connection(e.to_string()))?
            .json()
            .await?;
        Ok(token.access_token)
    }
}

/// Decode a Secret Manager payload into trimmed UTF-8 text.
fn decode_payload(name: &str, data: &str) -> std::result::Result<String, ConfigError> {
    let missing = |reason: String| ConfigError::MissingSecret {
        name: name.to_string(),
        reason,
    };
    let bytes = STANDARD
        .decode(data)
        .map_err(|e| missing(format!("payload is not base64: {e}")))?;
    let text = String::from_utf8(bytes).map_err(|e| missing(format!("payload is not UTF-8: {e}")))?;
    Ok(text.trim().to_string())
}

#[async_trait]
impl SecretStore for GcpSecretStore {
    async fn secret(&self, name: &str) -> Result<String> {
        let token = self.access_token().await.map_err(|e| ConfigError::MissingSecret {
            name: name.to_string(),
            reason: format!("no metadata access token: {e}"),
        })?;

        let response = self
            .client
            .get(self.secret_url(name))
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ConfigError::MissingSecret {
                name: name.to_string(),
                reason: format!("secret manager answered {status}: {body}"),
            }
            .into());
        }

        let access: AccessResponse = response.json().await?;
        debug!(secret = name, project = %self.project_id, "Loaded secret");
        Ok(decode_payload(name, &access.payload.data)?)
    }

    fn name(&self) -> &'static str {
        "gcp"
    }
}
