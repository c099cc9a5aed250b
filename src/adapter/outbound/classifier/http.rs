//! HTTP image classifier client.
//!
//! Posts `{"image_url": ...}` to a classification service and expects the
//! top prediction back as `{"label": ..., "score": ...}`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::port::{Classification, ImageClassifier};

#[derive(Debug)]
pub struct HttpClassifier {
    client: Client,
    endpoint: String,
    /// Bearer key, when the service requires one.
    api_key: Option<String>,
}

impl HttpClassifier {
    #[must_use]
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                Client::new()
            });

        Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        }
    }
}

#[derive(Serialize)]
struct Request<'a> {
    image_url: &'a str,
}

#[derive(Deserialize)]
struct Response {
    label: String,
    score: f64,
}

#[async_trait]
impl ImageClassifier for HttpClassifier {
    async fn classify(&self, image_url: &str) -> Result<Classification> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&Request { image_url });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Classifier(e.to_string()))?
            .error_for_status()
            .map_err(|e| Error::Classifier(e.to_string()))?
            .json::<Response>()
            .await
            .map_err(|e| Error::Classifier(format!("unexpected response: {e}")))?;

        if !(0.0..=1.0).contains(&response.score) {
            return Err(Error::Classifier(format!(
                "score {} outside [0, 1]",
                response.score
            )));
        }

        debug!(image_url, label = %response.label, score = response.score, "Image classified");
        Ok(Classification::new(response.label, response.score))
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_shape() {
        let body = serde_json::to_value(Request {
            image_url: "https://pbs.twimg.com/media/x.jpg",
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"image_url": "https://pbs.twimg.com/media/x.jpg"}));
    }

    #[test]
    fn response_ignores_extra_fields() {
        let response: Response =
            serde_json::from_str(r#"{"label":"shiba_inu","score":0.87,"model":"resnet50"}"#)
                .unwrap();
        assert_eq!(response.label, "shiba_inu");
        assert!((response.score - 0.87).abs() < f64::EPSILON);
    }
}
