//! Signed HTTP transport for the Binance futures REST API.
//!
//! Every call goes through [`BinanceClient::send`], which signs the query
//! when asked to and turns every failure into an [`ExchangeError`].

use reqwest::{Client as HttpClient, Method, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::dto::ApiErrorBody;
use super::settings::{BinanceCredentials, BinanceSettings};
use super::signing::sign;
use crate::error::ExchangeError;

const API_KEY_HEADER: &str = "X-MBX-APIKEY";

/// Query parameters in submission order.
pub type Params = Vec<(&'static str, String)>;

pub struct BinanceClient {
    http: HttpClient,
    settings: BinanceSettings,
    credentials: BinanceCredentials,
}

impl BinanceClient {
    #[must_use]
    pub fn new(settings: BinanceSettings, credentials: BinanceCredentials) -> Self {
        let http = HttpClient::builder()
            .timeout(settings.timeout)
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            settings,
            credentials,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.settings.base_url
    }

    /// Unsigned market-data request.
    pub async fn public<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Params,
    ) -> Result<T, ExchangeError> {
        self.send(Method::GET, path, params, false).await
    }

    /// Signed account or trading request.
    pub async fn signed<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        params: Params,
    ) -> Result<T, ExchangeError> {
        self.send(method, path, params, true).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        params: Params,
        signed: bool,
    ) -> Result<T, ExchangeError> {
        let mut query = encode(&params);
        if signed {
            let timestamp = chrono::Utc::now().timestamp_millis();
            if !query.is_empty() {
                query.push('&');
            }
            query.push_str(&format!(
                "recvWindow={}&timestamp={timestamp}",
                self.settings.recv_window_ms
            ));
            let signature = sign(&query, &self.credentials.api_secret)?;
            query.push_str(&format!("&signature={signature}"));
        }

        let url = if query.is_empty() {
            format!("{}{path}", self.settings.base_url)
        } else {
            format!("{}{path}?{query}", self.settings.base_url)
        };
        debug!(%method, path, "Binance request");

        let mut request = self.http.request(method, &url);
        if signed {
            request = request.header(API_KEY_HEADER, &self.credentials.api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ExchangeError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ExchangeError::Transport(e.to_string()))?;

        decode(status, &body)
    }
}

fn encode(params: &Params) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

/// Map a response to its payload or a structured API error.
fn decode<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T, ExchangeError> {
    if status.is_success() {
        return serde_json::from_str(body)
            .map_err(|e| ExchangeError::Malformed(format!("{e}: {body}")));
    }

    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(err) => Err(ExchangeError::Api {
            status: status.as_u16(),
            code: err.code,
            message: err.msg,
        }),
        Err(_) => Err(ExchangeError::Api {
            status: status.as_u16(),
            code: -1,
            message: body.to_string(),
        }),
    }
}
