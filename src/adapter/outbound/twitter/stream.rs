//! Filtered stream connection.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, USER_AGENT as USER_AGENT_HEADER};
use reqwest::{Client, StatusCode};
use tracing::debug;

use super::lines::split_lines;
use super::settings::{TwitterSettings, RATE_LIMIT_RESET_HEADER, USER_AGENT};
use crate::error::Result;
use crate::port::{Connection, StreamSource};

pub struct TwitterStream {
    client: Client,
    settings: TwitterSettings,
}

impl TwitterStream {
    /// The client carries no overall timeout; idle connections are detected
    /// by the line framer instead.
    #[must_use]
    pub fn new(settings: TwitterSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }
}

/// Unix seconds from the rate-limit reset header, if present and numeric.
fn rate_limit_reset(headers: &HeaderMap) -> Option<i64> {
    headers
        .get(RATE_LIMIT_RESET_HEADER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

#[async_trait]
impl StreamSource for TwitterStream {
    async fn connect(&self) -> Result<Connection> {
        let response = self
            .client
            .get(&self.settings.stream_url)
            .bearer_auth(&self.settings.bearer_token)
            .header(USER_AGENT_HEADER, USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        debug!(status = status.as_u16(), "Stream responded");

        if status == StatusCode::OK {
            let lines = split_lines(response.bytes_stream(), self.settings.idle_timeout);
            return Ok(Connection::Open(lines));
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            if let Some(reset_at) = rate_limit_reset(response.headers()) {
                return Ok(Connection::RateLimited { reset_at });
            }
        }

        let body = response.text().await.unwrap_or_default();
        Ok(Connection::Rejected {
            status: status.as_u16(),
            body,
        })
    }

    fn source_name(&self) -> &'static str {
        "twitter"
    }
}
