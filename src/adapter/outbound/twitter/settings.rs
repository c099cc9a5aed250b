//! Endpoints and request defaults for the Twitter v2 filtered stream.

use std::fmt;
use std::time::Duration;

/// Stream endpoint, with media expanded so photos can be classified.
pub const STREAM_URL: &str = "https://api.twitter.com/2/tweets/search/stream?expansions=attachments.media_keys&media.fields=type,url";

pub const RULES_URL: &str = "https://api.twitter.com/2/tweets/search/stream/rules";

pub const USER_AGENT: &str = concat!("tweetrade/", env!("CARGO_PKG_VERSION"));

/// Header carrying the unix time at which a rate limit resets.
pub const RATE_LIMIT_RESET_HEADER: &str = "x-rate-limit-reset";

/// The server sends a heartbeat every 20 seconds; silence past this is a dead
/// connection.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct TwitterSettings {
    pub bearer_token: String,
    pub stream_url: String,
    pub rules_url: String,
    pub idle_timeout: Duration,
}

impl TwitterSettings {
    pub fn new(bearer_token: impl Into<String>) -> Self {
        Self {
            bearer_token: bearer_token.into(),
            stream_url: STREAM_URL.to_string(),
            rules_url: RULES_URL.to_string(),
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }
}

impl fmt::Debug for TwitterSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwitterSettings")
            .field("bearer_token", &"<redacted>")
            .field("stream_url", &self.stream_url)
            .field("rules_url", &self.rules_url)
            .field("idle_timeout", &self.idle_timeout)
            .finish()
    }
}
