//! Filtered stream ports: the long-lived connection and its rule set.

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::Stream;

use crate::domain::Rule;
use crate::error::Result;

/// Body of an open stream, one item per newline-delimited line.
///
/// Lines are yielded without their terminator; heartbeats arrive as empty
/// strings. An `Err` item means the connection broke mid-stream.
pub type LineStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Outcome of one connection attempt.
pub enum Connection {
    /// Server accepted the connection and is streaming.
    Open(LineStream),
    /// Server refused with a rate limit; retry after `reset_at` (unix seconds).
    RateLimited { reset_at: i64 },
    /// Any other non-success status.
    Rejected { status: u16, body: String },
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open(_) => f.write_str("Open"),
            Self::RateLimited { reset_at } => {
                f.debug_struct("RateLimited").field("reset_at", reset_at).finish()
            }
            Self::Rejected { status, body } => f
                .debug_struct("Rejected")
                .field("status", status)
                .field("body", body)
                .finish(),
        }
    }
}

#[async_trait]
pub trait StreamSource: Send + Sync {
    /// Open a new connection to the stream.
    ///
    /// `Err` is reserved for transport failures (DNS, TLS, refused socket);
    /// HTTP-level refusals come back as [`Connection::RateLimited`] or
    /// [`Connection::Rejected`].
    async fn connect(&self) -> Result<Connection>;

    fn source_name(&self) -> &'static str;
}

/// A rule as currently installed on the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledRule {
    pub id: String,
    pub rule: Rule,
}

/// Rule management for the filtered stream. Never used on the hot path.
#[async_trait]
pub trait RuleStore: Send + Sync {
    async fn rules(&self) -> Result<Vec<InstalledRule>>;

    async fn delete_rules(&self, ids: &[String]) -> Result<()>;

    async fn add_rules(&self, rules: &[Rule]) -> Result<()>;
}
