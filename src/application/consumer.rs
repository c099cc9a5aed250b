//! Resilient consumer for the filtered tweet stream.
//!
//! The consumer owns a single connection at a time and never gives up on it:
//! rate limits, refused connections, broken bodies and clean closes all lead
//! back to a new connection attempt after a delay. Each parsed event is
//! handed to an [`EventHandler`] and awaited before the next line is read, so
//! at most one trade is ever in flight.
//!
//! # Connection lifecycle
//!
//! ```text
//! Connecting ──► Streaming ──► ClosedCleanly ─┐
//!     │              └───────► Errored ───────┤
//!     └──────────────────────► RateLimited ───┴──► (delay) ──► Connecting
//! ```
//!
//! The loop only ends when the shutdown channel fires.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{debug, error, info, trace, warn};

use super::dispatch::{Route, RuleDispatcher};
use super::pipeline::{OrderPipeline, PipelineOutcome};
use super::record::parse_record;
use crate::domain::StreamEvent;
use crate::port::{Connection, LineStream, StreamSource};

/// Default pause before reconnecting after anything but a rate limit.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Receives every well-formed event, in stream order.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: StreamEvent);
}

/// Production handler: route the event, then run the pipeline for any trade.
pub struct TradingHandler {
    dispatcher: RuleDispatcher,
    pipeline: OrderPipeline,
}

impl TradingHandler {
    #[must_use]
    pub fn new(dispatcher: RuleDispatcher, pipeline: OrderPipeline) -> Self {
        Self {
            dispatcher,
            pipeline,
        }
    }
}

#[async_trait]
impl EventHandler for TradingHandler {
    async fn handle(&self, event: StreamEvent) {
        let Route::Trade(symbol) = self.dispatcher.route(&event).await else {
            return;
        };

        match self.pipeline.run(&symbol).await {
            PipelineOutcome::Entered(report) if report.is_protected() => {
                info!(tweet_id = %event.id, %symbol, "Trade complete");
            }
            PipelineOutcome::Entered(_) => {
                warn!(tweet_id = %event.id, %symbol, "Trade entered without full protection");
            }
            outcome => {
                debug!(tweet_id = %event.id, %symbol, ?outcome, "Trade not entered");
            }
        }
    }
}

/// Connection state, used for log context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Streaming,
    RateLimited,
    Errored,
    ClosedCleanly,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Connecting => "connecting",
            Self::Streaming => "streaming",
            Self::RateLimited => "rate_limited",
            Self::Errored => "errored",
            Self::ClosedCleanly => "closed_cleanly",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct ConsumerConfig {
    /// Pause before reconnecting after a refusal, error or clean close.
    pub reconnect_delay: Duration,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
        }
    }
}

/// How a streaming session ended.
enum SessionEnd {
    Closed,
    Errored,
    Shutdown,
}

/// Delay before reconnecting after a rate limit that resets at `reset_at`,
/// with one second of slack. Both arguments are unix seconds.
#[must_use]
pub fn rate_limit_delay(reset_at: i64, now: i64) -> Duration {
    let secs = reset_at.saturating_sub(now).saturating_add(1).max(0);
    Duration::from_secs(secs.unsigned_abs())
}

pub struct StreamConsumer<S, H> {
    source: S,
    handler: H,
    config: ConsumerConfig,
}

impl<S: StreamSource, H: EventHandler> StreamConsumer<S, H> {
    #[must_use]
    pub fn new(source: S, handler: H, config: ConsumerConfig) -> Self {
        Self {
            source,
            handler,
            config,
        }
    }

    /// Stay attached to the stream until `shutdown` fires.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut attempt: u64 = 0;

        loop {
            attempt += 1;
            debug!(attempt, state = %ConnectionState::Connecting, source = self.source.source_name(), "Connecting to stream");

            let connection = tokio::select! {
                biased;
                () = shutdown_requested(&mut shutdown) => break,
                connection = self.source.connect() => connection,
            };

            let delay = match connection {
                Ok(Connection::Open(lines)) => {
                    info!(attempt, state = %ConnectionState::Streaming, "Stream connected");
                    match self.consume(lines, &mut shutdown).await {
                        SessionEnd::Shutdown => break,
                        SessionEnd::Closed => {
                            info!(state = %ConnectionState::ClosedCleanly, "Stream closed by server");
                        }
                        SessionEnd::Errored => {}
                    }
                    self.config.reconnect_delay
                }
                Ok(Connection::RateLimited { reset_at }) => {
                    let delay = rate_limit_delay(reset_at, chrono::Utc::now().timestamp());
                    warn!(
                        state = %ConnectionState::RateLimited,
                        reset_at,
                        delay_secs = delay.as_secs(),
                        "Stream rate limited"
                    );
                    delay
                }
                Ok(Connection::Rejected { status, body }) => {
                    warn!(state = %ConnectionState::Errored, status, %body, "Stream connection refused");
                    self.config.reconnect_delay
                }
                Err(e) => {
                    warn!(state = %ConnectionState::Errored, error = %e, "Stream connection failed");
                    self.config.reconnect_delay
                }
            };

            debug!(delay_ms = delay.as_millis() as u64, "Reconnecting after delay");
            tokio::select! {
                biased;
                () = shutdown_requested(&mut shutdown) => break,
                () = sleep(delay) => {}
            }
        }

        info!("Stream consumer stopped");
    }

    /// Read lines until the body ends, breaks, or shutdown fires.
    async fn consume(
        &self,
        mut lines: LineStream,
        shutdown: &mut watch::Receiver<bool>,
    ) -> SessionEnd {
        loop {
            let next = tokio::select! {
                biased;
                () = shutdown_requested(shutdown) => return SessionEnd::Shutdown,
                next = lines.next() => next,
            };

            let line = match next {
                None => return SessionEnd::Closed,
                Some(Err(e)) => {
                    error!(state = %ConnectionState::Errored, error = %e, "Stream read failed");
                    return SessionEnd::Errored;
                }
                Some(Ok(line)) => line,
            };

            if line.trim().is_empty() {
                trace!("Heartbeat");
                continue;
            }

            let event = match parse_record(&line) {
                Ok(event) => event,
                Err(e) => {
                    warn!(error = %e, raw = %line, "Skipping stream record");
                    continue;
                }
            };

            debug!(tweet_id = %event.id, tag = %event.matching_tag, "Stream event");
            tokio::select! {
                biased;
                () = shutdown_requested(shutdown) => return SessionEnd::Shutdown,
                () = self.handler.handle(event) => {}
            }
        }
    }
}

/// Resolves once shutdown has been signalled or its sender is gone.
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    while !*shutdown.borrow_and_update() {
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}
