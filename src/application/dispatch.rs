//! Routing of stream events to trading decisions.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::{RouteTag, StreamEvent, TradeBook};
use crate::port::ImageClassifier;

/// Confidence required before a classified image can trigger a trade.
pub const DEFAULT_MEDIA_THRESHOLD: f64 = 0.32;

/// Settings for the image-gated route.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaGate {
    /// Symbol traded when an image qualifies.
    pub symbol: String,
    /// Label the classifier must return.
    pub label: String,
    pub threshold: f64,
}

impl MediaGate {
    pub fn new(symbol: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            label: label.into(),
            threshold: DEFAULT_MEDIA_THRESHOLD,
        }
    }
}

/// Decision for one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Run the order pipeline for this symbol.
    Trade(String),
    Drop(DropReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    DevOnly,
    NoQualifyingImage,
    MediaGateDisabled,
    UnknownTag,
}

/// Maps events to routes. The only I/O is the optional classifier call.
pub struct RuleDispatcher {
    book: Arc<TradeBook>,
    media: Option<(MediaGate, Arc<dyn ImageClassifier>)>,
}

impl RuleDispatcher {
    #[must_use]
    pub fn new(book: Arc<TradeBook>) -> Self {
        Self { book, media: None }
    }

    /// Enable the `has-media` route.
    #[must_use]
    pub fn with_media_gate(mut self, gate: MediaGate, classifier: Arc<dyn ImageClassifier>) -> Self {
        self.media = Some((gate, classifier));
        self
    }

    pub async fn route(&self, event: &StreamEvent) -> Route {
        match RouteTag::parse(&event.matching_tag) {
            RouteTag::DevOnly => {
                info!(tweet_id = %event.id, text = %event.text, "Dev-only match, not trading");
                Route::Drop(DropReason::DevOnly)
            }
            RouteTag::HasMedia => self.route_media(event).await,
            RouteTag::Symbol(symbol) if self.book.contains(symbol) => {
                info!(tweet_id = %event.id, symbol, text = %event.text, "Tweet triggers trade");
                Route::Trade(symbol.to_string())
            }
            RouteTag::Symbol(tag) => {
                warn!(tweet_id = %event.id, tag, "Matched rule tag has no trade config");
                Route::Drop(DropReason::UnknownTag)
            }
        }
    }

    async fn route_media(&self, event: &StreamEvent) -> Route {
        let Some((gate, classifier)) = &self.media else {
            warn!(tweet_id = %event.id, "Media rule matched but no media gate is configured");
            return Route::Drop(DropReason::MediaGateDisabled);
        };

        for url in event.photo_urls() {
            match classifier.classify(url).await {
                Ok(result) if result.matches(&gate.label, gate.threshold) => {
                    info!(
                        tweet_id = %event.id,
                        url,
                        label = %result.label,
                        score = result.score,
                        symbol = %gate.symbol,
                        "Image qualifies, triggering trade"
                    );
                    return Route::Trade(gate.symbol.clone());
                }
                Ok(result) => {
                    debug!(url, label = %result.label, score = result.score, "Image does not qualify");
                }
                Err(e) => {
                    warn!(url, error = %e, classifier = classifier.name(), "Image classification failed");
                }
            }
        }

        info!(tweet_id = %event.id, "No qualifying image");
        Route::Drop(DropReason::NoQualifyingImage)
    }
}
