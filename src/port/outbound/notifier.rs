//! Notifier port for operator notifications.
//!
//! Operators hear about two things only: a trade that was fully protected,
//! and a trading step that failed and may need a human.

use std::fmt;

use rust_decimal::Decimal;

/// Events that can trigger notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Entry filled and both protective legs are live.
    TradeOpened(TradeOpenedEvent),
    /// A trading step failed; earlier orders stay on the exchange.
    TradeFailed(TradeFailedEvent),
}

/// Successful trade event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeOpenedEvent {
    pub symbol: String,
    pub quantity: Decimal,
    pub fill_price: Decimal,
}

/// Step of the order pipeline that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeStage {
    Guard,
    Entry,
    Fill,
    StopLoss,
    TrailingStop,
}

impl TradeStage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Guard => "position check",
            Self::Entry => "entry order",
            Self::Fill => "fill verification",
            Self::StopLoss => "stop-loss order",
            Self::TrailingStop => "trailing-stop order",
        }
    }
}

impl fmt::Display for TradeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failed trading step event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeFailedEvent {
    pub symbol: String,
    pub stage: TradeStage,
    pub reason: String,
}

impl TradeFailedEvent {
    #[must_use]
    pub fn new(symbol: &str, stage: TradeStage, reason: impl Into<String>) -> Self {
        Self {
            symbol: symbol.to_string(),
            stage,
            reason: reason.into(),
        }
    }
}

/// Operator-facing message text.
impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TradeOpened(e) => write!(
                f,
                "Bought {} {} at {}; stop-loss and trailing stop placed",
                e.quantity, e.symbol, e.fill_price
            ),
            Self::TradeFailed(e) => {
                write!(f, "{} {} failed: {}", e.symbol, e.stage, e.reason)
            }
        }
    }
}

/// Trait for notification handlers.
///
/// Notifications are fire-and-forget: `notify` must return quickly and never
/// report delivery failures to the caller. Implementations that perform
/// network I/O should hand the event to a background task.
pub trait Notifier: Send + Sync {
    /// Handle an event.
    fn notify(&self, event: Event);
}

/// Registry of notifiers (composite pattern).
///
/// Broadcasts events to all registered notifiers.
pub struct NotifierRegistry {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotifierRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { notifiers: vec![] }
    }

    /// Register a notifier.
    pub fn register(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    /// Notify all registered notifiers.
    pub fn notify_all(&self, event: Event) {
        for notifier in &self.notifiers {
            notifier.notify(event.clone());
        }
    }

    /// Number of registered notifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    /// Check if registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

impl Default for NotifierRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for NotifierRegistry {
    fn notify(&self, event: Event) {
        self.notify_all(event);
    }
}

/// A logging notifier that logs events via tracing.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: Event) {
        use tracing::info;
        match event {
            Event::TradeOpened(e) => {
                info!(
                    symbol = %e.symbol,
                    quantity = %e.quantity,
                    fill_price = %e.fill_price,
                    "Trade opened"
                );
            }
            Event::TradeFailed(e) => {
                info!(
                    symbol = %e.symbol,
                    stage = %e.stage,
                    reason = %e.reason,
                    "Trade step failed"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::sync::{Arc, Mutex};

    struct Collect(Arc<Mutex<Vec<Event>>>);

    impl Notifier for Collect {
        fn notify(&self, event: Event) {
            self.0.lock().unwrap().push(event);
        }
    }

    #[test]
    fn registry_broadcasts_to_every_notifier() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut registry = NotifierRegistry::new();
        registry.register(Box::new(LogNotifier));
        registry.register(Box::new(Collect(seen.clone())));
        registry.register(Box::new(Collect(seen.clone())));

        registry.notify_all(Event::TradeFailed(TradeFailedEvent::new(
            "BTCUSDT",
            TradeStage::Entry,
            "insufficient margin",
        )));

        assert_eq!(registry.len(), 3);
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn messages_name_symbol_quantity_and_price() {
        let opened = Event::TradeOpened(TradeOpenedEvent {
            symbol: "DOGEUSDT".into(),
            quantity: dec!(250000),
            fill_price: dec!(0.07131),
        });
        assert_eq!(
            opened.to_string(),
            "Bought 250000 DOGEUSDT at 0.07131; stop-loss and trailing stop placed"
        );

        let failed = Event::TradeFailed(TradeFailedEvent::new(
            "DOGEUSDT",
            TradeStage::StopLoss,
            "Order would immediately trigger",
        ));
        assert_eq!(
            failed.to_string(),
            "DOGEUSDT stop-loss order failed: Order would immediately trigger"
        );
    }
}
