//! Order pipeline: protected entry for one symbol.
//!
//! The pipeline places an immediate-or-cancel entry, verifies it filled, then
//! places a stop-loss and a trailing stop based on the fill price. It never
//! retries and never rolls back: an order the exchange accepted stays there,
//! and the operator is told about every step that failed.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{error, info, warn};

use crate::domain::{
    LimitOrder, Order, OrderSide, Price, Quantity, StopOrder, TradeBook, TradeConfig,
    TrailingStopOrder,
};
use crate::error::Error;
use crate::port::{Event, Exchange, Notifier, TradeFailedEvent, TradeOpenedEvent, TradeStage};

/// Result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Symbol missing from the trade book.
    UnknownSymbol,
    /// Symbol already has exposure; nothing was submitted.
    AlreadyInPosition,
    /// A step failed before the entry filled.
    Aborted { stage: TradeStage, reason: String },
    /// Entry filled; see the report for the protective legs.
    Entered(TradeReport),
}

/// What happened to one protective leg.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegOutcome {
    /// Accepted and working on the book.
    Active(Order),
    /// Accepted but reported in a status other than `NEW`.
    Inactive(Order),
    /// Submission failed.
    Failed(String),
}

impl LegOutcome {
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }
}

/// Filled entry and the state of its protective legs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeReport {
    pub symbol: String,
    pub quantity: Quantity,
    pub fill_price: Price,
    pub stop_loss: LegOutcome,
    pub trailing_stop: LegOutcome,
}

impl TradeReport {
    /// Both legs are live on the exchange.
    #[must_use]
    pub const fn is_protected(&self) -> bool {
        self.stop_loss.is_active() && self.trailing_stop.is_active()
    }
}

pub struct OrderPipeline {
    exchange: Arc<dyn Exchange>,
    notifier: Arc<dyn Notifier>,
    book: Arc<TradeBook>,
    /// Read once at startup; may be stale after earlier trades in the run.
    margin_balance: Decimal,
}

impl OrderPipeline {
    #[must_use]
    pub fn new(
        exchange: Arc<dyn Exchange>,
        notifier: Arc<dyn Notifier>,
        book: Arc<TradeBook>,
        margin_balance: Decimal,
    ) -> Self {
        Self {
            exchange,
            notifier,
            book,
            margin_balance,
        }
    }

    /// Run the pipeline for `symbol` to completion or the first blocking
    /// failure.
    pub async fn run(&self, symbol: &str) -> PipelineOutcome {
        let Some(config) = self.book.get(symbol) else {
            warn!(symbol, "No trade config for symbol");
            return PipelineOutcome::UnknownSymbol;
        };

        let quantity = match self.guard_and_size(config).await {
            Ok(Some(quantity)) => quantity,
            Ok(None) => return PipelineOutcome::AlreadyInPosition,
            Err((stage, reason)) => return self.abort(symbol, stage, reason),
        };

        let entry = match self.enter(config, quantity).await {
            Ok(order) => order,
            Err((stage, reason)) => return self.abort(symbol, stage, reason),
        };

        let fill_price = entry.fill_price();
        info!(
            symbol,
            order_id = %entry.order_id,
            %quantity,
            %fill_price,
            "Entry filled"
        );

        let stop_loss = self.place_stop_loss(config, quantity, fill_price).await;
        let trailing_stop = self.place_trailing_stop(config, quantity, fill_price).await;

        let report = TradeReport {
            symbol: symbol.to_string(),
            quantity,
            fill_price,
            stop_loss,
            trailing_stop,
        };

        if report.is_protected() {
            self.notifier.notify(Event::TradeOpened(TradeOpenedEvent {
                symbol: symbol.to_string(),
                quantity,
                fill_price,
            }));
        }

        PipelineOutcome::Entered(report)
    }

    /// Fresh position check, then leverage sync and sizing for a flat symbol.
    ///
    /// `Ok(None)` means the symbol already has exposure.
    async fn guard_and_size(
        &self,
        config: &TradeConfig,
    ) -> Result<Option<Quantity>, (TradeStage, String)> {
        let symbol = config.symbol.as_str();
        let position = self
            .exchange
            .position(symbol)
            .await
            .map_err(|e| (TradeStage::Guard, e.to_string()))?;

        if !position.is_flat() {
            info!(symbol, position_amt = %position.position_amt, "Already in a position, skipping");
            return Ok(None);
        }

        if position.leverage != config.params.leverage {
            info!(
                symbol,
                current = position.leverage,
                target = config.params.leverage,
                "Adjusting leverage"
            );
            self.exchange
                .set_leverage(symbol, config.params.leverage)
                .await
                .map_err(|e| (TradeStage::Guard, e.to_string()))?;
        }

        config
            .quantity_for(self.margin_balance, position.mark_price)
            .map(Some)
            .ok_or_else(|| {
                (
                    TradeStage::Entry,
                    format!(
                        "order size rounds to zero (margin {}, mark price {})",
                        self.margin_balance, position.mark_price
                    ),
                )
            })
    }

    /// Submit the IOC entry and confirm it filled.
    async fn enter(
        &self,
        config: &TradeConfig,
        quantity: Quantity,
    ) -> Result<Order, (TradeStage, String)> {
        let symbol = config.symbol.as_str();
        let ask = self
            .exchange
            .ask_price(symbol)
            .await
            .map_err(|e| (TradeStage::Entry, e.to_string()))?;

        let request = LimitOrder {
            symbol: symbol.to_string(),
            side: OrderSide::Buy,
            quantity,
            price: config.limit_price(ask),
        };
        info!(symbol, %quantity, %ask, price = %request.price, "Submitting entry order");

        let placed = self
            .exchange
            .place_limit_order(&request)
            .await
            .map_err(|e| (TradeStage::Entry, e.to_string()))?;

        let order = self
            .exchange
            .order(symbol, &placed.order_id)
            .await
            .map_err(|e| (TradeStage::Fill, e.to_string()))?;

        if !order.is_filled() {
            return Err((
                TradeStage::Fill,
                format!("entry order {} ended as {}", order.order_id, order.status),
            ));
        }

        Ok(order)
    }

    async fn place_stop_loss(
        &self,
        config: &TradeConfig,
        quantity: Quantity,
        fill_price: Price,
    ) -> LegOutcome {
        let request = StopOrder {
            symbol: config.symbol.clone(),
            side: OrderSide::Buy.opposite(),
            quantity,
            stop_price: config.stop_loss_price(fill_price),
        };
        info!(symbol = %request.symbol, stop_price = %request.stop_price, "Placing stop-loss");

        let placed = self.exchange.place_stop_order(&request).await;
        self.leg_outcome(&config.symbol, TradeStage::StopLoss, placed)
    }

    async fn place_trailing_stop(
        &self,
        config: &TradeConfig,
        quantity: Quantity,
        fill_price: Price,
    ) -> LegOutcome {
        let request = TrailingStopOrder {
            symbol: config.symbol.clone(),
            side: OrderSide::Buy.opposite(),
            quantity,
            activation_price: config.trailing_activation_price(fill_price),
            callback_rate: config.params.trailing_callback_rate,
        };
        info!(
            symbol = %request.symbol,
            activation_price = %request.activation_price,
            callback_rate = %request.callback_rate,
            "Placing trailing stop"
        );

        let placed = self.exchange.place_trailing_stop_order(&request).await;
        self.leg_outcome(&config.symbol, TradeStage::TrailingStop, placed)
    }

    fn leg_outcome(
        &self,
        symbol: &str,
        stage: TradeStage,
        placed: Result<Order, Error>,
    ) -> LegOutcome {
        match placed {
            Ok(order) if order.is_active() => {
                info!(symbol, %stage, order_id = %order.order_id, "Protective order active");
                LegOutcome::Active(order)
            }
            Ok(order) => {
                let reason = format!("order {} is {} instead of NEW", order.order_id, order.status);
                error!(symbol, %stage, %reason, "Protective order not active");
                self.notify_failure(symbol, stage, reason);
                LegOutcome::Inactive(order)
            }
            Err(e) => {
                error!(symbol, %stage, error = %e, "Protective order rejected");
                self.notify_failure(symbol, stage, e.to_string());
                LegOutcome::Failed(e.to_string())
            }
        }
    }

    fn abort(&self, symbol: &str, stage: TradeStage, reason: String) -> PipelineOutcome {
        error!(symbol, %stage, %reason, "Trade aborted");
        self.notify_failure(symbol, stage, reason.clone());
        PipelineOutcome::Aborted { stage, reason }
    }

    fn notify_failure(&self, symbol: &str, stage: TradeStage, reason: String) {
        self.notifier
            .notify(Event::TradeFailed(TradeFailedEvent::new(symbol, stage, reason)));
    }
}
