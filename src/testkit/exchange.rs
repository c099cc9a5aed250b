//! Scripted [`Exchange`] with a call log.
//!
//! Every endpoint returns a configurable result; the defaults describe a
//! healthy account where a flat 10x position at mark 100 fills at 100 and
//! both protective legs come back `NEW`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::domain::{flat_position, order};
use crate::domain::{
    LimitOrder, Order, OrderId, OrderStatus, OrderType, Position, Price, StopOrder,
    TrailingStopOrder,
};
use crate::error::{ExchangeError, Result};
use crate::port::Exchange;

type Scripted<T> = std::result::Result<T, ExchangeError>;

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeCall {
    Position(String),
    SetLeverage { symbol: String, leverage: u32 },
    AskPrice(String),
    MarginBalance,
    PlaceLimit(LimitOrder),
    PlaceStop(StopOrder),
    PlaceTrailingStop(TrailingStopOrder),
    FetchOrder { symbol: String, order_id: OrderId },
    TickSize(String),
    QuantityPrecision(String),
}

impl ExchangeCall {
    /// Whether the call submits an order.
    #[must_use]
    pub const fn is_order_submission(&self) -> bool {
        matches!(
            self,
            Self::PlaceLimit(_) | Self::PlaceStop(_) | Self::PlaceTrailingStop(_)
        )
    }
}

pub struct MockExchange {
    position: Scripted<Position>,
    set_leverage: Scripted<()>,
    ask: Scripted<Price>,
    margin: Scripted<Decimal>,
    limit: Scripted<Order>,
    fetched: Scripted<Order>,
    stop: Scripted<Order>,
    trailing: Scripted<Order>,
    tick_sizes: HashMap<String, Decimal>,
    precisions: HashMap<String, u32>,
    calls: Arc<Mutex<Vec<ExchangeCall>>>,
}

impl Default for MockExchange {
    fn default() -> Self {
        Self {
            position: Ok(flat_position("", 10, dec!(100))),
            set_leverage: Ok(()),
            ask: Ok(dec!(100)),
            margin: Ok(dec!(1000)),
            limit: Ok(order(1, "", OrderType::Limit, OrderStatus::New, Decimal::ZERO)),
            fetched: Ok(order(1, "", OrderType::Limit, OrderStatus::Filled, dec!(100))),
            stop: Ok(order(2, "", OrderType::StopMarket, OrderStatus::New, Decimal::ZERO)),
            trailing: Ok(order(
                3,
                "",
                OrderType::TrailingStopMarket,
                OrderStatus::New,
                Decimal::ZERO,
            )),
            tick_sizes: HashMap::new(),
            precisions: HashMap::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl MockExchange {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_position(mut self, position: Scripted<Position>) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn with_set_leverage(mut self, result: Scripted<()>) -> Self {
        self.set_leverage = result;
        self
    }

    #[must_use]
    pub fn with_ask(mut self, ask: Scripted<Price>) -> Self {
        self.ask = ask;
        self
    }

    #[must_use]
    pub fn with_margin(mut self, margin: Scripted<Decimal>) -> Self {
        self.margin = margin;
        self
    }

    /// Result of submitting the entry order.
    #[must_use]
    pub fn with_limit(mut self, result: Scripted<Order>) -> Self {
        self.limit = result;
        self
    }

    /// Result of re-fetching the entry order.
    #[must_use]
    pub fn with_fetched(mut self, result: Scripted<Order>) -> Self {
        self.fetched = result;
        self
    }

    #[must_use]
    pub fn with_stop(mut self, result: Scripted<Order>) -> Self {
        self.stop = result;
        self
    }

    #[must_use]
    pub fn with_trailing(mut self, result: Scripted<Order>) -> Self {
        self.trailing = result;
        self
    }

    /// Register precision data for a symbol.
    #[must_use]
    pub fn with_symbol(mut self, symbol: &str, tick_size: Decimal, quantity_precision: u32) -> Self {
        self.tick_sizes.insert(symbol.to_string(), tick_size);
        self.precisions.insert(symbol.to_string(), quantity_precision);
        self
    }

    pub fn calls(&self) -> Vec<ExchangeCall> {
        self.calls.lock().expect("lock exchange calls").clone()
    }

    /// Calls that submitted an order, in order.
    pub fn order_calls(&self) -> Vec<ExchangeCall> {
        self.calls()
            .into_iter()
            .filter(ExchangeCall::is_order_submission)
            .collect()
    }

    fn record(&self, call: ExchangeCall) {
        self.calls.lock().expect("lock exchange calls").push(call);
    }

    fn unknown(symbol: &str) -> ExchangeError {
        ExchangeError::UnknownSymbol(symbol.to_string())
    }
}

fn for_symbol(order: &Scripted<Order>, symbol: &str) -> Result<Order> {
    let mut order = order.clone()?;
    order.symbol = symbol.to_string();
    Ok(order)
}

#[async_trait]
impl Exchange for MockExchange {
    async fn position(&self, symbol: &str) -> Result<Position> {
        self.record(ExchangeCall::Position(symbol.to_string()));
        let mut position = self.position.clone()?;
        position.symbol = symbol.to_string();
        Ok(position)
    }

    async fn set_leverage(&self, symbol: &str, leverage: u32) -> Result<()> {
        self.record(ExchangeCall::SetLeverage {
            symbol: symbol.to_string(),
            leverage,
        });
        Ok(self.set_leverage.clone()?)
    }

    async fn ask_price(&self, symbol: &str) -> Result<Price> {
        self.record(ExchangeCall::AskPrice(symbol.to_string()));
        Ok(self.ask.clone()?)
    }

    async fn margin_balance(&self) -> Result<Decimal> {
        self.record(ExchangeCall::MarginBalance);
        Ok(self.margin.clone()?)
    }

    async fn place_limit_order(&self, order: &LimitOrder) -> Result<Order> {
        self.record(ExchangeCall::PlaceLimit(order.clone()));
        for_symbol(&self.limit, &order.symbol)
    }

    async fn place_stop_order(&self, order: &StopOrder) -> Result<Order> {
        self.record(ExchangeCall::PlaceStop(order.clone()));
        for_symbol(&self.stop, &order.symbol)
    }

    async fn place_trailing_stop_order(&self, order: &TrailingStopOrder) -> Result<Order> {
        self.record(ExchangeCall::PlaceTrailingStop(order.clone()));
        for_symbol(&self.trailing, &order.symbol)
    }

    async fn order(&self, symbol: &str, order_id: &OrderId) -> Result<Order> {
        self.record(ExchangeCall::FetchOrder {
            symbol: symbol.to_string(),
            order_id: order_id.clone(),
        });
        for_symbol(&self.fetched, symbol)
    }

    async fn tick_size(&self, symbol: &str) -> Result<Decimal> {
        self.record(ExchangeCall::TickSize(symbol.to_string()));
        Ok(self
            .tick_sizes
            .get(symbol)
            .copied()
            .ok_or_else(|| Self::unknown(symbol))?)
    }

    async fn quantity_precision(&self, symbol: &str) -> Result<u32> {
        self.record(ExchangeCall::QuantityPrecision(symbol.to_string()));
        Ok(self
            .precisions
            .get(symbol)
            .copied()
            .ok_or_else(|| Self::unknown(symbol))?)
    }

    fn exchange_name(&self) -> &'static str {
        "mock"
    }
}
