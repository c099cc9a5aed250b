//! Exchange port for account state and order placement.
//!
//! One implementation wraps one futures account. Every failure is reported as
//! [`crate::error::Error::Exchange`] so callers can treat all adapter errors
//! the same way.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{
    LimitOrder, Order, OrderId, Position, Price, StopOrder, TrailingStopOrder,
};
use crate::error::Result;

#[async_trait]
pub trait Exchange: Send + Sync {
    /// Current position and account leverage for a symbol.
    async fn position(&self, symbol: &str) -> Result<Position>;

    /// Change account leverage for a symbol.
    async fn set_leverage(&self, symbol: &str, leverage: u32) -> Result<()>;

    /// Best ask on the book.
    async fn ask_price(&self, symbol: &str) -> Result<Price>;

    /// Total margin balance of the account.
    async fn margin_balance(&self) -> Result<Decimal>;

    /// Submit an immediate-or-cancel limit order.
    async fn place_limit_order(&self, order: &LimitOrder) -> Result<Order>;

    /// Submit a reduce-only stop-market order.
    async fn place_stop_order(&self, order: &StopOrder) -> Result<Order>;

    /// Submit a reduce-only trailing stop order.
    async fn place_trailing_stop_order(&self, order: &TrailingStopOrder) -> Result<Order>;

    /// Re-fetch an order by id.
    async fn order(&self, symbol: &str, order_id: &OrderId) -> Result<Order>;

    /// Minimum price increment for a symbol.
    async fn tick_size(&self, symbol: &str) -> Result<Decimal>;

    /// Number of decimal places accepted for order quantities.
    async fn quantity_precision(&self, symbol: &str) -> Result<u32>;

    /// Get the exchange name for logging/debugging.
    fn exchange_name(&self) -> &'static str;
}
