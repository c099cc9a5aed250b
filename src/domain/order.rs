//! Orders as submitted to and reported by the exchange.

use std::fmt;

use rust_decimal::Decimal;

use super::id::OrderId;
use super::money::{Price, Quantity};

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }

    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order type as reported by the exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderType {
    Limit,
    StopMarket,
    TrailingStopMarket,
    Other(String),
}

impl OrderType {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "LIMIT" => Self::Limit,
            "STOP_MARKET" => Self::StopMarket,
            "TRAILING_STOP_MARKET" => Self::TrailingStopMarket,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Order status.
///
/// Only `NEW` and `FILLED` matter to the pipeline; everything else is carried
/// verbatim for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderStatus {
    New,
    Filled,
    Other(String),
}

impl OrderStatus {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "NEW" => Self::New,
            "FILLED" => Self::Filled,
            other => Self::Other(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::New => "NEW",
            Self::Filled => "FILLED",
            Self::Other(raw) => raw,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exchange-reported order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub order_id: OrderId,
    pub symbol: String,
    pub side: OrderSide,
    pub order_type: OrderType,
    pub status: OrderStatus,
    /// Limit price; zero for market-triggered orders.
    pub price: Price,
    /// Average execution price; zero until something has filled.
    pub avg_price: Price,
    pub stop_price: Option<Price>,
    pub executed_qty: Quantity,
}

impl Order {
    /// Price the order actually executed at, falling back to the limit price
    /// when the exchange did not report an average.
    #[must_use]
    pub fn fill_price(&self) -> Price {
        if self.avg_price > Decimal::ZERO {
            self.avg_price
        } else {
            self.price
        }
    }

    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.status == OrderStatus::Filled
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == OrderStatus::New
    }
}

/// Immediate-or-cancel limit order request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitOrder {
    pub symbol: String,
    pub side: OrderSide,
    pub quantity: Quantity,
    pub price: Price,
}

/// Stop-market order request; closes part of a position when triggered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopOrder {
    pub symbol: String,
    pub side: OrderSide,
    pub quantity: Quantity,
    pub stop_price: Price,
}

/// Trailing stop request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrailingStopOrder {
    pub symbol: String,
    pub side: OrderSide,
    pub quantity: Quantity,
    pub activation_price: Price,
    /// Callback rate in percent (e.g. `1.5` for 1.5%).
    pub callback_rate: Decimal,
}
