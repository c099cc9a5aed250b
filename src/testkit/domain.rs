//! Builders for domain primitives used across tests.
//!
//! Provides concise factory functions for trade parameters, orders,
//! positions and raw stream records so tests focus on assertions rather than
//! construction boilerplate.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

use crate::domain::{
    Order, OrderId, OrderSide, OrderStatus, OrderType, Position, TradeBook, TradeConfig,
    TradeParams,
};

/// Parameters with 10x leverage, full allocation and a 0.98 stop.
pub fn trade_params() -> TradeParams {
    TradeParams {
        leverage: 10,
        allocation: Decimal::ONE,
        limit_price_multiplier: dec!(1.001),
        stop_loss_multiplier: dec!(0.98),
        take_profit_multiplier: dec!(1.05),
        trailing_callback_rate: dec!(1.0),
    }
}

/// [`trade_params`] for `symbol` with tick 0.1 and three quantity decimals.
pub fn trade_config(symbol: &str) -> TradeConfig {
    TradeConfig::new(symbol, trade_params(), dec!(0.1), 3)
}

/// Book holding [`trade_config`] for each symbol.
pub fn trade_book(symbols: &[&str]) -> TradeBook {
    TradeBook::new(symbols.iter().map(|s| trade_config(s)))
}

/// Flat position at `leverage` with the given mark price.
pub fn flat_position(symbol: &str, leverage: u32, mark_price: Decimal) -> Position {
    Position {
        symbol: symbol.to_string(),
        leverage,
        position_amt: Decimal::ZERO,
        mark_price,
    }
}

/// Order with the given status, price and average price.
pub fn order(
    id: i64,
    symbol: &str,
    order_type: OrderType,
    status: OrderStatus,
    avg_price: Decimal,
) -> Order {
    Order {
        order_id: OrderId::from(id),
        symbol: symbol.to_string(),
        side: OrderSide::Buy,
        order_type,
        status,
        price: avg_price,
        avg_price,
        stop_price: None,
        executed_qty: Decimal::ZERO,
    }
}

/// One stream record line with a single matching rule tag.
pub fn tweet_line(id: &str, text: &str, tag: &str) -> String {
    json!({
        "data": { "id": id, "text": text },
        "matching_rules": [{ "id": "1", "tag": tag }],
    })
    .to_string()
}

/// Stream record line with photo attachments, tagged `has-media`.
pub fn media_tweet_line(id: &str, photo_urls: &[&str]) -> String {
    let keys: Vec<String> = (0..photo_urls.len()).map(|i| format!("{id}_{i}")).collect();
    let media: Vec<_> = photo_urls
        .iter()
        .zip(&keys)
        .map(|(url, key)| json!({ "media_key": key, "type": "photo", "url": url }))
        .collect();

    json!({
        "data": { "id": id, "text": "pic", "attachments": { "media_keys": keys } },
        "includes": { "media": media },
        "matching_rules": [{ "id": "2", "tag": "has-media" }],
    })
    .to_string()
}
