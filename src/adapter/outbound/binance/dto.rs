//! Wire types for the Binance USDⓈ-M futures REST API.
//!
//! Binance sends numbers as strings; `rust_decimal` deserializes both forms.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::{Order, OrderId, OrderSide, OrderStatus, OrderType, Position};
use crate::error::ExchangeError;

/// Error body returned with every non-2xx response.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub code: i64,
    pub msg: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionRisk {
    pub symbol: String,
    pub position_amt: Decimal,
    pub mark_price: Decimal,
    /// Integer leverage, sent as a string.
    pub leverage: String,
}

impl TryFrom<PositionRisk> for Position {
    type Error = ExchangeError;

    fn try_from(raw: PositionRisk) -> Result<Self, Self::Error> {
        let leverage = raw.leverage.parse().map_err(|_| {
            ExchangeError::Malformed(format!("leverage {:?} for {}", raw.leverage, raw.symbol))
        })?;
        Ok(Self {
            symbol: raw.symbol,
            leverage,
            position_amt: raw.position_amt,
            mark_price: raw.mark_price,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookTicker {
    pub ask_price: Decimal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    pub total_margin_balance: Decimal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionMode {
    pub dual_side_position: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub order_id: i64,
    pub symbol: String,
    pub status: String,
    #[serde(rename = "type")]
    pub order_type: String,
    pub side: String,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub avg_price: Decimal,
    pub stop_price: Option<Decimal>,
    #[serde(default)]
    pub executed_qty: Decimal,
}

impl TryFrom<OrderResponse> for Order {
    type Error = ExchangeError;

    fn try_from(raw: OrderResponse) -> Result<Self, Self::Error> {
        let side = match raw.side.as_str() {
            "BUY" => OrderSide::Buy,
            "SELL" => OrderSide::Sell,
            other => {
                return Err(ExchangeError::Malformed(format!(
                    "order {} has side {other:?}",
                    raw.order_id
                )))
            }
        };
        Ok(Self {
            order_id: OrderId::from(raw.order_id),
            symbol: raw.symbol,
            side,
            order_type: OrderType::parse(&raw.order_type),
            status: OrderStatus::parse(&raw.status),
            price: raw.price,
            avg_price: raw.avg_price,
            stop_price: raw.stop_price.filter(|p| !p.is_zero()),
            executed_qty: raw.executed_qty,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ExchangeInfo {
    pub symbols: Vec<SymbolInfo>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolInfo {
    pub symbol: String,
    pub quantity_precision: u32,
    #[serde(default)]
    pub filters: Vec<SymbolFilter>,
}

impl SymbolInfo {
    /// Tick size from the `PRICE_FILTER` entry.
    #[must_use]
    pub fn tick_size(&self) -> Option<Decimal> {
        self.filters
            .iter()
            .find(|f| f.filter_type == "PRICE_FILTER")
            .and_then(|f| f.tick_size)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolFilter {
    pub filter_type: String,
    pub tick_size: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn position_risk_parses_string_numbers() {
        let raw: PositionRisk = serde_json::from_str(
            r#"{"symbol":"BTCUSDT","positionAmt":"0.000","entryPrice":"0.0",
                "markPrice":"64012.50000000","leverage":"20","marginType":"cross"}"#,
        )
        .unwrap();
        let position = Position::try_from(raw).unwrap();

        assert_eq!(position.leverage, 20);
        assert!(position.is_flat());
        assert_eq!(position.mark_price, dec!(64012.5));
    }

    #[test]
    fn stop_order_response_maps_to_order() {
        let raw: OrderResponse = serde_json::from_str(
            r#"{"orderId":283194212,"symbol":"BTCUSDT","status":"NEW","type":"STOP_MARKET",
                "side":"SELL","price":"0","avgPrice":"0.00000","stopPrice":"62731.2",
                "executedQty":"0","reduceOnly":true}"#,
        )
        .unwrap();
        let order = Order::try_from(raw).unwrap();

        assert_eq!(order.order_id.as_str(), "283194212");
        assert_eq!(order.order_type, OrderType::StopMarket);
        assert!(order.is_active());
        assert_eq!(order.stop_price, Some(dec!(62731.2)));
    }

    #[test]
    fn tick_size_comes_from_price_filter() {
        let info: ExchangeInfo = serde_json::from_str(
            r#"{"symbols":[{"symbol":"DOGEUSDT","quantityPrecision":0,"filters":[
                {"filterType":"PRICE_FILTER","minPrice":"0.000010","maxPrice":"30","tickSize":"0.000010"},
                {"filterType":"LOT_SIZE","stepSize":"1","minQty":"1","maxQty":"50000000"}
            ]}]}"#,
        )
        .unwrap();

        assert_eq!(info.symbols[0].tick_size(), Some(dec!(0.00001)));
        assert_eq!(info.symbols[0].quantity_precision, 0);
    }
}
