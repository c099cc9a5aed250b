//! [`Exchange`] implementation for one Binance USDⓈ-M futures account.

use async_trait::async_trait;
use reqwest::Method;
use rust_decimal::Decimal;
use tokio::sync::OnceCell;
use tracing::info;

use super::client::{BinanceClient, Params};
use super::dto::{
    AccountInfo, BookTicker, ExchangeInfo, OrderResponse, PositionMode, PositionRisk, SymbolInfo,
};
use super::settings::{BinanceCredentials, BinanceSettings};
use crate::domain::{LimitOrder, Order, OrderId, Position, Price, StopOrder, TrailingStopOrder};
use crate::error::{ExchangeError, Result};
use crate::port::Exchange;

pub struct BinanceExchange {
    client: BinanceClient,
    symbols: OnceCell<Vec<SymbolInfo>>,
}

impl BinanceExchange {
    #[must_use]
    pub fn new(settings: BinanceSettings, credentials: BinanceCredentials) -> Self {
        Self {
            client: BinanceClient::new(settings, credentials),
            symbols: OnceCell::new(),
        }
    }

    /// Switch the account to one-way position mode if it uses hedge mode.
    pub async fn ensure_one_way_mode(&self) -> Result<()> {
        let mode: PositionMode = self
            .client
            .signed(Method::GET, "/fapi/v1/positionSide/dual", Vec::new())
            .await?;

        if !mode.dual_side_position {
            info!("Account already in one-way position mode");
            return Ok(());
        }

        info!("Switching account to one-way position mode");
        let _: serde_json::Value = self
            .client
            .signed(
                Method::POST,
                "/fapi/v1/positionSide/dual",
                vec![("dualSidePosition", "false".into())],
            )
            .await?;
        Ok(())
    }

    async fn symbol_info(&self, symbol: &str) -> Result<&SymbolInfo> {
        let symbols = self
            .symbols
            .get_or_try_init(|| async {
                let info: ExchangeInfo = self
                    .client
                    .public("/fapi/v1/exchangeInfo", Vec::new())
                    .await?;
                Ok::<_, ExchangeError>(info.symbols)
            })
            .await?;

        symbols
            .iter()
            .find(|s| s.symbol == symbol)
            .ok_or_else(|| ExchangeError::UnknownSymbol(symbol.to_string()).into())
    }

    async fn submit(&self, params: Params) -> Result<Order> {
        let raw: OrderResponse = self
            .client
            .signed(Method::POST, "/fapi/v1/order", params)
            .await?;
        Ok(Order::try_from(raw)?)
    }
}

/// Plain decimal text without trailing zeros, as the API expects.
fn decimal_param(value: Decimal) -> String {
    value.normalize().to_string()
}

fn limit_params(order: &LimitOrder) -> Params {
    vec![
        ("symbol", order.symbol.clone()),
        ("side", order.side.as_str().into()),
        ("type", "LIMIT".into()),
        ("timeInForce", "IOC".into()),
        ("quantity", decimal_param(order.quantity)),
        ("price", decimal_param(order.price)),
    ]
}

fn stop_params(order: &StopOrder) -> Params {
    vec![
        ("symbol", order.symbol.clone()),
        ("side", order.side.as_str().into()),
        ("type", "STOP_MARKET".into()),
        ("quantity", decimal_param(order.quantity)),
        ("stopPrice", decimal_param(order.stop_price)),
        ("reduceOnly", "true".into()),
    ]
}

fn trailing_params(order: &TrailingStopOrder) -> Params {
    vec![
        ("symbol", order.symbol.clone()),
        ("side", order.side.as_str().into()),
        ("type", "TRAILING_STOP_MARKET".into()),
        ("quantity", decimal_param(order.quantity)),
        ("activationPrice", decimal_param(order.activation_price)),
        ("callbackRate", decimal_param(order.callback_rate)),
        ("reduceOnly", "true".into()),
    ]
}

#[async_trait]
impl Exchange for BinanceExchange {
    async fn position(&self, symbol: &str) -> Result<Position> {
        let positions: Vec<PositionRisk> = self
            .client
            .signed(
                Method::GET,
                "/fapi/v2/positionRisk",
                vec![("symbol", symbol.to_string())],
            )
            .await?;

        let raw = positions
            .into_iter()
            .find(|p| p.symbol == symbol)
            .ok_or_else(|| ExchangeError::UnknownSymbol(symbol.to_string()))?;
        Ok(Position::try_from(raw)?)
    }

    async fn set_leverage(&self, symbol: &str, leverage: u32) -> Result<()> {
        let _: serde_json::Value = self
            .client
            .signed(
                Method::POST,
                "/fapi/v1/leverage",
                vec![
                    ("symbol", symbol.to_string()),
                    ("leverage", leverage.to_string()),
                ],
            )
            .await?;
        Ok(())
    }

    async fn ask_price(&self, symbol: &str) -> Result<Price> {
        let ticker: BookTicker = self
            .client
            .public(
                "/fapi/v1/ticker/bookTicker",
                vec![("symbol", symbol.to_string())],
            )
            .await?;
        Ok(ticker.ask_price)
    }

    async fn margin_balance(&self) -> Result<Decimal> {
        let account: AccountInfo = self
            .client
            .signed(Method::GET, "/fapi/v2/account", Vec::new())
            .await?;
        Ok(account.total_margin_balance)
    }

    async fn place_limit_order(&self, order: &LimitOrder) -> Result<Order> {
        self.submit(limit_params(order)).await
    }

    async fn place_stop_order(&self, order: &StopOrder) -> Result<Order> {
        self.submit(stop_params(order)).await
    }

    async fn place_trailing_stop_order(&self, order: &TrailingStopOrder) -> Result<Order> {
        self.submit(trailing_params(order)).await
    }

    async fn order(&self, symbol: &str, order_id: &OrderId) -> Result<Order> {
        let raw: OrderResponse = self
            .client
            .signed(
                Method::GET,
                "/fapi/v1/order",
                vec![
                    ("symbol", symbol.to_string()),
                    ("orderId", order_id.to_string()),
                ],
            )
            .await?;
        Ok(Order::try_from(raw)?)
    }

    async fn tick_size(&self, symbol: &str) -> Result<Decimal> {
        let info = self.symbol_info(symbol).await?;
        info.tick_size().ok_or_else(|| {
            ExchangeError::Malformed(format!("{symbol} has no PRICE_FILTER tick size")).into()
        })
    }

    async fn quantity_precision(&self, symbol: &str) -> Result<u32> {
        Ok(self.symbol_info(symbol).await?.quantity_precision)
    }

    fn exchange_name(&self) -> &'static str {
        "Binance Futures"
    }
}
