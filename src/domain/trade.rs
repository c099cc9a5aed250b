//! Per-symbol trade parameters and the immutable book built at startup.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;

use super::money::{round_quantity, round_to_tick, Price, Quantity};

/// Trade parameters for one symbol, as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TradeParams {
    /// Account leverage to trade with (1 or more).
    pub leverage: u32,
    /// Fraction of margin balance committed per trade, in (0, 1].
    pub allocation: Decimal,
    /// Applied to the best ask to get the entry limit price (around 1).
    pub limit_price_multiplier: Decimal,
    /// Applied to the fill price to get the stop-loss trigger (below 1).
    pub stop_loss_multiplier: Decimal,
    /// Applied to the fill price to get the trailing-stop activation (above 1).
    pub take_profit_multiplier: Decimal,
    /// Trailing callback rate in percent.
    pub trailing_callback_rate: Decimal,
}

/// Trade parameters completed with the exchange's symbol filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeConfig {
    pub symbol: String,
    pub params: TradeParams,
    pub tick_size: Decimal,
    pub quantity_precision: u32,
}

impl TradeConfig {
    #[must_use]
    pub fn new(
        symbol: impl Into<String>,
        params: TradeParams,
        tick_size: Decimal,
        quantity_precision: u32,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            params,
            tick_size,
            quantity_precision,
        }
    }

    /// Entry size for a given margin balance and mark price.
    ///
    /// Returns `None` when the mark price is unusable or the rounded size
    /// would be zero.
    #[must_use]
    pub fn quantity_for(&self, margin_balance: Decimal, mark_price: Price) -> Option<Quantity> {
        if mark_price <= Decimal::ZERO {
            return None;
        }
        let notional =
            margin_balance * self.params.allocation * Decimal::from(self.params.leverage);
        let quantity = round_quantity(notional / mark_price, self.quantity_precision);
        (quantity > Decimal::ZERO).then_some(quantity)
    }

    #[must_use]
    pub fn limit_price(&self, ask: Price) -> Price {
        round_to_tick(ask * self.params.limit_price_multiplier, self.tick_size)
    }

    #[must_use]
    pub fn stop_loss_price(&self, fill_price: Price) -> Price {
        round_to_tick(fill_price * self.params.stop_loss_multiplier, self.tick_size)
    }

    #[must_use]
    pub fn trailing_activation_price(&self, fill_price: Price) -> Price {
        round_to_tick(fill_price * self.params.take_profit_multiplier, self.tick_size)
    }
}

/// Immutable snapshot of every tradable symbol's configuration.
///
/// Built once before the stream starts and shared by reference afterwards.
#[derive(Debug, Clone, Default)]
pub struct TradeBook {
    configs: HashMap<String, TradeConfig>,
}

impl TradeBook {
    #[must_use]
    pub fn new(configs: impl IntoIterator<Item = TradeConfig>) -> Self {
        Self {
            configs: configs
                .into_iter()
                .map(|config| (config.symbol.clone(), config))
                .collect(),
        }
    }

    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<&TradeConfig> {
        self.configs.get(symbol)
    }

    #[must_use]
    pub fn contains(&self, symbol: &str) -> bool {
        self.configs.contains_key(symbol)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.configs.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}
