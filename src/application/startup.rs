//! One-shot startup steps that run before the stream opens.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::domain::{Rule, TradeBook, TradeConfig, TradeParams};
use crate::error::{ExchangeError, Result};
use crate::port::{Exchange, RuleStore};

/// Replace whatever rules are installed with `rules`.
pub async fn install_rules(store: &dyn RuleStore, rules: &[Rule]) -> Result<()> {
    let installed = store.rules().await?;
    let ids: Vec<String> = installed.into_iter().map(|r| r.id).collect();

    if ids.is_empty() {
        debug!("No stream rules installed");
    } else {
        info!(count = ids.len(), "Deleting installed stream rules");
        store.delete_rules(&ids).await?;
    }

    info!(count = rules.len(), "Installing stream rules");
    store.add_rules(rules).await
}

/// Complete each symbol's parameters with the exchange's filters.
pub async fn build_trade_book(
    exchange: &dyn Exchange,
    params: &BTreeMap<String, TradeParams>,
) -> Result<TradeBook> {
    let mut configs = Vec::with_capacity(params.len());

    for (symbol, params) in params {
        let tick_size = exchange.tick_size(symbol).await?;
        if tick_size <= Decimal::ZERO {
            return Err(ExchangeError::Malformed(format!(
                "tick size for {symbol} is {tick_size}"
            ))
            .into());
        }
        let quantity_precision = exchange.quantity_precision(symbol).await?;

        info!(symbol, %tick_size, quantity_precision, "Loaded symbol filters");
        configs.push(TradeConfig::new(
            symbol.clone(),
            params.clone(),
            tick_size,
            quantity_precision,
        ));
    }

    Ok(TradeBook::new(configs))
}
