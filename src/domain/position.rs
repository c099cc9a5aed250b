//! Exchange-reported position for a single symbol.

use rust_decimal::Decimal;

use super::money::{Price, Quantity};

/// Position snapshot. Always fetched fresh; never cached between trades.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub symbol: String,
    pub leverage: u32,
    /// Signed position size; negative for shorts.
    pub position_amt: Quantity,
    pub mark_price: Price,
}

impl Position {
    /// No open exposure on this symbol.
    #[must_use]
    pub fn is_flat(&self) -> bool {
        self.position_amt == Decimal::ZERO
    }
}
