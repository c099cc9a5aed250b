//! Monetary types and exchange rounding rules.

use rust_decimal::Decimal;

/// Price represented as a Decimal for precision.
pub type Price = Decimal;

/// Order quantity represented as a Decimal for precision.
pub type Quantity = Decimal;

/// Round `price` to the nearest integer multiple of `tick_size`.
///
/// A non-positive tick size leaves the price untouched; trade books reject
/// such ticks before they can reach this point.
#[must_use]
pub fn round_to_tick(price: Price, tick_size: Decimal) -> Price {
    if tick_size <= Decimal::ZERO {
        return price;
    }
    ((price / tick_size).round() * tick_size).normalize()
}

/// Round a quantity to the exchange's quantity precision (decimal places).
#[must_use]
pub fn round_quantity(quantity: Quantity, precision: u32) -> Quantity {
    quantity.round_dp(precision).normalize()
}
