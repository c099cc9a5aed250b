//! Outbound adapters (driven side).

pub mod binance;
pub mod classifier;
pub mod notifier;
pub mod secrets;
pub mod twitter;
