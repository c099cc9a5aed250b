//! Binance USDⓈ-M futures integration.

pub mod client;
pub mod dto;
pub mod exchange;
pub mod settings;
pub mod signing;

pub use exchange::BinanceExchange;
pub use settings::{BinanceCredentials, BinanceSettings};
