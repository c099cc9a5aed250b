//! Tweetrade - filtered tweet stream to protected Binance futures entries.
//!
//! The crate consumes the Twitter v2 filtered stream, routes every matched
//! tweet by its rule tag, and for tradable matches places an
//! immediate-or-cancel entry followed by a stop-loss and a trailing stop.
//!
//! # Modules
//!
//! - [`domain`] - Exchange-agnostic types: events, rules, orders, trade math
//! - [`port`] - Traits for the exchange, stream, notifier, classifier, secrets
//! - [`adapter`] - Binance, Twitter, Telegram, classifier and secret adapters
//! - [`application`] - Stream consumer, rule dispatcher, order pipeline
//! - [`infrastructure`] - Configuration, bootstrap wiring, runtime
//! - [`error`] - Error types for the crate
//!
//! # Features
//!
//! - `telegram` (default) - Operator notifications through a Telegram bot
//! - `testkit` - In-memory doubles for integration tests

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
