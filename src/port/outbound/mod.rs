//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe infrastructure dependencies such as the exchange,
//! the tweet stream, image inference, secrets, and notifications.

pub mod classifier;
pub mod exchange;
pub mod notifier;
pub mod secrets;
pub mod stream;
