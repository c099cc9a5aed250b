//! Telegram notification backend.

pub mod notifier;

pub use notifier::{TelegramConfig, TelegramNotifier};
