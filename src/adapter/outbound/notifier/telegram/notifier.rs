//! Telegram delivery of operator notifications.
//!
//! [`TelegramNotifier`] queues events on an unbounded channel and a
//! background worker sends them, so `notify` never blocks the pipeline.
//! Delivery failures are logged and dropped.
//!
//! Requires the `telegram` feature to be enabled.

use std::fmt;

use teloxide::prelude::*;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::error::ConfigError;
use crate::port::{Event, Notifier};

#[derive(Clone)]
pub struct TelegramConfig {
    /// Bot API token obtained from BotFather.
    pub bot_token: String,
    /// Target chat ID for notifications.
    pub chat_id: i64,
}

impl TelegramConfig {
    pub fn new(bot_token: impl Into<String>, chat_id: i64) -> Self {
        Self {
            bot_token: bot_token.into(),
            chat_id,
        }
    }

    /// Build from the raw secret values; the chat id must be an integer.
    pub fn from_secrets(bot_token: String, chat_id: &str) -> Result<Self, ConfigError> {
        let chat_id = chat_id
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                field: "telegram-chat-id",
                reason: format!("{chat_id:?} is not an integer chat id"),
            })?;
        Ok(Self::new(bot_token, chat_id))
    }
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

pub struct TelegramNotifier {
    /// Channel sender for queuing outbound notifications.
    sender: mpsc::UnboundedSender<Event>,
}

impl TelegramNotifier {
    /// Create the notifier and spawn its delivery worker.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn new(config: TelegramConfig) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        tokio::spawn(telegram_worker(config, receiver));
        Self { sender }
    }
}

impl Notifier for TelegramNotifier {
    fn notify(&self, event: Event) {
        if self.sender.send(event).is_err() {
            warn!("Telegram notifier channel closed");
        }
    }
}

/// Background worker that sends Telegram messages as plain text.
async fn telegram_worker(config: TelegramConfig, mut receiver: mpsc::UnboundedReceiver<Event>) {
    let bot = Bot::new(&config.bot_token);
    let chat_id = ChatId(config.chat_id);

    info!(chat_id = config.chat_id, "Telegram notifier started");

    while let Some(event) = receiver.recv().await {
        let text = event.to_string();
        if let Err(e) = bot.send_message(chat_id, text).await {
            error!(error = %e, "Failed to send Telegram message");
        }
    }

    warn!("Telegram notifier worker shutting down");
}
