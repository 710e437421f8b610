//! Telegram transport module.
//!
//! Wire types for inbound updates, the outbound [`Messenger`] trait,
//! and the long-polling Bot API client.

mod api;
mod types;

#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;

pub use api::{BotApiClient, TelegramError};
pub use types::{Chat, Message, Update, User};

/// Outbound side of the chat transport.
///
/// Command handlers send at most one message per invocation through
/// this trait; delivery is fire-and-forget.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Sends a plain-text message to a chat.
    async fn send_text(&self, chat_id: i64, text: &str);
}
