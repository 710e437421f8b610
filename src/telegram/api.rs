//! Telegram Bot API client.
//!
//! Thin long-polling client over the HTTP Bot API: `getUpdates` for
//! inbound messages and `sendMessage` for replies.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, warn};

use super::types::Update;
use super::Messenger;

/// Errors that can occur when talking to the Bot API.
#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Telegram API rejected the call: {0}")]
    Api(String),
}

/// Response envelope every Bot API method returns.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,

    #[serde(default)]
    result: Option<T>,

    #[serde(default)]
    description: Option<String>,
}

impl<T> ApiResponse<T> {
    fn into_result(self) -> Result<T, TelegramError> {
        match (self.ok, self.result) {
            (true, Some(result)) => Ok(result),
            _ => Err(TelegramError::Api(
                self.description
                    .unwrap_or_else(|| "no description".to_owned()),
            )),
        }
    }
}

/// Client for one bot token.
#[derive(Debug, Clone)]
pub struct BotApiClient {
    client: Client,
    base_url: String,
    poll_timeout_secs: u64,
}

impl BotApiClient {
    /// Creates a client for the given bot token.
    ///
    /// `poll_timeout_secs` is the Telegram-side long-poll timeout; the
    /// HTTP timeout is set above it so a quiet poll does not error.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(token: &str, poll_timeout_secs: u64) -> Result<Self, TelegramError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(poll_timeout_secs + 10))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: format!("https://api.telegram.org/bot{token}"),
            poll_timeout_secs,
        })
    }

    /// Long-polls for updates with ids at or above `offset`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, TelegramError> {
        let response: ApiResponse<Vec<Update>> = self
            .client
            .post(format!("{}/getUpdates", self.base_url))
            .json(&json!({
                "offset": offset,
                "timeout": self.poll_timeout_secs,
                "allowed_updates": ["message"],
            }))
            .send()
            .await?
            .json()
            .await?;

        let updates = response.into_result()?;
        debug!("Received {} update(s)", updates.len());
        Ok(updates)
    }

    /// Sends a plain-text message to a chat.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramError> {
        let response: ApiResponse<serde_json::Value> = self
            .client
            .post(format!("{}/sendMessage", self.base_url))
            .json(&json!({
                "chat_id": chat_id,
                "text": text,
            }))
            .send()
            .await?
            .json()
            .await?;

        response.into_result().map(|_| ())
    }
}

#[async_trait]
impl Messenger for BotApiClient {
    async fn send_text(&self, chat_id: i64, text: &str) {
        // Fire and forget; delivery failures only get logged.
        if let Err(e) = self.send_message(chat_id, text).await {
            warn!("Failed to send message to chat {}: {}", chat_id, e);
        }
    }
}
