//! Test doubles and message builders shared by handler tests.

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{Chat, Message, Messenger, User};

/// Messenger that records every outbound message.
#[derive(Debug, Default)]
pub struct RecordingMessenger {
    sent: Mutex<Vec<(i64, String)>>,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// All `(chat_id, text)` pairs sent so far.
    pub async fn sent(&self) -> Vec<(i64, String)> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send_text(&self, chat_id: i64, text: &str) {
        self.sent.lock().await.push((chat_id, text.to_owned()));
    }
}

pub fn user(id: i64, username: &str) -> User {
    User {
        id,
        username: Some(username.to_owned()),
        first_name: None,
        last_name: None,
    }
}

pub fn message(chat_id: i64, from: User, text: &str) -> Message {
    Message {
        chat: Chat { id: chat_id },
        from: Some(from),
        text: Some(text.to_owned()),
        reply_to_message: None,
    }
}

/// A command message sent as a reply to a message from `target`.
pub fn reply(chat_id: i64, from: User, text: &str, target: User) -> Message {
    let mut msg = message(chat_id, from, text);
    msg.reply_to_message = Some(Box::new(message(chat_id, target, "original")));
    msg
}
