//! Wire types for the Telegram Bot API subset the bot consumes.

use serde::Deserialize;

/// A Telegram user, as attached to a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct User {
    pub id: i64,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub first_name: Option<String>,

    #[serde(default)]
    pub last_name: Option<String>,
}

impl User {
    /// Name shown in bot replies: `@username` when one is set, otherwise
    /// "first last" with missing parts dropped.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self.username.as_deref().map(str::trim) {
            Some(username) if !username.is_empty() => format!("@{username}"),
            _ => {
                let first = self.first_name.as_deref().unwrap_or("");
                let last = self.last_name.as_deref().unwrap_or("");
                format!("{first} {last}").trim().to_owned()
            }
        }
    }
}

/// The chat a message arrived in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// An inbound chat message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Message {
    pub chat: Chat,

    #[serde(default)]
    pub from: Option<User>,

    #[serde(default)]
    pub text: Option<String>,

    /// The message this one replies to, when sent as a reply.
    #[serde(default)]
    pub reply_to_message: Option<Box<Message>>,
}

/// One entry from `getUpdates`.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,

    #[serde(default)]
    pub message: Option<Message>,
}
