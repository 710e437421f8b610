//! Command routing.
//!
//! Extracts a `/command args` pair from an inbound message and
//! dispatches to the matching handler. Anything that is not a
//! recognized command is dropped without a reply.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::dailymenu::{self, DailyMenuCommand, Restaurant};
use super::karma::{self, KarmaCommand};
use crate::storage::UserStore;
use crate::telegram::{Message, Messenger};

/// Routes inbound messages to command handlers.
pub struct CommandRouter {
    like: KarmaCommand,
    dislike: KarmaCommand,
    dailymenu: DailyMenuCommand,
}

impl CommandRouter {
    /// Builds the router with one handler per supported command.
    #[must_use]
    pub fn new(
        store: Arc<dyn UserStore>,
        messenger: Arc<dyn Messenger>,
        restaurants: HashMap<String, Box<dyn Restaurant>>,
        karma_update_delay_mins: i64,
    ) -> Self {
        Self {
            like: KarmaCommand::increment(
                karma_update_delay_mins,
                Arc::clone(&store),
                Arc::clone(&messenger),
            ),
            dislike: KarmaCommand::decrement(
                karma_update_delay_mins,
                Arc::clone(&store),
                Arc::clone(&messenger),
            ),
            dailymenu: DailyMenuCommand::new(restaurants, messenger),
        }
    }

    /// Handles one inbound message.
    ///
    /// Unmatched commands and non-command messages are silently
    /// ignored.
    pub async fn handle(&self, message: &Message) {
        let Some(text) = message.text.as_deref() else {
            return;
        };
        let Some((command, args)) = parse_command(text) else {
            return;
        };

        match command.as_str() {
            karma::LIKE_COMMAND => self.like.handle(message).await,
            karma::DISLIKE_COMMAND => self.dislike.handle(message).await,
            dailymenu::COMMAND => self.dailymenu.handle(message, &args).await,
            other => debug!("Ignoring unknown command '{}'", other),
        }
    }
}

/// Splits `/command args` into a lowercase command token and the
/// trimmed raw argument string.
///
/// Group chats may address commands as `/command@botname`; the suffix
/// is stripped. Returns `None` for non-command text.
fn parse_command(text: &str) -> Option<(String, String)> {
    let rest = text.trim().strip_prefix('/')?;

    let (token, args) = match rest.split_once(char::is_whitespace) {
        Some((token, args)) => (token, args.trim()),
        None => (rest, ""),
    };

    let token = match token.split_once('@') {
        Some((name, _bot)) => name,
        None => token,
    };

    if token.is_empty() {
        return None;
    }

    Some((token.to_lowercase(), args.to_owned()))
}
