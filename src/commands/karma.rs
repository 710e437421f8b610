//! Karma command handler.
//!
//! Grants or removes one karma point on the author of the replied-to
//! message. Preconditions run strictly in order and each failure replies
//! with its own message and stops the invocation: anti-spam rate limit,
//! reply required, no self-scoring.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, warn};

use crate::storage::{UserProfile, UserStore};
use crate::telegram::{Message, Messenger, User};

/// Command name that increments karma.
pub const LIKE_COMMAND: &str = "like";

/// Command name that decrements karma.
pub const DISLIKE_COMMAND: &str = "dislike";

const ERROR_TOO_EARLY: &str = "Anti-spam protection! Please wait before changing karma again.";
const ERROR_NOT_REPLY: &str = "This command must be used as a reply to another message.";
const ERROR_YOURSELF: &str = "Liking yourself is not allowed.";

/// Handler for one karma direction, parameterized by a signed delta.
pub struct KarmaCommand {
    delta: i64,
    update_delay: Duration,
    store: Arc<dyn UserStore>,
    messenger: Arc<dyn Messenger>,
}

impl KarmaCommand {
    /// Creates the `+1` handler.
    #[must_use]
    pub fn increment(
        update_delay_mins: i64,
        store: Arc<dyn UserStore>,
        messenger: Arc<dyn Messenger>,
    ) -> Self {
        Self::new(1, update_delay_mins, store, messenger)
    }

    /// Creates the `-1` handler.
    #[must_use]
    pub fn decrement(
        update_delay_mins: i64,
        store: Arc<dyn UserStore>,
        messenger: Arc<dyn Messenger>,
    ) -> Self {
        Self::new(-1, update_delay_mins, store, messenger)
    }

    fn new(
        delta: i64,
        update_delay_mins: i64,
        store: Arc<dyn UserStore>,
        messenger: Arc<dyn Messenger>,
    ) -> Self {
        Self {
            delta,
            update_delay: Duration::minutes(update_delay_mins),
            store,
            messenger,
        }
    }

    /// Processes one karma command invocation.
    pub async fn handle(&self, message: &Message) {
        let Some(actor) = message.from.as_ref() else {
            debug!("Karma command without a sender; ignoring");
            return;
        };

        if !self.can_update_now(actor.id).await {
            self.send(message.chat.id, ERROR_TOO_EARLY).await;
            return;
        }

        let Some(replied) = message.reply_to_message.as_deref() else {
            self.send(message.chat.id, ERROR_NOT_REPLY).await;
            return;
        };

        let Some(target) = replied.from.as_ref() else {
            debug!("Replied-to message has no author; ignoring");
            return;
        };

        if target.id == actor.id {
            self.send(message.chat.id, ERROR_YOURSELF).await;
            return;
        }

        let profile = profile_of(target);
        let new_karma = match self.store.adjust_karma(&profile, self.delta).await {
            Ok(karma) => karma,
            Err(e) => {
                warn!("Failed to adjust karma for user {}: {}", target.id, e);
                return;
            }
        };

        self.stamp_actor(actor.id).await;

        debug!(
            "User {} changed karma of user {} by {} (now {})",
            actor.id, target.id, self.delta, new_karma
        );

        let confirmation = format!(
            "Done! {} now has karma {}",
            target.display_name(),
            new_karma
        );
        self.send(message.chat.id, &confirmation).await;
    }

    /// Whether the actor's last karma grant lies strictly before the
    /// anti-spam cutoff. An actor with no record or no stamp passes.
    async fn can_update_now(&self, actor_id: i64) -> bool {
        let last_set_karma = match self.store.find_by_id(actor_id).await {
            Ok(record) => record.and_then(|r| r.last_set_karma),
            Err(e) => {
                warn!("Rate-limit lookup failed for user {}: {}", actor_id, e);
                None
            }
        };

        match last_set_karma {
            Some(stamp) => stamp < Utc::now() - self.update_delay,
            None => true,
        }
    }

    /// Stamps the actor's `last_set_karma`.
    ///
    /// The stamp only lands on an existing record; a first-time actor is
    /// not created here.
    async fn stamp_actor(&self, actor_id: i64) {
        match self.store.find_by_id(actor_id).await {
            Ok(Some(mut record)) => {
                record.last_set_karma = Some(Utc::now());
                if let Err(e) = self.store.save(&record).await {
                    warn!("Failed to stamp rate limit for user {}: {}", actor_id, e);
                }
            }
            Ok(None) => {}
            Err(e) => warn!("Rate-limit stamp lookup failed for user {}: {}", actor_id, e),
        }
    }

    async fn send(&self, chat_id: i64, text: &str) {
        self.messenger.send_text(chat_id, text).await;
    }
}

fn profile_of(user: &User) -> UserProfile {
    UserProfile {
        id: user.id,
        username: user.username.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
    }
}
