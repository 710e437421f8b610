//! User record storage.
//!
//! Karma scores and rate-limit stamps live in a per-user record keyed by
//! the Telegram user id. Records are created lazily, on the first karma
//! mutation that involves the user, never eagerly.

mod memory;
mod sqlite;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

pub use memory::MemoryUserStore;
pub use sqlite::SqliteUserStore;

type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Identity fields captured from the chat platform, used when a record
/// is first created.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// A stored chat user.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct UserRecord {
    /// Telegram user id (stable, assigned by the platform).
    pub id: i64,

    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,

    /// Signed karma score.
    pub karma: i64,

    /// When this user last granted karma to someone else.
    /// `None` means never, which trivially passes the rate limit.
    pub last_set_karma: Option<DateTime<Utc>>,

    /// Reserved for access control; not enforced yet.
    pub allowed: bool,

    /// Last activity involving this user.
    pub last_seen: DateTime<Utc>,
}

impl UserRecord {
    /// Creates a fresh record for a user seen for the first time.
    #[must_use]
    pub fn from_profile(profile: &UserProfile, now: DateTime<Utc>) -> Self {
        Self {
            id: profile.id,
            username: profile.username.clone(),
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            karma: 0,
            last_set_karma: None,
            allowed: true,
            last_seen: now,
        }
    }
}

/// Persistence interface for user records.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Looks up a record by user id.
    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>>;

    /// Inserts or replaces a record.
    async fn save(&self, record: &UserRecord) -> Result<()>;

    /// Atomically applies `delta` to a user's karma and returns the
    /// stored value.
    ///
    /// A user without a record gets one created with `karma = delta`.
    /// The read-modify-write must not race with concurrent adjustments
    /// to the same user.
    async fn adjust_karma(&self, profile: &UserProfile, delta: i64) -> Result<i64>;
}
