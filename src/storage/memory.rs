//! In-memory user store.
//!
//! Backs unit tests and database-less runs. Same contract as the
//! SQLite store; the map mutex makes `adjust_karma` atomic per call.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use super::{Result, UserProfile, UserRecord, UserStore};

/// User store holding records in a mutex-guarded map.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: Mutex<HashMap<i64, UserRecord>>,
}

impl MemoryUserStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>> {
        let users = self.users.lock().await;
        Ok(users.get(&id).cloned())
    }

    async fn save(&self, record: &UserRecord) -> Result<()> {
        let mut users = self.users.lock().await;
        users.insert(record.id, record.clone());
        Ok(())
    }

    async fn adjust_karma(&self, profile: &UserProfile, delta: i64) -> Result<i64> {
        let mut users = self.users.lock().await;
        let record = users
            .entry(profile.id)
            .or_insert_with(|| UserRecord::from_profile(profile, Utc::now()));
        record.karma += delta;
        Ok(record.karma)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: i64) -> UserProfile {
        UserProfile {
            id,
            username: Some(format!("user{id}")),
            ..UserProfile::default()
        }
    }

    #[tokio::test]
    async fn test_adjust_creates_with_delta() {
        let store = MemoryUserStore::new();

        assert_eq!(store.adjust_karma(&profile(1), -1).await.expect("adjust"), -1);

        let record = store
            .find_by_id(1)
            .await
            .expect("find")
            .expect("record exists");
        assert_eq!(record.karma, -1);
        assert_eq!(record.last_set_karma, None);
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let store = MemoryUserStore::new();

        let mut record = UserRecord::from_profile(&profile(2), Utc::now());
        store.save(&record).await.expect("save");

        record.karma = 5;
        store.save(&record).await.expect("save");

        let loaded = store
            .find_by_id(2)
            .await
            .expect("find")
            .expect("record exists");
        assert_eq!(loaded.karma, 5);
    }
}
