//! SQLite-backed user store.

use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

use super::{Result, UserProfile, UserRecord, UserStore};

const SCHEMA: &str = "\
    CREATE TABLE IF NOT EXISTS users (
        id             INTEGER PRIMARY KEY,
        username       TEXT,
        first_name     TEXT,
        last_name      TEXT,
        karma          INTEGER NOT NULL DEFAULT 0,
        last_set_karma TEXT,
        allowed        INTEGER NOT NULL DEFAULT 1,
        last_seen      TEXT NOT NULL
    )";

/// User store persisting records in a SQLite database file.
#[derive(Debug, Clone)]
pub struct SqliteUserStore {
    pool: SqlitePool,
}

impl SqliteUserStore {
    /// Opens (creating if missing) the database at `path` and ensures
    /// the schema exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated.
    pub async fn connect(path: impl AsRef<Path>) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;

        sqlx::query(SCHEMA).execute(&pool).await?;

        info!("User database ready at {}", path.as_ref().display());
        Ok(Self { pool })
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT id, username, first_name, last_name, karma,
                    last_set_karma, allowed, last_seen
             FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn save(&self, record: &UserRecord) -> Result<()> {
        sqlx::query(
            "INSERT INTO users
                 (id, username, first_name, last_name, karma,
                  last_set_karma, allowed, last_seen)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 username       = excluded.username,
                 first_name     = excluded.first_name,
                 last_name      = excluded.last_name,
                 karma          = excluded.karma,
                 last_set_karma = excluded.last_set_karma,
                 allowed        = excluded.allowed,
                 last_seen      = excluded.last_seen",
        )
        .bind(record.id)
        .bind(&record.username)
        .bind(&record.first_name)
        .bind(&record.last_name)
        .bind(record.karma)
        .bind(record.last_set_karma)
        .bind(record.allowed)
        .bind(record.last_seen)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn adjust_karma(&self, profile: &UserProfile, delta: i64) -> Result<i64> {
        // Single upsert so concurrent adjustments to one user serialize
        // inside the database.
        let karma = sqlx::query_scalar::<_, i64>(
            "INSERT INTO users
                 (id, username, first_name, last_name, karma,
                  last_set_karma, allowed, last_seen)
             VALUES (?, ?, ?, ?, ?, NULL, 1, ?)
             ON CONFLICT(id) DO UPDATE SET
                 karma = users.karma + excluded.karma
             RETURNING karma",
        )
        .bind(profile.id)
        .bind(&profile.username)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(delta)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(karma)
    }
}
