use crate::core::MatchRecord;
use crate::models::{UserData, UserFriends};
use crate::services::store::{MatchStore, StoreError};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;

/// PostgreSQL-backed store for user profiles and match records
///
/// List-valued fields (friend IDs, queue, decision sets) are kept in
/// `TEXT[]` columns. The potential-match queue keeps its array order.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL store from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }
}

#[async_trait]
impl MatchStore for PostgresStore {
    async fn load_all_users_with_friends(&self) -> Result<Vec<UserFriends>, StoreError> {
        let query = r#"
            SELECT user_id, friend_ids
            FROM users
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;

        let users: Vec<UserFriends> = rows
            .iter()
            .map(|row| {
                let friend_ids: Vec<String> = row.get("friend_ids");
                UserFriends::new(row.get::<String, _>("user_id"), friend_ids)
            })
            .collect();

        tracing::debug!("Loaded {} users with friend lists", users.len());

        Ok(users)
    }

    async fn load_match_record(&self, user_id: &str) -> Result<Option<MatchRecord>, StoreError> {
        let query = r#"
            SELECT potential_matches, friended_ids, passed_ids, matched_ids
            FROM match_records
            WHERE user_id = $1
        "#;

        let row = sqlx::query(query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        MatchRecord::from_parts(
            row.get("potential_matches"),
            row.get("friended_ids"),
            row.get("passed_ids"),
            row.get("matched_ids"),
        )
        .map(Some)
        .ok_or_else(|| StoreError::CorruptRecord(user_id.to_string()))
    }

    /// Upsert the full record for `user_id`
    async fn save_match_record(&self, user_id: &str, record: &MatchRecord) -> Result<(), StoreError> {
        let query = r#"
            INSERT INTO match_records (user_id, potential_matches, friended_ids, passed_ids, matched_ids, updated_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
            ON CONFLICT (user_id)
            DO UPDATE SET
                potential_matches = EXCLUDED.potential_matches,
                friended_ids = EXCLUDED.friended_ids,
                passed_ids = EXCLUDED.passed_ids,
                matched_ids = EXCLUDED.matched_ids,
                updated_at = EXCLUDED.updated_at
        "#;

        let potential: Vec<String> = record.potential_matches().cloned().collect();
        let friended: Vec<String> = record.friended().iter().cloned().collect();
        let passed: Vec<String> = record.passed().iter().cloned().collect();
        let matched: Vec<String> = record.matches().iter().cloned().collect();

        sqlx::query(query)
            .bind(user_id)
            .bind(&potential)
            .bind(&friended)
            .bind(&passed)
            .bind(&matched)
            .execute(&self.pool)
            .await?;

        tracing::debug!(
            "Saved match record for {} ({} pending, {} matches)",
            user_id,
            potential.len(),
            matched.len()
        );

        Ok(())
    }

    async fn load_user(&self, user_id: &str) -> Result<Option<UserData>, StoreError> {
        let query = r#"
            SELECT user_id, name, email, bio, friend_ids
            FROM users
            WHERE user_id = $1
        "#;

        let row = sqlx::query(query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| UserData {
            user_id: row.get("user_id"),
            name: row.get("name"),
            email: row.get("email"),
            bio: row.get("bio"),
            friend_ids: row.get("friend_ids"),
        }))
    }

    async fn save_user(&self, user: &UserData) -> Result<(), StoreError> {
        let query = r#"
            INSERT INTO users (user_id, name, email, bio, friend_ids, updated_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
            ON CONFLICT (user_id)
            DO UPDATE SET
                name = EXCLUDED.name,
                email = EXCLUDED.email,
                bio = EXCLUDED.bio,
                friend_ids = EXCLUDED.friend_ids,
                updated_at = EXCLUDED.updated_at
        "#;

        sqlx::query(query)
            .bind(&user.user_id)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.bio)
            .bind(&user.friend_ids)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Saved user {} ({} friends)", user.user_id, user.friend_ids.len());

        Ok(())
    }

    /// Health check for the database connection
    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
