use crate::core::MatchRecord;
use crate::models::{UserData, UserFriends};
use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors raised by a storage backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Corrupt match record for user {0}")]
    CorruptRecord(String),
}

/// Load/save interface the matching service uses for all persistence
///
/// Implementations own every I/O concern. The matching core never reaches
/// storage except through this trait.
#[async_trait]
pub trait MatchStore: Send + Sync {
    /// Every known user with the friend list from their own profile
    async fn load_all_users_with_friends(&self) -> Result<Vec<UserFriends>, StoreError>;

    async fn load_match_record(&self, user_id: &str) -> Result<Option<MatchRecord>, StoreError>;

    async fn save_match_record(&self, user_id: &str, record: &MatchRecord) -> Result<(), StoreError>;

    async fn load_user(&self, user_id: &str) -> Result<Option<UserData>, StoreError>;

    async fn save_user(&self, user: &UserData) -> Result<(), StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError>;
}

/// In-process store backed by hash maps
///
/// Used by tests and local runs without a database.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, UserData>>,
    records: RwLock<HashMap<String, MatchRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `users`
    pub fn with_users(users: impl IntoIterator<Item = UserData>) -> Self {
        let users = users
            .into_iter()
            .map(|user| (user.user_id.clone(), user))
            .collect();

        Self {
            users: RwLock::new(users),
            records: RwLock::new(HashMap::new()),
        }
    }

    pub async fn record_count(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl MatchStore for MemoryStore {
    async fn load_all_users_with_friends(&self) -> Result<Vec<UserFriends>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().map(UserData::friends).collect())
    }

    async fn load_match_record(&self, user_id: &str) -> Result<Option<MatchRecord>, StoreError> {
        Ok(self.records.read().await.get(user_id).cloned())
    }

    async fn save_match_record(&self, user_id: &str, record: &MatchRecord) -> Result<(), StoreError> {
        self.records
            .write()
            .await
            .insert(user_id.to_string(), record.clone());
        Ok(())
    }

    async fn load_user(&self, user_id: &str) -> Result<Option<UserData>, StoreError> {
        Ok(self.users.read().await.get(user_id).cloned())
    }

    async fn save_user(&self, user: &UserData) -> Result<(), StoreError> {
        self.users
            .write()
            .await
            .insert(user.user_id.clone(), user.clone());
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, friends: &[&str]) -> UserData {
        UserData {
            user_id: id.to_string(),
            name: format!("User {}", id),
            email: String::new(),
            bio: String::new(),
            friend_ids: friends.iter().map(|f| f.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_memory_store_records() {
        let store = MemoryStore::new();
        assert!(store.load_match_record("a").await.unwrap().is_none());

        let record = MatchRecord::seeded(vec!["b".to_string()]);
        store.save_match_record("a", &record).await.unwrap();

        assert_eq!(store.load_match_record("a").await.unwrap(), Some(record));
        assert_eq!(store.record_count().await, 1);
    }

    #[tokio::test]
    async fn test_memory_store_users() {
        let store = MemoryStore::with_users(vec![user("a", &["b"]), user("b", &["a"])]);

        let mut all = store.load_all_users_with_friends().await.unwrap();
        all.sort_by(|x, y| x.user_id.cmp(&y.user_id));
        assert_eq!(all.len(), 2);
        assert!(all[0].friend_ids.contains("b"));

        assert!(store.load_user("c").await.unwrap().is_none());
        store.save_user(&user("c", &[])).await.unwrap();
        assert!(store.load_user("c").await.unwrap().is_some());
    }
}
