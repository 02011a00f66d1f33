use crate::core::{
    find_potential_matches, DecisionError, FriendDirectory, MatchDecisionProcessor, MatchRecord,
    MutualMatch,
};
use crate::models::{Decision, DecisionReport, MutualMatchEvent, UserData, UserId};
use crate::services::cache::{CacheKey, CacheManager};
use crate::services::locks::UserLocks;
use crate::services::store::{MatchStore, StoreError};
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced to request handlers
#[derive(Debug, Error)]
pub enum MatchServiceError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Decision(#[from] DecisionError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Options that shape how the service builds and uses directories
#[derive(Debug, Clone, Copy)]
pub struct MatchServiceOptions {
    /// Log a warning when a freshly built directory has one-sided friendships
    pub warn_on_asymmetry: bool,
}

impl Default for MatchServiceOptions {
    fn default() -> Self {
        Self {
            warn_on_asymmetry: true,
        }
    }
}

/// Runs matching requests against the injected store
///
/// Owns the per-user lock table so that every load-mutate-save cycle on a
/// match record is serialized for that user.
pub struct MatchService {
    store: Arc<dyn MatchStore>,
    cache: Option<Arc<CacheManager>>,
    processor: MatchDecisionProcessor,
    locks: UserLocks,
    options: MatchServiceOptions,
    /// Bumped on every profile write; directories built under an older
    /// epoch are not written to the cache
    directory_epoch: tokio::sync::Mutex<u64>,
}

impl MatchService {
    pub fn new(store: Arc<dyn MatchStore>) -> Self {
        Self {
            store,
            cache: None,
            processor: MatchDecisionProcessor::new(),
            locks: UserLocks::new(),
            options: MatchServiceOptions::default(),
            directory_epoch: tokio::sync::Mutex::new(0),
        }
    }

    pub fn with_cache(mut self, cache: Arc<CacheManager>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_options(mut self, options: MatchServiceOptions) -> Self {
        self.options = options;
        self
    }

    /// Build a friend directory snapshot, preferring the cached copy
    pub async fn load_directory(&self) -> Result<FriendDirectory, MatchServiceError> {
        if let Some(cache) = &self.cache {
            match cache.get::<FriendDirectory>(CacheKey::friend_directory()).await {
                Ok(directory) => return Ok(directory),
                Err(e) => tracing::debug!("Directory not served from cache: {}", e),
            }
        }

        let epoch = *self.directory_epoch.lock().await;
        let users = self.store.load_all_users_with_friends().await?;
        let directory = FriendDirectory::from_users(users);

        if self.options.warn_on_asymmetry {
            let one_sided = directory.asymmetric_edges();
            if !one_sided.is_empty() {
                tracing::warn!(
                    "Friend directory has {} one-sided friendships across {} users",
                    one_sided.len(),
                    directory.len()
                );
            }
        }

        self.fill_directory_cache(epoch, &directory).await;

        Ok(directory)
    }

    /// Cache `directory` unless a profile write happened since `epoch` was read
    async fn fill_directory_cache(&self, epoch: u64, directory: &FriendDirectory) {
        let Some(cache) = &self.cache else {
            return;
        };

        let current = self.directory_epoch.lock().await;
        if *current != epoch {
            tracing::debug!(
                "Not caching friend directory built at epoch {} (now {})",
                epoch,
                *current
            );
            return;
        }

        if let Err(e) = cache.set(CacheKey::friend_directory(), directory).await {
            tracing::warn!("Failed to cache friend directory: {}", e);
        }
    }

    /// Load the user's record, creating and seeding it on first use.
    ///
    /// Must be called with the user's lock held. The boolean is true when
    /// the record was just created and has not been saved yet.
    async fn load_or_seed_record(&self, user_id: &str) -> Result<(MatchRecord, bool), MatchServiceError> {
        if let Some(record) = self.store.load_match_record(user_id).await? {
            return Ok((record, false));
        }

        let directory = self.load_directory().await?;
        let candidates = find_potential_matches(user_id, &directory);

        tracing::info!(
            "Seeding match record for {} with {} potential matches",
            user_id,
            candidates.len()
        );

        Ok((MatchRecord::seeded(candidates), true))
    }

    /// Hand out the user's next potential match, or `None` when the queue is empty
    pub async fn next_potential_match(&self, user_id: &str) -> Result<Option<UserId>, MatchServiceError> {
        require_id(user_id, "userId")?;
        let _guard = self.locks.lock(user_id).await;

        // A record seeded empty has nothing to persist and is seeded again next time
        let (mut record, _) = self.load_or_seed_record(user_id).await?;
        let next = record.take_next();

        if next.is_some() {
            self.store.save_match_record(user_id, &record).await?;
        }

        match &next {
            Some(candidate) => tracing::debug!(
                "Next potential match for {}: {} ({} left)",
                user_id,
                candidate,
                record.pending_count()
            ),
            None => tracing::debug!("No potential matches left for {}", user_id),
        }

        Ok(next)
    }

    /// Record `user_id`'s decision on `candidate_id` and check for a mutual match
    pub async fn record_decision(
        &self,
        user_id: &str,
        candidate_id: &str,
        decision: Decision,
    ) -> Result<DecisionReport, MatchServiceError> {
        require_id(user_id, "userId")?;
        require_id(candidate_id, "potentialMatchId")?;
        if user_id == candidate_id {
            return Err(DecisionError::SelfDecision(user_id.to_string()).into());
        }

        let _guard = self.locks.lock_pair(user_id, candidate_id).await;

        let (mut record, created) = self.load_or_seed_record(user_id).await?;
        let outcome = self
            .processor
            .record_decision(&mut record, user_id, candidate_id, decision)?;

        let mut mutual_match = None;
        let mut candidate_changed = false;
        let mut candidate_record = None;

        if decision == Decision::Friended {
            candidate_record = self.store.load_match_record(candidate_id).await?;
            let result = self.processor.check_and_establish_mutual_match(
                &mut record,
                candidate_record.as_mut(),
                user_id,
                candidate_id,
            );

            if result == MutualMatch::Established {
                candidate_changed = true;
                let event = MutualMatchEvent {
                    user_a: user_id.to_string(),
                    user_b: candidate_id.to_string(),
                    matched_at: chrono::Utc::now(),
                };
                tracing::info!("Mutual match between {} and {}", user_id, candidate_id);
                mutual_match = Some(event);
            }
        }

        if created || outcome.was_pending || outcome.changed(decision) || candidate_changed {
            self.store.save_match_record(user_id, &record).await?;
        }
        if let (true, Some(candidate_record)) = (candidate_changed, &candidate_record) {
            self.store
                .save_match_record(candidate_id, candidate_record)
                .await?;
        }

        tracing::info!("User {} {} {}", user_id, decision, candidate_id);

        Ok(DecisionReport {
            user_id: user_id.to_string(),
            candidate_id: candidate_id.to_string(),
            decision,
            mutual_match,
        })
    }

    /// The user's confirmed mutual matches; empty when they have no record
    pub async fn matches_list(&self, user_id: &str) -> Result<Vec<UserId>, MatchServiceError> {
        require_id(user_id, "userId")?;
        let record = self.store.load_match_record(user_id).await?;

        Ok(record
            .map(|r| r.matches().iter().cloned().collect())
            .unwrap_or_default())
    }

    /// Friends that two users have in common
    pub async fn mutual_friends(&self, a: &str, b: &str) -> Result<Vec<UserId>, MatchServiceError> {
        require_id(a, "userId1")?;
        require_id(b, "userId2")?;
        let directory = self.load_directory().await?;

        Ok(directory.mutual_friends(a, b).into_iter().collect())
    }

    /// Potential matches computed from a fresh directory, without touching the record
    pub async fn potential_match_snapshot(&self, user_id: &str) -> Result<Vec<UserId>, MatchServiceError> {
        require_id(user_id, "userId")?;
        let directory = self.load_directory().await?;

        Ok(find_potential_matches(user_id, &directory).into_iter().collect())
    }

    pub async fn get_user(&self, user_id: &str) -> Result<Option<UserData>, MatchServiceError> {
        require_id(user_id, "userId")?;
        Ok(self.store.load_user(user_id).await?)
    }

    /// Create a profile, or merge a partial update into the stored one
    pub async fn upsert_user(&self, update: UserData) -> Result<UserData, MatchServiceError> {
        require_id(&update.user_id, "userId")?;

        let user = match self.store.load_user(&update.user_id).await? {
            Some(mut stored) => {
                stored.merge(update);
                stored
            }
            None => {
                let mut created = update;
                created.strip_self_reference();
                created
            }
        };

        self.store.save_user(&user).await?;

        let mut epoch = self.directory_epoch.lock().await;
        *epoch += 1;
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.delete(CacheKey::friend_directory()).await {
                tracing::warn!("Failed to invalidate friend directory cache: {}", e);
            }
        }
        drop(epoch);

        tracing::info!("Saved profile for {} ({} friends)", user.user_id, user.friend_ids.len());
        Ok(user)
    }

    pub async fn health(&self) -> bool {
        self.store.health_check().await.unwrap_or(false)
    }
}

fn require_id(value: &str, field: &str) -> Result<(), MatchServiceError> {
    if value.trim().is_empty() {
        return Err(MatchServiceError::InvalidInput(format!("{} must not be empty", field)));
    }
    Ok(())
}
