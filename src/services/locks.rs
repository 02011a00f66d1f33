use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Per-user mutation locks
///
/// Every read-modify-write of a user's match record runs while holding that
/// user's lock. Operations touching two users take both locks in ascending
/// user ID order, whichever side started the call.
#[derive(Debug, Default)]
pub struct UserLocks {
    handles: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

/// Holds one user's lock; the table entry is dropped once nobody else wants it
pub struct UserLockGuard<'a> {
    locks: &'a UserLocks,
    user_id: String,
    guard: Option<OwnedMutexGuard<()>>,
}

/// Guards held for a two-user operation
pub struct PairGuard<'a> {
    _first: UserLockGuard<'a>,
    _second: Option<UserLockGuard<'a>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> MutexGuard<'_, HashMap<String, Arc<AsyncMutex<()>>>> {
        self.handles
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn handle(&self, user_id: &str) -> Arc<AsyncMutex<()>> {
        self.table()
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    /// Remove the entry when the table holds the last handle.
    ///
    /// Handles are only cloned while the table is locked, so a count of one
    /// here means no task holds or waits on this lock.
    fn release(&self, user_id: &str) {
        let mut handles = self.table();
        if handles
            .get(user_id)
            .is_some_and(|handle| Arc::strong_count(handle) == 1)
        {
            handles.remove(user_id);
        }
    }

    /// Lock a single user
    pub async fn lock(&self, user_id: &str) -> UserLockGuard<'_> {
        let guard = self.handle(user_id).lock_owned().await;
        UserLockGuard {
            locks: self,
            user_id: user_id.to_string(),
            guard: Some(guard),
        }
    }

    /// Lock two users in a fixed order; the same user is locked once
    pub async fn lock_pair(&self, a: &str, b: &str) -> PairGuard<'_> {
        if a == b {
            return PairGuard {
                _first: self.lock(a).await,
                _second: None,
            };
        }

        let (low, high) = if a < b { (a, b) } else { (b, a) };
        let first = self.lock(low).await;
        let second = self.lock(high).await;

        PairGuard {
            _first: first,
            _second: Some(second),
        }
    }

    /// Users with a live lock handle
    pub fn tracked_users(&self) -> usize {
        self.table().len()
    }
}

impl Drop for UserLockGuard<'_> {
    fn drop(&mut self) {
        // Unlock first so our own handle no longer counts
        drop(self.guard.take());
        self.locks.release(&self.user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_user_locked_once() {
        let locks = UserLocks::new();
        let guard = locks.lock_pair("a", "a").await;
        assert_eq!(locks.tracked_users(), 1);
        drop(guard);
        assert_eq!(locks.tracked_users(), 0);
    }

    #[tokio::test]
    async fn test_released_locks_leave_no_handles() {
        let locks = UserLocks::new();

        for i in 0..1000 {
            let _g = locks.lock(&format!("visitor-{}", i)).await;
        }
        for i in 0..100 {
            let _g = locks.lock_pair(&format!("left-{}", i), &format!("right-{}", i)).await;
        }

        assert_eq!(locks.tracked_users(), 0);
    }

    #[tokio::test]
    async fn test_handle_kept_while_a_task_waits() {
        let locks = Arc::new(UserLocks::new());
        let guard = locks.lock("a").await;

        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _g = locks.lock("a").await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        drop(guard);
        assert_eq!(locks.tracked_users(), 1);

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should acquire the lock")
            .unwrap();
        assert_eq!(locks.tracked_users(), 0);
    }

    #[tokio::test]
    async fn test_pair_lock_blocks_single_lock() {
        let locks = Arc::new(UserLocks::new());
        let guard = locks.lock_pair("b", "a").await;

        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _g = locks.lock("a").await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should acquire the lock")
            .unwrap();
    }

    #[tokio::test]
    async fn test_opposite_directions_do_not_deadlock() {
        let locks = Arc::new(UserLocks::new());

        let tasks: Vec<_> = (0..50)
            .map(|i| {
                let locks = locks.clone();
                tokio::spawn(async move {
                    let _g = if i % 2 == 0 {
                        locks.lock_pair("x", "y").await
                    } else {
                        locks.lock_pair("y", "x").await
                    };
                    tokio::task::yield_now().await;
                })
            })
            .collect();

        for task in tasks {
            tokio::time::timeout(Duration::from_secs(5), task)
                .await
                .expect("pair locks deadlocked")
                .unwrap();
        }
    }
}
