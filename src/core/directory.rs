use crate::models::{UserFriends, UserId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

static NO_FRIENDS: BTreeSet<UserId> = BTreeSet::new();

/// Immutable snapshot of who is directly friends with whom
///
/// Built once per matching pass from the user store. Every friend set is
/// owned by the directory, so nothing outside can change a snapshot while a
/// computation is reading it.
///
/// Each user's own friend list is trusted as-is: if `B` lists `A` but `A`
/// does not list `B`, the edge only exists in `B`'s set. Use
/// [`FriendDirectory::asymmetric_edges`] to find such one-sided entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendDirectory {
    friends: BTreeMap<UserId, BTreeSet<UserId>>,
}

/// A friend entry that is not mirrored on the other user's list
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OneSidedEdge {
    pub from: UserId,
    pub to: UserId,
}

impl FriendDirectory {
    /// Build a directory from `(user, friends)` entries.
    ///
    /// Self-loops are dropped. Repeated entries for the same user are merged.
    pub fn new<I, F>(entries: I) -> Self
    where
        I: IntoIterator<Item = (UserId, F)>,
        F: IntoIterator<Item = UserId>,
    {
        let mut friends: BTreeMap<UserId, BTreeSet<UserId>> = BTreeMap::new();

        for (user_id, friend_ids) in entries {
            let set = friends.entry(user_id.clone()).or_default();
            for friend_id in friend_ids {
                if friend_id != user_id {
                    set.insert(friend_id);
                } else {
                    tracing::debug!("Dropping self-loop for user {}", user_id);
                }
            }
        }

        Self { friends }
    }

    pub fn from_users(users: impl IntoIterator<Item = UserFriends>) -> Self {
        Self::new(users.into_iter().map(|u| (u.user_id, u.friend_ids)))
    }

    /// Direct friends of `user_id`; empty for unknown users
    pub fn friends_of(&self, user_id: &str) -> &BTreeSet<UserId> {
        self.friends.get(user_id).unwrap_or(&NO_FRIENDS)
    }

    pub fn all_user_ids(&self) -> impl Iterator<Item = &UserId> {
        self.friends.keys()
    }

    pub fn contains_user(&self, user_id: &str) -> bool {
        self.friends.contains_key(user_id)
    }

    pub fn len(&self) -> usize {
        self.friends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.friends.is_empty()
    }

    /// Friends that `a` and `b` have in common
    pub fn mutual_friends(&self, a: &str, b: &str) -> BTreeSet<UserId> {
        self.friends_of(a)
            .intersection(self.friends_of(b))
            .cloned()
            .collect()
    }

    /// Every `(from, to)` where `to` is on `from`'s list but not the reverse
    pub fn asymmetric_edges(&self) -> Vec<OneSidedEdge> {
        self.friends
            .iter()
            .flat_map(|(from, friend_ids)| {
                friend_ids
                    .iter()
                    .filter(move |to| !self.friends_of(to).contains(from))
                    .map(move |to| OneSidedEdge {
                        from: from.clone(),
                        to: to.clone(),
                    })
            })
            .collect()
    }

    pub fn is_symmetric(&self) -> bool {
        self.friends.iter().all(|(from, friend_ids)| {
            friend_ids
                .iter()
                .all(|to| self.friends_of(to).contains(from))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory(entries: &[(&str, &[&str])]) -> FriendDirectory {
        FriendDirectory::new(entries.iter().map(|(id, friends)| {
            (id.to_string(), friends.iter().map(|f| f.to_string()).collect::<Vec<_>>())
        }))
    }

    #[test]
    fn test_unknown_user_has_no_friends() {
        let dir = directory(&[("a", &["b"]), ("b", &["a"])]);
        assert!(dir.friends_of("zzz").is_empty());
        assert!(!dir.contains_user("zzz"));
    }

    #[test]
    fn test_self_loops_dropped() {
        let dir = directory(&[("a", &["a", "b"]), ("b", &["a"])]);
        assert!(!dir.friends_of("a").contains("a"));
        assert_eq!(dir.friends_of("a").len(), 1);
    }

    #[test]
    fn test_repeated_entries_merge() {
        let dir = directory(&[("a", &["b"]), ("a", &["c"])]);
        assert_eq!(dir.len(), 1);
        assert_eq!(dir.friends_of("a").len(), 2);
    }

    #[test]
    fn test_mutual_friends() {
        let dir = directory(&[
            ("a", &["b", "c", "d"]),
            ("e", &["c", "d", "f"]),
        ]);
        let mutual: Vec<_> = dir.mutual_friends("a", "e").into_iter().collect();
        assert_eq!(mutual, vec!["c".to_string(), "d".to_string()]);
        assert!(dir.mutual_friends("a", "nobody").is_empty());
    }

    #[test]
    fn test_asymmetric_edges_reported_not_fixed() {
        let dir = directory(&[("a", &["b"]), ("b", &[]), ("c", &["a"]), ]);
        assert!(!dir.is_symmetric());

        let edges = dir.asymmetric_edges();
        assert_eq!(edges.len(), 2);
        assert!(edges.contains(&OneSidedEdge { from: "a".into(), to: "b".into() }));
        assert!(edges.contains(&OneSidedEdge { from: "c".into(), to: "a".into() }));

        // Still one-sided after validation
        assert!(dir.friends_of("b").is_empty());
    }

    #[test]
    fn test_symmetric_directory() {
        let dir = directory(&[("a", &["b"]), ("b", &["a"])]);
        assert!(dir.is_symmetric());
        assert!(dir.asymmetric_edges().is_empty());
    }
}
