use crate::core::directory::FriendDirectory;
use crate::models::UserId;
use std::collections::{BTreeMap, BTreeSet};

/// Find the potential matches of a single user
///
/// A potential match is a friend of one of the user's friends who is neither
/// the user nor already one of their friends. Candidates reachable through
/// several common friends appear once.
pub fn find_potential_matches(user_id: &str, directory: &FriendDirectory) -> BTreeSet<UserId> {
    let own_friends = directory.friends_of(user_id);

    own_friends
        .iter()
        .flat_map(|friend_id| directory.friends_of(friend_id).iter())
        .filter(|candidate| candidate.as_str() != user_id && !own_friends.contains(*candidate))
        .cloned()
        .collect()
}

/// Find the potential matches of every user in the directory
///
/// Each user is computed independently against the same read-only snapshot.
pub fn find_all_potential_matches(directory: &FriendDirectory) -> BTreeMap<UserId, BTreeSet<UserId>> {
    directory
        .all_user_ids()
        .map(|user_id| (user_id.clone(), find_potential_matches(user_id, directory)))
        .collect()
}
