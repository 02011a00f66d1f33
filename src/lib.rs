//! Friend Match - friend-of-friend matching service
//!
//! Users are matched with people who share at least one direct friend with
//! them but are not yet friends. This library holds the matching core
//! (friend directory, potential-match discovery, per-user match records and
//! decision handling) plus the storage, cache and HTTP layers around it.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{
    find_all_potential_matches, find_potential_matches, FriendDirectory, MatchDecisionProcessor,
    MatchRecord, MutualMatch,
};
pub use models::{Decision, MutualMatchEvent, UserData, UserFriends, UserId};
pub use services::{MatchService, MatchStore, MemoryStore};
