use serde::{Deserialize, Serialize};
use validator::Validate;

/// Query for the next potential match
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PotentialMatchQuery {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", alias = "userid", rename = "userId")]
    pub user_id: String,
}

/// Request to record a friend/pass decision
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MatchDecisionRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", alias = "userid", rename = "userId")]
    pub user_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "potential_match_id", alias = "potentialMatchID", rename = "potentialMatchId")]
    pub potential_match_id: String,
    pub decision: String,
}

/// Query for a user's mutual matches
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MatchesListQuery {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", alias = "userid", rename = "userId")]
    pub user_id: String,
}

/// Query for the friends two users have in common
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MutualFriendsQuery {
    #[validate(length(min = 1))]
    #[serde(alias = "userid1", rename = "userId1")]
    pub user_id_1: String,
    #[validate(length(min = 1))]
    #[serde(alias = "userid2", rename = "userId2")]
    pub user_id_2: String,
}

/// Query for a stored profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UserDataQuery {
    #[validate(length(min = 1))]
    #[serde(alias = "id", alias = "userid", rename = "userId")]
    pub user_id: String,
}

/// Create or partially update a profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UserDataRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "id", rename = "userId")]
    pub user_id: String,
    #[serde(default)]
    pub name: String,
    #[validate(email)]
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub bio: String,
    #[serde(alias = "friends-list", rename = "friendIds", default)]
    pub friend_ids: Vec<String>,
}
