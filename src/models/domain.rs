use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Opaque user identifier
pub type UserId = String;

/// One user and the direct friends listed on their own profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFriends {
    #[serde(rename = "userId")]
    pub user_id: UserId,
    #[serde(rename = "friendIds", default)]
    pub friend_ids: BTreeSet<UserId>,
}

impl UserFriends {
    pub fn new<I, S>(user_id: impl Into<UserId>, friend_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<UserId>,
    {
        Self {
            user_id: user_id.into(),
            friend_ids: friend_ids.into_iter().map(Into::into).collect(),
        }
    }
}

/// Stored user profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    #[serde(rename = "userId")]
    pub user_id: UserId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub bio: String,
    #[serde(rename = "friendIds", default)]
    pub friend_ids: Vec<UserId>,
}

impl UserData {
    /// Merge a partial update into this profile.
    ///
    /// Empty strings and an empty friend list leave the stored value untouched.
    pub fn merge(&mut self, update: UserData) {
        if !update.name.is_empty() {
            self.name = update.name;
        }
        if !update.email.is_empty() {
            self.email = update.email;
        }
        if !update.bio.is_empty() {
            self.bio = update.bio;
        }
        if !update.friend_ids.is_empty() {
            self.friend_ids = update.friend_ids;
        }
        self.strip_self_reference();
    }

    /// Remove the owner from their own friend list and drop duplicates
    pub fn strip_self_reference(&mut self) {
        let mut seen = BTreeSet::new();
        let owner = &self.user_id;
        self.friend_ids
            .retain(|id| id != owner && !id.is_empty() && seen.insert(id.clone()));
    }

    pub fn friends(&self) -> UserFriends {
        UserFriends::new(self.user_id.clone(), self.friend_ids.iter().cloned())
    }
}

/// A user's feed decision on a potential match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Decision {
    Friended,
    Passed,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Friended => "FRIENDED",
            Decision::Passed => "PASSED",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown decision '{0}', expected FRIENDED or PASSED")]
pub struct UnknownDecision(pub String);

impl FromStr for Decision {
    type Err = UnknownDecision;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "FRIENDED" => Ok(Decision::Friended),
            "PASSED" => Ok(Decision::Passed),
            _ => Err(UnknownDecision(s.to_string())),
        }
    }
}

/// Emitted when two users have both friended each other
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutualMatchEvent {
    #[serde(rename = "userA")]
    pub user_a: UserId,
    #[serde(rename = "userB")]
    pub user_b: UserId,
    #[serde(rename = "matchedAt")]
    pub matched_at: chrono::DateTime<chrono::Utc>,
}

/// Outcome of a recorded decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionReport {
    pub user_id: UserId,
    pub candidate_id: UserId,
    pub decision: Decision,
    pub mutual_match: Option<MutualMatchEvent>,
}
