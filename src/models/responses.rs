use serde::{Deserialize, Serialize};
use crate::models::domain::{Decision, UserData};

/// Response for the next potential match endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PotentialMatchResponse {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "potentialMatchId")]
    pub potential_match_id: Option<String>,
    pub exhausted: bool,
}

/// Response for a recorded decision
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchDecisionResponse {
    pub success: bool,
    #[serde(rename = "eventId")]
    pub event_id: String,
    pub decision: Decision,
    #[serde(rename = "mutualMatch")]
    pub mutual_match: bool,
}

/// Response listing user IDs (matches or mutual friends)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserListResponse {
    #[serde(rename = "userIds")]
    pub user_ids: Vec<String>,
    pub count: usize,
}

impl From<Vec<String>> for UserListResponse {
    fn from(user_ids: Vec<String>) -> Self {
        Self {
            count: user_ids.len(),
            user_ids,
        }
    }
}

/// Response for a profile lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDataResponse {
    #[serde(rename = "userFound")]
    pub user_found: bool,
    #[serde(flatten)]
    pub user: Option<UserData>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
