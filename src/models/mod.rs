// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{UserId, UserFriends, UserData, Decision, UnknownDecision, MutualMatchEvent, DecisionReport};
pub use requests::{PotentialMatchQuery, MatchDecisionRequest, MatchesListQuery, MutualFriendsQuery, UserDataQuery, UserDataRequest};
pub use responses::{PotentialMatchResponse, MatchDecisionResponse, UserListResponse, UserDataResponse, HealthResponse, ErrorResponse};
