// Core algorithm exports
pub mod decisions;
pub mod directory;
pub mod finder;
pub mod record;

pub use decisions::{MatchDecisionProcessor, DecisionError, DecisionOutcome, MutualMatch};
pub use directory::{FriendDirectory, OneSidedEdge};
pub use finder::{find_potential_matches, find_all_potential_matches};
pub use record::MatchRecord;
