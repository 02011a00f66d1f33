use crate::core::record::MatchRecord;
use crate::models::Decision;
use thiserror::Error;

/// Errors raised when a decision cannot be applied
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecisionError {
    #[error("User {0} cannot decide on themselves")]
    SelfDecision(String),

    #[error("User {user_id} is already matched with {candidate_id}; the decision cannot change to {requested}")]
    DecisionAfterMatch {
        user_id: String,
        candidate_id: String,
        requested: Decision,
    },
}

/// What happened to a record when a decision was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionOutcome {
    /// The candidate was still queued when the decision arrived
    pub was_pending: bool,
    /// The decision recorded before this one, if any
    pub previous: Option<Decision>,
}

impl DecisionOutcome {
    pub fn changed(&self, decision: Decision) -> bool {
        self.previous != Some(decision)
    }
}

/// Result of a mutual match check between two users
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutualMatch {
    /// Both users friended each other and the match was just recorded
    Established,
    /// The match had already been recorded on both sides
    AlreadyMatched,
    /// At least one side has not friended the other
    NotMutual,
}

/// Applies feed decisions to match records and detects mutual matches
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchDecisionProcessor;

impl MatchDecisionProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Apply `decision` by `user_id` on `candidate_id` to the user's record
    ///
    /// The candidate leaves the queue whether or not it was already drained,
    /// and is filed under the decision. Repeating a decision is a no-op.
    /// Changing the decision on someone already matched is rejected.
    pub fn record_decision(
        &self,
        record: &mut MatchRecord,
        user_id: &str,
        candidate_id: &str,
        decision: Decision,
    ) -> Result<DecisionOutcome, DecisionError> {
        if user_id == candidate_id {
            return Err(DecisionError::SelfDecision(user_id.to_string()));
        }

        let previous = record.decision_for(candidate_id);
        if record.is_matched_with(candidate_id) && previous != Some(decision) {
            return Err(DecisionError::DecisionAfterMatch {
                user_id: user_id.to_string(),
                candidate_id: candidate_id.to_string(),
                requested: decision,
            });
        }

        let was_pending = record.classify(candidate_id, decision);

        tracing::debug!(
            "Recorded {} -> {} ({}, pending: {}, previous: {:?})",
            user_id,
            candidate_id,
            decision,
            was_pending,
            previous
        );

        Ok(DecisionOutcome { was_pending, previous })
    }

    /// Record a mutual match between `user_a` and `user_b` if both friended each other
    ///
    /// `record_b` is `None` when `user_b` has never used matching, which
    /// simply means there is no match. Calling this again after the match is
    /// recorded changes nothing, and the result does not depend on which user
    /// is passed first.
    pub fn check_and_establish_mutual_match(
        &self,
        record_a: &mut MatchRecord,
        record_b: Option<&mut MatchRecord>,
        user_a: &str,
        user_b: &str,
    ) -> MutualMatch {
        let Some(record_b) = record_b else {
            return MutualMatch::NotMutual;
        };

        if user_a == user_b
            || !record_a.friended().contains(user_b)
            || !record_b.friended().contains(user_a)
        {
            return MutualMatch::NotMutual;
        }

        let added_a = record_a.add_match(user_b);
        let added_b = record_b.add_match(user_a);

        if added_a || added_b {
            tracing::debug!("Mutual match recorded between {} and {}", user_a, user_b);
            MutualMatch::Established
        } else {
            MutualMatch::AlreadyMatched
        }
    }
}
