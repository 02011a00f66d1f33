use crate::models::{Decision, UserId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, VecDeque};

/// Per-user matching state
///
/// Holds the queue of potential matches not yet surfaced to the owner and
/// the owner's past decisions. A candidate is never pending and decided at
/// the same time, and every mutual match is also a friended candidate.
///
/// Decisions and mutual matches are written through
/// [`crate::core::MatchDecisionProcessor`]; the record itself only exposes
/// seeding and draining the queue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    #[serde(rename = "potentialMatches", default)]
    potential_matches: VecDeque<UserId>,
    #[serde(default)]
    friended: BTreeSet<UserId>,
    #[serde(default)]
    passed: BTreeSet<UserId>,
    #[serde(default)]
    matches: BTreeSet<UserId>,
}

impl MatchRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a record whose queue holds `candidates` in the given order
    pub fn seeded<I>(candidates: I) -> Self
    where
        I: IntoIterator<Item = UserId>,
    {
        let mut record = Self::new();
        record.seed(candidates);
        record
    }

    /// Reassemble a record from stored parts.
    ///
    /// Returns `None` when the parts break the record invariants.
    pub fn from_parts(
        potential_matches: Vec<UserId>,
        friended: Vec<UserId>,
        passed: Vec<UserId>,
        matches: Vec<UserId>,
    ) -> Option<Self> {
        let record = Self {
            potential_matches: potential_matches.into(),
            friended: friended.into_iter().collect(),
            passed: passed.into_iter().collect(),
            matches: matches.into_iter().collect(),
        };
        record.invariants_hold().then_some(record)
    }

    /// Replace the queue with `candidates`.
    ///
    /// Duplicates and already-decided candidates are skipped. Meant to be
    /// called once when the record is created.
    pub fn seed<I>(&mut self, candidates: I)
    where
        I: IntoIterator<Item = UserId>,
    {
        let mut seen = BTreeSet::new();
        self.potential_matches = candidates
            .into_iter()
            .filter(|id| !self.is_decided(id) && seen.insert(id.clone()))
            .collect();
        debug_assert!(self.invariants_hold());
    }

    /// Remove and return the oldest pending candidate
    pub fn take_next(&mut self) -> Option<UserId> {
        self.potential_matches.pop_front()
    }

    pub fn potential_matches(&self) -> impl ExactSizeIterator<Item = &UserId> {
        self.potential_matches.iter()
    }

    pub fn pending_count(&self) -> usize {
        self.potential_matches.len()
    }

    pub fn is_pending(&self, user_id: &str) -> bool {
        self.potential_matches.iter().any(|id| id == user_id)
    }

    pub fn friended(&self) -> &BTreeSet<UserId> {
        &self.friended
    }

    pub fn passed(&self) -> &BTreeSet<UserId> {
        &self.passed
    }

    pub fn matches(&self) -> &BTreeSet<UserId> {
        &self.matches
    }

    pub fn is_decided(&self, user_id: &str) -> bool {
        self.friended.contains(user_id) || self.passed.contains(user_id)
    }

    /// The decision currently recorded for `user_id`, if any
    pub fn decision_for(&self, user_id: &str) -> Option<Decision> {
        if self.friended.contains(user_id) {
            Some(Decision::Friended)
        } else if self.passed.contains(user_id) {
            Some(Decision::Passed)
        } else {
            None
        }
    }

    pub fn is_matched_with(&self, user_id: &str) -> bool {
        self.matches.contains(user_id)
    }

    /// Check the record invariants:
    /// - no candidate is both pending and decided
    /// - no candidate is both friended and passed
    /// - every match is friended
    /// - the queue holds no duplicates
    pub fn invariants_hold(&self) -> bool {
        let mut seen = BTreeSet::new();
        let queue_ok = self
            .potential_matches
            .iter()
            .all(|id| !self.is_decided(id) && seen.insert(id));

        queue_ok
            && self.friended.is_disjoint(&self.passed)
            && self.matches.is_subset(&self.friended)
    }

    /// Take `candidate_id` out of the queue and file it under `decision`.
    ///
    /// Removal and classification happen in one step so a candidate is never
    /// observed pending and decided at once. Returns whether the candidate was
    /// still pending.
    pub(crate) fn classify(&mut self, candidate_id: &str, decision: Decision) -> bool {
        let before = self.potential_matches.len();
        self.potential_matches.retain(|id| id != candidate_id);
        let was_pending = self.potential_matches.len() != before;

        let (target, other) = match decision {
            Decision::Friended => (&mut self.friended, &mut self.passed),
            Decision::Passed => (&mut self.passed, &mut self.friended),
        };
        other.remove(candidate_id);
        target.insert(candidate_id.to_string());

        assert!(
            self.invariants_hold(),
            "match record invariant broken while deciding on {}",
            candidate_id
        );
        was_pending
    }

    /// Record a mutual match; returns false when it already existed
    pub(crate) fn add_match(&mut self, user_id: &str) -> bool {
        debug_assert!(self.friended.contains(user_id));
        self.matches.insert(user_id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(items: &[&str]) -> Vec<UserId> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_fifo_order() {
        let mut record = MatchRecord::seeded(ids(&["x", "y", "z"]));

        assert_eq!(record.take_next().as_deref(), Some("x"));
        assert_eq!(record.take_next().as_deref(), Some("y"));
        assert_eq!(record.take_next().as_deref(), Some("z"));
        assert_eq!(record.take_next(), None);
        assert_eq!(record.take_next(), None);
    }

    #[test]
    fn test_seed_skips_duplicates() {
        let record = MatchRecord::seeded(ids(&["x", "y", "x"]));
        assert_eq!(record.pending_count(), 2);
        assert!(record.invariants_hold());
    }

    #[test]
    fn test_reseed_replaces_queue_and_skips_decided() {
        let mut record = MatchRecord::seeded(ids(&["x", "y"]));
        record.classify("y", Decision::Passed);
        record.seed(ids(&["y", "z"]));

        let pending: Vec<_> = record.potential_matches().cloned().collect();
        assert_eq!(pending, ids(&["z"]));
        assert!(record.invariants_hold());
    }

    #[test]
    fn test_classify_moves_between_sets() {
        let mut record = MatchRecord::seeded(ids(&["x"]));

        assert!(record.classify("x", Decision::Friended));
        assert_eq!(record.decision_for("x"), Some(Decision::Friended));

        assert!(!record.classify("x", Decision::Passed));
        assert_eq!(record.decision_for("x"), Some(Decision::Passed));
        assert!(!record.friended().contains("x"));
    }

    #[test]
    fn test_from_parts_rejects_broken_state() {
        assert!(MatchRecord::from_parts(ids(&["x"]), ids(&["x"]), vec![], vec![]).is_none());
        assert!(MatchRecord::from_parts(vec![], ids(&["x"]), ids(&["x"]), vec![]).is_none());
        assert!(MatchRecord::from_parts(vec![], vec![], vec![], ids(&["x"])).is_none());

        let ok = MatchRecord::from_parts(ids(&["y"]), ids(&["x"]), vec![], ids(&["x"]));
        assert!(ok.is_some());
    }

    #[test]
    fn test_serde_field_names() {
        let record = MatchRecord::seeded(ids(&["x"]));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["potentialMatches"][0], "x");
        let back: MatchRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
