//! Best scores list
//!
//! Persisted as a plain JSON array of scores, descending, top 10.

use serde::{Deserialize, Serialize};

use crate::consts::HIGH_SCORES_KEY;
use crate::persistence::{self, Storage};

/// Maximum number of scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Descending list of the best run scores
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BestScores {
    scores: Vec<u32>,
}

impl BestScores {
    /// Create empty list
    pub fn new() -> Self {
        Self { scores: Vec::new() }
    }

    /// Build from arbitrary scores (sorted and trimmed)
    pub fn from_scores(mut scores: Vec<u32>) -> Self {
        scores.sort_unstable_by(|a, b| b.cmp(a));
        scores.truncate(MAX_HIGH_SCORES);
        Self { scores }
    }

    /// Record a finished run. Returns true when it is a new record.
    ///
    /// Every score is pushed, so equal scores stack up. A new record means
    /// the score now sits at the top and is strictly greater than the
    /// previous best.
    pub fn record(&mut self, score: u32) -> bool {
        let previous_best = self.best();
        self.scores.push(score);
        self.scores.sort_unstable_by(|a, b| b.cmp(a));
        self.scores.truncate(MAX_HIGH_SCORES);

        score > 0 && self.best() == Some(score) && previous_best.is_none_or(|best| score > best)
    }

    /// The top score (if any)
    pub fn best(&self) -> Option<u32> {
        self.scores.first().copied()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.scores
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Load from storage; a missing or damaged entry gives an empty list
    pub fn load(storage: &dyn Storage) -> Self {
        let scores: Vec<u32> = persistence::load(storage, HIGH_SCORES_KEY, Vec::new());
        let loaded = Self::from_scores(scores);
        log::info!("{} best scores on record", loaded.scores.len());
        loaded
    }

    pub fn save(&self, storage: &mut dyn Storage) {
        persistence::save(storage, HIGH_SCORES_KEY, self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    #[test]
    fn test_equal_score_is_not_a_record() {
        let mut best = BestScores::from_scores(vec![50]);
        assert!(!best.record(50));
        assert_eq!(best.as_slice(), &[50, 50]);
    }

    #[test]
    fn test_higher_score_is_a_record() {
        let mut best = BestScores::from_scores(vec![50]);
        assert!(best.record(80));
        assert_eq!(best.as_slice(), &[80, 50]);
    }

    #[test]
    fn test_first_nonzero_score_is_a_record() {
        let mut best = BestScores::new();
        assert!(best.record(3));
        let mut zero = BestScores::new();
        assert!(!zero.record(0));
        assert_eq!(zero.as_slice(), &[0]);
    }

    #[test]
    fn test_capped_at_ten() {
        let mut best = BestScores::from_scores((1..=10).collect());
        assert!(!best.record(0));
        assert_eq!(best.as_slice().len(), MAX_HIGH_SCORES);
        assert_eq!(best.as_slice().last(), Some(&1));
        assert!(best.record(11));
        assert_eq!(best.as_slice()[0], 11);
        assert_eq!(best.as_slice().last(), Some(&2));
    }

    #[test]
    fn test_persisted_as_plain_array() {
        let mut storage = MemoryStorage::new();
        BestScores::from_scores(vec![50, 80]).save(&mut storage);
        assert_eq!(storage.get(HIGH_SCORES_KEY), Some("[80,50]"));
        assert_eq!(BestScores::load(&storage).as_slice(), &[80, 50]);
    }

    #[test]
    fn test_unsorted_storage_is_normalized() {
        let mut storage = MemoryStorage::new();
        storage.insert(HIGH_SCORES_KEY, "[1,9,5,3,7,2,8,4,6,10,11,0]");
        let best = BestScores::load(&storage);
        assert_eq!(best.as_slice(), &[11, 10, 9, 8, 7, 6, 5, 4, 3, 2]);
    }
}
