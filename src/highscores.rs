//! High score leaderboard system
//!
//! Top 10 by height, highest first. Ties keep insertion order.

use serde::{Deserialize, Serialize};

use crate::persistence::ScoreStore;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub name: String,
    /// Final height reached
    pub score: u64,
}

impl ScoreRecord {
    pub fn new(name: impl Into<String>, score: u64) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// High score leaderboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub entries: Vec<ScoreRecord>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from arbitrary records, restoring the ordering and size bounds
    pub fn from_records(mut entries: Vec<ScoreRecord>) -> Self {
        entries.retain(|e| e.score > 0);
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(MAX_HIGH_SCORES);
        Self { entries }
    }

    /// Check if a score would make the table
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // A tie with the last entry lands after it and is cut
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Record a finished round.
    /// Returns the rank achieved (1-indexed) or None if it didn't make the table.
    pub fn add_score(&mut self, name: &str, score: u64) -> Option<usize> {
        if score == 0 {
            return None;
        }

        // Entries are already sorted, so inserting after every score >= this
        // one is the same as a stable sort: ties keep arrival order
        let pos = self.entries.partition_point(|e| e.score >= score);
        self.entries.insert(pos, ScoreRecord::new(name, score));
        self.entries.truncate(MAX_HIGH_SCORES);

        (pos < MAX_HIGH_SCORES).then_some(pos + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load from `store`, falling back to an empty table on any failure
    pub fn load_from(store: &dyn ScoreStore) -> Self {
        match store.load() {
            Ok(records) => {
                let board = Self::from_records(records);
                log::info!("Loaded {} high scores", board.entries.len());
                board
            }
            Err(e) => {
                log::warn!("Could not load high scores, starting fresh: {}", e);
                Self::new()
            }
        }
    }

    /// Persist to `store`. Failures are logged, never fatal.
    pub fn save_to(&self, store: &dyn ScoreStore) -> bool {
        match store.save(&self.entries) {
            Ok(()) => {
                log::info!("High scores saved ({} entries)", self.entries.len());
                true
            }
            Err(e) => {
                log::warn!("Could not save high scores: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{JsonFileStore, MemoryStore, PersistenceError};
    use proptest::prelude::*;

    fn names(board: &Leaderboard) -> Vec<&str> {
        board.entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_ordering_is_stable_for_ties() {
        let mut board = Leaderboard::new();
        board.add_score("A", 30);
        board.add_score("B", 90);
        board.add_score("C", 10);
        board.add_score("D", 90);
        assert_eq!(names(&board), ["B", "D", "A", "C"]);
    }

    #[test]
    fn test_rank_reported() {
        let mut board = Leaderboard::new();
        assert_eq!(board.add_score("A", 50), Some(1));
        assert_eq!(board.add_score("B", 80), Some(1));
        assert_eq!(board.add_score("C", 50), Some(3));
        assert_eq!(board.top_score(), Some(80));
    }

    #[test]
    fn test_zero_is_ignored() {
        let mut board = Leaderboard::new();
        assert_eq!(board.add_score("A", 0), None);
        assert!(board.is_empty());
        assert!(!board.qualifies(0));
    }

    #[test]
    fn test_capped_at_ten() {
        let mut board = Leaderboard::new();
        for i in 1..=12u64 {
            board.add_score(&format!("p{i}"), i * 10);
        }
        assert_eq!(board.len(), MAX_HIGH_SCORES);
        assert_eq!(board.top_score(), Some(120));
        assert_eq!(board.entries.last().map(|e| e.score), Some(30));

        // Ties with the last place do not displace it
        assert!(!board.qualifies(30));
        assert_eq!(board.add_score("late", 30), None);
        assert_eq!(board.entries.last().map(|e| e.name.as_str()), Some("p3"));
        assert!(board.qualifies(31));
    }

    #[test]
    fn test_corrupt_store_loads_empty() {
        let store = MemoryStore::with_contents("not json at all");
        assert!(Leaderboard::load_from(&store).is_empty());
    }

    #[test]
    fn test_load_sanitizes_records() {
        let store = MemoryStore::new();
        let mut records: Vec<_> = (0..15u64).map(|i| ScoreRecord::new(format!("n{i}"), i)).collect();
        records.reverse();
        records.swap(0, 7);
        store.save(&records).unwrap();

        let board = Leaderboard::load_from(&store);
        assert_eq!(board.len(), MAX_HIGH_SCORES);
        assert_eq!(board.top_score(), Some(14));
        assert!(board.entries.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(board.entries.iter().all(|e| e.score > 0));
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("leaderboard.json"));

        let mut board = Leaderboard::new();
        board.add_score("ada", 4_200);
        board.add_score("bob", 1_337);
        assert!(board.save_to(&store));

        assert_eq!(Leaderboard::load_from(&store), board);
    }

    #[test]
    fn test_failed_save_is_not_fatal() {
        struct ReadOnly;
        impl ScoreStore for ReadOnly {
            fn load(&self) -> Result<Vec<ScoreRecord>, PersistenceError> {
                Ok(Vec::new())
            }
            fn save(&self, _records: &[ScoreRecord]) -> Result<(), PersistenceError> {
                Err(std::io::Error::other("read-only").into())
            }
        }

        let mut board = Leaderboard::new();
        board.add_score("ada", 10);
        assert!(!board.save_to(&ReadOnly));
        assert_eq!(board.len(), 1);
    }

    proptest! {
        #[test]
        fn prop_bounded_and_sorted(scores in prop::collection::vec(0u64..1_000, 0..40)) {
            let mut board = Leaderboard::new();
            for (i, s) in scores.iter().enumerate() {
                board.add_score(&i.to_string(), *s);
            }
            prop_assert!(board.len() <= MAX_HIGH_SCORES);
            prop_assert!(board.entries.windows(2).all(|w| w[0].score >= w[1].score));

            let mut expected: Vec<u64> = scores.iter().copied().filter(|&s| s > 0).collect();
            expected.sort_by(|a, b| b.cmp(a));
            expected.truncate(MAX_HIGH_SCORES);
            let got: Vec<u64> = board.entries.iter().map(|e| e.score).collect();
            prop_assert_eq!(got, expected);
        }
    }
}
