//! Score leaderboard
//!
//! Persisted to LocalStorage under `gameScores` as a plain JSON array,
//! sorted by descending score and capped at [`MAX_ENTRIES`]. Equal scores
//! keep their submission order.

use serde::{Deserialize, Serialize};

use crate::platform::KeyValueStore;
use crate::platform::storage::{load_json, save_json};

/// Maximum number of entries to keep
pub const MAX_ENTRIES: usize = 100;

/// LocalStorage key for the leaderboard
pub const SCORES_KEY: &str = "gameScores";

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Display name at submission time (rewritten by session rename)
    pub name: String,
    /// Final score
    pub score: u64,
    /// Display name of the game that produced the score
    pub game: String,
    /// Unix timestamp (ms) when submitted
    pub timestamp: u64,
}

/// Ranked leaderboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Entries in rank order
    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Check if a score would be retained
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_ENTRIES {
            return true;
        }
        // A tie with the last entry lands after it and is truncated
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        Some(self.insertion_index(score) + 1)
    }

    /// Rank of the entry submitted at `timestamp` (1-indexed)
    pub fn rank_of(&self, timestamp: u64) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.timestamp == timestamp)
            .map(|i| i + 1)
    }

    /// Entries for one game, in rank order
    pub fn for_game<'a>(&'a self, game: &'a str) -> impl Iterator<Item = &'a LeaderboardEntry> {
        self.entries.iter().filter(move |e| e.game == game)
    }

    /// Newest timestamp on the board
    pub fn latest_timestamp(&self) -> Option<u64> {
        self.entries.iter().map(|e| e.timestamp).max()
    }

    /// First index holding a strictly lower score
    fn insertion_index(&self, score: u64) -> usize {
        self.entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len())
    }

    /// Insert an entry after all entries with an equal or higher score and
    /// trim to [`MAX_ENTRIES`].
    ///
    /// Returns the rank achieved (1-indexed), or None if the entry was not
    /// retained. Zero scores are never recorded.
    pub fn insert(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        if entry.score == 0 {
            return None;
        }

        let pos = self.insertion_index(entry.score);
        self.entries.insert(pos, entry);

        // Trim to max size
        self.entries.truncate(MAX_ENTRIES);

        (pos < MAX_ENTRIES).then_some(pos + 1)
    }

    /// Relabel `old_name` entries created at or after `session_start`.
    ///
    /// Older entries are left untouched even if they share the name.
    /// Returns the number of entries changed.
    pub fn rename_session_entries(
        &mut self,
        old_name: &str,
        new_name: &str,
        session_start: u64,
    ) -> usize {
        let mut changed = 0;
        for entry in &mut self.entries {
            if entry.name == old_name && entry.timestamp >= session_start {
                entry.name = new_name.to_string();
                changed += 1;
            }
        }
        changed
    }

    /// Re-establish ordering and cap on data read from storage.
    ///
    /// Stable sort so equal scores keep their stored order.
    fn normalize(&mut self) {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_ENTRIES);
    }

    /// Load the leaderboard, empty if absent or unparseable
    pub fn load(store: &impl KeyValueStore) -> Self {
        match load_json::<Leaderboard>(store, SCORES_KEY) {
            Some(mut board) => {
                board.normalize();
                log::info!("Loaded {} leaderboard entries", board.len());
                board
            }
            None => {
                log::info!("No leaderboard found, starting fresh");
                Self::new()
            }
        }
    }

    /// Persist the leaderboard (best effort)
    pub fn save(&self, store: &mut impl KeyValueStore) {
        match save_json(store, SCORES_KEY, self) {
            Ok(()) => log::info!("Leaderboard saved ({} entries)", self.entries.len()),
            Err(e) => log::warn!("Leaderboard not saved: {}", e),
        }
    }
}

/// Format a timestamp relative to `now_ms` ("Just now", "3 mins ago", ...)
pub fn format_age(timestamp: u64, now_ms: u64) -> String {
    let diff_mins = now_ms.saturating_sub(timestamp) / 60_000;
    let diff_hours = diff_mins / 60;
    let diff_days = diff_hours / 24;

    match (diff_days, diff_hours, diff_mins) {
        (1, _, _) => "Yesterday".to_string(),
        (d, _, _) if d >= 14 => format!("{} weeks ago", d / 7),
        (d, _, _) if d >= 7 => "Last week".to_string(),
        (d, _, _) if d > 1 => format!("{} days ago", d),
        (_, 1, _) => "1 hour ago".to_string(),
        (_, h, _) if h > 1 => format!("{} hours ago", h),
        (_, _, 1) => "1 min ago".to_string(),
        (_, _, m) if m > 1 => format!("{} mins ago", m),
        _ => "Just now".to_string(),
    }
}
