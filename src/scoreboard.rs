//! Player identity + leaderboard for the current visit
//!
//! Captures the session start when constructed. Renaming the player
//! relabels only leaderboard entries stamped at or after that instant.

use rand::Rng;

use crate::identity;
use crate::leaderboard::{Leaderboard, LeaderboardEntry};
use crate::platform::{Clock, KeyValueStore};

pub struct Scoreboard<S: KeyValueStore, C: Clock> {
    store: S,
    clock: C,
    session_start: u64,
    player: String,
    board: Leaderboard,
    /// Last timestamp handed out, keeps stamps strictly increasing
    last_stamp: u64,
}

impl<S: KeyValueStore, C: Clock> Scoreboard<S, C> {
    /// Open the persisted state, creating the identity on first visit
    pub fn open(mut store: S, clock: C, rng: &mut impl Rng) -> Self {
        let session_start = clock.now_ms();
        let board = Leaderboard::load(&store);
        let player = identity::get_or_create(&mut store, rng, &[], session_start);
        // Stamps never fall before the session start, even if the clock
        // steps backwards, so this visit's entries stay renameable
        let last_stamp = board
            .latest_timestamp()
            .unwrap_or(0)
            .max(session_start.saturating_sub(1));

        log::info!("Session started at {} as {}", session_start, player);

        Self {
            store,
            clock,
            session_start,
            player,
            board,
            last_stamp,
        }
    }

    pub fn player_name(&self) -> &str {
        &self.player
    }

    pub fn session_start(&self) -> u64 {
        self.session_start
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.board
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Next submission timestamp, never equal to or below the previous one
    fn stamp(&mut self) -> u64 {
        let now = self.clock.now_ms();
        let stamp = if now > self.last_stamp {
            now
        } else {
            self.last_stamp + 1
        };
        self.last_stamp = stamp;
        stamp
    }

    /// Record a finished game's score under the current name.
    ///
    /// Zero scores leave the leaderboard and storage untouched. Returns the
    /// timestamp of the new entry if it was retained.
    pub fn submit(&mut self, game: &str, score: u64) -> Option<u64> {
        if score == 0 {
            log::debug!("Zero score for {} not recorded", game);
            return None;
        }

        let timestamp = self.stamp();
        let rank = self.board.insert(LeaderboardEntry {
            name: self.player.clone(),
            score,
            game: game.to_string(),
            timestamp,
        });
        self.board.save(&mut self.store);

        match rank {
            Some(rank) => {
                log::info!("{} scored {} in {} (rank {})", self.player, score, game, rank);
                Some(timestamp)
            }
            None => {
                log::info!("{} scored {} in {} (not ranked)", self.player, score, game);
                None
            }
        }
    }

    /// Rename the player and relabel this session's entries.
    ///
    /// The new name is not validated; empty or duplicate names are accepted.
    pub fn rename(&mut self, new_name: &str) {
        let old_name = std::mem::replace(&mut self.player, new_name.to_string());
        identity::rename(&mut self.store, new_name);

        let changed = self
            .board
            .rename_session_entries(&old_name, new_name, self.session_start);
        self.board.save(&mut self.store);

        log::info!(
            "Renamed {} -> {} ({} session entries)",
            old_name,
            new_name,
            changed
        );
    }

    /// Access the underlying store (settings share it)
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::PLAYER_NAME_KEY;
    use crate::leaderboard::SCORES_KEY;
    use crate::platform::{ManualClock, MemoryStore};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn open_with(store: MemoryStore, clock: &ManualClock) -> Scoreboard<MemoryStore, &ManualClock> {
        Scoreboard::open(store, clock, &mut Pcg32::seed_from_u64(5))
    }

    #[test]
    fn test_first_visit_creates_identity() {
        let clock = ManualClock::new(1_000);
        let board = open_with(MemoryStore::new(), &clock);
        assert!(!board.player_name().is_empty());
        assert_eq!(
            board.store().get(PLAYER_NAME_KEY).as_deref(),
            Some(board.player_name())
        );
        assert!(board.leaderboard().is_empty());
    }

    #[test]
    fn test_returning_visit_reuses_identity() {
        let clock = ManualClock::new(1_000);
        let store = MemoryStore::new().with_value(PLAYER_NAME_KEY, "CalmCache007");
        let board = open_with(store, &clock);
        assert_eq!(board.player_name(), "CalmCache007");
    }

    #[test]
    fn test_submit_persists() {
        let clock = ManualClock::new(1_000);
        let mut board = open_with(MemoryStore::new(), &clock);
        let stamp = board.submit("Bubble Pop", 12);
        assert_eq!(stamp, Some(1_000));

        let reloaded = Leaderboard::load(board.store());
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.entries()[0].game, "Bubble Pop");
    }

    #[test]
    fn test_submit_zero_leaves_storage_untouched() {
        let clock = ManualClock::new(1_000);
        let mut board = open_with(MemoryStore::new(), &clock);
        assert_eq!(board.submit("Whack-a-Bug", 0), None);
        assert_eq!(board.store().get(SCORES_KEY), None);
    }

    #[test]
    fn test_stamps_strictly_increase() {
        let clock = ManualClock::new(5_000);
        let mut board = open_with(MemoryStore::new(), &clock);
        let a = board.submit("X", 3);
        let b = board.submit("X", 3);
        clock.set(4_000);
        let c = board.submit("X", 3);
        assert_eq!(a, Some(5_000));
        assert_eq!(b, Some(5_001));
        assert_eq!(c, Some(5_002));
    }

    #[test]
    fn test_rename_spares_previous_visits() {
        let prior = r#"[{"name":"CalmCache007","score":40,"game":"X","timestamp":100}]"#;
        let store = MemoryStore::new()
            .with_value(PLAYER_NAME_KEY, "CalmCache007")
            .with_value(SCORES_KEY, prior);
        let clock = ManualClock::new(10_000);
        let mut board = open_with(store, &clock);

        clock.advance(500);
        board.submit("X", 50);
        board.rename("Ada");

        let names: Vec<_> = board
            .leaderboard()
            .entries()
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, ["Ada", "CalmCache007"]);
        assert_eq!(board.store().get(PLAYER_NAME_KEY).as_deref(), Some("Ada"));

        let reloaded = Leaderboard::load(board.store());
        assert_eq!(reloaded, *board.leaderboard());
    }

    #[test]
    fn test_clock_step_back_stays_in_session() {
        let prior = r#"[{"name":"CalmCache007","score":40,"game":"X","timestamp":5000}]"#;
        let store = MemoryStore::new()
            .with_value(PLAYER_NAME_KEY, "CalmCache007")
            .with_value(SCORES_KEY, prior);
        let clock = ManualClock::new(10_000);
        let mut board = open_with(store, &clock);

        clock.set(9_000);
        let stamp = board.submit("X", 50);
        assert!(stamp.is_some_and(|t| t >= board.session_start()));

        board.rename("Ada");
        let entries = board.leaderboard().entries();
        assert_eq!(entries[0].name, "Ada");
        assert_eq!(entries[0].score, 50);
        assert_eq!(entries[1].name, "CalmCache007");
    }

    #[test]
    fn test_rename_then_submit_uses_new_name() {
        let clock = ManualClock::new(1_000);
        let mut board = open_with(MemoryStore::new(), &clock);
        board.rename("Grace");
        board.submit("X", 9);
        assert_eq!(board.leaderboard().entries()[0].name, "Grace");
    }
}
