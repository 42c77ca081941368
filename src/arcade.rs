//! Game selector + leaderboard prompt
//!
//! Mounts one game session at a time and routes its single game-over
//! result into the scoreboard.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::leaderboard::Leaderboard;
use crate::platform::{Clock, KeyValueStore};
use crate::scoreboard::Scoreboard;
use crate::settings::Settings;
use crate::sim::{AnyGame, GameKind, GameOver, GameSession, PlayerAction, SessionState};

/// Outcome of the most recent round, shown in the leaderboard prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundResult {
    pub game: GameKind,
    pub score: u64,
    /// Timestamp of the recorded entry, None if not recorded or not ranked
    pub entry: Option<u64>,
    /// Beat the previous best for this game on the leaderboard
    pub new_best: bool,
}

pub struct Arcade<S: KeyValueStore, C: Clock> {
    scoreboard: Scoreboard<S, C>,
    settings: Settings,
    session: GameSession<AnyGame>,
    rng: Pcg32,
    last_result: Option<RoundResult>,
}

impl<S: KeyValueStore, C: Clock> Arcade<S, C> {
    /// Load persisted state and mount the preferred (or a random) game
    pub fn open(store: S, clock: C, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let scoreboard = Scoreboard::open(store, clock, &mut rng);
        let settings = Settings::load(scoreboard.store());

        let kind = settings
            .preferred_game
            .unwrap_or_else(|| GameKind::ALL[rng.random_range(0..GameKind::ALL.len())]);
        let session = GameSession::new(AnyGame::new(kind), rng.random());
        log::info!("Mounted {}", kind.display_name());

        Self {
            scoreboard,
            settings,
            session,
            rng,
            last_result: None,
        }
    }

    pub fn session(&self) -> &GameSession<AnyGame> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession<AnyGame> {
        &mut self.session
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        self.scoreboard.leaderboard()
    }

    pub fn player_name(&self) -> &str {
        self.scoreboard.player_name()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn now_ms(&self) -> u64 {
        self.scoreboard.now_ms()
    }

    /// Result of the round that just ended; cleared by [`Arcade::play_again`]
    pub fn last_result(&self) -> Option<RoundResult> {
        self.last_result
    }

    /// Highest leaderboard score recorded for `kind`
    pub fn best_for(&self, kind: GameKind) -> Option<u64> {
        self.leaderboard()
            .for_game(kind.display_name())
            .map(|e| e.score)
            .max()
    }

    /// The prompt only appears for a finished round with a non-zero score
    pub fn show_leaderboard_prompt(&self) -> bool {
        self.session.state() == SessionState::Ended
            && self.last_result.is_some_and(|r| r.score > 0)
    }

    pub fn start(&mut self) -> bool {
        let now = self.scoreboard.now_ms();
        self.last_result = None;
        self.session.start(now)
    }

    /// Drive timers to the current time
    pub fn update(&mut self) -> Option<RoundResult> {
        let now = self.scoreboard.now_ms();
        let over = self.session.advance(now)?;
        Some(self.record(over))
    }

    pub fn act(&mut self, action: &PlayerAction) -> Option<RoundResult> {
        let over = self.session.act(action)?;
        Some(self.record(over))
    }

    fn record(&mut self, over: GameOver) -> RoundResult {
        let new_best = over.score > self.best_for(over.game).unwrap_or(0);
        let entry = self
            .scoreboard
            .submit(over.game.display_name(), over.score);
        let result = RoundResult {
            game: over.game,
            score: over.score,
            entry,
            new_best,
        };
        if new_best {
            log::info!("New best for {}: {}", over.game.display_name(), over.score);
        }
        self.last_result = Some(result);
        result
    }

    /// Close the prompt and return to the start screen
    pub fn play_again(&mut self) {
        self.session.replay();
        self.last_result = None;
    }

    /// Unmount the current game and mount `kind`
    pub fn switch_game(&mut self, kind: GameKind) {
        self.session.teardown();
        self.session = GameSession::new(AnyGame::new(kind), self.rng.random());
        self.last_result = None;
        log::info!("Mounted {}", kind.display_name());
    }

    /// Rename the player; entries from this visit follow the new name
    pub fn rename_player(&mut self, name: &str) {
        self.scoreboard.rename(name);
    }

    /// Apply and persist a settings change
    pub fn update_settings(&mut self, f: impl FnOnce(&mut Settings)) {
        f(&mut self.settings);
        self.settings.save(self.scoreboard.store_mut());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{COUNTDOWN_MS, ROUND_SECS};
    use crate::identity::PLAYER_NAME_KEY;
    use crate::leaderboard::SCORES_KEY;
    use crate::platform::{ManualClock, MemoryStore};
    use crate::sim::whack_a_bug::BugKind;

    const ROUND_MS: u64 = ROUND_SECS as u64 * COUNTDOWN_MS;

    fn whack_arcade(clock: &ManualClock) -> Arcade<MemoryStore, &ManualClock> {
        let settings = r#"{"preferred_game":"WhackABug"}"#;
        let store = MemoryStore::new()
            .with_value(Settings::STORAGE_KEY, settings)
            .with_value(PLAYER_NAME_KEY, "KeenNode314");
        Arcade::open(store, clock, 21)
    }

    /// Play a whack round second by second, hitting every non-bomb bug
    fn play_round(arcade: &mut Arcade<MemoryStore, &ManualClock>, clock: &ManualClock) -> Option<RoundResult> {
        arcade.start();
        for _ in 0..ROUND_SECS {
            clock.advance(COUNTDOWN_MS);
            if let Some(result) = arcade.update() {
                return Some(result);
            }
            let AnyGame::WhackABug(game) = arcade.session().game() else {
                unreachable!()
            };
            let up = game
                .holes()
                .iter()
                .position(|h| matches!(h, Some(BugKind::Normal | BugKind::Golden)));
            if let Some(hole) = up {
                arcade.act(&PlayerAction::Whack(hole));
            }
        }
        None
    }

    #[test]
    fn test_preferred_game_mounted() {
        let clock = ManualClock::new(0);
        let arcade = whack_arcade(&clock);
        assert_eq!(arcade.session().kind(), GameKind::WhackABug);
        assert_eq!(arcade.state(), SessionState::Idle);
    }

    #[test]
    fn test_round_submits_exactly_once() {
        let clock = ManualClock::new(1_000);
        let mut arcade = whack_arcade(&clock);
        let result = play_round(&mut arcade, &clock).expect("round should end");
        assert!(result.score > 0);
        assert!(arcade.show_leaderboard_prompt());
        assert_eq!(arcade.leaderboard().len(), 1);

        // Late ticks and clicks after the end change nothing
        clock.advance(ROUND_MS);
        assert_eq!(arcade.update(), None);
        assert_eq!(arcade.act(&PlayerAction::Whack(0)), None);
        assert_eq!(arcade.leaderboard().len(), 1);

        let entry = &arcade.leaderboard().entries()[0];
        assert_eq!(entry.name, "KeenNode314");
        assert_eq!(entry.game, "Whack-a-Bug");
        assert_eq!(Some(entry.timestamp), result.entry);
    }

    #[test]
    fn test_replay_records_second_round() {
        let clock = ManualClock::new(1_000);
        let mut arcade = whack_arcade(&clock);
        play_round(&mut arcade, &clock);
        arcade.play_again();
        assert_eq!(arcade.state(), SessionState::Idle);
        assert_eq!(arcade.last_result(), None);

        play_round(&mut arcade, &clock);
        assert_eq!(arcade.leaderboard().len(), 2);
    }

    #[test]
    fn test_rename_after_round_relabels_entry() {
        let clock = ManualClock::new(1_000);
        let mut arcade = whack_arcade(&clock);
        play_round(&mut arcade, &clock);
        arcade.rename_player("Ada");
        assert_eq!(arcade.player_name(), "Ada");
        assert_eq!(arcade.leaderboard().entries()[0].name, "Ada");
    }

    #[test]
    fn test_switch_game_tears_down() {
        let clock = ManualClock::new(0);
        let mut arcade = whack_arcade(&clock);
        arcade.start();
        clock.advance(5_000);
        arcade.update();
        arcade.switch_game(GameKind::WordScramble);

        assert_eq!(arcade.session().kind(), GameKind::WordScramble);
        assert_eq!(arcade.state(), SessionState::Idle);
        clock.advance(ROUND_MS);
        assert_eq!(arcade.update(), None);
        assert!(arcade.leaderboard().is_empty());
    }

    #[test]
    fn test_zero_score_round_shows_no_prompt() {
        let clock = ManualClock::new(0);
        let mut arcade = whack_arcade(&clock);
        arcade.start();
        clock.advance(ROUND_MS);
        let result = arcade.update().expect("round should end");
        assert_eq!(result.score, 0);
        assert_eq!(result.entry, None);
        assert!(!arcade.show_leaderboard_prompt());
        assert!(arcade.leaderboard().is_empty());
    }

    #[test]
    fn test_settings_persist() {
        let clock = ManualClock::new(0);
        let mut arcade = whack_arcade(&clock);
        arcade.update_settings(|s| s.sound = false);
        assert!(!arcade.settings().sound);

        let stored = arcade.scoreboard.store();
        assert!(stored.get(Settings::STORAGE_KEY).is_some());
        let reloaded = Settings::load(stored);
        assert!(!reloaded.sound);
        assert_eq!(reloaded.preferred_game, Some(GameKind::WhackABug));
    }

    #[test]
    fn test_best_score_per_game() {
        let board = r#"[
            {"name":"Ada","score":40,"game":"Bubble Pop","timestamp":10},
            {"name":"Bob","score":3,"game":"Whack-a-Bug","timestamp":20}
        ]"#;
        let clock = ManualClock::new(1_000);
        let store = MemoryStore::new()
            .with_value(Settings::STORAGE_KEY, r#"{"preferred_game":"WhackABug"}"#)
            .with_value(SCORES_KEY, board);
        let mut arcade = Arcade::open(store, &clock, 21);
        assert_eq!(arcade.best_for(GameKind::WhackABug), Some(3));
        assert_eq!(arcade.best_for(GameKind::BubblePop), Some(40));
        assert_eq!(arcade.best_for(GameKind::CodeTyping), None);

        let result = play_round(&mut arcade, &clock).expect("round should end");
        assert_eq!(result.new_best, result.score > 3);
        assert_eq!(arcade.best_for(GameKind::WhackABug), Some(result.score.max(3)));
    }

    #[test]
    fn test_matching_best_is_not_new_best() {
        let clock = ManualClock::new(1_000);
        let mut arcade = whack_arcade(&clock);
        let first = play_round(&mut arcade, &clock).expect("round should end");
        assert!(first.new_best);

        // Same score again only ties the best
        let over = GameOver {
            game: GameKind::WhackABug,
            score: first.score,
        };
        let again = arcade.record(over);
        assert!(!again.new_best);
        assert_eq!(arcade.best_for(GameKind::WhackABug), Some(first.score));
    }

    #[test]
    fn test_zero_score_never_new_best() {
        let clock = ManualClock::new(0);
        let mut arcade = whack_arcade(&clock);
        arcade.start();
        clock.advance(ROUND_MS);
        let result = arcade.update().expect("round should end");
        assert!(!result.new_best);
    }
}
