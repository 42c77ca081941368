//! Game session controller
//!
//! `Idle -> Running -> Ended -> Idle`. The session owns the game, its RNG
//! and its timers. Ticks and actions reach the game only while `Running`;
//! the transition to `Ended` cancels every timer and yields exactly one
//! [`GameOver`].

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::game::{GameCtx, GameEvent, GameKind, MiniGame, PlayerAction};
use super::timer::Timers;
use crate::consts::MAX_TICKS_PER_ADVANCE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for start; no timers armed
    Idle,
    /// Round in progress
    Running,
    /// Round finished, final score on display
    Ended,
}

/// Terminal result of one round, produced once per `Running` period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOver {
    pub game: GameKind,
    pub score: u64,
}

pub struct GameSession<G: MiniGame> {
    game: G,
    state: SessionState,
    timers: Timers,
    rng: Pcg32,
    events: Vec<GameEvent>,
    /// Latched when the round's GameOver has been handed out
    reported: bool,
}

impl<G: MiniGame> GameSession<G> {
    pub fn new(game: G, seed: u64) -> Self {
        Self {
            game,
            state: SessionState::Idle,
            timers: Timers::new(),
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            reported: false,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn kind(&self) -> GameKind {
        self.game.kind()
    }

    pub fn score(&self) -> u64 {
        self.game.score()
    }

    pub fn has_active_timers(&self) -> bool {
        !self.timers.is_empty()
    }

    /// Feedback events since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Begin a round. From `Ended` this implies a replay.
    ///
    /// Returns false if a round is already running.
    pub fn start(&mut self, now_ms: u64) -> bool {
        if self.state == SessionState::Running {
            return false;
        }

        self.timers.cancel_all();
        self.events.clear();
        let mut ctx = GameCtx {
            rng: &mut self.rng,
            events: &mut self.events,
        };
        self.game.reset(&mut ctx);

        for &(kind, period) in self.game.schedule() {
            self.timers.arm(kind, period, now_ms);
        }
        self.state = SessionState::Running;
        self.reported = false;

        log::info!("{} started", self.game.kind().display_name());
        true
    }

    /// Fire every timer tick due by `now_ms`.
    ///
    /// Returns the game over if this advance ended the round.
    pub fn advance(&mut self, now_ms: u64) -> Option<GameOver> {
        if self.state != SessionState::Running {
            return None;
        }

        let mut fired = 0;
        while let Some(kind) = self.timers.pop_due(now_ms) {
            let mut ctx = GameCtx {
                rng: &mut self.rng,
                events: &mut self.events,
            };
            self.game.tick(kind, &mut ctx);
            if self.game.is_ended() {
                return self.finish();
            }

            fired += 1;
            if fired >= MAX_TICKS_PER_ADVANCE {
                log::debug!("Tick backlog dropped at {}", now_ms);
                self.timers.resync(now_ms);
                break;
            }
        }
        None
    }

    /// Apply one player action.
    ///
    /// Returns the game over if the action ended the round.
    pub fn act(&mut self, action: &PlayerAction) -> Option<GameOver> {
        if self.state != SessionState::Running {
            return None;
        }

        let mut ctx = GameCtx {
            rng: &mut self.rng,
            events: &mut self.events,
        };
        self.game.act(action, &mut ctx);
        if self.game.is_ended() {
            return self.finish();
        }
        None
    }

    /// `Running -> Ended`: cancel timers, freeze score, report once
    fn finish(&mut self) -> Option<GameOver> {
        self.timers.cancel_all();
        self.state = SessionState::Ended;
        self.events.push(GameEvent::GameOver);

        if self.reported {
            return None;
        }
        self.reported = true;

        let score = self.game.score();
        log::info!(
            "{} over, score {}",
            self.game.kind().display_name(),
            score
        );
        Some(GameOver {
            game: self.game.kind(),
            score,
        })
    }

    /// `Ended -> Idle`
    pub fn replay(&mut self) {
        if self.state == SessionState::Ended {
            self.state = SessionState::Idle;
        }
    }

    /// Stop the session without reporting (navigation away, game switch)
    pub fn teardown(&mut self) {
        self.timers.cancel_all();
        self.state = SessionState::Idle;
    }
}

impl<G: MiniGame> Drop for GameSession<G> {
    fn drop(&mut self) {
        if self.state == SessionState::Running {
            log::debug!("{} dropped mid-round", self.game.kind().display_name());
        }
        self.timers.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{COUNTDOWN_MS, ROUND_SECS};
    use crate::sim::color_pattern::TILE_COUNT;
    use crate::sim::game::AnyGame;
    use crate::sim::whack_a_bug::{BugKind, WhackABug};

    fn whack_session() -> GameSession<WhackABug> {
        GameSession::new(WhackABug::new(), 77)
    }

    const ROUND_MS: u64 = ROUND_SECS as u64 * COUNTDOWN_MS;

    #[test]
    fn test_idle_ignores_ticks_and_actions() {
        let mut s = whack_session();
        assert_eq!(s.advance(10_000), None);
        assert_eq!(s.act(&PlayerAction::Whack(0)), None);
        assert_eq!(s.state(), SessionState::Idle);
        assert!(!s.has_active_timers());
    }

    #[test]
    fn test_round_ends_once_and_cancels_timers() {
        let mut s = whack_session();
        assert!(s.start(0));
        assert!(!s.start(0));
        assert!(s.has_active_timers());

        assert_eq!(s.advance(ROUND_MS - 1), None);
        let over = s.advance(ROUND_MS);
        assert_eq!(
            over,
            Some(GameOver {
                game: GameKind::WhackABug,
                score: 0
            })
        );
        assert_eq!(s.state(), SessionState::Ended);
        assert!(!s.has_active_timers());

        assert_eq!(s.advance(ROUND_MS * 2), None);
        assert_eq!(s.act(&PlayerAction::Whack(0)), None);
    }

    #[test]
    fn test_post_end_tick_does_not_mutate() {
        let mut s = whack_session();
        s.start(0);
        s.advance(ROUND_MS);
        let holes = *s.game().holes();
        let score = s.score();
        let time_left = s.game().time_left();

        for t in 1..=50 {
            s.advance(ROUND_MS + t * 1000);
        }
        assert_eq!(*s.game().holes(), holes);
        assert_eq!(s.score(), score);
        assert_eq!(s.game().time_left(), time_left);
    }

    #[test]
    fn test_restart_resets_before_first_tick() {
        let mut s = whack_session();
        s.start(0);
        // Play until a bug is up, whack it, then leave one on the board
        let mut t = 0;
        while s.score() == 0 && t < ROUND_MS {
            t += 1000;
            s.advance(t);
            let up = s
                .game()
                .holes()
                .iter()
                .position(|h| matches!(h, Some(BugKind::Normal | BugKind::Golden)));
            if let Some(hole) = up {
                s.act(&PlayerAction::Whack(hole));
            }
        }
        assert!(s.score() > 0);
        s.advance(ROUND_MS);
        assert_eq!(s.state(), SessionState::Ended);

        s.replay();
        assert_eq!(s.state(), SessionState::Idle);
        assert!(s.start(ROUND_MS + 5_000));
        assert_eq!(s.score(), 0);
        assert!(s.game().holes().iter().all(Option::is_none));
        assert_eq!(s.game().time_left(), ROUND_SECS);
    }

    #[test]
    fn test_start_from_ended_reports_again() {
        let mut s = whack_session();
        s.start(0);
        assert!(s.advance(ROUND_MS).is_some());
        s.start(ROUND_MS);
        assert!(s.advance(ROUND_MS * 2).is_some());
    }

    #[test]
    fn test_terminal_action_reports_once() {
        let mut s = GameSession::new(AnyGame::new(GameKind::ColorPattern), 3);
        s.start(0);
        // Two reveal ticks play back the single-tile sequence
        s.advance(1000);
        let AnyGame::ColorPattern(game) = s.game() else {
            unreachable!()
        };
        let wrong = (game.sequence()[0] + 1) % TILE_COUNT;

        let over = s.act(&PlayerAction::Tile(wrong));
        assert_eq!(
            over,
            Some(GameOver {
                game: GameKind::ColorPattern,
                score: 0
            })
        );
        assert_eq!(s.act(&PlayerAction::Tile(wrong)), None);
        assert!(!s.has_active_timers());
    }

    #[test]
    fn test_teardown_cancels_without_report() {
        let mut s = whack_session();
        s.start(0);
        s.advance(5_000);
        s.teardown();
        assert_eq!(s.state(), SessionState::Idle);
        assert!(!s.has_active_timers());
        assert_eq!(s.advance(ROUND_MS), None);
    }

    #[test]
    fn test_backlog_is_capped() {
        let mut s = GameSession::new(AnyGame::new(GameKind::BubblePop), 1);
        s.start(0);
        // A long stall: frame ticks alone would exceed the cap many times over
        assert_eq!(s.advance(ROUND_MS * 10), None);
        assert_eq!(s.state(), SessionState::Running);
        assert!(s.game().time_left().is_some_and(|t| t > 0));
    }

    #[test]
    fn test_events_drained() {
        let mut s = whack_session();
        s.start(0);
        s.advance(1000);
        let events = s.drain_events();
        assert_eq!(events, [GameEvent::Spawned]);
        assert!(s.drain_events().is_empty());
    }
}
