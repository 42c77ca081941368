//! Whack-a-Bug: bugs pop out of a 3x3 grid of holes
//!
//! Normal bugs are worth 1, golden bugs 3, and bombs cost 2 (score never
//! drops below zero).

use rand::Rng;

use super::game::{Countdown, GameCtx, GameEvent, GameKind, MiniGame, PlayerAction};
use super::timer::TimerKind;
use crate::consts::{COUNTDOWN_MS, ROUND_SECS};

pub const HOLE_COUNT: usize = 9;

/// A bug appears every second
pub const SPAWN_MS: u64 = 1000;
/// All bugs duck back every two seconds
pub const HIDE_MS: u64 = 2000;

const GOLDEN_CHANCE: f64 = 0.10;
const BOMB_CHANCE: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BugKind {
    Normal,
    Golden,
    Bomb,
}

impl BugKind {
    fn roll(rng: &mut impl Rng) -> Self {
        let roll: f64 = rng.random();
        if roll < GOLDEN_CHANCE {
            BugKind::Golden
        } else if roll < GOLDEN_CHANCE + BOMB_CHANCE {
            BugKind::Bomb
        } else {
            BugKind::Normal
        }
    }
}

#[derive(Debug, Clone)]
pub struct WhackABug {
    holes: [Option<BugKind>; HOLE_COUNT],
    score: u64,
    clock: Countdown,
    /// The same hole can't be whacked twice in a row
    last_whacked: Option<usize>,
}

impl Default for WhackABug {
    fn default() -> Self {
        Self::new()
    }
}

impl WhackABug {
    pub fn new() -> Self {
        Self {
            holes: [None; HOLE_COUNT],
            score: 0,
            clock: Countdown::new(ROUND_SECS),
            last_whacked: None,
        }
    }

    pub fn holes(&self) -> &[Option<BugKind>; HOLE_COUNT] {
        &self.holes
    }

    pub fn time_left(&self) -> u32 {
        self.clock.remaining()
    }

    fn spawn(&mut self, ctx: &mut GameCtx) {
        let empty: Vec<usize> = (0..HOLE_COUNT).filter(|&i| self.holes[i].is_none()).collect();
        if empty.is_empty() {
            return;
        }
        let hole = empty[ctx.rng.random_range(0..empty.len())];
        self.holes[hole] = Some(BugKind::roll(ctx.rng));
        ctx.emit(GameEvent::Spawned);
    }

    fn whack(&mut self, hole: usize, ctx: &mut GameCtx) {
        if hole >= HOLE_COUNT || self.last_whacked == Some(hole) {
            return;
        }
        let Some(bug) = self.holes[hole].take() else {
            return;
        };
        self.last_whacked = Some(hole);

        match bug {
            BugKind::Normal => {
                self.score += 1;
                ctx.emit(GameEvent::Scored(1));
            }
            BugKind::Golden => {
                self.score += 3;
                ctx.emit(GameEvent::Scored(3));
            }
            BugKind::Bomb => {
                self.score = self.score.saturating_sub(2);
                ctx.emit(GameEvent::Penalty(2));
            }
        }
    }
}

impl MiniGame for WhackABug {
    fn kind(&self) -> GameKind {
        GameKind::WhackABug
    }

    fn schedule(&self) -> &'static [(TimerKind, u64)] {
        &[
            (TimerKind::Spawn, SPAWN_MS),
            (TimerKind::Hide, HIDE_MS),
            (TimerKind::Countdown, COUNTDOWN_MS),
        ]
    }

    fn reset(&mut self, _ctx: &mut GameCtx) {
        self.holes = [None; HOLE_COUNT];
        self.score = 0;
        self.clock = Countdown::new(ROUND_SECS);
        self.last_whacked = None;
    }

    fn tick(&mut self, timer: TimerKind, ctx: &mut GameCtx) {
        match timer {
            TimerKind::Spawn => self.spawn(ctx),
            TimerKind::Hide => self.holes = [None; HOLE_COUNT],
            TimerKind::Countdown => self.clock.tick(),
            _ => {}
        }
    }

    fn act(&mut self, action: &PlayerAction, ctx: &mut GameCtx) {
        if let PlayerAction::Whack(hole) = *action {
            self.whack(hole, ctx);
        }
    }

    fn is_ended(&self) -> bool {
        self.clock.expired()
    }

    fn score(&self) -> u64 {
        self.score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn whack(game: &mut WhackABug, hole: usize) -> Vec<GameEvent> {
        let mut rng = Pcg32::seed_from_u64(0);
        let mut events = Vec::new();
        game.act(
            &PlayerAction::Whack(hole),
            &mut GameCtx {
                rng: &mut rng,
                events: &mut events,
            },
        );
        events
    }

    #[test]
    fn test_scoring_rules() {
        let mut game = WhackABug::new();
        game.holes[0] = Some(BugKind::Golden);
        game.holes[1] = Some(BugKind::Normal);
        game.holes[2] = Some(BugKind::Bomb);

        assert_eq!(whack(&mut game, 0), [GameEvent::Scored(3)]);
        assert_eq!(whack(&mut game, 1), [GameEvent::Scored(1)]);
        assert_eq!(whack(&mut game, 2), [GameEvent::Penalty(2)]);
        assert_eq!(game.score(), 2);
    }

    #[test]
    fn test_bomb_floors_at_zero() {
        let mut game = WhackABug::new();
        game.holes[4] = Some(BugKind::Bomb);
        whack(&mut game, 4);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_same_hole_twice_in_a_row_ignored() {
        let mut game = WhackABug::new();
        game.holes[3] = Some(BugKind::Normal);
        whack(&mut game, 3);
        game.holes[3] = Some(BugKind::Normal);
        assert!(whack(&mut game, 3).is_empty());
        assert_eq!(game.holes()[3], Some(BugKind::Normal));

        game.holes[5] = Some(BugKind::Normal);
        whack(&mut game, 5);
        whack(&mut game, 3);
        assert_eq!(game.score(), 3);
    }

    #[test]
    fn test_empty_hole_and_bad_index() {
        let mut game = WhackABug::new();
        assert!(whack(&mut game, 0).is_empty());
        assert!(whack(&mut game, HOLE_COUNT).is_empty());
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_spawn_fills_only_empty_holes() {
        let mut game = WhackABug::new();
        let mut rng = Pcg32::seed_from_u64(6);
        let mut events = Vec::new();
        let mut ctx = GameCtx {
            rng: &mut rng,
            events: &mut events,
        };
        for _ in 0..HOLE_COUNT + 3 {
            game.tick(TimerKind::Spawn, &mut ctx);
        }
        assert!(game.holes().iter().all(Option::is_some));
        assert_eq!(events.len(), HOLE_COUNT);

        game.tick(TimerKind::Hide, &mut GameCtx {
            rng: &mut rng,
            events: &mut events,
        });
        assert!(game.holes().iter().all(Option::is_none));
    }
}
