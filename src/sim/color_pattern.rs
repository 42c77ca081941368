//! Color Pattern Memory
//!
//! Watch a growing sequence of tiles, then repeat it. One wrong tile ends
//! the round; the score is the number of sequences completed.

use rand::Rng;

use super::game::{GameCtx, GameEvent, GameKind, MiniGame, PlayerAction};
use super::timer::TimerKind;
use crate::consts::REVEAL_MS;

pub const TILE_COUNT: usize = 4;

/// Tile tones: C4, E4, G4, C5
pub const TILE_FREQUENCIES: [f32; TILE_COUNT] = [261.63, 329.63, 392.0, 523.25];

/// Reveal ticks to wait after a completed sequence before the next playback
const PAUSE_TICKS: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Playing back the sequence; `lit` is true on the second half of a step
    Showing { step: usize, lit: bool },
    /// Waiting for the player
    Input,
    /// Short rest after a completed sequence
    Pause { ticks: u32 },
    /// Wrong tile pressed
    Over,
}

#[derive(Debug, Clone)]
pub struct ColorPattern {
    sequence: Vec<usize>,
    entered: usize,
    phase: Phase,
}

impl Default for ColorPattern {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorPattern {
    pub fn new() -> Self {
        Self {
            sequence: Vec::new(),
            entered: 0,
            phase: Phase::Input,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current sequence length
    pub fn level(&self) -> usize {
        self.sequence.len()
    }

    pub fn sequence(&self) -> &[usize] {
        &self.sequence
    }

    /// Tiles of the current sequence already entered correctly
    pub fn entered(&self) -> usize {
        self.entered
    }

    /// Tile currently highlighted by playback
    pub fn lit_tile(&self) -> Option<usize> {
        match self.phase {
            Phase::Showing { step, lit: true } => self.sequence.get(step).copied(),
            _ => None,
        }
    }

    pub fn accepts_input(&self) -> bool {
        self.phase == Phase::Input
    }

    fn extend(&mut self, ctx: &mut GameCtx) {
        self.sequence.push(ctx.rng.random_range(0..TILE_COUNT));
        self.entered = 0;
        self.phase = Phase::Showing {
            step: 0,
            lit: false,
        };
    }
}

impl MiniGame for ColorPattern {
    fn kind(&self) -> GameKind {
        GameKind::ColorPattern
    }

    fn schedule(&self) -> &'static [(TimerKind, u64)] {
        &[(TimerKind::Reveal, REVEAL_MS)]
    }

    fn reset(&mut self, ctx: &mut GameCtx) {
        self.sequence.clear();
        self.extend(ctx);
    }

    fn tick(&mut self, timer: TimerKind, ctx: &mut GameCtx) {
        if timer != TimerKind::Reveal {
            return;
        }
        match self.phase {
            Phase::Showing { step, lit: false } => {
                if let Some(&tile) = self.sequence.get(step) {
                    ctx.emit(GameEvent::TileLit(tile));
                }
                self.phase = Phase::Showing { step, lit: true };
            }
            Phase::Showing { step, lit: true } => {
                self.phase = if step + 1 >= self.sequence.len() {
                    Phase::Input
                } else {
                    Phase::Showing {
                        step: step + 1,
                        lit: false,
                    }
                };
            }
            Phase::Pause { ticks } if ticks <= 1 => self.extend(ctx),
            Phase::Pause { ticks } => self.phase = Phase::Pause { ticks: ticks - 1 },
            Phase::Input | Phase::Over => {}
        }
    }

    fn act(&mut self, action: &PlayerAction, ctx: &mut GameCtx) {
        let PlayerAction::Tile(tile) = *action else {
            return;
        };
        if !self.accepts_input() || tile >= TILE_COUNT {
            return;
        }

        ctx.emit(GameEvent::TilePressed(tile));
        if self.sequence.get(self.entered) != Some(&tile) {
            self.phase = Phase::Over;
            return;
        }

        self.entered += 1;
        if self.entered == self.sequence.len() {
            self.entered = 0;
            self.phase = Phase::Pause { ticks: PAUSE_TICKS };
            ctx.emit(GameEvent::Scored(1));
        }
    }

    fn is_ended(&self) -> bool {
        self.phase == Phase::Over
    }

    /// Completed sequences: one less than the current length
    fn score(&self) -> u64 {
        self.sequence.len().saturating_sub(1) as u64
    }
}
