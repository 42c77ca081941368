//! Bubble Pop: click rising bubbles; smaller bubbles are worth more

use glam::Vec2;
use rand::Rng;

use super::game::{Countdown, GameCtx, GameEvent, GameKind, MiniGame, PlayerAction};
use super::timer::TimerKind;
use crate::consts::{COUNTDOWN_MS, FIELD_HEIGHT, FIELD_WIDTH, FRAME_MS, ROUND_SECS};

/// Bubble diameter range
pub const MIN_BUBBLE_SIZE: f32 = 40.0;
pub const MAX_BUBBLE_SIZE: f32 = 60.0;

/// Upward travel per frame
pub const RISE_PER_FRAME: f32 = 2.0;

/// Chance of a new bubble each frame
pub const SPAWN_CHANCE: f64 = 0.1;

/// Horizontal padding kept free on the right edge
const FIELD_PADDING: f32 = 40.0;

/// A rising bubble
#[derive(Debug, Clone, PartialEq)]
pub struct Bubble {
    pub id: u32,
    /// Top-left corner, y grows downward
    pub pos: Vec2,
    pub size: f32,
    pub points: u64,
}

impl Bubble {
    /// Points for a bubble of `size`: 1 for the largest, up to 3 for the smallest
    pub fn points_for(size: f32) -> u64 {
        ((MAX_BUBBLE_SIZE - size) / 10.0).floor().max(0.0) as u64 + 1
    }

    fn off_screen(&self) -> bool {
        self.pos.y + self.size <= 0.0
    }
}

#[derive(Debug, Clone)]
pub struct BubblePop {
    bubbles: Vec<Bubble>,
    score: u64,
    clock: Countdown,
    next_id: u32,
}

impl Default for BubblePop {
    fn default() -> Self {
        Self::new()
    }
}

impl BubblePop {
    pub fn new() -> Self {
        Self {
            bubbles: Vec::new(),
            score: 0,
            clock: Countdown::new(ROUND_SECS),
            next_id: 1,
        }
    }

    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    pub fn time_left(&self) -> u32 {
        self.clock.remaining()
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn spawn(&mut self, rng: &mut impl Rng) -> u32 {
        let size = rng.random_range(MIN_BUBBLE_SIZE..MAX_BUBBLE_SIZE);
        let max_x = (FIELD_WIDTH - size - FIELD_PADDING).max(1.0);
        let id = self.next_entity_id();
        self.bubbles.push(Bubble {
            id,
            pos: Vec2::new(rng.random_range(0.0..max_x), FIELD_HEIGHT),
            size,
            points: Bubble::points_for(size),
        });
        id
    }

    fn step(&mut self, ctx: &mut GameCtx) {
        for bubble in &mut self.bubbles {
            bubble.pos.y -= RISE_PER_FRAME;
        }
        self.bubbles.retain(|b| !b.off_screen());

        if ctx.rng.random_bool(SPAWN_CHANCE) {
            self.spawn(ctx.rng);
            ctx.emit(GameEvent::Spawned);
        }
    }
}

impl MiniGame for BubblePop {
    fn kind(&self) -> GameKind {
        GameKind::BubblePop
    }

    fn schedule(&self) -> &'static [(TimerKind, u64)] {
        &[
            (TimerKind::Frame, FRAME_MS),
            (TimerKind::Countdown, COUNTDOWN_MS),
        ]
    }

    fn reset(&mut self, _ctx: &mut GameCtx) {
        self.bubbles.clear();
        self.score = 0;
        self.clock = Countdown::new(ROUND_SECS);
    }

    fn tick(&mut self, timer: TimerKind, ctx: &mut GameCtx) {
        match timer {
            TimerKind::Frame => self.step(ctx),
            TimerKind::Countdown => self.clock.tick(),
            _ => {}
        }
    }

    fn act(&mut self, action: &PlayerAction, ctx: &mut GameCtx) {
        let PlayerAction::Pop(id) = *action else {
            return;
        };
        if let Some(i) = self.bubbles.iter().position(|b| b.id == id) {
            let bubble = self.bubbles.remove(i);
            self.score += bubble.points;
            ctx.emit(GameEvent::Scored(bubble.points));
        }
    }

    fn is_ended(&self) -> bool {
        self.clock.expired()
    }

    fn score(&self) -> u64 {
        self.score
    }
}
