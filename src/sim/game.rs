//! Common mini-game interface
//!
//! Every game is a small state machine driven by timer ticks and discrete
//! player actions. The session controller owns the game and decides when
//! either may reach it; games only implement their own rules.

use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bubble_pop::BubblePop;
use super::code_typing::CodeTyping;
use super::color_pattern::ColorPattern;
use super::timer::TimerKind;
use super::whack_a_bug::WhackABug;
use super::word_scramble::WordScramble;

/// Which mini-game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameKind {
    ColorPattern,
    WordScramble,
    BubblePop,
    WhackABug,
    CodeTyping,
}

impl GameKind {
    pub const ALL: [GameKind; 5] = [
        GameKind::ColorPattern,
        GameKind::WordScramble,
        GameKind::BubblePop,
        GameKind::WhackABug,
        GameKind::CodeTyping,
    ];

    /// Name shown in the leaderboard's game column
    pub fn display_name(&self) -> &'static str {
        match self {
            GameKind::ColorPattern => "Color Pattern Memory",
            GameKind::WordScramble => "Word Scramble",
            GameKind::BubblePop => "Bubble Pop",
            GameKind::WhackABug => "Whack-a-Bug",
            GameKind::CodeTyping => "Code Typing",
        }
    }

    /// Parse a short id as used in DOM data attributes
    pub fn from_id(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "color-pattern" | "memory" => Some(GameKind::ColorPattern),
            "word-scramble" | "words" => Some(GameKind::WordScramble),
            "bubble-pop" | "bubbles" => Some(GameKind::BubblePop),
            "whack-a-bug" | "whack" => Some(GameKind::WhackABug),
            "code-typing" | "typing" => Some(GameKind::CodeTyping),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            GameKind::ColorPattern => "color-pattern",
            GameKind::WordScramble => "word-scramble",
            GameKind::BubblePop => "bubble-pop",
            GameKind::WhackABug => "whack-a-bug",
            GameKind::CodeTyping => "code-typing",
        }
    }
}

/// Discrete player input
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerAction {
    /// Press a color tile
    Tile(usize),
    /// Submit a word guess
    Guess(String),
    /// Click a bubble by id
    Pop(u32),
    /// Hit a hole by index
    Whack(usize),
    /// Current contents of the typing field
    Type(String),
}

/// Feedback produced by a game (drives sound and flashes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Tile lit during sequence playback
    TileLit(usize),
    /// Tile pressed by the player
    TilePressed(usize),
    /// Points gained
    Scored(u64),
    /// Points lost
    Penalty(u64),
    /// Wrong answer without a score change
    Miss,
    /// Target appeared
    Spawned,
    /// Round finished
    GameOver,
}

/// Per-call context handed to games
pub struct GameCtx<'a> {
    pub rng: &'a mut Pcg32,
    pub events: &'a mut Vec<GameEvent>,
}

impl GameCtx<'_> {
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}

/// Rules of one mini-game
pub trait MiniGame {
    fn kind(&self) -> GameKind;

    /// Recurring timers armed on start, as `(kind, period_ms)`
    fn schedule(&self) -> &'static [(TimerKind, u64)];

    /// Reset score, budget and transient entities for a fresh round
    fn reset(&mut self, ctx: &mut GameCtx);

    /// Handle one timer tick
    fn tick(&mut self, timer: TimerKind, ctx: &mut GameCtx);

    /// Handle one player action
    fn act(&mut self, action: &PlayerAction, ctx: &mut GameCtx);

    /// Budget exhausted or terminal condition reached
    fn is_ended(&self) -> bool;

    fn score(&self) -> u64;
}

/// Round clock in whole seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
}

impl Countdown {
    pub fn new(secs: u32) -> Self {
        Self { remaining: secs }
    }

    pub fn tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn expired(&self) -> bool {
        self.remaining == 0
    }
}

/// Any of the mini-games
#[derive(Debug, Clone)]
pub enum AnyGame {
    ColorPattern(ColorPattern),
    WordScramble(WordScramble),
    BubblePop(BubblePop),
    WhackABug(WhackABug),
    CodeTyping(CodeTyping),
}

impl AnyGame {
    pub fn new(kind: GameKind) -> Self {
        match kind {
            GameKind::ColorPattern => AnyGame::ColorPattern(ColorPattern::new()),
            GameKind::WordScramble => AnyGame::WordScramble(WordScramble::new()),
            GameKind::BubblePop => AnyGame::BubblePop(BubblePop::new()),
            GameKind::WhackABug => AnyGame::WhackABug(WhackABug::new()),
            GameKind::CodeTyping => AnyGame::CodeTyping(CodeTyping::new()),
        }
    }

    fn inner(&self) -> &dyn MiniGame {
        match self {
            AnyGame::ColorPattern(g) => g,
            AnyGame::WordScramble(g) => g,
            AnyGame::BubblePop(g) => g,
            AnyGame::WhackABug(g) => g,
            AnyGame::CodeTyping(g) => g,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn MiniGame {
        match self {
            AnyGame::ColorPattern(g) => g,
            AnyGame::WordScramble(g) => g,
            AnyGame::BubblePop(g) => g,
            AnyGame::WhackABug(g) => g,
            AnyGame::CodeTyping(g) => g,
        }
    }

    /// Seconds left on the round clock, None for untimed games
    pub fn time_left(&self) -> Option<u32> {
        match self {
            AnyGame::ColorPattern(_) => None,
            AnyGame::WordScramble(g) => Some(g.time_left()),
            AnyGame::BubblePop(g) => Some(g.time_left()),
            AnyGame::WhackABug(g) => Some(g.time_left()),
            AnyGame::CodeTyping(g) => Some(g.time_left()),
        }
    }
}

impl MiniGame for AnyGame {
    fn kind(&self) -> GameKind {
        self.inner().kind()
    }

    fn schedule(&self) -> &'static [(TimerKind, u64)] {
        self.inner().schedule()
    }

    fn reset(&mut self, ctx: &mut GameCtx) {
        self.inner_mut().reset(ctx)
    }

    fn tick(&mut self, timer: TimerKind, ctx: &mut GameCtx) {
        self.inner_mut().tick(timer, ctx)
    }

    fn act(&mut self, action: &PlayerAction, ctx: &mut GameCtx) {
        self.inner_mut().act(action, ctx)
    }

    fn is_ended(&self) -> bool {
        self.inner().is_ended()
    }

    fn score(&self) -> u64 {
        self.inner().score()
    }
}
