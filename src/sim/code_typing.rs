//! Code Typing: retype short code snippets exactly

use rand::Rng;

use super::game::{Countdown, GameCtx, GameEvent, GameKind, MiniGame, PlayerAction};
use super::timer::TimerKind;
use crate::consts::{COUNTDOWN_MS, ROUND_SECS};

pub const SNIPPETS: [&str; 5] = [
    r#"console.log("Hello World!");"#,
    r#"function solve() { return "bugs"; }"#,
    "const future = await getSuccess();",
    "while(coding) { improve++; }",
    r#"git commit -m "Fixed everything""#,
];

#[derive(Debug, Clone)]
pub struct CodeTyping {
    snippet: usize,
    typed: String,
    score: u64,
    clock: Countdown,
}

impl Default for CodeTyping {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeTyping {
    pub fn new() -> Self {
        Self {
            snippet: 0,
            typed: String::new(),
            score: 0,
            clock: Countdown::new(ROUND_SECS),
        }
    }

    pub fn snippet(&self) -> &'static str {
        SNIPPETS[self.snippet]
    }

    pub fn typed(&self) -> &str {
        &self.typed
    }

    /// Length of the correctly typed prefix
    pub fn matched_len(&self) -> usize {
        self.typed
            .chars()
            .zip(self.snippet().chars())
            .take_while(|(a, b)| a == b)
            .count()
    }

    pub fn time_left(&self) -> u32 {
        self.clock.remaining()
    }
}

impl MiniGame for CodeTyping {
    fn kind(&self) -> GameKind {
        GameKind::CodeTyping
    }

    fn schedule(&self) -> &'static [(TimerKind, u64)] {
        &[(TimerKind::Countdown, COUNTDOWN_MS)]
    }

    fn reset(&mut self, ctx: &mut GameCtx) {
        self.score = 0;
        self.typed.clear();
        self.clock = Countdown::new(ROUND_SECS);
        self.snippet = ctx.rng.random_range(0..SNIPPETS.len());
    }

    fn tick(&mut self, timer: TimerKind, _ctx: &mut GameCtx) {
        if timer == TimerKind::Countdown {
            self.clock.tick();
        }
    }

    fn act(&mut self, action: &PlayerAction, ctx: &mut GameCtx) {
        let PlayerAction::Type(text) = action else {
            return;
        };
        if text == self.snippet() {
            self.score += 1;
            self.typed.clear();
            self.snippet = ctx.rng.random_range(0..SNIPPETS.len());
            ctx.emit(GameEvent::Scored(1));
        } else {
            self.typed.clone_from(text);
        }
    }

    fn is_ended(&self) -> bool {
        self.clock.expired()
    }

    fn score(&self) -> u64 {
        self.score
    }
}
