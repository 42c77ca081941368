//! Word Scramble: unscramble as many words as possible before time runs out

use rand::Rng;
use rand::seq::SliceRandom;

use super::game::{Countdown, GameCtx, GameEvent, GameKind, MiniGame, PlayerAction};
use super::timer::TimerKind;
use crate::consts::{COUNTDOWN_MS, ROUND_SECS};

/// (word, hint)
pub const WORDS: [(&str, &str); 10] = [
    ("REACT", "Popular JavaScript library"),
    ("CODING", "Writing computer programs"),
    ("WEBSITE", "Collection of web pages"),
    ("DEVELOPER", "Person who creates software"),
    ("DESIGN", "Plan or create something"),
    ("CREATIVE", "Original and imaginative"),
    ("DIGITAL", "Related to computers"),
    ("INTERNET", "Global computer network"),
    ("SOFTWARE", "Computer programs"),
    ("MOBILE", "Portable device"),
];

#[derive(Debug, Clone)]
pub struct WordScramble {
    word_index: usize,
    scrambled: String,
    score: u64,
    clock: Countdown,
}

impl Default for WordScramble {
    fn default() -> Self {
        Self::new()
    }
}

impl WordScramble {
    pub fn new() -> Self {
        Self {
            word_index: 0,
            scrambled: String::new(),
            score: 0,
            clock: Countdown::new(ROUND_SECS),
        }
    }

    pub fn scrambled(&self) -> &str {
        &self.scrambled
    }

    pub fn hint(&self) -> &'static str {
        WORDS[self.word_index].1
    }

    pub fn time_left(&self) -> u32 {
        self.clock.remaining()
    }

    fn word(&self) -> &'static str {
        WORDS[self.word_index].0
    }

    /// Pick a word and shuffle it until it differs from the word
    fn next_word(&mut self, rng: &mut impl Rng) {
        self.word_index = rng.random_range(0..WORDS.len());
        let word = self.word();
        let mut letters: Vec<char> = word.chars().collect();
        loop {
            letters.shuffle(rng);
            let candidate: String = letters.iter().collect();
            if candidate != word {
                self.scrambled = candidate;
                break;
            }
        }
    }
}

impl MiniGame for WordScramble {
    fn kind(&self) -> GameKind {
        GameKind::WordScramble
    }

    fn schedule(&self) -> &'static [(TimerKind, u64)] {
        &[(TimerKind::Countdown, COUNTDOWN_MS)]
    }

    fn reset(&mut self, ctx: &mut GameCtx) {
        self.score = 0;
        self.clock = Countdown::new(ROUND_SECS);
        self.next_word(ctx.rng);
    }

    fn tick(&mut self, timer: TimerKind, _ctx: &mut GameCtx) {
        if timer == TimerKind::Countdown {
            self.clock.tick();
        }
    }

    fn act(&mut self, action: &PlayerAction, ctx: &mut GameCtx) {
        let PlayerAction::Guess(guess) = action else {
            return;
        };
        if guess.to_uppercase() == self.word() {
            self.score += 1;
            ctx.emit(GameEvent::Scored(1));
            self.next_word(ctx.rng);
        } else {
            ctx.emit(GameEvent::Miss);
        }
    }

    fn is_ended(&self) -> bool {
        self.clock.expired()
    }

    fn score(&self) -> u64 {
        self.score
    }
}
