//! Mini-game simulation
//!
//! All gameplay logic lives here. This module must stay platform-free:
//! - Time arrives as explicit millisecond timestamps
//! - Seeded RNG only
//! - No DOM, audio or storage access

pub mod bubble_pop;
pub mod code_typing;
pub mod color_pattern;
pub mod game;
pub mod session;
pub mod timer;
pub mod whack_a_bug;
pub mod word_scramble;

pub use game::{AnyGame, Countdown, GameCtx, GameEvent, GameKind, MiniGame, PlayerAction};
pub use session::{GameOver, GameSession, SessionState};
pub use timer::{TimerKind, Timers};
