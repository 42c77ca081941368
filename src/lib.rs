//! Folio Arcade - mini-games and local leaderboard for a portfolio site
//!
//! Core modules:
//! - `sim`: Game session controller, timers and mini-game rules
//! - `leaderboard`: Ranked, capped score list
//! - `identity`: Generated player display name
//! - `scoreboard`: Identity + leaderboard scoped to the current visit
//! - `arcade`: Ties the active game to the scoreboard
//! - `platform`: Browser/native storage and clock

pub mod arcade;
#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod error;
pub mod identity;
pub mod leaderboard;
pub mod platform;
pub mod scoreboard;
pub mod settings;
pub mod sim;

pub use arcade::Arcade;
pub use error::StorageError;
pub use leaderboard::{Leaderboard, LeaderboardEntry};
pub use scoreboard::Scoreboard;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Round length for timed games (seconds)
    pub const ROUND_SECS: u32 = 30;
    /// Round clock resolution
    pub const COUNTDOWN_MS: u64 = 1000;
    /// Continuous motion step (~60 Hz)
    pub const FRAME_MS: u64 = 16;
    /// Sequence playback half-step (lit, then pause)
    pub const REVEAL_MS: u64 = 500;

    /// Maximum timer ticks handled per advance before dropping the backlog
    /// (about four seconds of frame ticks)
    pub const MAX_TICKS_PER_ADVANCE: u32 = 240;

    /// Bubble field dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 500.0;
}
