//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (wall-clock milliseconds)
//! - Storage (LocalStorage on web, in-memory elsewhere)

pub mod storage;
pub mod time;

pub use storage::{KeyValueStore, MemoryStore};
pub use time::{Clock, ManualClock, SystemClock};

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStore;
