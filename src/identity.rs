//! Player identity
//!
//! A generated display name like `SwiftPixel042`, persisted under
//! `playerName` with no expiry and reused until the player renames it.

use rand::Rng;

use crate::platform::KeyValueStore;

/// LocalStorage key for the display name
pub const PLAYER_NAME_KEY: &str = "playerName";

/// Generation attempts before falling back to a timestamp suffix
pub const MAX_NAME_ATTEMPTS: usize = 100;

const ADJECTIVES: [&str; 24] = [
    "Swift", "Clever", "Bright", "Quick", "Sharp", "Smart", "Bold", "Brave", "Calm", "Deft",
    "Epic", "Fair", "Fast", "Keen", "Wise", "Wild", "Noble", "Prime", "Proud", "Pure", "Rich",
    "Safe", "Sure", "Warm",
];

const NOUNS: [&str; 24] = [
    "Pixel", "Byte", "Code", "Data", "Link", "Node", "Port", "Query", "Stack", "Token", "Array",
    "Cache", "Frame", "Grid", "Hash", "Loop", "Queue", "Scope", "Shell", "Table", "Unit",
    "Value", "Wave", "Zone",
];

/// One candidate name: adjective, noun, three digits
fn random_name(rng: &mut impl Rng) -> String {
    let adj = ADJECTIVES[rng.random_range(0..ADJECTIVES.len())];
    let noun = NOUNS[rng.random_range(0..NOUNS.len())];
    let num: u32 = rng.random_range(0..1000);
    format!("{}{}{:03}", adj, noun, num)
}

/// Generate a name not contained in `existing`.
///
/// After [`MAX_NAME_ATTEMPTS`] collisions the last candidate gets `now_ms`
/// appended.
pub fn generate_unique_name(rng: &mut impl Rng, existing: &[String], now_ms: u64) -> String {
    let mut name = String::new();
    for _ in 0..MAX_NAME_ATTEMPTS {
        name = random_name(rng);
        if !existing.contains(&name) {
            return name;
        }
    }
    log::warn!("Name generation exhausted retries, adding timestamp");
    format!("{}{}", name, now_ms)
}

/// Return the persisted display name, generating and persisting one if
/// none exists yet.
pub fn get_or_create(
    store: &mut impl KeyValueStore,
    rng: &mut impl Rng,
    existing: &[String],
    now_ms: u64,
) -> String {
    if let Some(name) = store.get(PLAYER_NAME_KEY) {
        return name;
    }

    let name = generate_unique_name(rng, existing, now_ms);
    if let Err(e) = store.set(PLAYER_NAME_KEY, &name) {
        log::warn!("Could not persist player name: {}", e);
    }
    log::info!("Generated player name {}", name);
    name
}

/// Overwrite the persisted display name. No validation is applied.
pub fn rename(store: &mut impl KeyValueStore, new_name: &str) {
    if let Err(e) = store.set(PLAYER_NAME_KEY, new_name) {
        log::warn!("Could not persist player name: {}", e);
    }
}
