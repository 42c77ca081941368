//! Arcade settings and preferences
//!
//! Persisted separately from scores in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::platform::KeyValueStore;
use crate::platform::storage::{load_json, save_json};
use crate::sim::GameKind;

/// Arcade settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Play tile tones and effects
    pub sound: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Mute when the tab is hidden
    pub mute_on_blur: bool,

    // === Accessibility ===
    /// Reduced motion (skip flashes and pop animations)
    pub reduced_motion: bool,

    // === Games ===
    /// Game to mount on load; random when unset
    pub preferred_game: Option<GameKind>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound: true,
            master_volume: 0.8,
            mute_on_blur: true,
            reduced_motion: false,
            preferred_game: None,
        }
    }
}

impl Settings {
    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "arcadeSettings";

    /// Volume actually applied to audio (0 when sound is off)
    pub fn effective_volume(&self) -> f32 {
        if self.sound {
            self.master_volume.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Load settings, defaults if absent or unparseable
    pub fn load(store: &impl KeyValueStore) -> Self {
        match load_json::<Settings>(store, Self::STORAGE_KEY) {
            Some(mut settings) => {
                settings.set_master_volume(settings.master_volume);
                log::info!("Loaded settings from LocalStorage");
                settings
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings (best effort)
    pub fn save(&self, store: &mut impl KeyValueStore) {
        match save_json(store, Self::STORAGE_KEY, self) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Settings not saved: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStore;

    #[test]
    fn test_missing_fields_take_defaults() {
        let store = MemoryStore::new().with_value(Settings::STORAGE_KEY, r#"{"sound":false}"#);
        let settings = Settings::load(&store);
        assert!(!settings.sound);
        assert_eq!(settings.master_volume, 0.8);
        assert_eq!(settings.preferred_game, None);
    }

    #[test]
    fn test_volume_clamped_on_load() {
        let store =
            MemoryStore::new().with_value(Settings::STORAGE_KEY, r#"{"master_volume":4.0}"#);
        assert_eq!(Settings::load(&store).master_volume, 1.0);
    }

    #[test]
    fn test_effective_volume_respects_sound_toggle() {
        let mut settings = Settings::default();
        assert_eq!(settings.effective_volume(), 0.8);
        settings.sound = false;
        assert_eq!(settings.effective_volume(), 0.0);
    }

    #[test]
    fn test_save_and_load_preferred_game() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            preferred_game: Some(GameKind::BubblePop),
            ..Settings::default()
        };
        settings.save(&mut store);
        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn test_garbage_falls_back_to_default() {
        let store = MemoryStore::new().with_value(Settings::STORAGE_KEY, "[]");
        assert_eq!(Settings::load(&store), Settings::default());
    }
}
