//! Player settings and preferences
//!
//! Persisted separately from the high score in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::platform::{KeyValueStore, StorageError};

/// Player settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Microphone ===
    /// Multiplier applied to the raw mic level (1.0 = as measured)
    pub mic_sensitivity: f32,
    /// Exponential smoothing of the mic level (0 = raw, closer to 1 = slower)
    pub mic_smoothing: f32,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Mute all sound effects
    pub muted: bool,

    // === HUD ===
    /// Show mic level and speed multiplier readouts
    pub show_debug: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mic_sensitivity: 1.0,
            mic_smoothing: 0.0,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            show_debug: true,
        }
    }
}

impl Settings {
    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "mic_flap_settings";

    /// Clamp values into their valid ranges
    pub fn sanitized(mut self) -> Self {
        self.mic_sensitivity = if self.mic_sensitivity.is_finite() {
            self.mic_sensitivity.clamp(0.1, 10.0)
        } else {
            1.0
        };
        self.mic_smoothing = if self.mic_smoothing.is_finite() {
            self.mic_smoothing.clamp(0.0, 0.95)
        } else {
            0.0
        };
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self
    }

    /// Effective sound effect volume (respects mute)
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Apply sensitivity to a raw mic level, keeping it in [0, 1]
    pub fn adjust_level(&self, raw: f32) -> f32 {
        (raw * self.mic_sensitivity).clamp(0.0, 1.0)
    }

    /// Load settings from storage (falls back to defaults)
    pub fn load(store: &impl KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Settings>(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    settings.sanitized()
                }
                Err(e) => {
                    log::warn!("Ignoring malformed settings: {}", e);
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not read settings: {}", e);
                Self::default()
            }
        }
    }

    /// Save settings to storage
    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<(), StorageError> {
        let json = serde_json::to_string(self).map_err(|source| StorageError::Encode {
            key: Self::STORAGE_KEY.to_string(),
            source,
        })?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStore;

    #[test]
    fn test_roundtrip() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            mic_sensitivity: 2.5,
            muted: true,
            ..Settings::default()
        };
        settings.save(&mut store).unwrap();
        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn test_partial_and_out_of_range_values() {
        let mut store = MemoryStore::new();
        store
            .set(Settings::STORAGE_KEY, r#"{ "master_volume": 3.0, "mic_smoothing": -1 }"#)
            .unwrap();
        let settings = Settings::load(&store);
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.mic_smoothing, 0.0);
        assert_eq!(settings.sfx_volume, 1.0);
    }

    #[test]
    fn test_malformed_falls_back() {
        let mut store = MemoryStore::new();
        store.set(Settings::STORAGE_KEY, "{{{").unwrap();
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_level_adjustment() {
        let settings = Settings {
            mic_sensitivity: 2.0,
            ..Settings::default()
        };
        assert_eq!(settings.adjust_level(0.1), 0.2);
        assert_eq!(settings.adjust_level(0.8), 1.0);
        assert_eq!(settings.adjust_level(-0.5), 0.0);
    }

    #[test]
    fn test_mute() {
        let mut settings = Settings::default();
        assert!(settings.effective_volume() > 0.0);
        settings.muted = true;
        assert_eq!(settings.effective_volume(), 0.0);
    }
}
