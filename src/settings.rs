//! Game settings and preferences
//!
//! Persisted in LocalStorage on the web. Settings are user-facing and may be
//! stale or hand-edited, so they are only trusted after conversion into a
//! validated [`SessionConfig`].

use serde::{Deserialize, Serialize};

use crate::consts::{AUTO_FIRE_DURATION_MS, AUTO_FIRE_INTERVAL_MS};
use crate::error::ConfigError;
use crate::sim::{Playfield, SessionConfig, Tier};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Difficulty tier ("low"/"mid"/"high"; aliases accepted)
    pub difficulty: Tier,

    // === Tuning ===
    /// Difficulty scaling cadence override (tier default when unset)
    pub scale_cadence_ms: Option<f64>,
    /// Auto-fire power-up lifetime
    pub auto_fire_duration_ms: f64,
    /// Time between automatic volleys
    pub auto_fire_interval_ms: f64,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,

    // === Focus ===
    /// Pause the game when the tab is hidden or the window loses focus
    #[serde(alias = "mute_on_blur")]
    pub pause_on_blur: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Tier::Mid,

            scale_cadence_ms: None,
            auto_fire_duration_ms: AUTO_FIRE_DURATION_MS,
            auto_fire_interval_ms: AUTO_FIRE_INTERVAL_MS,

            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.5,
            pause_on_blur: true,
        }
    }
}

impl Settings {
    /// Defaults with the given tier name
    pub fn with_difficulty(name: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            difficulty: name.parse()?,
            ..Self::default()
        })
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Validated session config for a playfield of `width` x `height`
    pub fn session_config(&self, width: f32, height: f32) -> Result<SessionConfig, ConfigError> {
        let mut config = SessionConfig::for_tier(self.difficulty, Playfield::new(width, height))?;
        if let Some(cadence) = self.scale_cadence_ms {
            config.scale_cadence_ms = cadence;
        }
        config.auto_fire_duration_ms = self.auto_fire_duration_ms;
        config.auto_fire_interval_ms = self.auto_fire_interval_ms;
        config.validate()?;
        Ok(config)
    }

    /// Effective effect gain
    pub fn sfx_gain(&self) -> f32 {
        (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
    }

    /// Effective music gain
    pub fn music_gain(&self) -> f32 {
        (self.master_volume * self.music_volume).clamp(0.0, 1.0)
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "rock_shooter_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Discarding stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            match self.to_json() {
                Ok(json) => {
                    let _ = storage.set_item(Self::STORAGE_KEY, &json);
                    log::info!("Settings saved");
                }
                Err(e) => log::warn!("Could not save settings: {}", e),
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
        log::trace!("settings not persisted ({})", Self::STORAGE_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_build_a_config() {
        let config = Settings::default().session_config(800.0, 600.0).unwrap();
        assert_eq!(config.tier, Tier::Mid);
        assert_eq!(config.scale_cadence_ms, 10_000.0);
        assert_eq!(config.auto_fire_duration_ms, 10_000.0);
        assert_eq!(config.auto_fire_interval_ms, 300.0);
    }

    #[test]
    fn test_tier_names_and_aliases() {
        assert_eq!(Settings::with_difficulty("hard").unwrap().difficulty, Tier::High);
        assert_eq!(Settings::with_difficulty("Easy").unwrap().difficulty, Tier::Low);
        assert!(matches!(
            Settings::with_difficulty("nightmare"),
            Err(ConfigError::UnknownTier(_))
        ));
    }

    #[test]
    fn test_json_partial_fills_defaults() {
        let settings = Settings::from_json(r#"{"difficulty":"high"}"#).unwrap();
        assert_eq!(settings.difficulty, Tier::High);
        assert_eq!(settings.auto_fire_interval_ms, 300.0);
        assert!(settings.pause_on_blur);
    }

    #[test]
    fn test_json_accepts_old_blur_key() {
        let settings = Settings::from_json(r#"{"mute_on_blur":false}"#).unwrap();
        assert!(!settings.pause_on_blur);
    }

    #[test]
    fn test_json_unknown_tier_fails() {
        assert!(Settings::from_json(r#"{"difficulty":"insane"}"#).is_err());
        assert!(matches!(
            Settings::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_json_keeps_values() {
        let settings = Settings {
            difficulty: Tier::Low,
            scale_cadence_ms: Some(2_000.0),
            ..Settings::default()
        };
        let back = Settings::from_json(&settings.to_json().unwrap()).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn test_cadence_override_and_validation() {
        let mut settings = Settings {
            scale_cadence_ms: Some(2_500.0),
            ..Settings::default()
        };
        assert_eq!(
            settings.session_config(800.0, 600.0).unwrap().scale_cadence_ms,
            2_500.0
        );

        settings.auto_fire_interval_ms = 0.0;
        assert!(matches!(
            settings.session_config(800.0, 600.0),
            Err(ConfigError::InvalidDuration {
                name: "auto_fire_interval_ms",
                ..
            })
        ));
    }

    #[test]
    fn test_bad_playfield_rejected() {
        assert!(matches!(
            Settings::default().session_config(0.0, 600.0),
            Err(ConfigError::InvalidPlayfield { .. })
        ));
    }

    #[test]
    fn test_gains_are_clamped() {
        let settings = Settings {
            master_volume: 2.0,
            sfx_volume: 1.0,
            music_volume: 0.25,
            ..Settings::default()
        };
        assert_eq!(settings.sfx_gain(), 1.0);
        assert_eq!(settings.music_gain(), 0.5);
    }
}
