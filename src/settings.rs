//! Game settings and preferences
//!
//! Persisted in LocalStorage on the web. Every field has a serde default, so
//! settings saved by an older build still load.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::effects::EffectsConfig;
use crate::sim::ScoringPolicy;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 20,
            QualityPreset::Medium => DEFAULT_MAX_PARTICLES,
            QualityPreset::High => 100,
        }
    }

    /// Ball trail length in points
    pub fn trail_length(&self) -> usize {
        match self {
            QualityPreset::Low => 8,
            QualityPreset::Medium => DEFAULT_TRAIL_LENGTH,
            QualityPreset::High => 32,
        }
    }

    /// Number of drifting clouds
    pub fn cloud_count(&self) -> usize {
        match self {
            QualityPreset::Low => 0,
            QualityPreset::Medium => DEFAULT_CLOUD_COUNT,
            QualityPreset::High => 8,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Dust puffs and collision bursts
    pub particles: bool,
    /// Ball trail
    pub trails: bool,

    // === Gameplay ===
    pub scoring: ScoringPolicy,
    /// Speed control value (ball units per tick)
    pub speed: i32,
    /// Added to a jumping character's vertical velocity every tick
    pub gravity: f32,
    /// Initial vertical velocity of a jump (negative is up)
    pub jump_force: f32,

    // === Audio ===
    /// Binaural ambience while running
    pub hemisync: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            particles: true,
            trails: true,

            scoring: ScoringPolicy::default(),
            speed: DEFAULT_SPEED_SETTING,
            gravity: DEFAULT_GRAVITY,
            jump_force: DEFAULT_JUMP_FORCE,

            hemisync: true,
            master_volume: 0.8,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset (applies preset defaults)
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Effective trail length
    pub fn trail_length(&self) -> usize {
        if !self.trails {
            0
        } else {
            self.quality.trail_length()
        }
    }

    pub fn effects_config(&self) -> EffectsConfig {
        EffectsConfig {
            max_particles: self.max_particles(),
            trail_length: self.trail_length(),
            cloud_count: self.quality.cloud_count(),
        }
    }

    /// Repair out-of-range tuning. Returns true if anything changed.
    pub fn validate(&mut self) -> bool {
        let mut changed = false;

        if !(self.gravity.is_finite() && self.gravity > 0.0) {
            log::warn!("Invalid gravity {}, using {}", self.gravity, DEFAULT_GRAVITY);
            self.gravity = DEFAULT_GRAVITY;
            changed = true;
        }
        if !(self.jump_force.is_finite() && self.jump_force < 0.0) {
            log::warn!(
                "Invalid jump force {}, using {}",
                self.jump_force,
                DEFAULT_JUMP_FORCE
            );
            self.jump_force = DEFAULT_JUMP_FORCE;
            changed = true;
        }
        if !(0.0..=1.0).contains(&self.master_volume) {
            let fixed = if self.master_volume.is_finite() {
                self.master_volume.clamp(0.0, 1.0)
            } else {
                0.8
            };
            log::warn!("Invalid volume {}, using {}", self.master_volume, fixed);
            self.master_volume = fixed;
            changed = true;
        }

        changed
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "hemi_bounce_settings";

    /// Parse stored JSON, falling back to defaults on any problem
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Settings>(json) {
            Ok(mut settings) => {
                settings.validate();
                settings
            }
            Err(e) => {
                log::warn!("Ignoring unreadable settings: {e}");
                Self::default()
            }
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(json) = storage.and_then(|s| s.get_item(Self::STORAGE_KEY).ok().flatten()) {
            log::info!("Loaded settings from LocalStorage");
            return Self::from_json(&json);
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
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
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
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_scale_effects() {
        let low = Settings::from_preset(QualityPreset::Low).effects_config();
        let high = Settings::from_preset(QualityPreset::High).effects_config();
        assert_eq!(
            low,
            EffectsConfig {
                max_particles: 20,
                trail_length: 8,
                cloud_count: 0
            }
        );
        assert_eq!(high.max_particles, 100);
        assert_eq!(Settings::default().effects_config(), EffectsConfig::default());
    }

    #[test]
    fn test_toggles_zero_caps() {
        let settings = Settings {
            particles: false,
            trails: false,
            ..Settings::default()
        };
        assert_eq!(settings.max_particles(), 0);
        assert_eq!(settings.trail_length(), 0);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{"quality":"High","scoring":"Rally"}"#);
        assert_eq!(settings.quality, QualityPreset::High);
        assert_eq!(settings.scoring, ScoringPolicy::Rally);
        assert_eq!(settings.speed, DEFAULT_SPEED_SETTING);
        assert!(settings.hemisync);
    }

    #[test]
    fn test_garbage_json_gives_defaults() {
        assert_eq!(Settings::from_json("not json"), Settings::default());
    }

    #[test]
    fn test_validate_repairs_tuning() {
        let mut settings = Settings {
            gravity: -1.0,
            jump_force: 5.0,
            master_volume: 3.0,
            ..Settings::default()
        };
        assert!(settings.validate());
        assert_eq!(settings.gravity, DEFAULT_GRAVITY);
        assert_eq!(settings.jump_force, DEFAULT_JUMP_FORCE);
        assert_eq!(settings.master_volume, 1.0);
        assert!(!settings.validate());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_native_load_gives_defaults() {
        assert_eq!(Settings::load(), Settings::default());
    }

    #[test]
    fn test_quality_from_str() {
        assert_eq!(QualityPreset::from_str("MED"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::from_str("ultra"), None);
    }
}
