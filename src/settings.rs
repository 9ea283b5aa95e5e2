//! Player settings and preferences
//!
//! Persisted as JSON next to the game, separately from designer tuning.

use std::path::Path;

use serde::{Deserialize, Serialize};

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

    /// Guide dots per trajectory for this preset
    pub fn max_points(&self) -> usize {
        match self {
            QualityPreset::Low => 40,
            QualityPreset::Medium => 75,
            QualityPreset::High => 120,
        }
    }

    /// Minimum integration sub-steps per dot
    pub fn base_sub_steps(&self) -> u32 {
        match self {
            QualityPreset::Low => 2,
            QualityPreset::Medium => 3,
            QualityPreset::High => 4,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Guide detail preset
    pub quality: QualityPreset,

    // === Aim guide ===
    /// Show the dotted aim guide while aiming
    pub aim_guide: bool,
    /// Show the ghost ball where the shot first makes contact
    pub ghost_ball: bool,
    /// Normalized guide length (0.0 - 1.0)
    pub guide_length: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            aim_guide: true,
            ghost_ball: true,
            guide_length: 0.5,
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

    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;

        // Low preset drops the ghost ball
        if preset == QualityPreset::Low {
            self.ghost_ball = false;
        }
    }

    /// Effective ghost ball (nothing to show without the guide)
    pub fn effective_ghost_ball(&self) -> bool {
        self.aim_guide && self.ghost_ball
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring malformed settings {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
