//! Data-driven aim guide balance
//!
//! Designer-facing knobs, loadable from JSON. Every field has a default so a
//! tuning file only needs the values it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::settings::Settings;
use crate::sim::LayerMask;

/// Aim guide tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuideTuning {
    /// World gravity before the launcher's gravity scale
    pub gravity: f32,
    /// Simulated seconds between two dots
    pub frame_step: f32,
    /// Minimum sub-steps per dot
    pub base_sub_steps: u32,
    /// Dots per trajectory (pool capacity)
    pub max_points: usize,
    /// Ghost ball back-off beyond the ball radius
    pub backoff_margin: f32,
    /// Inflation added to the probed ball radius for sweeps
    pub radius_margin: f32,
    /// Normalized guide length (0.0 - 1.0)
    pub guide_length: f32,
    pub min_length_factor: f32,
    pub max_length_factor: f32,
    /// Layers the guide collides with
    pub mask: LayerMask,
    /// Show ghost balls at the rest positions
    pub show_ghost: bool,
}

impl Default for GuideTuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            frame_step: FRAME_STEP,
            base_sub_steps: BASE_SUB_STEPS,
            max_points: MAX_POINTS,
            backoff_margin: BACKOFF_MARGIN,
            radius_margin: 0.0,
            guide_length: 0.5,
            min_length_factor: MIN_GUIDE_FACTOR,
            max_length_factor: MAX_GUIDE_FACTOR,
            mask: LayerMask::ALL,
            show_ghost: true,
        }
    }
}

impl GuideTuning {
    /// Parse tuning from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(|t| t.sanitized())
    }

    /// Load tuning from a JSON file, falling back to defaults
    pub fn load_or_default(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(_) => {
                log::info!("No tuning at {}, using defaults", path.display());
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded guide tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring malformed tuning {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Clamp values that would stall or break the integrator
    pub fn sanitized(mut self) -> Self {
        if !self.gravity.is_finite() {
            log::warn!("Non-finite gravity in tuning, using {}", GRAVITY);
            self.gravity = GRAVITY;
        }
        if !self.frame_step.is_finite() || self.frame_step <= 0.0 {
            log::warn!("Invalid frame_step {} in tuning, using {}", self.frame_step, FRAME_STEP);
            self.frame_step = FRAME_STEP;
        }
        self.base_sub_steps = self.base_sub_steps.max(1);
        self.max_points = self.max_points.max(1);
        if self.backoff_margin.is_nan() || self.backoff_margin < 0.0 {
            self.backoff_margin = 0.0;
        }
        if self.radius_margin.is_nan() || self.radius_margin < 0.0 {
            self.radius_margin = 0.0;
        }
        self.guide_length = crate::clamp01(self.guide_length);
        if self.min_length_factor > self.max_length_factor {
            std::mem::swap(&mut self.min_length_factor, &mut self.max_length_factor);
        }
        self
    }

    /// Fold player preferences into the tuning
    pub fn with_settings(&self, settings: &Settings) -> Self {
        Self {
            max_points: settings.quality.max_points(),
            base_sub_steps: settings.quality.base_sub_steps(),
            guide_length: crate::clamp01(settings.guide_length),
            show_ghost: settings.effective_ghost_ball(),
            ..self.clone()
        }
    }

    /// Multiplier on the launcher's aim distance for the current guide length
    pub fn length_factor(&self) -> f32 {
        crate::lerp(self.min_length_factor, self.max_length_factor, self.guide_length)
    }
}
