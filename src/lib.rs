//! Peg Aim - aim-guide prediction for a peg-bounce arcade game
//!
//! Core modules:
//! - `sim`: Deterministic physics (queries, reference world, projectile flight)
//! - `guide`: Trajectory predictor, marker pools and launcher state
//! - `settings`: Player preferences
//! - `tuning`: Data-driven guide balance

pub mod guide;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use guide::{GuideFrame, PredictorState, ShotVariant, TrajectoryPredictor};
pub use settings::{QualityPreset, Settings};
pub use tuning::GuideTuning;

use glam::Vec2;

/// Guide configuration constants
pub mod consts {
    /// World gravity (units/s², negative is down)
    pub const GRAVITY: f32 = -9.81;
    /// Simulated time covered by one visual point (matches the fixed physics step)
    pub const FRAME_STEP: f32 = 0.02;
    /// Minimum sub-steps per visual point
    pub const BASE_SUB_STEPS: u32 = 3;
    /// Upper bound on adaptive sub-steps per visual point
    pub const MAX_ADAPTIVE_SUB_STEPS: u32 = 64;
    /// Dots per trajectory variant
    pub const MAX_POINTS: usize = 75;

    /// Extra distance the ghost ball backs off from a contact
    pub const BACKOFF_MARGIN: f32 = 0.01;
    /// Smallest ball radius the integrator will simulate
    pub const MIN_BALL_RADIUS: f32 = 0.01;
    /// Smallest per-substep displacement target
    pub const MIN_TARGET_SEGMENT: f32 = 0.02;
    /// Segments shorter than this have no usable direction
    pub const MIN_SEGMENT_LENGTH: f32 = 1e-6;

    /// Launcher defaults
    pub const TIME_TO_PEAK: f32 = 0.5;
    pub const BASE_AIM_DISTANCE: f32 = 4.0;
    pub const MAX_AIM_ANGLE_DEG: f32 = 80.0;
    pub const TRIPLE_SPREAD_DEG: f32 = 10.0;
    pub const TRIPLE_SPEED_SCALE: f32 = 1.0;

    /// Guide length factor range (normalized guide length 0 -> min, 1 -> max)
    pub const MIN_GUIDE_FACTOR: f32 = 0.5;
    pub const MAX_GUIDE_FACTOR: f32 = 1.5;
}

/// Rotate a vector counter-clockwise by `degrees`
#[inline]
pub fn rotate_deg(v: Vec2, degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians()).rotate(v)
}

/// Clamp to [0, 1]; NaN maps to 0
#[inline]
pub fn clamp01(t: f32) -> f32 {
    if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) }
}

/// Linear interpolation with a clamped parameter
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * clamp01(t)
}
