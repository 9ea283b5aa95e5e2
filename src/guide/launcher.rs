//! Launcher and power-up state snapshots
//!
//! The predictor never reaches into game singletons; the game hands it these
//! snapshots every frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::rotate_deg;

/// Smallest time-to-peak accepted by the launch solve
const MIN_TIME_TO_PEAK: f32 = 1e-3;

/// One of the simultaneously predicted shots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShotVariant {
    Center,
    /// Rotated counter-clockwise by the triple-shot spread
    Left,
    /// Rotated clockwise by the triple-shot spread
    Right,
}

impl ShotVariant {
    pub const ALL: [ShotVariant; 3] = [ShotVariant::Center, ShotVariant::Left, ShotVariant::Right];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            ShotVariant::Center => 0,
            ShotVariant::Left => 1,
            ShotVariant::Right => 2,
        }
    }

    /// Sign applied to the spread angle
    fn spread_sign(self) -> f32 {
        match self {
            ShotVariant::Center => 0.0,
            ShotVariant::Left => 1.0,
            ShotVariant::Right => -1.0,
        }
    }
}

/// Launcher snapshot for the current frame
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherState {
    /// Rotation pivot of the launcher (aim is measured from here)
    pub pivot: Vec2,
    /// Where the ball leaves the launcher
    pub spawn: Vec2,
    /// Half of the legal firing arc, measured from straight down
    pub max_aim_angle_deg: f32,
    /// Time for the launched ball to reach its aim target
    pub time_to_peak: f32,
    pub base_aim_distance: f32,
    /// Gravity multiplier of the ball body
    pub gravity_scale: f32,
    pub triple_spread_deg: f32,
    pub triple_speed_scale: f32,
    pub is_first_shot: bool,
    /// The very first shot of a game flies without gravity
    pub first_shot_linear: bool,
}

impl Default for LauncherState {
    fn default() -> Self {
        Self {
            pivot: Vec2::new(0.0, 4.5),
            spawn: Vec2::new(0.0, 4.0),
            max_aim_angle_deg: MAX_AIM_ANGLE_DEG,
            time_to_peak: TIME_TO_PEAK,
            base_aim_distance: BASE_AIM_DISTANCE,
            gravity_scale: 1.0,
            triple_spread_deg: TRIPLE_SPREAD_DEG,
            triple_speed_scale: TRIPLE_SPEED_SCALE,
            is_first_shot: false,
            first_shot_linear: false,
        }
    }
}

impl LauncherState {
    /// Constrain a raw aim direction to the firing arc
    ///
    /// Returns a unit vector. Zero or non-finite input aims straight down.
    pub fn clamp_aim(&self, raw: Vec2) -> Vec2 {
        let down = Vec2::NEG_Y;
        let Some(dir) = raw.try_normalize() else {
            return down;
        };

        let angle = down.perp_dot(dir).atan2(down.dot(dir));
        let limit = self.max_aim_angle_deg.abs().min(180.0).to_radians();
        Vec2::from_angle(angle.clamp(-limit, limit)).rotate(down)
    }

    /// Aim direction toward a world-space pointer position
    pub fn aim_at(&self, pointer: Vec2) -> Vec2 {
        self.clamp_aim(pointer - self.pivot)
    }

    /// Gravity the ball will actually feel on the next shot
    pub fn effective_gravity(&self, world_gravity: f32) -> f32 {
        if self.is_first_shot && self.first_shot_linear {
            0.0
        } else {
            world_gravity * self.gravity_scale
        }
    }

    /// Initial velocity of the center shot
    pub fn launch_velocity(&self, aim: Vec2, gravity: f32, length_factor: f32) -> Vec2 {
        let target = self.spawn + aim * (self.base_aim_distance * length_factor);
        solve_launch_velocity(self.spawn, target, gravity, self.time_to_peak)
    }

    /// Initial velocity of a variant derived from the center velocity
    pub fn variant_velocity(&self, center: Vec2, variant: ShotVariant) -> Vec2 {
        match variant {
            ShotVariant::Center => center,
            _ => rotate_deg(center, variant.spread_sign() * self.triple_spread_deg) * self.triple_speed_scale,
        }
    }
}

/// Velocity that carries a ball from `spawn` to `target` in `time_to_peak`
/// under vertical acceleration `gravity`
pub fn solve_launch_velocity(spawn: Vec2, target: Vec2, gravity: f32, time_to_peak: f32) -> Vec2 {
    let t = if time_to_peak.is_finite() {
        time_to_peak.max(MIN_TIME_TO_PEAK)
    } else {
        TIME_TO_PEAK
    };
    let d = target - spawn;
    Vec2::new(d.x / t, d.y / t - 0.5 * gravity * t)
}

/// Power-up snapshot for the next shot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUpState {
    pub triple_shot: bool,
    /// Fireball shots never split, even with triple shot queued
    pub fireball: bool,
}

impl PowerUpState {
    /// Whether the guide predicts the Left/Right variants
    pub fn fans_out(&self) -> bool {
        self.triple_shot && !self.fireball
    }

    /// Variants predicted for this state
    pub fn variants(&self) -> &'static [ShotVariant] {
        if self.fans_out() {
            &ShotVariant::ALL
        } else {
            &ShotVariant::ALL[..1]
        }
    }
}
