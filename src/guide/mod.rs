//! Aim guide
//!
//! Turns the launcher's aim into dotted predicted paths and ghost balls for up
//! to three simultaneous shots (center plus the triple-shot side shots).

pub mod launcher;
pub mod pool;
pub mod predictor;

pub use launcher::{LauncherState, PowerUpState, ShotVariant, solve_launch_velocity};
pub use pool::{Dot, DotPool, GhostMarker};
pub use predictor::{BallProbe, GuideFrame, PredictorState, TrajectoryPredictor};
