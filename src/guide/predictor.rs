//! Aim guide trajectory predictor
//!
//! Recomputed late every frame while the player aims: solves the launch
//! velocity, fans it out for triple shot, predicts each flight and writes the
//! result into the per-variant dot pools and ghost balls.

use glam::Vec2;

use super::launcher::{LauncherState, PowerUpState, ShotVariant};
use super::pool::{DotPool, GhostMarker};
use crate::consts::MIN_BALL_RADIUS;
use crate::sim::{FlightParams, PhysicsQuery, Trajectory, integrate};
use crate::tuning::GuideTuning;

/// Predictor visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictorState {
    /// Nothing shown; initial state and after the aim system goes away
    Hidden,
    /// Recomputing every frame
    Active,
}

/// Collider geometry of the ball the guide predicts for
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallProbe {
    pub collider_radius: f32,
    /// World scale of the ball body
    pub scale: Vec2,
}

impl BallProbe {
    pub fn new(collider_radius: f32) -> Self {
        Self {
            collider_radius,
            scale: Vec2::ONE,
        }
    }

    /// Collider radius in world units (largest scale axis wins)
    pub fn world_radius(&self) -> f32 {
        self.collider_radius.abs() * self.scale.x.abs().max(self.scale.y.abs())
    }
}

/// Predicted paths of one recompute, indexed by variant
#[derive(Debug, Clone, Default)]
pub struct GuideFrame {
    paths: [Option<Trajectory>; 3],
}

impl GuideFrame {
    pub fn get(&self, variant: ShotVariant) -> Option<&Trajectory> {
        self.paths[variant.index()].as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.iter().all(Option::is_none)
    }

    /// Predicted variants with their paths
    pub fn iter(&self) -> impl Iterator<Item = (ShotVariant, &Trajectory)> {
        ShotVariant::ALL
            .into_iter()
            .filter_map(|v| self.get(v).map(|path| (v, path)))
    }
}

/// Owns the guide markers and keeps them in sync with the predicted flights
pub struct TrajectoryPredictor {
    tuning: GuideTuning,
    state: PredictorState,
    /// Cached on enable
    ball_radius: Option<f32>,
    pools: [DotPool; 3],
    ghosts: [GhostMarker; 3],
}

impl TrajectoryPredictor {
    pub fn new(tuning: GuideTuning) -> Self {
        let tuning = tuning.sanitized();
        let capacity = tuning.max_points;
        Self {
            tuning,
            state: PredictorState::Hidden,
            ball_radius: None,
            pools: std::array::from_fn(|_| DotPool::new(capacity)),
            ghosts: [GhostMarker::default(); 3],
        }
    }

    pub fn state(&self) -> PredictorState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == PredictorState::Active
    }

    /// Sweep radius cached by the last `enable`
    pub fn ball_radius(&self) -> Option<f32> {
        self.ball_radius
    }

    pub fn tuning(&self) -> &GuideTuning {
        &self.tuning
    }

    /// Replace the tuning; pools are reallocated (and emptied) if the dot count changed
    pub fn set_tuning(&mut self, tuning: GuideTuning) {
        let tuning = tuning.sanitized();
        if tuning.max_points != self.tuning.max_points {
            log::debug!(
                "Resizing guide pools {} -> {}",
                self.tuning.max_points,
                tuning.max_points
            );
            self.pools = std::array::from_fn(|_| DotPool::new(tuning.max_points));
            self.ghosts.iter_mut().for_each(GhostMarker::hide);
        }
        self.tuning = tuning;
    }

    pub fn pool(&self, variant: ShotVariant) -> &DotPool {
        &self.pools[variant.index()]
    }

    pub fn ghost(&self, variant: ShotVariant) -> &GhostMarker {
        &self.ghosts[variant.index()]
    }

    /// Measure the ball once and start showing the guide
    pub fn enable(&mut self, probe: &BallProbe) -> f32 {
        let radius = (probe.world_radius() + self.tuning.radius_margin).max(MIN_BALL_RADIUS);
        self.ball_radius = Some(radius);
        self.state = PredictorState::Active;
        log::debug!("Aim guide enabled (ball radius {:.3})", radius);
        radius
    }

    /// Hide every marker (shot fired, aim system disabled)
    pub fn disable(&mut self) {
        self.hide_all();
        if self.state == PredictorState::Active {
            log::debug!("Aim guide hidden");
        }
        self.state = PredictorState::Hidden;
    }

    fn hide_variant(&mut self, variant: ShotVariant) {
        self.pools[variant.index()].clear();
        self.ghosts[variant.index()].hide();
    }

    fn hide_all(&mut self) {
        for variant in ShotVariant::ALL {
            self.hide_variant(variant);
        }
    }

    /// Predict this frame's shots and update the markers
    ///
    /// Without a launcher the guide hides itself instead of predicting from
    /// stale data.
    pub fn recompute<Q: PhysicsQuery + ?Sized>(
        &mut self,
        query: &Q,
        aim: Vec2,
        launcher: Option<&LauncherState>,
        powerups: &PowerUpState,
    ) -> GuideFrame {
        let Some(launcher) = launcher else {
            self.disable();
            return GuideFrame::default();
        };
        let Some(ball_radius) = self.ball_radius else {
            // Never enabled: no ball to measure yet
            self.hide_all();
            return GuideFrame::default();
        };
        if self.state == PredictorState::Hidden {
            log::debug!("Aim guide active");
            self.state = PredictorState::Active;
        }

        let aim = launcher.clamp_aim(aim);
        let gravity = launcher.effective_gravity(self.tuning.gravity);
        let center = launcher.launch_velocity(aim, gravity, self.tuning.length_factor());

        let mut frame = GuideFrame::default();
        let predicted = powerups.variants();
        for variant in ShotVariant::ALL {
            if !predicted.contains(&variant) {
                self.hide_variant(variant);
                continue;
            }

            let i = variant.index();
            let params = FlightParams::new(
                launcher.spawn,
                launcher.variant_velocity(center, variant),
                gravity,
                ball_radius,
            )
            .with_budget(self.pools[i].capacity(), self.tuning.base_sub_steps)
            .with_frame_step(self.tuning.frame_step)
            .with_backoff(self.tuning.backoff_margin)
            .with_mask(self.tuning.mask);

            let path = integrate(query, &params);
            let used = self.pools[i].write(&path.points);
            if used > 0 && self.tuning.show_ghost {
                self.ghosts[i].place(path.terminal);
            } else {
                self.ghosts[i].hide();
            }
            frame.paths[i] = Some(path);
        }

        frame
    }
}
