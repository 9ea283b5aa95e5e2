//! Projectile flight prediction
//!
//! Advances a ball under constant gravity with sub-stepped semi-implicit Euler,
//! sweeping the ball against the query backend every sub-step. One visual point
//! is produced per `frame_step` of simulated time; flight ends at the first
//! contact or when the point budget runs out.

use glam::Vec2;

use super::query::{ColliderHandle, LayerMask, PhysicsQuery};
use crate::consts::*;

/// Inputs for one predicted flight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightParams {
    pub origin: Vec2,
    pub velocity: Vec2,
    /// Vertical acceleration (negative is down), gravity scale already applied
    pub gravity: f32,
    pub ball_radius: f32,
    /// Maximum number of points produced, terminal point included
    pub max_points: usize,
    /// Minimum sub-steps per point
    pub base_sub_steps: u32,
    /// Simulated seconds between two points
    pub frame_step: f32,
    /// Extra back-off beyond the ball radius when placing the rest position
    pub backoff_margin: f32,
    pub mask: LayerMask,
}

impl FlightParams {
    pub fn new(origin: Vec2, velocity: Vec2, gravity: f32, ball_radius: f32) -> Self {
        Self {
            origin,
            velocity,
            gravity,
            ball_radius,
            max_points: MAX_POINTS,
            base_sub_steps: BASE_SUB_STEPS,
            frame_step: FRAME_STEP,
            backoff_margin: BACKOFF_MARGIN,
            mask: LayerMask::ALL,
        }
    }

    pub fn with_budget(mut self, max_points: usize, base_sub_steps: u32) -> Self {
        self.max_points = max_points;
        self.base_sub_steps = base_sub_steps;
        self
    }

    pub fn with_frame_step(mut self, frame_step: f32) -> Self {
        self.frame_step = frame_step;
        self
    }

    pub fn with_backoff(mut self, backoff_margin: f32) -> Self {
        self.backoff_margin = backoff_margin;
        self
    }

    pub fn with_mask(mut self, mask: LayerMask) -> Self {
        self.mask = mask;
        self
    }

    /// Clamp degenerate inputs into a range the integrator can always finish
    pub fn sanitized(mut self) -> Self {
        if !self.origin.is_finite() {
            self.origin = Vec2::ZERO;
        }
        if !self.velocity.is_finite() {
            self.velocity = Vec2::ZERO;
        }
        if !self.gravity.is_finite() {
            self.gravity = 0.0;
        }
        if self.ball_radius.is_nan() || self.ball_radius < MIN_BALL_RADIUS {
            self.ball_radius = MIN_BALL_RADIUS;
        }
        if !self.frame_step.is_finite() || self.frame_step <= 0.0 {
            self.frame_step = FRAME_STEP;
        }
        if !self.backoff_margin.is_finite() || self.backoff_margin < 0.0 {
            self.backoff_margin = 0.0;
        }
        self.max_points = self.max_points.max(1);
        self.base_sub_steps = self.base_sub_steps.max(1);
        self
    }

    /// Start a lazy flight; calling again restarts from the origin
    pub fn fly<'q, Q: PhysicsQuery + ?Sized>(&self, query: &'q Q) -> Flight<'q, Q> {
        Flight::new(query, *self)
    }
}

/// Sub-steps needed for one point at `speed`
///
/// The target per-substep displacement is half a ball radius (never below
/// `MIN_TARGET_SEGMENT`), so fast balls refine instead of tunnelling through
/// pegs about their own size. Non-decreasing in `speed`.
pub fn adaptive_sub_steps(speed: f32, frame_step: f32, base_sub_steps: u32, ball_radius: f32) -> u32 {
    let base = base_sub_steps.max(1);
    let cap = MAX_ADAPTIVE_SUB_STEPS.max(base);
    let target = (0.5 * ball_radius).max(MIN_TARGET_SEGMENT);
    let estimate = speed.abs() * frame_step.max(0.0) / base as f32;
    if estimate.is_nan() || estimate <= 0.0 {
        return base;
    }

    let needed = (estimate / target).ceil();
    let needed = if needed >= cap as f32 { cap } else { needed as u32 };
    base.max(needed)
}

/// How a flight was stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactKind {
    /// The swept ball met a collider along a sub-step segment
    Swept,
    /// The ball finished a sub-step inside a collider
    Overlap,
}

/// First contact of a predicted flight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impact {
    pub kind: ImpactKind,
    pub collider: ColliderHandle,
    /// Contact point on the collider (sweep) or the ball center when the overlap was found
    pub contact: Vec2,
    /// Where the ghost ball rests, backed off from the contact
    pub rest: Vec2,
}

/// Lazy, finite sequence of predicted ball positions
///
/// Yields at most `max_points` positions. When the flight ends on a contact the
/// final yielded position is the backed-off rest position.
pub struct Flight<'q, Q: ?Sized> {
    query: &'q Q,
    params: FlightParams,
    pos: Vec2,
    vel: Vec2,
    /// Points produced from flight slices (excludes an appended rest point)
    emitted: usize,
    pending_rest: Option<Vec2>,
    last: Option<Vec2>,
    impact: Option<Impact>,
    done: bool,
}

impl<'q, Q: PhysicsQuery + ?Sized> Flight<'q, Q> {
    fn new(query: &'q Q, params: FlightParams) -> Self {
        let params = params.sanitized();
        Self {
            query,
            params,
            pos: params.origin,
            vel: params.velocity,
            emitted: 0,
            pending_rest: None,
            last: None,
            impact: None,
            done: false,
        }
    }

    /// Parameters after sanitizing
    pub fn params(&self) -> &FlightParams {
        &self.params
    }

    /// Contact that ended the flight, once found
    pub fn impact(&self) -> Option<Impact> {
        self.impact
    }

    /// Last yielded position; the terminal position once the flight is finished
    pub fn terminal(&self) -> Option<Vec2> {
        self.last
    }

    pub fn is_finished(&self) -> bool {
        self.done
    }

    /// Simulate one point's time slice; returns the contact if one stops the flight
    fn advance_slice(&mut self) -> Option<Impact> {
        let p = self.params;
        let steps = adaptive_sub_steps(self.vel.length(), p.frame_step, p.base_sub_steps, p.ball_radius);
        let h = p.frame_step / steps as f32;
        let accel = Vec2::Y * p.gravity;
        let backoff = p.ball_radius + p.backoff_margin;

        for _ in 0..steps {
            let next = self.pos + self.vel * h + 0.5 * accel * h * h;
            let segment = next - self.pos;
            let len = segment.length();
            let dir = (len > MIN_SEGMENT_LENGTH).then(|| segment / len);

            if let Some(dir) = dir {
                if let Some(hit) = self.query.sweep_circle(self.pos, p.ball_radius, dir, len, p.mask) {
                    return Some(Impact {
                        kind: ImpactKind::Swept,
                        collider: hit.collider,
                        contact: hit.point,
                        rest: hit.point - dir * backoff,
                    });
                }
            }

            self.vel += accel * h;
            self.pos = next;

            // Concave or overlapping colliders can swallow the ball without a sweep hit
            if let Some(collider) = self.query.overlap_circle(self.pos, p.ball_radius, p.mask) {
                let back = dir.unwrap_or(Vec2::NEG_Y);
                return Some(Impact {
                    kind: ImpactKind::Overlap,
                    collider,
                    contact: self.pos,
                    rest: self.pos - back * backoff,
                });
            }
        }

        None
    }
}

impl<Q: PhysicsQuery + ?Sized> Iterator for Flight<'_, Q> {
    type Item = Vec2;

    fn next(&mut self) -> Option<Vec2> {
        if self.done {
            return None;
        }
        if let Some(rest) = self.pending_rest.take() {
            self.done = true;
            self.last = Some(rest);
            return Some(rest);
        }
        if self.emitted >= self.params.max_points {
            self.done = true;
            return None;
        }

        let point = self.pos;
        self.emitted += 1;
        let budget_full = self.emitted >= self.params.max_points;

        let out = match self.advance_slice() {
            Some(impact) => {
                self.impact = Some(impact);
                if budget_full {
                    // No room left: the rest position takes the last slot
                    self.done = true;
                    impact.rest
                } else {
                    self.pending_rest = Some(impact.rest);
                    point
                }
            }
            None => {
                self.done = budget_full;
                point
            }
        };

        self.last = Some(out);
        Some(out)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        let pending = usize::from(self.pending_rest.is_some());
        let remaining = self.params.max_points.saturating_sub(self.emitted);
        (pending, Some(remaining.max(pending)))
    }
}

/// A fully collected flight
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub points: Vec<Vec2>,
    /// Final point: the rest position after a contact, or the natural end of flight
    pub terminal: Vec2,
    pub impact: Option<Impact>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Rest position if the flight ended on a contact
    pub fn hit(&self) -> Option<Vec2> {
        self.impact.map(|i| i.rest)
    }

    /// Highest point of the path
    pub fn peak(&self) -> Option<Vec2> {
        self.points.iter().copied().max_by(|a, b| a.y.total_cmp(&b.y))
    }
}

/// Run a flight to completion
pub fn integrate<Q: PhysicsQuery + ?Sized>(query: &Q, params: &FlightParams) -> Trajectory {
    let mut flight = params.fly(query);
    let mut points = Vec::with_capacity(flight.params().max_points);
    points.extend(flight.by_ref());

    let terminal = flight.terminal().unwrap_or(flight.params().origin);
    Trajectory {
        points,
        terminal,
        impact: flight.impact(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::query::{EmptySpace, SweepHit};
    use crate::sim::world::StaticWorld;
    use proptest::prelude::*;
    use std::cell::{Cell, RefCell};

    const R: f32 = 0.2;

    /// Reports a single sweep hit at a fixed point on its first call
    struct ScriptedHit {
        point: Vec2,
        calls: Cell<u32>,
        first_dir: RefCell<Option<Vec2>>,
    }

    impl ScriptedHit {
        fn new(point: Vec2) -> Self {
            Self {
                point,
                calls: Cell::new(0),
                first_dir: RefCell::new(None),
            }
        }
    }

    impl PhysicsQuery for ScriptedHit {
        fn sweep_circle(&self, origin: Vec2, _: f32, dir: Vec2, dist: f32, _: LayerMask) -> Option<SweepHit> {
            self.calls.set(self.calls.get() + 1);
            *self.first_dir.borrow_mut() = Some(dir);
            Some(SweepHit {
                point: self.point,
                centroid: origin + dir * dist,
                distance: dist,
                normal: -dir,
                collider: ColliderHandle(7),
            })
        }

        fn overlap_circle(&self, _: Vec2, _: f32, _: LayerMask) -> Option<ColliderHandle> {
            None
        }
    }

    /// Never reports sweeps; reports overlap once the ball passes `x_limit`
    struct OverlapPast {
        x_limit: f32,
    }

    impl PhysicsQuery for OverlapPast {
        fn sweep_circle(&self, _: Vec2, _: f32, _: Vec2, _: f32, _: LayerMask) -> Option<SweepHit> {
            None
        }

        fn overlap_circle(&self, center: Vec2, _: f32, _: LayerMask) -> Option<ColliderHandle> {
            (center.x > self.x_limit).then_some(ColliderHandle(3))
        }
    }

    fn board_with_peg(center: Vec2, radius: f32) -> StaticWorld {
        let mut world = StaticWorld::new();
        world.add_circle(center, radius, 1);
        world
    }

    #[test]
    fn test_free_flight_traces_parabola() {
        let params = FlightParams::new(Vec2::ZERO, Vec2::new(5.0, 5.0), -10.0, R).with_budget(75, 3);
        let path = integrate(&EmptySpace, &params);

        assert_eq!(path.len(), 75);
        assert!(path.impact.is_none());
        assert_eq!(path.terminal, *path.points.last().unwrap());
        assert_eq!(path.points[0], Vec2::ZERO);

        let peak = path.peak().unwrap();
        let peak_index = path.points.iter().position(|p| *p == peak).unwrap();
        assert!(peak_index > 0 && peak_index < 74);
        assert!(path.terminal.y < peak.y);
        // x advances uniformly without horizontal forces
        assert!(path.points.windows(2).all(|w| w[1].x > w[0].x));
    }

    #[test]
    fn test_flight_into_peg_stops_short() {
        let world = board_with_peg(Vec2::new(2.0, 1.0), 1.0);
        let params = FlightParams::new(Vec2::ZERO, Vec2::new(5.0, 5.0), -10.0, R).with_budget(75, 3);
        let path = integrate(&world, &params);

        assert!(path.len() < 75);
        let impact = path.impact.expect("peg is in the flight path");
        assert_eq!(impact.kind, ImpactKind::Swept);
        assert_eq!(path.terminal, impact.rest);
        assert_eq!(*path.points.last().unwrap(), impact.rest);

        // Contact sits on the peg surface and the rest point backs off along the
        // approach direction by exactly radius + margin
        let peg = Vec2::new(2.0, 1.0);
        assert!((impact.contact.distance(peg) - 1.0).abs() < 1e-4);
        let backoff = impact.contact - impact.rest;
        assert!((backoff.length() - (R + BACKOFF_MARGIN)).abs() < 1e-5);
        let prev = path.points[path.len() - 2];
        assert!(backoff.dot(impact.contact - prev) > 0.0);

        // Glancing contact: clear of the surface by more than the ball radius,
        // never further than a head-on back-off
        let d = path.terminal.distance(peg);
        assert!(d > 1.0 + R, "distance {d}");
        assert!(d <= 1.0 + R + BACKOFF_MARGIN + 1e-4, "distance {d}");
    }

    #[test]
    fn test_head_on_backoff_distance() {
        let peg = Vec2::new(2.0, 1.0);
        let world = board_with_peg(peg, 1.0);
        let params = FlightParams::new(Vec2::new(2.0, 5.0), Vec2::ZERO, -10.0, R).with_budget(75, 3);
        let path = integrate(&world, &params);

        assert!(path.len() < 75);
        let d = path.terminal.distance(peg);
        assert!((d - (1.0 + R + BACKOFF_MARGIN)).abs() < 1e-4, "distance {d}");
    }

    #[test]
    fn test_contact_in_last_slot_replaces_point() {
        let world = board_with_peg(Vec2::ZERO, 1.0);
        let origin = Vec2::new(0.0, 1.25);
        let params = FlightParams::new(origin, Vec2::new(0.0, -10.0), 0.0, R);

        let single = integrate(&world, &params.with_budget(1, 3));
        assert_eq!(single.len(), 1);
        assert_eq!(single.points[0], single.impact.unwrap().rest);

        let roomy = integrate(&world, &params.with_budget(5, 3));
        assert_eq!(roomy.len(), 2);
        assert_eq!(roomy.points[0], origin);
        assert_eq!(roomy.points[1], roomy.terminal);
    }

    #[test]
    fn test_overlap_stop_backs_off_along_segment() {
        let query = OverlapPast { x_limit: 1.0 };
        let params = FlightParams::new(Vec2::ZERO, Vec2::new(10.0, 0.0), 0.0, R).with_budget(75, 3);
        let path = integrate(&query, &params);

        let impact = path.impact.unwrap();
        assert_eq!(impact.kind, ImpactKind::Overlap);
        assert_eq!(impact.collider, ColliderHandle(3));
        assert!(impact.contact.x > 1.0);
        let expected = impact.contact - Vec2::X * (R + BACKOFF_MARGIN);
        assert!((impact.rest - expected).length() < 1e-5);
    }

    #[test]
    fn test_stationary_overlap_backs_off_upward() {
        let query = OverlapPast { x_limit: -1.0 };
        let params = FlightParams::new(Vec2::ZERO, Vec2::ZERO, 0.0, R);
        let path = integrate(&query, &params);

        assert_eq!(path.len(), 2);
        assert!((path.terminal - Vec2::new(0.0, R + BACKOFF_MARGIN)).length() < 1e-6);
    }

    #[test]
    fn test_zero_length_segment_skips_sweep() {
        let query = ScriptedHit::new(Vec2::ZERO);
        let params = FlightParams::new(Vec2::ZERO, Vec2::ZERO, 0.0, R).with_budget(4, 2);
        let path = integrate(&query, &params);

        assert_eq!(query.calls.get(), 0);
        assert_eq!(path.len(), 4);
        assert!(path.impact.is_none());
    }

    #[test]
    fn test_flight_is_lazy_and_restartable() {
        let params = FlightParams::new(Vec2::ZERO, Vec2::new(3.0, 4.0), -9.81, R);
        let first: Vec<Vec2> = params.fly(&EmptySpace).take(3).collect();
        let again: Vec<Vec2> = params.fly(&EmptySpace).take(3).collect();
        assert_eq!(first.len(), 3);
        assert_eq!(first, again);

        let mut flight = params.fly(&EmptySpace);
        assert!(!flight.is_finished());
        assert_eq!(flight.by_ref().count(), MAX_POINTS);
        assert!(flight.is_finished());
        assert_eq!(flight.next(), None);
    }

    #[test]
    fn test_degenerate_inputs_are_clamped() {
        let params = FlightParams::new(Vec2::ZERO, Vec2::new(f32::NAN, 1.0), f32::INFINITY, -1.0)
            .with_budget(0, 0)
            .with_frame_step(-1.0)
            .with_backoff(-5.0);
        let clean = params.sanitized();
        assert_eq!(clean.max_points, 1);
        assert_eq!(clean.base_sub_steps, 1);
        assert_eq!(clean.ball_radius, MIN_BALL_RADIUS);
        assert_eq!(clean.frame_step, FRAME_STEP);
        assert_eq!(clean.backoff_margin, 0.0);
        assert_eq!(clean.velocity, Vec2::ZERO);

        let path = integrate(&EmptySpace, &params);
        assert_eq!(path.len(), 1);

        let nan = FlightParams::new(Vec2::ZERO, Vec2::X, -10.0, f32::NAN)
            .with_frame_step(f32::NAN)
            .with_backoff(f32::NAN)
            .sanitized();
        assert_eq!(nan.ball_radius, MIN_BALL_RADIUS);
        assert_eq!(nan.frame_step, FRAME_STEP);
        assert_eq!(nan.backoff_margin, 0.0);

        let inf = FlightParams::new(Vec2::ZERO, Vec2::X, -10.0, R)
            .with_frame_step(f32::INFINITY)
            .with_backoff(f32::INFINITY)
            .sanitized();
        assert_eq!(inf.ball_radius, R);
        assert_eq!(inf.frame_step, FRAME_STEP);
        assert_eq!(inf.backoff_margin, 0.0);
    }

    #[test]
    fn test_sub_steps_refine_at_speed() {
        assert_eq!(adaptive_sub_steps(0.0, FRAME_STEP, 3, R), 3);
        assert_eq!(adaptive_sub_steps(10.0, FRAME_STEP, 3, R), 3);
        // 310 u/s: 6.2 units per point, ~2.07 per base sub-step, target 0.1
        assert_eq!(adaptive_sub_steps(310.0, FRAME_STEP, 3, R), 21);
        assert_eq!(adaptive_sub_steps(f32::INFINITY, FRAME_STEP, 3, R), MAX_ADAPTIVE_SUB_STEPS);
        assert_eq!(adaptive_sub_steps(5.0, FRAME_STEP, 0, R), 1);
    }

    proptest! {
        #[test]
        fn prop_flight_terminates_within_budget(
            vx in -30.0f32..30.0, vy in -30.0f32..30.0,
            gravity in -30.0f32..0.0,
            radius in 0.05f32..0.5,
            max_points in 1usize..120,
            sub_steps in 1u32..6,
        ) {
            let world = board_with_peg(Vec2::new(1.5, -1.0), 0.3);
            let params = FlightParams::new(Vec2::ZERO, Vec2::new(vx, vy), gravity, radius)
                .with_budget(max_points, sub_steps);
            let path = integrate(&world, &params);
            prop_assert!(!path.is_empty());
            prop_assert!(path.len() <= max_points);
            prop_assert_eq!(path.terminal, *path.points.last().unwrap());
        }

        #[test]
        fn prop_sweep_backoff_is_exact(
            hx in -10.0f32..10.0, hy in -10.0f32..10.0,
            vx in -20.0f32..20.0, vy in 0.5f32..20.0,
            radius in 0.01f32..1.0,
            margin in 0.0f32..0.5,
        ) {
            let point = Vec2::new(hx, hy);
            let query = ScriptedHit::new(point);
            let params = FlightParams::new(Vec2::ZERO, Vec2::new(vx, vy), -9.81, radius)
                .with_backoff(margin);
            let path = integrate(&query, &params);

            let dir = query.first_dir.borrow().expect("sweep was issued");
            let expected = point - dir * (radius + margin);
            prop_assert_eq!(query.calls.get(), 1);
            prop_assert!((path.terminal - expected).length() < 1e-5);
        }

        #[test]
        fn prop_sub_steps_non_decreasing(
            a in 0.0f32..500.0, b in 0.0f32..500.0,
            base in 1u32..8,
            radius in 0.01f32..1.0,
        ) {
            let (slow, fast) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(
                adaptive_sub_steps(slow, FRAME_STEP, base, radius)
                    <= adaptive_sub_steps(fast, FRAME_STEP, base, radius)
            );
        }

        #[test]
        fn prop_zero_gravity_path_is_straight(
            vx in -20.0f32..20.0, vy in -20.0f32..20.0,
        ) {
            prop_assume!(Vec2::new(vx, vy).length() > 0.1);
            let v = Vec2::new(vx, vy);
            let params = FlightParams::new(Vec2::new(1.0, 2.0), v, 0.0, R);
            let path = integrate(&EmptySpace, &params);
            let dir = v.normalize();
            for p in &path.points {
                let offset = *p - params.origin;
                prop_assert!(dir.perp_dot(offset).abs() < 1e-3 * (1.0 + offset.length()));
            }
        }
    }
}
