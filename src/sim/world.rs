//! Static collider world
//!
//! A minimal query backend for the aim guide: pegs are circles, walls are
//! capsule segments. Nothing moves; the world only answers sweep and overlap
//! questions.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::query::{ColliderHandle, LayerMask, PhysicsQuery, SweepHit};
use super::sdf::{closest_on_segment, sd_circle, sd_segment};

/// Collider geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { center: Vec2, radius: f32 },
    /// Segment `a..b` thickened by `half_thickness` on every side
    Segment { a: Vec2, b: Vec2, half_thickness: f32 },
}

impl Shape {
    /// Signed distance from `p` to the shape surface
    pub fn signed_distance(&self, p: Vec2) -> f32 {
        match *self {
            Shape::Circle { center, radius } => sd_circle(p, center, radius),
            Shape::Segment { a, b, half_thickness } => sd_segment(p, a, b, half_thickness),
        }
    }

    /// Closest point on the shape's core (circle center or segment spine) and the
    /// surface offset from it
    fn core(&self, p: Vec2) -> (Vec2, f32) {
        match *self {
            Shape::Circle { center, radius } => (center, radius),
            Shape::Segment { a, b, half_thickness } => (closest_on_segment(p, a, b), half_thickness),
        }
    }
}

/// A collider entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collider {
    pub handle: ColliderHandle,
    pub layer: u8,
    pub shape: Shape,
}

/// Set of static colliders, iterated in handle order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticWorld {
    colliders: Vec<Collider>,
    next_id: u32,
}

impl StaticWorld {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, layer: u8, shape: Shape) -> ColliderHandle {
        let handle = ColliderHandle(self.next_id);
        self.next_id += 1;
        self.colliders.push(Collider { handle, layer, shape });
        handle
    }

    /// Add a circular collider (a peg)
    pub fn add_circle(&mut self, center: Vec2, radius: f32, layer: u8) -> ColliderHandle {
        self.push(layer, Shape::Circle { center, radius: radius.max(0.0) })
    }

    /// Add a capsule collider (a wall)
    pub fn add_segment(&mut self, a: Vec2, b: Vec2, half_thickness: f32, layer: u8) -> ColliderHandle {
        self.push(
            layer,
            Shape::Segment {
                a,
                b,
                half_thickness: half_thickness.max(0.0),
            },
        )
    }

    /// Remove a collider; handles are never reused
    pub fn remove(&mut self, handle: ColliderHandle) -> bool {
        let before = self.colliders.len();
        self.colliders.retain(|c| c.handle != handle);
        self.colliders.len() != before
    }

    pub fn get(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.colliders.iter().find(|c| c.handle == handle)
    }

    pub fn colliders(&self) -> &[Collider] {
        &self.colliders
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }
}

/// Time of impact of a point ray against a circle, `Some(0.0)` if the origin is
/// already inside
fn ray_circle(origin: Vec2, dir: Vec2, center: Vec2, radius: f32) -> Option<f32> {
    let m = origin - center;
    let c = m.length_squared() - radius * radius;
    if c <= 0.0 {
        return Some(0.0);
    }
    let b = m.dot(dir);
    if b > 0.0 {
        return None; // Moving away
    }
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    Some((-b - disc.sqrt()).max(0.0))
}

/// Time of impact of a point ray against a capsule of radius `radius` around
/// `a..b`, assuming the origin starts outside
fn ray_capsule(origin: Vec2, dir: Vec2, a: Vec2, b: Vec2, radius: f32) -> Option<f32> {
    let e = b - a;
    let len = e.length();
    if len < 1e-6 {
        return ray_circle(origin, dir, a, radius);
    }
    let u = e / len;
    let n = u.perp();
    let s0 = (origin - a).dot(n);
    let ds = dir.dot(n);

    let mut best: Option<f32> = None;

    // Flat side facing the origin
    if s0 * ds < 0.0 {
        let t = (s0.signum() * radius - s0) / ds;
        if t >= 0.0 {
            let k = (origin + dir * t - a).dot(u);
            if (0.0..=len).contains(&k) {
                best = Some(t);
            }
        }
    }

    // Rounded caps
    for cap in [a, b] {
        if let Some(t) = ray_circle(origin, dir, cap, radius) {
            best = Some(best.map_or(t, |cur| cur.min(t)));
        }
    }

    best
}

impl PhysicsQuery for StaticWorld {
    fn sweep_circle(
        &self,
        origin: Vec2,
        radius: f32,
        direction: Vec2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<SweepHit> {
        if max_distance.is_nan() || max_distance <= 0.0 || !direction.is_finite() || !origin.is_finite() {
            return None;
        }
        let dir = direction.try_normalize()?;
        let radius = radius.max(0.0);

        let mut best: Option<(f32, &Collider)> = None;
        for collider in self.colliders.iter().filter(|c| mask.contains(c.layer)) {
            let toi = if collider.shape.signed_distance(origin) < radius {
                Some(0.0)
            } else {
                match collider.shape {
                    Shape::Circle { center, radius: r } => ray_circle(origin, dir, center, r + radius),
                    Shape::Segment { a, b, half_thickness } => {
                        ray_capsule(origin, dir, a, b, half_thickness + radius)
                    }
                }
            };

            if let Some(t) = toi.filter(|t| *t <= max_distance) {
                // Strict comparison keeps the lowest handle on ties
                if best.is_none_or(|(bt, _)| t < bt) {
                    best = Some((t, collider));
                }
            }
        }

        best.map(|(distance, collider)| {
            let centroid = origin + dir * distance;
            let (core, offset) = collider.shape.core(centroid);
            let normal = (centroid - core).try_normalize().unwrap_or(-dir);
            SweepHit {
                point: core + normal * offset,
                centroid,
                distance,
                normal,
                collider: collider.handle,
            }
        })
    }

    fn overlap_circle(&self, center: Vec2, radius: f32, mask: LayerMask) -> Option<ColliderHandle> {
        self.colliders
            .iter()
            .filter(|c| mask.contains(c.layer))
            .find(|c| c.shape.signed_distance(center) < radius)
            .map(|c| c.handle)
    }
}
