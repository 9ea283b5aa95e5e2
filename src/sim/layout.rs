//! Seeded peg field generation
//!
//! Same seed, same board: layouts are rejection-sampled from a `Pcg32` stream so
//! a field can be reproduced from its seed alone.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::world::StaticWorld;

/// Collider layers used by generated boards
pub mod layers {
    pub const PEG: u8 = 1;
    pub const WALL: u8 = 2;
}

/// Parameters for a random peg field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PegLayout {
    /// Lower-left corner of the region pegs may occupy
    pub bounds_min: Vec2,
    /// Upper-right corner of the region pegs may occupy
    pub bounds_max: Vec2,
    pub peg_radius: f32,
    /// Minimum free gap between two peg surfaces
    pub min_spacing: f32,
    pub count: usize,
    /// Height of the board ceiling (above the launcher)
    #[serde(default = "default_ceiling")]
    pub ceiling: f32,
    /// Rejection-sampling budget per peg
    #[serde(default = "default_attempts")]
    pub max_attempts: u32,
}

fn default_attempts() -> u32 {
    64
}

fn default_ceiling() -> f32 {
    5.0
}

impl Default for PegLayout {
    fn default() -> Self {
        Self {
            bounds_min: Vec2::new(-4.0, -6.0),
            bounds_max: Vec2::new(4.0, 1.0),
            peg_radius: 0.15,
            min_spacing: 0.35,
            count: 40,
            ceiling: default_ceiling(),
            max_attempts: default_attempts(),
        }
    }
}

/// Generate peg centers for a layout
///
/// Pegs that cannot be placed within `max_attempts` tries are skipped, so a
/// crowded layout yields fewer than `count` pegs rather than looping forever.
pub fn generate_pegs(seed: u64, layout: &PegLayout) -> Vec<Vec2> {
    let mut rng = Pcg32::seed_from_u64(seed);

    let lo = layout.bounds_min.min(layout.bounds_max);
    let hi = layout.bounds_min.max(layout.bounds_max);
    let min_dist = 2.0 * layout.peg_radius.max(0.0) + layout.min_spacing.max(0.0);
    let min_dist_sq = min_dist * min_dist;

    let mut pegs: Vec<Vec2> = Vec::with_capacity(layout.count);
    for _ in 0..layout.count {
        for _ in 0..layout.max_attempts.max(1) {
            let candidate = Vec2::new(sample(&mut rng, lo.x, hi.x), sample(&mut rng, lo.y, hi.y));
            if pegs.iter().all(|p| p.distance_squared(candidate) >= min_dist_sq) {
                pegs.push(candidate);
                break;
            }
        }
    }

    if pegs.len() < layout.count {
        log::warn!("Placed {} of {} pegs (layout too crowded)", pegs.len(), layout.count);
    }
    pegs
}

fn sample(rng: &mut Pcg32, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}

/// Build a board: random pegs plus side walls `wall_margin` outside the bounds
/// and a ceiling; the bottom stays open
pub fn build_world(seed: u64, layout: &PegLayout, wall_margin: f32) -> StaticWorld {
    let mut world = StaticWorld::new();
    for center in generate_pegs(seed, layout) {
        world.add_circle(center, layout.peg_radius, layers::PEG);
    }

    let lo = layout.bounds_min.min(layout.bounds_max) - Vec2::splat(wall_margin);
    let hi = layout.bounds_min.max(layout.bounds_max) + Vec2::splat(wall_margin);
    let top = layout.ceiling.max(hi.y);
    let thickness = 0.05;
    world.add_segment(Vec2::new(lo.x, lo.y), Vec2::new(lo.x, top), thickness, layers::WALL);
    world.add_segment(Vec2::new(hi.x, lo.y), Vec2::new(hi.x, top), thickness, layers::WALL);
    world.add_segment(Vec2::new(lo.x, top), Vec2::new(hi.x, top), thickness, layers::WALL);

    log::info!("Board seed {}: {} colliders", seed, world.len());
    world
}
