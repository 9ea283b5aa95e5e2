//! Deterministic physics module
//!
//! Everything the aim guide needs to know about the board lives here. This
//! module must stay pure and deterministic:
//! - Fixed time slices only
//! - Seeded RNG only
//! - Stable iteration order (by collider handle)
//! - No rendering or platform dependencies

pub mod flight;
pub mod layout;
pub mod query;
pub mod sdf;
pub mod world;

pub use flight::{Flight, FlightParams, Impact, ImpactKind, Trajectory, adaptive_sub_steps, integrate};
pub use layout::{PegLayout, build_world, generate_pegs, layers};
pub use query::{ColliderHandle, EmptySpace, LayerMask, PhysicsQuery, SweepHit};
pub use sdf::{closest_on_segment, sd_circle, sd_segment};
pub use world::{Collider, Shape, StaticWorld};
