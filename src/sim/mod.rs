//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Clamped timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod particles;
pub mod slicer;
pub mod state;
pub mod target;
pub mod tick;

pub use particles::{BurstKind, Particle, ParticleSystem};
pub use slicer::{SliceHit, Slicer, segment_hits_circle};
pub use state::{GameEvent, GamePhase, GameState};
pub use target::{Target, TargetSprite};
pub use tick::{slice_points, tick};
