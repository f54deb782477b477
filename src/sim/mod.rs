//! Particle simulation module
//!
//! Everything that touches the numbers lives here:
//! - Fixed timestep only (the engine decides when to step)
//! - Particles never interact with each other, only with fields and walls
//! - No rendering or platform dependencies

pub mod field;
pub mod particle;
pub mod system;
pub mod vector;

pub use field::{FieldKind, FieldSet, ForceField};
pub use particle::{Hsl, Particle};
pub use system::{Bounds, ParticleSystem};
