//! Particle Sandbox - an interactive 2D particle playground
//!
//! Core modules:
//! - `sim`: Particle simulation (Verlet integration, force fields, boundaries)
//! - `engine`: Fixed timestep loop and FPS accounting
//! - `settings`: Shared, live-read simulation configuration
//! - `sandbox`: Orchestration layer tying particles, fields and config together

pub mod engine;
pub mod error;
pub mod sandbox;
pub mod settings;
pub mod sim;

pub use engine::{Engine, FrameHooks};
pub use error::{Error, Result};
pub use sandbox::{FrameSnapshot, Sandbox};
pub use settings::{ConfigHandle, QualityPreset, SimConfig};

/// Simulation constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const FIXED_DT: f64 = 1.0 / 60.0;
    /// Largest frame delta fed into the accumulator (seconds)
    pub const MAX_FRAME_DT: f64 = 0.1;
    /// Length of an FPS sampling window (milliseconds)
    pub const FPS_WINDOW_MS: f64 = 1000.0;

    /// Fraction of implied velocity kept after a wall bounce
    pub const RESTITUTION: f32 = 0.8;
    /// Squared distance below which a field exerts no force (avoids the center singularity)
    pub const FIELD_MIN_DIST_SQ: f32 = 0.1;
    /// Vortex pull toward the center, relative to the tangential push
    pub const VORTEX_RADIAL_FACTOR: f32 = 0.2;
    /// Below this dt the cached velocity is left untouched
    pub const VELOCITY_DT_EPSILON: f32 = 1e-4;

    /// Random spawn velocity range per axis (pixels per tick)
    pub const SPAWN_SPEED: f32 = 2.0;
    /// Hue range reserved for standard particles (degrees)
    pub const PARTICLE_HUE_MIN: f32 = 180.0;
    pub const PARTICLE_HUE_MAX: f32 = 260.0;
    pub const PARTICLE_SATURATION: f32 = 80.0;
    pub const PARTICLE_LIGHTNESS: f32 = 60.0;
}
