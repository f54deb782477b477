//! Error types
//!
//! The per-tick paths are infallible; errors only surface at the edges where
//! configuration or viewport values enter the simulation.

use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A configuration value is non-finite or out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Viewport dimensions must be finite and wide enough to hold a particle.
    #[error("invalid viewport {width}x{height}: dimensions must be finite and at least {min}")]
    InvalidViewport { width: f32, height: f32, min: f32 },

    /// A force field was placed with an unusable radius or strength.
    #[error("invalid field: {0}")]
    InvalidField(String),

    /// Reading a configuration file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A configuration file was not valid JSON for `SimConfig`.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
