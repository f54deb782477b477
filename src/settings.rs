//! Simulation settings
//!
//! `SimConfig` is shared between the orchestration layer and the simulation
//! through a `ConfigHandle`. The simulation reads it fresh on every tick, so
//! any committed change takes effect on the next tick.

use std::cell::{Ref, RefCell};
use std::path::Path;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    /// Lowercase name, as accepted by `FromStr`
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "low",
            QualityPreset::Medium => "medium",
            QualityPreset::High => "high",
        }
    }

    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 500,
            QualityPreset::Medium => 2000,
            QualityPreset::High => 5000,
        }
    }
}

impl FromStr for QualityPreset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(QualityPreset::Low),
            "medium" => Ok(QualityPreset::Medium),
            "high" => Ok(QualityPreset::High),
            other => Err(Error::InvalidConfig(format!(
                "unknown quality preset {other:?} (expected low, medium or high)"
            ))),
        }
    }
}

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Downward acceleration (pixels/s²)
    pub gravity: f32,
    /// Velocity retained per tick, in percent (0-100)
    pub friction: f32,
    /// Live particle cap
    pub max_particles: usize,
    /// Radius given to newly spawned particles
    pub particle_radius: f32,
    /// Lifetime given to newly spawned particles (seconds)
    pub particle_lifetime: f32,

    // === Field placement defaults ===
    /// Force magnitude at a new field's center
    pub field_strength: f32,
    /// Influence radius of a new field
    pub field_radius: f32,
    /// Field cap; placing beyond it evicts the oldest field
    pub max_fields: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            gravity: 200.0,
            friction: 98.0,
            max_particles: QualityPreset::Medium.max_particles(),
            particle_radius: 3.0,
            particle_lifetime: 5.0,

            field_strength: 500.0,
            field_radius: 150.0,
            max_fields: 20,
        }
    }
}

impl SimConfig {
    /// Create a config from a quality preset (applies preset defaults)
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut config = Self::default();
        config.apply_preset(preset);
        config
    }

    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.max_particles = preset.max_particles();
    }

    /// Friction as a per-tick retention factor (0.0 - 1.0)
    #[inline]
    pub fn damping(&self) -> f32 {
        self.friction / 100.0
    }

    /// Check every value is finite and within range.
    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            ("gravity", self.gravity),
            ("friction", self.friction),
            ("field_strength", self.field_strength),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be finite and >= 0 (got {value})"
                )));
            }
        }
        let positive = [
            ("particle_radius", self.particle_radius),
            ("particle_lifetime", self.particle_lifetime),
            ("field_radius", self.field_radius),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be finite and > 0 (got {value})"
                )));
            }
        }
        if self.friction > 100.0 {
            return Err(Error::InvalidConfig(format!(
                "friction is a percentage in 0..=100 (got {})",
                self.friction
            )));
        }
        if self.max_particles == 0 {
            return Err(Error::InvalidConfig("max_particles must be >= 1".into()));
        }
        if self.max_fields == 0 {
            return Err(Error::InvalidConfig("max_fields must be >= 1".into()));
        }
        Ok(())
    }

    /// Parse and validate a JSON config. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}

/// Shared handle to the live configuration.
///
/// Clones share the same underlying config. Writers go through the
/// validating setters, so readers never need to re-check values.
#[derive(Debug, Clone, Default)]
pub struct ConfigHandle {
    inner: Rc<RefCell<SimConfig>>,
}

impl ConfigHandle {
    /// Wrap a config after validating it
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            inner: Rc::new(RefCell::new(config)),
        })
    }

    /// Borrow the current values. Do not hold across a tick.
    pub fn get(&self) -> Ref<'_, SimConfig> {
        self.inner.borrow()
    }

    /// Copy of the current values
    pub fn snapshot(&self) -> SimConfig {
        self.inner.borrow().clone()
    }

    /// Apply `f` to a copy, validate, then commit. Nothing changes on error.
    pub fn update(&self, f: impl FnOnce(&mut SimConfig)) -> Result<()> {
        let mut candidate = self.snapshot();
        f(&mut candidate);
        if let Err(e) = candidate.validate() {
            log::warn!("Rejected config update: {e}");
            return Err(e);
        }
        *self.inner.borrow_mut() = candidate;
        Ok(())
    }

    pub fn set_gravity(&self, gravity: f32) -> Result<()> {
        self.update(|c| c.gravity = gravity)
    }

    pub fn set_friction(&self, friction: f32) -> Result<()> {
        self.update(|c| c.friction = friction)
    }

    pub fn set_max_particles(&self, max_particles: usize) -> Result<()> {
        self.update(|c| c.max_particles = max_particles)
    }
}
