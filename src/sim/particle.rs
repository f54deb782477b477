//! Particle entity

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// HSL color, degrees / percent / percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
}

impl Hsl {
    pub fn new(hue: f32, saturation: f32, lightness: f32) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }

    /// CSS color string, e.g. `hsl(200, 80%, 60%)`
    pub fn to_css(&self) -> String {
        format!(
            "hsl({:.0}, {:.0}%, {:.0}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

/// A simulated point mass.
///
/// Velocity is implied by `pos - old_pos` (Verlet). The `vel` field is a
/// per-second cache for renderers and is never read by the integrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub id: u64,
    pub pos: Vec2,
    pub old_pos: Vec2,
    /// Last tick's displacement divided by dt
    pub vel: Vec2,
    pub mass: f32,
    pub radius: f32,
    pub color: Hsl,
    /// Remaining lifetime (seconds)
    pub life: f32,
    pub max_life: f32,
    /// Pinned particles are skipped by the integrator
    pub fixed: bool,
}

impl Particle {
    /// Create a particle whose implied first-tick displacement is `vel`
    pub fn new(id: u64, pos: Vec2, vel: Vec2, radius: f32, lifetime: f32, color: Hsl) -> Self {
        Self {
            id,
            pos,
            old_pos: pos - vel,
            vel,
            mass: 1.0,
            radius,
            color,
            life: lifetime,
            max_life: lifetime,
            fixed: false,
        }
    }

    /// Displacement implied by position history
    #[inline]
    pub fn implied_velocity(&self) -> Vec2 {
        self.pos - self.old_pos
    }

    /// Remaining life as a fraction of the total (0.0 - 1.0)
    #[inline]
    pub fn life_fraction(&self) -> f32 {
        if self.max_life > 0.0 {
            (self.life / self.max_life).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }
}
