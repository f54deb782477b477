//! Particle system
//!
//! Owns the live particles and advances them one fixed step at a time:
//! Verlet integration under gravity, friction and force fields, then wall
//! bounces, then aging. Configuration is read from the shared handle at the
//! start of every call and never cached.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::field::ForceField;
use super::particle::{Hsl, Particle};
use super::vector;
use crate::consts::*;
use crate::error::{Error, Result};
use crate::settings::ConfigHandle;

/// Viewport bounds the particles bounce inside
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    /// Bounds that can hold a particle of `radius`: each side must be at
    /// least `2 * radius`, otherwise `[r, side - r]` is empty.
    pub fn new(width: f32, height: f32, radius: f32) -> Result<Self> {
        let min = 2.0 * radius;
        let fits = |side: f32| side.is_finite() && side > 0.0 && side >= min;
        if !fits(width) || !fits(height) {
            return Err(Error::InvalidViewport { width, height, min });
        }
        Ok(Self { width, height })
    }

    /// True if a particle of `radius` at `pos` is inside the bounce box
    pub fn contains(&self, pos: Vec2, radius: f32) -> bool {
        pos.x >= radius
            && pos.x <= self.width - radius
            && pos.y >= radius
            && pos.y <= self.height - radius
    }
}

pub struct ParticleSystem {
    config: ConfigHandle,
    bounds: Bounds,
    /// Live particles in creation order
    particles: Vec<Particle>,
    rng: Pcg32,
    next_id: u64,
}

impl ParticleSystem {
    /// Create a system over a `width` x `height` viewport with a random seed
    pub fn new(config: ConfigHandle, width: f32, height: f32) -> Result<Self> {
        Self::with_seed(config, width, height, rand::random())
    }

    /// Create a system whose spawn velocities and colors follow `seed`
    pub fn with_seed(config: ConfigHandle, width: f32, height: f32, seed: u64) -> Result<Self> {
        let (radius, capacity) = {
            let config = config.get();
            (config.particle_radius, config.max_particles)
        };
        let bounds = Bounds::new(width, height, radius)?;
        Ok(Self {
            config,
            bounds,
            particles: Vec::with_capacity(capacity),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        })
    }

    fn next_particle_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn a particle at `pos`.
    ///
    /// `vel` is the per-tick displacement; when `None` each axis is drawn
    /// uniformly from `[-SPAWN_SPEED, SPAWN_SPEED]`. At capacity the back of
    /// the list is evicted first, so the new particle is always present.
    pub fn create_particle(&mut self, pos: Vec2, vel: Option<Vec2>) -> &Particle {
        let (max_particles, radius, lifetime) = {
            let config = self.config.get();
            (
                config.max_particles,
                config.particle_radius,
                config.particle_lifetime,
            )
        };

        // The cap can shrink between calls; trim down to make room
        while !self.particles.is_empty() && self.particles.len() >= max_particles {
            if let Some(evicted) = self.particles.pop() {
                log::debug!("Evicted particle {} at capacity {}", evicted.id, max_particles);
            }
        }

        let vel = vel.unwrap_or_else(|| {
            Vec2::new(
                self.rng.random_range(-SPAWN_SPEED..=SPAWN_SPEED),
                self.rng.random_range(-SPAWN_SPEED..=SPAWN_SPEED),
            )
        });
        let hue = self.rng.random_range(PARTICLE_HUE_MIN..PARTICLE_HUE_MAX);
        let color = Hsl::new(hue, PARTICLE_SATURATION, PARTICLE_LIGHTNESS);

        let id = self.next_particle_id();
        self.particles
            .push(Particle::new(id, pos, vel, radius, lifetime, color));
        &self.particles[self.particles.len() - 1]
    }

    /// Advance every live particle by one fixed step of `dt` seconds, then
    /// drop the ones whose life ran out.
    pub fn update<'f, F>(&mut self, dt: f32, fields: F)
    where
        F: IntoIterator<Item = &'f ForceField>,
        F::IntoIter: Clone,
    {
        let (gravity, damping) = {
            let config = self.config.get();
            (config.gravity, config.damping())
        };
        let fields = fields.into_iter();
        let dt_sq = dt * dt;
        let bounds = self.bounds;

        for p in self.particles.iter_mut().filter(|p| !p.fixed) {
            let damped = vector::scale(vector::sub(p.pos, p.old_pos), damping);

            let accel = fields
                .clone()
                .fold(Vec2::new(0.0, gravity), |acc, field| {
                    vector::add(acc, field.acceleration_at(p.pos))
                });

            let next = vector::add(vector::add(p.pos, damped), vector::scale(accel, dt_sq));
            p.old_pos = p.pos;
            p.pos = next;

            if dt > VELOCITY_DT_EPSILON {
                p.vel = vector::scale(vector::sub(p.pos, p.old_pos), 1.0 / dt);
            }

            constrain(p, &bounds);
            p.life -= dt;
        }

        self.particles.retain(|p| p.fixed || p.is_alive());
    }

    /// Live particles in creation order
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Drop every live particle
    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Change the bounce box. Particles outside it are pulled back on their
    /// next tick, not now.
    pub fn resize(&mut self, width: f32, height: f32) -> Result<()> {
        let radius = self.config.get().particle_radius;
        self.bounds = Bounds::new(width, height, radius)?;
        log::info!("Viewport resized to {width}x{height}");
        Ok(())
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn config(&self) -> &ConfigHandle {
        &self.config
    }
}

/// Clamp `p` into the viewport, reflecting its implied velocity on each
/// axis it crossed. The x axis is resolved fully before y.
fn constrain(p: &mut Particle, bounds: &Bounds) {
    let r = p.radius;

    if p.pos.x < r {
        p.pos.x = r;
        p.old_pos.x = p.pos.x + (p.pos.x - p.old_pos.x) * RESTITUTION;
    } else if p.pos.x > bounds.width - r {
        p.pos.x = bounds.width - r;
        p.old_pos.x = p.pos.x + (p.pos.x - p.old_pos.x) * RESTITUTION;
    }

    if p.pos.y < r {
        p.pos.y = r;
        p.old_pos.y = p.pos.y + (p.pos.y - p.old_pos.y) * RESTITUTION;
    } else if p.pos.y > bounds.height - r {
        p.pos.y = bounds.height - r;
        p.old_pos.y = p.pos.y + (p.pos.y - p.old_pos.y) * RESTITUTION;
    }
}
