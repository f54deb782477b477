//! Sandbox orchestration
//!
//! Owns the shared config, the particle system and the placed fields, and
//! plugs them into the engine. Tool actions (spawn, place field, reset) go
//! through here; renderers and progression tracking read `FrameSnapshot`s.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::engine::FrameHooks;
use crate::error::Result;
use crate::settings::ConfigHandle;
use crate::sim::{FieldKind, FieldSet, Particle, ParticleSystem};

/// Read-only summary handed out after each rendered frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    /// Fixed updates run so far
    pub tick: u64,
    pub particles: usize,
    pub fields: usize,
    /// Mean cached speed of live particles (pixels/s)
    pub mean_speed: f32,
    pub spawned_total: u64,
    pub expired_total: u64,
}

pub struct Sandbox {
    config: ConfigHandle,
    particles: ParticleSystem,
    fields: FieldSet,
    tick: u64,
    spawned_total: u64,
    /// Particles that aged out (evictions and resets are not counted)
    expired_total: u64,
    last_snapshot: FrameSnapshot,
}

impl Sandbox {
    pub fn new(config: ConfigHandle, width: f32, height: f32) -> Result<Self> {
        let particles = ParticleSystem::new(config.clone(), width, height)?;
        Ok(Self::from_parts(config, particles))
    }

    /// Sandbox with reproducible spawns
    pub fn with_seed(config: ConfigHandle, width: f32, height: f32, seed: u64) -> Result<Self> {
        let particles = ParticleSystem::with_seed(config.clone(), width, height, seed)?;
        Ok(Self::from_parts(config, particles))
    }

    fn from_parts(config: ConfigHandle, particles: ParticleSystem) -> Self {
        Self {
            fields: FieldSet::new(config.clone()),
            config,
            particles,
            tick: 0,
            spawned_total: 0,
            expired_total: 0,
            last_snapshot: FrameSnapshot::default(),
        }
    }

    /// Spawn one particle; `None` velocity picks a random one
    pub fn spawn(&mut self, pos: Vec2, vel: Option<Vec2>) -> u64 {
        self.spawned_total += 1;
        self.particles.create_particle(pos, vel).id
    }

    /// Spawn `count` particles at `pos` with random velocities
    pub fn spawn_burst(&mut self, pos: Vec2, count: usize) {
        for _ in 0..count {
            self.spawn(pos, None);
        }
        log::debug!("Spawned burst of {count} at {pos}");
    }

    /// Place a field using the configured strength/radius defaults
    pub fn place_field(&mut self, kind: FieldKind, pos: Vec2) -> Result<u32> {
        let id = self.fields.place(kind, pos)?;
        log::info!("Placed {} field {id} at {pos}", kind.as_str());
        Ok(id)
    }

    pub fn place_field_with(
        &mut self,
        kind: FieldKind,
        pos: Vec2,
        strength: f32,
        radius: f32,
    ) -> Result<u32> {
        let id = self.fields.place_with(kind, pos, strength, radius)?;
        log::info!("Placed {} field {id} at {pos}", kind.as_str());
        Ok(id)
    }

    pub fn remove_field(&mut self, id: u32) -> bool {
        self.fields.remove(id).is_some()
    }

    /// Clear particles and fields
    pub fn reset(&mut self) {
        self.particles.clear();
        self.fields.clear();
        log::info!("Sandbox reset");
    }

    pub fn resize(&mut self, width: f32, height: f32) -> Result<()> {
        self.particles.resize(width, height)
    }

    pub fn particles(&self) -> &[Particle] {
        self.particles.particles()
    }

    pub fn particle_system(&self) -> &ParticleSystem {
        &self.particles
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    pub fn config(&self) -> &ConfigHandle {
        &self.config
    }

    /// Summary as of the last rendered frame
    pub fn snapshot(&self) -> &FrameSnapshot {
        &self.last_snapshot
    }

    fn build_snapshot(&self) -> FrameSnapshot {
        let live = self.particles.particles();
        let mean_speed = if live.is_empty() {
            0.0
        } else {
            live.iter().map(|p| p.vel.length()).sum::<f32>() / live.len() as f32
        };
        FrameSnapshot {
            tick: self.tick,
            particles: live.len(),
            fields: self.fields.len(),
            mean_speed,
            spawned_total: self.spawned_total,
            expired_total: self.expired_total,
        }
    }
}

impl FrameHooks for Sandbox {
    fn update(&mut self, dt: f32) {
        let before = self.particles.len();
        self.particles.update(dt, &self.fields);
        self.expired_total += (before - self.particles.len()) as u64;
        self.tick += 1;
    }

    fn render(&mut self) {
        self.last_snapshot = self.build_snapshot();
        log::debug!(
            "tick {} particles {} fields {} mean speed {:.1}",
            self.last_snapshot.tick,
            self.last_snapshot.particles,
            self.last_snapshot.fields,
            self.last_snapshot.mean_speed
        );
    }
}
