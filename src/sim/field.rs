//! Force fields
//!
//! A field is a fixed, radius-bounded source of acceleration. Its strength
//! falls off linearly from `strength` at the center to zero at `radius`.
//! Fields are owned by the orchestration layer (`FieldSet`); the simulation
//! only ever reads them.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::vector;
use crate::consts::{FIELD_MIN_DIST_SQ, VORTEX_RADIAL_FACTOR};
use crate::error::{Error, Result};
use crate::settings::ConfigHandle;

/// Force law selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    /// Pulls toward the center
    Attractor,
    /// Pushes away from the center
    Repulsor,
    /// Swirls around the center with a weak inward pull
    Vortex,
    /// Reserved; has no force law and contributes nothing
    Directional,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Attractor => "attractor",
            FieldKind::Repulsor => "repulsor",
            FieldKind::Vortex => "vortex",
            FieldKind::Directional => "directional",
        }
    }

    /// Force for a particle whose unit direction toward the field center is
    /// `toward`, with the already-attenuated magnitude `falloff`.
    #[inline]
    pub fn force(&self, toward: Vec2, falloff: f32) -> Vec2 {
        match self {
            FieldKind::Attractor => vector::scale(toward, falloff),
            FieldKind::Repulsor => vector::scale(toward, -falloff),
            FieldKind::Vortex => {
                let tangent = vector::scale(vector::rotate_90(toward), falloff);
                let radial = vector::scale(toward, falloff * VORTEX_RADIAL_FACTOR);
                vector::add(tangent, radial)
            }
            FieldKind::Directional => Vec2::ZERO,
        }
    }
}

/// A positioned force source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForceField {
    pub id: u32,
    pub kind: FieldKind,
    pub pos: Vec2,
    /// Magnitude at the center
    pub strength: f32,
    /// Influence radius; zero force at and beyond it
    pub radius: f32,
    pub active: bool,
}

impl ForceField {
    pub fn new(id: u32, kind: FieldKind, pos: Vec2, strength: f32, radius: f32) -> Self {
        Self {
            id,
            kind,
            pos,
            strength,
            radius,
            active: true,
        }
    }

    /// Acceleration this field applies at `point`.
    ///
    /// Zero when inactive, outside the radius, or within the singularity floor
    /// around the center.
    pub fn acceleration_at(&self, point: Vec2) -> Vec2 {
        if !self.active {
            return Vec2::ZERO;
        }
        let dist_sq = vector::distance_squared(self.pos, point);
        if dist_sq >= self.radius * self.radius || dist_sq <= FIELD_MIN_DIST_SQ {
            return Vec2::ZERO;
        }
        let toward = vector::normalize(vector::sub(self.pos, point));
        let falloff = self.strength * (1.0 - dist_sq.sqrt() / self.radius);
        self.kind.force(toward, falloff)
    }
}

/// Capacity-bounded field collection in creation order.
///
/// Strength, radius and the cap (`max_fields`) come from the live config at
/// placement time. Placing a field at capacity evicts the oldest one (front)
/// in O(1).
#[derive(Debug, Clone)]
pub struct FieldSet {
    config: ConfigHandle,
    fields: VecDeque<ForceField>,
    next_id: u32,
}

impl FieldSet {
    pub fn new(config: ConfigHandle) -> Self {
        Self {
            config,
            fields: VecDeque::new(),
            next_id: 1,
        }
    }

    fn next_field_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Place a field with the configured default strength and radius.
    /// Returns the new field's id.
    pub fn place(&mut self, kind: FieldKind, pos: Vec2) -> Result<u32> {
        let (strength, radius) = {
            let config = self.config.get();
            (config.field_strength, config.field_radius)
        };
        self.place_with(kind, pos, strength, radius)
    }

    /// Place a field with an explicit strength and radius
    pub fn place_with(
        &mut self,
        kind: FieldKind,
        pos: Vec2,
        strength: f32,
        radius: f32,
    ) -> Result<u32> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(Error::InvalidField(format!(
                "radius must be finite and > 0 (got {radius})"
            )));
        }
        if !strength.is_finite() {
            return Err(Error::InvalidField(format!(
                "strength must be finite (got {strength})"
            )));
        }
        if !pos.is_finite() {
            return Err(Error::InvalidField(format!("position must be finite (got {pos})")));
        }

        let capacity = self.config.get().max_fields.max(1);
        while self.fields.len() >= capacity {
            if let Some(evicted) = self.fields.pop_front() {
                log::debug!("Evicted {} field {}", evicted.kind.as_str(), evicted.id);
            }
        }

        let id = self.next_field_id();
        self.fields
            .push_back(ForceField::new(id, kind, pos, strength, radius));
        Ok(id)
    }

    /// Remove a single field by id
    pub fn remove(&mut self, id: u32) -> Option<ForceField> {
        let index = self.fields.iter().position(|f| f.id == id)?;
        self.fields.remove(index)
    }

    /// Toggle a field's active gate. Returns false if no such field.
    pub fn set_active(&mut self, id: u32, active: bool) -> bool {
        match self.fields.iter_mut().find(|f| f.id == id) {
            Some(field) => {
                field.active = active;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: u32) -> Option<&ForceField> {
        self.fields.iter().find(|f| f.id == id)
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }

    /// Fields oldest first
    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, ForceField> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'a> IntoIterator for &'a FieldSet {
    type Item = &'a ForceField;
    type IntoIter = std::collections::vec_deque::Iter<'a, ForceField>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SimConfig;

    const EPS: f32 = 1e-4;

    fn field(kind: FieldKind) -> ForceField {
        ForceField::new(1, kind, Vec2::new(100.0, 100.0), 100.0, 50.0)
    }

    fn field_set(max_fields: usize) -> (FieldSet, ConfigHandle) {
        let config = ConfigHandle::new(SimConfig {
            max_fields,
            field_strength: 42.0,
            field_radius: 64.0,
            ..Default::default()
        })
        .unwrap();
        (FieldSet::new(config.clone()), config)
    }

    #[test]
    fn test_attractor_pulls_with_linear_falloff() {
        let f = field(FieldKind::Attractor);
        // 25 away on +x: half strength, pointing -x
        let a = f.acceleration_at(Vec2::new(125.0, 100.0));
        assert!((a - Vec2::new(-50.0, 0.0)).length() < EPS, "{a}");
    }

    #[test]
    fn test_repulsor_is_negated_attractor() {
        let p = Vec2::new(90.0, 130.0);
        let a = field(FieldKind::Attractor).acceleration_at(p);
        let r = field(FieldKind::Repulsor).acceleration_at(p);
        assert!((a + r).length() < EPS);
        assert!(a.length() > 0.0);
    }

    #[test]
    fn test_vortex_is_mostly_tangential() {
        let f = field(FieldKind::Vortex);
        let p = Vec2::new(125.0, 100.0);
        let a = f.acceleration_at(p);
        // toward = (-1, 0), tangent = (0, -1) * 50, radial = (-1, 0) * 10
        assert!((a - Vec2::new(-10.0, -50.0)).length() < EPS, "{a}");
    }

    #[test]
    fn test_no_force_outside_radius_or_at_center() {
        let f = field(FieldKind::Attractor);
        assert_eq!(f.acceleration_at(Vec2::new(150.0, 100.0)), Vec2::ZERO);
        assert_eq!(f.acceleration_at(Vec2::new(300.0, 0.0)), Vec2::ZERO);
        assert_eq!(f.acceleration_at(Vec2::new(100.0, 100.0)), Vec2::ZERO);
        assert_eq!(f.acceleration_at(Vec2::new(100.2, 100.2)), Vec2::ZERO);
    }

    #[test]
    fn test_directional_and_inactive_are_inert() {
        let p = Vec2::new(110.0, 100.0);
        assert_eq!(field(FieldKind::Directional).acceleration_at(p), Vec2::ZERO);

        let mut f = field(FieldKind::Attractor);
        f.active = false;
        assert_eq!(f.acceleration_at(p), Vec2::ZERO);
    }

    #[test]
    fn test_place_uses_config_defaults() {
        let (mut set, _) = field_set(5);
        let id = set.place(FieldKind::Vortex, Vec2::new(10.0, 20.0)).unwrap();
        let f = set.get(id).unwrap();
        assert_eq!(f.strength, 42.0);
        assert_eq!(f.radius, 64.0);
        assert!(f.active);

        let id = set
            .place_with(FieldKind::Attractor, Vec2::ZERO, 7.0, 8.0)
            .unwrap();
        assert_eq!(set.get(id).unwrap().radius, 8.0);
    }

    #[test]
    fn test_field_set_evicts_oldest() {
        let (mut set, _) = field_set(3);
        for i in 0..3 {
            set.place(FieldKind::Attractor, Vec2::splat(i as f32)).unwrap();
        }
        let id = set.place(FieldKind::Vortex, Vec2::ZERO).unwrap();
        assert_eq!(id, 4);
        let ids: Vec<u32> = set.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![2, 3, 4]);
    }

    #[test]
    fn test_field_cap_is_read_live() {
        let (mut set, config) = field_set(4);
        for _ in 0..4 {
            set.place(FieldKind::Repulsor, Vec2::ZERO).unwrap();
        }
        config.update(|c| c.max_fields = 2).unwrap();
        set.place(FieldKind::Repulsor, Vec2::ZERO).unwrap();
        let ids: Vec<u32> = set.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![4, 5]);
    }

    #[test]
    fn test_field_set_ids_increase_after_clear() {
        let (mut set, _) = field_set(5);
        assert_eq!(set.place(FieldKind::Attractor, Vec2::ZERO).unwrap(), 1);
        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.place(FieldKind::Attractor, Vec2::ZERO).unwrap(), 2);
    }

    #[test]
    fn test_field_set_remove_and_toggle() {
        let (mut set, _) = field_set(5);
        let a = set.place(FieldKind::Attractor, Vec2::ZERO).unwrap();
        let b = set.place(FieldKind::Repulsor, Vec2::ONE).unwrap();
        assert!(set.set_active(b, false));
        assert!(!set.get(b).unwrap().active);
        assert_eq!(set.remove(a).map(|f| f.id), Some(a));
        assert!(set.remove(a).is_none());
        assert!(!set.set_active(a, true));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_field_set_rejects_bad_radius() {
        let (mut set, _) = field_set(5);
        assert!(matches!(
            set.place_with(FieldKind::Attractor, Vec2::ZERO, 1.0, 0.0),
            Err(Error::InvalidField(_))
        ));
        assert!(set.is_empty());
    }
}
