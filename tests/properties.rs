//! Property tests for the simulation invariants

use glam::Vec2;
use proptest::prelude::*;

use particle_sandbox::consts::FIXED_DT;
use particle_sandbox::sim::{FieldKind, ForceField, ParticleSystem};
use particle_sandbox::{ConfigHandle, SimConfig};

const DT: f32 = FIXED_DT as f32;

fn field_kind() -> impl Strategy<Value = FieldKind> {
    prop_oneof![
        Just(FieldKind::Attractor),
        Just(FieldKind::Repulsor),
        Just(FieldKind::Vortex),
        Just(FieldKind::Directional),
    ]
}

fn fields(width: f32, height: f32) -> impl Strategy<Value = Vec<ForceField>> {
    prop::collection::vec(
        (field_kind(), 0.0..width, 0.0..height, 0.0f32..5000.0, 1.0f32..400.0, any::<bool>()),
        0..6,
    )
    .prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (kind, x, y, strength, radius, active))| {
                let mut f = ForceField::new(i as u32 + 1, kind, Vec2::new(x, y), strength, radius);
                f.active = active;
                f
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn count_never_exceeds_cap(cap in 1usize..64, spawns in 0usize..200) {
        let config = ConfigHandle::new(SimConfig { max_particles: cap, ..Default::default() }).unwrap();
        let mut sys = ParticleSystem::with_seed(config, 300.0, 300.0, 5).unwrap();
        for i in 0..spawns {
            let id = sys.create_particle(Vec2::splat(150.0), None).id;
            prop_assert!(sys.len() <= cap);
            prop_assert_eq!(sys.particles().last().map(|p| p.id), Some(id));
            prop_assert_eq!(id, i as u64 + 1);
        }
    }

    #[test]
    fn particles_stay_inside_viewport(
        width in 50.0f32..1200.0,
        height in 50.0f32..1200.0,
        gravity in 0.0f32..2000.0,
        friction in 0.0f32..=100.0,
        seed in any::<u64>(),
        field_set in fields(1200.0, 1200.0),
        ticks in 1usize..120,
    ) {
        let config = ConfigHandle::new(SimConfig {
            gravity,
            friction,
            particle_lifetime: 10.0,
            ..Default::default()
        }).unwrap();
        let mut sys = ParticleSystem::with_seed(config, width, height, seed).unwrap();
        for i in 0..20 {
            let t = i as f32 / 20.0;
            sys.create_particle(Vec2::new(width * t, height * (1.0 - t)), None);
        }
        for _ in 0..ticks {
            sys.update(DT, &field_set);
            let bounds = sys.bounds();
            for p in sys.particles() {
                prop_assert!(p.pos.is_finite());
                prop_assert!(bounds.contains(p.pos, p.radius), "{} escaped {:?}", p.pos, bounds);
            }
        }
    }

    #[test]
    fn life_decreases_by_dt_until_removed(lifetime in 0.05f32..1.0, ticks in 1usize..90) {
        let config = ConfigHandle::new(SimConfig {
            particle_lifetime: lifetime,
            ..Default::default()
        }).unwrap();
        let mut sys = ParticleSystem::with_seed(config, 400.0, 400.0, 11).unwrap();
        sys.create_particle(Vec2::splat(200.0), None);
        let no_fields: Vec<ForceField> = Vec::new();

        let mut last_life = lifetime;
        for _ in 0..ticks {
            sys.update(DT, &no_fields);
            match sys.particles().first() {
                Some(p) => {
                    prop_assert!(p.life > 0.0 && p.life <= p.max_life);
                    prop_assert!((last_life - p.life - DT).abs() < 1e-5);
                    last_life = p.life;
                }
                None => {
                    prop_assert!(last_life - DT <= 1e-5);
                    break;
                }
            }
        }
    }
}
