//! Scenario tests: volumes, octree and collision system working together

use std::collections::HashSet;

use crate::core::config::{CollisionConfig, OctreeConfig};
use crate::ecs::{EntityId, EntityManager};
use crate::foundation::math::{utils, Mat4, Quat, Transform, Vec3};
use crate::physics::collision::{Axis, SeparatingAxis};
use crate::physics::{CollisionPair, CollisionSystem};
use crate::spatial::{OctantState, ROOT_OCTANT};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn unit_cube() -> [Vec3; 2] {
    [Vec3::repeat(-0.5), Vec3::repeat(0.5)]
}

fn place(world: &mut EntityManager, id: EntityId, model: &Mat4) {
    world.set_model_matrix(id, model).expect("entity is alive");
}

fn translation(x: f32, y: f32, z: f32) -> Mat4 {
    Transform::from_position(Vec3::new(x, y, z)).to_matrix()
}

/// Unit cubes at random positions inside a cube of edge `region`, randomly rotated
fn scatter(world: &mut EntityManager, rng: &mut StdRng, count: usize, region: f32) -> Vec<EntityId> {
    let half = region * 0.5 - 0.5;
    (0..count)
        .map(|_| {
            let id = world.add_entity(&unit_cube());
            let position = Vec3::new(
                rng.gen_range(-half..half),
                rng.gen_range(-half..half),
                rng.gen_range(-half..half),
            );
            let rotation = Quat::from_euler_angles(
                rng.gen_range(0.0..std::f32::consts::PI),
                rng.gen_range(0.0..std::f32::consts::PI),
                rng.gen_range(0.0..std::f32::consts::PI),
            );
            let model = Transform::from_position_rotation(position, rotation).to_matrix();
            place(world, id, &model);
            id
        })
        .collect()
}

fn two_cubes(offset: Vec3) -> (EntityManager, EntityId, EntityId) {
    let mut world = EntityManager::new();
    let a = world.add_entity(&unit_cube());
    let b = world.add_entity(&unit_cube());
    place(&mut world, b, &translation(offset.x, offset.y, offset.z));
    (world, a, b)
}

#[test]
fn test_overlapping_unit_cubes() {
    let (mut world, a, b) = two_cubes(Vec3::new(0.5, 0.0, 0.0));

    let va = world.get(a).expect("a").volume();
    let vb = world.get(b).expect("b").volume();
    assert_eq!(va.separating_axis(vb), None);

    let mut system = CollisionSystem::default();
    system.update(&mut world);
    assert!(system.is_pair_colliding(a, b));
    assert!(world.get(a).expect("a").volume().is_colliding_with(b));
    assert!(world.get(b).expect("b").volume().is_colliding_with(a));
}

#[test]
fn test_separated_unit_cubes() {
    let (mut world, a, b) = two_cubes(Vec3::new(1.5, 0.0, 0.0));

    let va = world.get(a).expect("a").volume();
    let vb = world.get(b).expect("b").volume();
    assert_eq!(va.separating_axis(vb), Some(SeparatingAxis::FaceA(Axis::X)));
    assert_eq!(vb.separating_axis(va), Some(SeparatingAxis::FaceA(Axis::X)));

    let mut system = CollisionSystem::default();
    assert!(system.update(&mut world).is_empty());
    assert!(!world.get(a).expect("a").volume().has_collisions());
    assert!(!world.get(b).expect("b").volume().has_collisions());
}

#[test]
fn test_axis_aligned_separation_is_a_face_axis() {
    let mut rng = StdRng::seed_from_u64(5);
    for axis in 0..3 {
        for _ in 0..20 {
            let mut offset = Vec3::zeros();
            let sign: f32 = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
            offset[axis] = sign * rng.gen_range(1.01_f32..6.0);

            let (world, a, b) = two_cubes(offset);
            let va = world.get(a).expect("a").volume();
            let vb = world.get(b).expect("b").volume();

            match va.separating_axis(vb) {
                Some(found) => {
                    assert!(found.is_face(), "offset {offset:?} separated on {found}");
                    assert_eq!(found, SeparatingAxis::FaceA(Axis::ALL[axis]));
                }
                None => panic!("offset {offset:?} reported no separation"),
            }
        }
    }
}

#[test]
fn test_overlap_is_symmetric() {
    let tilt = Quat::from_euler_angles(0.3, 0.7, 1.1);
    let cases = [
        (Vec3::new(0.4, 0.2, 0.0), true),
        (Vec3::new(0.0, 0.9, 0.3), true),
        (Vec3::new(2.5, 0.0, 0.0), false),
        (Vec3::new(1.4, 1.4, 1.4), false),
    ];

    for (position, expected) in cases {
        let mut world = EntityManager::new();
        let a = world.add_entity(&unit_cube());
        let b = world.add_entity(&unit_cube());
        place(&mut world, b, &Transform::from_position_rotation(position, tilt).to_matrix());

        let va = world.get(a).expect("a").volume();
        let vb = world.get(b).expect("b").volume();
        assert_eq!(va.overlaps(vb), expected, "a vs b at {position:?}");
        assert_eq!(vb.overlaps(va), expected, "b vs a at {position:?}");

        assert_eq!(world.check_pair(0, 1), expected);
        let va = world.get(a).expect("a").volume();
        let vb = world.get(b).expect("b").volume();
        assert_eq!(va.is_colliding_with(b), vb.is_colliding_with(a));
    }
}

#[test]
fn test_colliding_sets_match_reported_pairs() {
    let mut rng = StdRng::seed_from_u64(21);
    let mut world = EntityManager::new();
    scatter(&mut world, &mut rng, 40, 8.0);

    let mut system = CollisionSystem::default();
    let pairs: HashSet<CollisionPair> = system.update(&mut world).clone();
    assert!(!pairs.is_empty());

    for pair in &pairs {
        let va = world.get(pair.entity_a).expect("a").volume();
        let vb = world.get(pair.entity_b).expect("b").volume();
        assert!(va.is_colliding_with(pair.entity_b));
        assert!(vb.is_colliding_with(pair.entity_a));
    }

    let memberships: usize = world.iter().map(|e| e.volume().collision_count()).sum();
    assert_eq!(memberships, pairs.len() * 2);
}

#[test]
fn test_octree_finds_every_brute_force_pair() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut world = EntityManager::new();
    scatter(&mut world, &mut rng, 60, 12.0);

    let mut with_tree = CollisionSystem::default();
    let bucketed = with_tree.update(&mut world).clone();

    let mut brute = CollisionSystem::new(CollisionConfig {
        use_octree: false,
        ..CollisionConfig::default()
    });
    world.mark_dirty();
    let all_pairs = brute.update(&mut world).clone();

    assert_eq!(bucketed, all_pairs);
    assert!(with_tree.stats().candidate_pairs < brute.stats().candidate_pairs);
    assert_eq!(brute.stats().candidate_pairs, 60 * 59 / 2);
}

#[test]
fn test_scattered_scene_subdivides() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut world = EntityManager::new();
    scatter(&mut world, &mut rng, 10, 10.0);

    let mut system = CollisionSystem::new(CollisionConfig {
        octree: OctreeConfig::new(3, 5),
        use_octree: true,
    });
    system.update(&mut world);

    let octree = system.octree();
    assert_eq!(octree.state(ROOT_OCTANT), Some(OctantState::Internal));
    assert!(octree.octants().all(|octant| octant.level() <= 3));

    let covered: HashSet<usize> = octree
        .leaves()
        .iter()
        .flat_map(|&leaf| octree.entities_in(leaf).iter().copied())
        .collect();
    assert_eq!(covered, (0..10).collect::<HashSet<usize>>());

    for entity in world.iter() {
        assert!(entity.dimensions().next().is_some());
    }
}

#[test]
fn test_empty_scene() {
    let mut world = EntityManager::new();
    let mut system = CollisionSystem::default();

    assert!(system.update(&mut world).is_empty());

    let octree = system.octree();
    let root = octree.root();
    assert_eq!(root.level(), 0);
    assert!(root.is_leaf());
    assert!(root.entities().is_empty());
    assert_eq!(octree.octant_count(), 1);
    assert_eq!(octree.child(ROOT_OCTANT, 0), None);
}

#[test]
fn test_unchanged_scene_rebuilds_identically() {
    let mut rng = StdRng::seed_from_u64(8);
    let mut world = EntityManager::new();
    scatter(&mut world, &mut rng, 30, 10.0);

    let mut system = CollisionSystem::default();
    let first_pairs = system.update(&mut world).clone();
    let snapshot = |system: &CollisionSystem| -> Vec<(usize, Vec<usize>)> {
        let octree = system.octree();
        octree
            .leaves()
            .iter()
            .map(|&leaf| (leaf, octree.entities_in(leaf).to_vec()))
            .collect()
    };
    let first_leaves = snapshot(&system);

    system.clear();
    let second_pairs = system.update(&mut world).clone();
    assert!(system.stats().rebuilt);
    assert_eq!(snapshot(&system), first_leaves);
    assert_eq!(second_pairs, first_pairs);
}

#[test]
fn test_local_extents_are_ordered() {
    let mut rng = StdRng::seed_from_u64(17);
    for _ in 0..25 {
        let points: Vec<Vec3> = (0..rng.gen_range(1..12))
            .map(|_| Vec3::new(rng.gen_range(-3.0..3.0), rng.gen_range(-3.0..3.0), rng.gen_range(-3.0..3.0)))
            .collect();

        let mut world = EntityManager::new();
        let id = world.add_entity(&points);
        let volume = world.get(id).expect("alive").volume();

        let (min, max) = utils::min_max(&points).expect("non-empty");
        assert_eq!(volume.min_local(), min);
        assert_eq!(volume.max_local(), max);
        assert!((0..3).all(|axis| volume.min_local()[axis] <= volume.max_local()[axis]));
        approx::assert_relative_eq!(
            volume.radius(),
            (volume.center_local() - volume.min_local()).magnitude()
        );
    }
}
