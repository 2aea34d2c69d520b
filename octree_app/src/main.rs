//! Octree Collision Demo
//!
//! Headless run of the collision pipeline:
//! - Unit cubes scattered through a cubic region with random velocity and spin
//! - Cubes bounce off the region walls
//! - Octree rebuilt and colliding pairs reported every frame
//! - Debug shapes produced each frame the way a renderer would consume them
//!
//! Pass a `.toml` or `.ron` scene file as the first argument to override
//! the defaults. Set `RUST_LOG=debug` to see per-frame collision summaries.

use collision_engine::prelude::*;
use collision_engine::foundation::math::Unit;
use collision_engine::foundation::logging::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Scene parameters for the demo
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct SceneConfig {
    /// Number of cubes
    entity_count: usize,
    /// Edge length of the cubic region the cubes bounce around in
    region_size: f32,
    /// Seed for placement, velocity and spin
    seed: u64,
    /// Frames to simulate
    frames: u32,
    /// Simulated seconds per frame
    delta_time: f32,
    /// Linear speed range (units per second)
    min_speed: f32,
    max_speed: f32,
    /// Largest spin rate (radians per second)
    max_spin: f32,
    /// Log a stats line every this many frames
    report_interval: u32,
    /// Octants emitted to the debug draw list
    display_leaves: bool,
    collision: CollisionConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            entity_count: 40,
            region_size: 30.0,
            seed: 42,
            frames: 600,
            delta_time: 1.0 / 60.0,
            min_speed: 1.0,
            max_speed: 6.0,
            max_spin: 1.5,
            report_interval: 60,
            display_leaves: true,
            collision: CollisionConfig::default(),
        }
    }
}

impl SceneConfig {
    /// Reject parameters that would leave no room to spawn or an empty sampling range
    fn validate(&self) -> Result<(), AppError> {
        if !self.region_size.is_finite() || self.region_size <= 2.0 {
            return Err(AppError::InvalidScene(format!(
                "region_size must be greater than 2 to fit unit cubes, got {}",
                self.region_size
            )));
        }
        if !self.min_speed.is_finite() || !self.max_speed.is_finite() || self.min_speed < 0.0 {
            return Err(AppError::InvalidScene(format!(
                "speeds must be finite and non-negative, got {}..{}",
                self.min_speed, self.max_speed
            )));
        }
        if self.min_speed > self.max_speed {
            return Err(AppError::InvalidScene(format!(
                "min_speed {} exceeds max_speed {}",
                self.min_speed, self.max_speed
            )));
        }
        if !self.max_spin.is_finite() || self.max_spin < 0.0 {
            return Err(AppError::InvalidScene(format!(
                "max_spin must be finite and non-negative, got {}",
                self.max_spin
            )));
        }
        if !self.delta_time.is_finite() || self.delta_time < 0.0 {
            return Err(AppError::InvalidScene(format!(
                "delta_time must be finite and non-negative, got {}",
                self.delta_time
            )));
        }
        Ok(())
    }
}

impl Config for SceneConfig {}

#[derive(Error, Debug)]
enum AppError {
    #[error("Failed to load scene: {0}")]
    Config(#[from] ConfigError),

    #[error("World error: {0}")]
    World(#[from] WorldError),

    #[error("Invalid scene: {0}")]
    InvalidScene(String),
}

/// A moving cube
struct Body {
    entity: EntityId,
    position: Vec3,
    velocity: Vec3,
    rotation: Quat,
    spin_axis: Unit<Vec3>,
    spin_rate: f32,
}

impl Body {
    fn spawn(world: &mut EntityManager, rng: &mut StdRng, scene: &SceneConfig) -> Self {
        let cube = [Vec3::new(-0.5, -0.5, -0.5), Vec3::new(0.5, 0.5, 0.5)];
        let entity = world.add_entity(&cube);
        let bounds = scene.region_size * 0.5 - 1.0;

        let position = Vec3::new(
            rng.gen_range(-bounds..bounds),
            rng.gen_range(-bounds..bounds),
            rng.gen_range(-bounds..bounds),
        );

        let speed = rng.gen_range(scene.min_speed..=scene.max_speed);
        let velocity = random_direction(rng).into_inner() * speed;

        Self {
            entity,
            position,
            velocity,
            rotation: Quat::identity(),
            spin_axis: random_direction(rng),
            spin_rate: rng.gen_range(0.0..=scene.max_spin),
        }
    }

    /// Advance one step, bouncing off the walls of a cube with half-edge `half_bounds`
    fn step(&mut self, delta_time: f32, half_bounds: f32) {
        self.position += self.velocity * delta_time;

        for axis in 0..3 {
            if self.position[axis] < -half_bounds || self.position[axis] > half_bounds {
                self.velocity[axis] = -self.velocity[axis];
                self.position[axis] = self.position[axis].clamp(-half_bounds, half_bounds);
            }
        }

        let spin = Quat::from_axis_angle(&self.spin_axis, self.spin_rate * delta_time);
        self.rotation = spin * self.rotation;
    }

    fn model_matrix(&self) -> Mat4 {
        Transform::from_position_rotation(self.position, self.rotation).to_matrix()
    }
}

fn random_direction(rng: &mut StdRng) -> Unit<Vec3> {
    let direction = Vec3::new(
        rng.gen_range(-1.0..1.0),
        rng.gen_range(-1.0..1.0),
        rng.gen_range(-1.0..1.0),
    );
    Unit::try_new(direction, 1.0e-3).unwrap_or_else(Vec3::x_axis)
}

fn load_scene() -> Result<SceneConfig, AppError> {
    let scene = match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading scene from {}", path);
            SceneConfig::load_from_file(&path)?
        }
        None => SceneConfig::default(),
    };
    scene.validate()?;
    Ok(scene)
}

fn run() -> Result<(), AppError> {
    let scene = load_scene()?;
    info!(
        "Scene: {} cubes in a {} unit region, seed {}, {} frames",
        scene.entity_count, scene.region_size, scene.seed, scene.frames
    );
    info!(
        "Octree: max level {}, ideal entity count {}, enabled {}",
        scene.collision.octree.max_level,
        scene.collision.octree.ideal_entity_count,
        scene.collision.use_octree
    );

    let mut rng = StdRng::seed_from_u64(scene.seed);
    let mut world = EntityManager::new();
    let mut bodies: Vec<Body> = (0..scene.entity_count)
        .map(|_| Body::spawn(&mut world, &mut rng, &scene))
        .collect();

    let mut collisions = CollisionSystem::new(scene.collision);
    let mut visualizer = CollisionDebugVisualizer::new();
    if scene.display_leaves {
        visualizer.octree_mode = OctreeDisplayMode::Leaves;
    }

    let half_bounds = scene.region_size * 0.5;
    let mut total_entered = 0;
    let mut peak_pairs = 0;

    for frame in 1..=scene.frames {
        for body in &mut bodies {
            body.step(scene.delta_time, half_bounds);
            world.set_model_matrix(body.entity, &body.model_matrix())?;
        }

        let pairs = collisions.update(&mut world).len();
        peak_pairs = peak_pairs.max(pairs);

        for pair in collisions.entered() {
            debug!("Frame {}: {:?} hit {:?}", frame, pair.entity_a, pair.entity_b);
        }
        for pair in collisions.exited() {
            debug!("Frame {}: {:?} left {:?}", frame, pair.entity_a, pair.entity_b);
        }
        total_entered += collisions.stats().entered;

        // A renderer would drain these each frame
        let shapes = visualizer.draw_frame(&world, collisions.octree()).len();

        if scene.report_interval > 0 && frame % scene.report_interval == 0 {
            let stats = collisions.stats();
            let octree = collisions.octree();
            info!(
                "Frame {}: {} colliding, {} candidates, {} octants ({} non-empty leaves, depth {}), {} debug shapes",
                frame,
                stats.colliding_pairs,
                stats.candidate_pairs,
                octree.octant_count(),
                octree.leaves().len(),
                octree.max_depth(),
                shapes
            );
        }
    }

    info!(
        "Done: {} collisions started, peak of {} simultaneous pairs",
        total_entered, peak_pairs
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    run()?;
    Ok(())
}
