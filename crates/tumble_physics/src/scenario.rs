//! Seeded layouts for the demo.
//!
//! Both layouts share one engine; they differ only in gravity, materials,
//! the initial bodies and what the launch key fires.

use std::f32::consts::{FRAC_PI_3, FRAC_PI_4, PI, TAU};
use std::fmt;
use std::str::FromStr;

use glam::{Quat, Vec3};
use thiserror::Error;

use tumble_core::{BodyId, Camera, ShapeDesc, Simulation, SimulationError, Transform};

use crate::world::{BodyDesc, MassSpec, RapierSimulation, WorldConfig};

// ── ring ───────────────────────────────────────────────────────────────────
const RING_ROWS: usize = 24;
const RING_COLUMNS: usize = 16;
const RING_RADIUS: f32 = 12.0;
const RING_BOX_HALF_EXTENTS: Vec3 = Vec3::new(1.125, 1.0, 2.0);
const RING_BOX_MASS: f32 = 0.25;
const RING_LAUNCH_SPEED: f32 = 100.0;

// ── stacks ─────────────────────────────────────────────────────────────────
const STACK_COUNT: usize = 4;
const STACK_SIZE: usize = 10;
const STACK_SPACING: f32 = 10.0;
const STACK_HALF_EXTENT: f32 = 2.0;
const STACK_DENSITY: f32 = 20.0;
const STACK_LAUNCH_SPEED: f32 = 175.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scenario {
    /// Cylindrical tower of boxes; three small spheres per launch.
    #[default]
    Ring,
    /// Pyramids of cubes; one heavy sphere per launch.
    Stacks,
}

#[derive(Debug, Error)]
#[error("unknown scenario `{0}` (expected `ring` or `stacks`)")]
pub struct ScenarioParseError(pub String);

impl FromStr for Scenario {
    type Err = ScenarioParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ring" => Ok(Scenario::Ring),
            "stacks" => Ok(Scenario::Stacks),
            other => Err(ScenarioParseError(other.to_string())),
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Scenario::Ring => "ring",
            Scenario::Stacks => "stacks",
        })
    }
}

impl Scenario {
    pub fn world_config(&self) -> WorldConfig {
        match self {
            Scenario::Ring => WorldConfig {
                gravity: Vec3::new(0.0, -10.0, 0.0),
                friction: 0.5,
                restitution: 0.0,
                spawn_mass: MassSpec::Mass(1.0),
                spawn_angular_damping: 0.0,
            },
            Scenario::Stacks => WorldConfig {
                gravity: Vec3::new(0.0, -9.81, 0.0),
                friction: 0.5,
                restitution: 0.6,
                spawn_mass: MassSpec::Density(10.0),
                spawn_angular_damping: 0.5,
            },
        }
    }

    /// Half extents of every box this layout creates.
    pub fn box_half_extents(&self) -> Vec3 {
        match self {
            Scenario::Ring => RING_BOX_HALF_EXTENTS,
            Scenario::Stacks => Vec3::splat(STACK_HALF_EXTENT),
        }
    }

    /// Radius of launched spheres.
    pub fn sphere_radius(&self) -> f32 {
        match self {
            Scenario::Ring => 1.0,
            Scenario::Stacks => 4.0,
        }
    }

    /// Ground plane first, then the boxes.
    pub fn layout(&self) -> Vec<BodyDesc> {
        let mut bodies = vec![BodyDesc::new(ShapeDesc::Plane, Transform::IDENTITY, 0.0)];
        match self {
            Scenario::Ring => bodies.extend(ring_layout()),
            Scenario::Stacks => bodies.extend(stacks_layout()),
        }
        bodies
    }

    pub fn build(&self) -> Result<RapierSimulation, SimulationError> {
        log::info!("building `{self}` scenario");
        RapierSimulation::initialize(self.world_config(), &self.layout())
    }

    /// Starting camera for this layout.
    pub fn camera(&self) -> Camera {
        let horizontal = -0.75 * PI;
        match self {
            Scenario::Ring => Camera::new(Vec3::new(50.0, 30.0, 50.0), horizontal, 0.0, FRAC_PI_3),
            Scenario::Stacks => Camera::new(Vec3::new(50.0, 20.0, 50.0), horizontal, 0.0, FRAC_PI_4),
        }
    }

    /// Fire this layout's projectiles from the camera.
    pub fn launch<S: Simulation>(
        &self,
        sim: &mut S,
        camera: &Camera,
    ) -> Result<Vec<BodyId>, SimulationError> {
        let direction = camera.direction();
        let ball = ShapeDesc::Sphere { radius: self.sphere_radius() };
        let (origins, speed) = match self {
            Scenario::Ring => {
                let eye = camera.eye;
                let side = camera.right() * 7.5;
                let origins = vec![
                    Vec3::new(eye.x - side.x, eye.y - 10.0, eye.z - side.z),
                    Vec3::new(eye.x, eye.y - 7.5, eye.z),
                    Vec3::new(eye.x + side.x, eye.y - 10.0, eye.z + side.z),
                ];
                (origins, RING_LAUNCH_SPEED)
            }
            Scenario::Stacks => (vec![camera.eye], STACK_LAUNCH_SPEED),
        };

        origins
            .into_iter()
            .map(|origin| -> Result<BodyId, SimulationError> {
                let id = sim.spawn(ball, origin, Quat::IDENTITY, direction * speed)?;
                log::info!("launched sphere {:?} from {origin}", id);
                Ok(id)
            })
            .collect()
    }
}

fn ring_layout() -> impl Iterator<Item = BodyDesc> {
    (0..RING_ROWS).flat_map(|row| {
        (0..RING_COLUMNS).map(move |column| {
            let stagger = (row % 2) as f32 / 2.0;
            let angle = TAU * (column as f32 + stagger) / RING_COLUMNS as f32;
            let position = Vec3::new(
                RING_RADIUS * angle.cos(),
                1.0 + 2.0 * row as f32,
                -RING_RADIUS * angle.sin(),
            );
            BodyDesc::new(
                ShapeDesc::Cuboid { half_extents: RING_BOX_HALF_EXTENTS },
                Transform::new(position, Quat::from_rotation_y(angle)),
                RING_BOX_MASS,
            )
        })
    })
}

fn stacks_layout() -> impl Iterator<Item = BodyDesc> {
    (0..STACK_COUNT).flat_map(|stack| {
        let origin = Vec3::new(0.0, 0.0, -(stack as f32) * STACK_SPACING);
        (0..STACK_SIZE).flat_map(move |i| {
            (0..STACK_SIZE - i).map(move |j| {
                let local = Vec3::new(
                    (2 * j) as f32 - (STACK_SIZE - i) as f32,
                    (2 * i + 1) as f32,
                    0.0,
                ) * STACK_HALF_EXTENT;
                BodyDesc::new(
                    ShapeDesc::Cuboid { half_extents: Vec3::splat(STACK_HALF_EXTENT) },
                    Transform::from_position(origin + local),
                    1.0,
                )
                .with_mass(MassSpec::Density(STACK_DENSITY))
            })
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tumble_core::ShapeKind;

    #[test]
    fn ring_seeds_ground_and_boxes() {
        let sim = Scenario::Ring.build().unwrap();
        assert_eq!(sim.body_count(), 1 + RING_ROWS * RING_COLUMNS);
        assert_eq!(sim.gravity(), Vec3::new(0.0, -10.0, 0.0));
        let kinds: Vec<ShapeKind> = sim.bodies().map(|b| b.kind).collect();
        assert_eq!(kinds[0], ShapeKind::Plane);
        assert!(kinds[1..].iter().all(|k| *k == ShapeKind::Box));
    }

    #[test]
    fn ring_boxes_sit_on_the_ring() {
        for desc in ring_layout() {
            let p = desc.transform.position;
            let r = (p.x * p.x + p.z * p.z).sqrt();
            assert!((r - RING_RADIUS).abs() < 1e-4);
        }
        let second_row = ring_layout().nth(RING_COLUMNS).unwrap();
        assert_eq!(second_row.transform.position.y, 3.0);
    }

    #[test]
    fn stacks_are_pyramids() {
        // 10 + 9 + ... + 1 per stack
        let per_stack = STACK_SIZE * (STACK_SIZE + 1) / 2;
        assert_eq!(stacks_layout().count(), STACK_COUNT * per_stack);
        let first = stacks_layout().next().unwrap();
        assert_eq!(first.transform.position, Vec3::new(-20.0, 2.0, 0.0));
        let last = stacks_layout().last().unwrap();
        assert_eq!(last.transform.position, Vec3::new(-2.0, 38.0, -30.0));
    }

    #[test]
    fn launches_fire_from_the_camera() {
        let mut sim = Scenario::Ring.build().unwrap();
        let camera = Scenario::Ring.camera();
        let ids = Scenario::Ring.launch(&mut sim, &camera).unwrap();
        assert_eq!(ids.len(), 3);
        let middle = sim.body(ids[1]).unwrap();
        assert_eq!(middle.kind, ShapeKind::Sphere);
        assert!(middle.transform.position.abs_diff_eq(camera.eye - Vec3::Y * 7.5, 1e-5));

        let mut stacks = Scenario::Stacks.build().unwrap();
        let ids = Scenario::Stacks.launch(&mut stacks, &Scenario::Stacks.camera()).unwrap();
        assert_eq!(ids.len(), 1);
    }

    #[test]
    fn parses_names() {
        assert_eq!("Ring".parse::<Scenario>().unwrap(), Scenario::Ring);
        assert_eq!("stacks".parse::<Scenario>().unwrap(), Scenario::Stacks);
        assert!("pile".parse::<Scenario>().is_err());
        assert_eq!(Scenario::Stacks.to_string(), "stacks");
    }
}
