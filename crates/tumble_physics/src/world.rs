use glam::{Quat, Vec3};
use rapier3d::na::{Isometry3, Quaternion, Translation3, UnitQuaternion};
use rapier3d::parry::shape::ShapeType;
use rapier3d::prelude::*;

use tumble_core::simulation::validate_spawn;
use tumble_core::{
    BodyId, BodySnapshot, ShapeDesc, ShapeKind, Simulation, SimulationError, Transform,
    FIXED_TIMESTEP,
};

/// World-wide parameters fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldConfig {
    pub gravity: Vec3,
    /// Applied to every collider created in this world.
    pub friction: f32,
    pub restitution: f32,
    /// How bodies created through [`Simulation::spawn`] get their mass.
    pub spawn_mass: MassSpec,
    pub spawn_angular_damping: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            friction: 0.5,
            restitution: 0.0,
            spawn_mass: MassSpec::Mass(1.0),
            spawn_angular_damping: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MassSpec {
    /// Immovable body.
    Static,
    /// Total mass in kilograms.
    Mass(f32),
    /// Mass derived from the collider volume.
    Density(f32),
}

impl MassSpec {
    /// `0` means static, anything else is a dynamic body of that mass.
    pub fn from_mass(mass: f32) -> Self {
        if mass == 0.0 {
            MassSpec::Static
        } else {
            MassSpec::Mass(mass)
        }
    }

    fn is_valid(&self) -> bool {
        match *self {
            MassSpec::Static => true,
            MassSpec::Mass(m) | MassSpec::Density(m) => m.is_finite() && m > 0.0,
        }
    }
}

/// Everything needed to insert one body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDesc {
    pub shape: ShapeDesc,
    pub transform: Transform,
    pub mass: MassSpec,
    pub linear_velocity: Vec3,
    pub angular_damping: f32,
    /// Continuous collision detection, for fast projectiles.
    pub ccd: bool,
}

impl BodyDesc {
    /// `addBody(shape, transform, mass)`: mass `0` gives a static body.
    pub fn new(shape: ShapeDesc, transform: Transform, mass: f32) -> Self {
        Self {
            shape,
            transform,
            mass: MassSpec::from_mass(mass),
            linear_velocity: Vec3::ZERO,
            angular_damping: 0.0,
            ccd: false,
        }
    }

    pub fn with_mass(mut self, mass: MassSpec) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.linear_velocity = velocity;
        self
    }

    pub fn with_angular_damping(mut self, damping: f32) -> Self {
        self.angular_damping = damping;
        self
    }

    pub fn with_ccd(mut self, enabled: bool) -> Self {
        self.ccd = enabled;
        self
    }
}

struct BodyEntry {
    id: BodyId,
    body: RigidBodyHandle,
    collider: ColliderHandle,
}

/// A single rapier world and everything the pipeline needs to step it.
///
/// Bodies are kept in insertion order; that is also the enumeration order.
pub struct RapierSimulation {
    config: WorldConfig,
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    entries: Vec<BodyEntry>,
    next_id: u64,
}

impl RapierSimulation {
    /// Empty world with the given gravity and materials.
    pub fn new(config: WorldConfig) -> Result<Self, SimulationError> {
        if !config.gravity.is_finite() {
            return Err(SimulationError::InvalidParameter(format!(
                "non-finite gravity {}",
                config.gravity
            )));
        }
        if !config.spawn_mass.is_valid() || matches!(config.spawn_mass, MassSpec::Static) {
            return Err(SimulationError::InvalidParameter(format!(
                "spawned bodies need a positive mass, got {:?}",
                config.spawn_mass
            )));
        }
        let g = config.gravity;
        Ok(Self {
            config,
            gravity: vector![g.x, g.y, g.z],
            integration_parameters: IntegrationParameters {
                dt: FIXED_TIMESTEP,
                ..Default::default()
            },
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            entries: Vec::new(),
            next_id: 0,
        })
    }

    /// `initialize(config)`: new world seeded with `layout`, in order.
    pub fn initialize(config: WorldConfig, layout: &[BodyDesc]) -> Result<Self, SimulationError> {
        let mut sim = Self::new(config)?;
        for desc in layout {
            sim.add_body(desc)?;
        }
        log::info!("physics world seeded with {} bodies", sim.body_count());
        Ok(sim)
    }

    pub fn gravity(&self) -> Vec3 {
        self.config.gravity
    }

    /// Insert one body of any kind.  Validation happens before the world is
    /// touched, so a rejected descriptor leaves no trace.
    pub fn add_body(&mut self, desc: &BodyDesc) -> Result<BodyId, SimulationError> {
        desc.shape.validate()?;
        if !desc.mass.is_valid() {
            return Err(SimulationError::InvalidParameter(format!("bad mass {:?}", desc.mass)));
        }
        if !desc.transform.position.is_finite() || !desc.transform.rotation.is_finite() {
            return Err(SimulationError::InvalidParameter(format!(
                "non-finite transform {:?}",
                desc.transform
            )));
        }
        if !desc.linear_velocity.is_finite() || !desc.angular_damping.is_finite() {
            return Err(SimulationError::InvalidParameter(
                "non-finite velocity or damping".into(),
            ));
        }
        let is_static = matches!(desc.mass, MassSpec::Static);
        if matches!(desc.shape, ShapeDesc::Plane) && !is_static {
            return Err(SimulationError::InvalidParameter("planes must be static".into()));
        }

        let builder = if is_static {
            RigidBodyBuilder::fixed()
        } else {
            let v = desc.linear_velocity;
            RigidBodyBuilder::dynamic()
                .linvel(vector![v.x, v.y, v.z])
                .angular_damping(desc.angular_damping)
                .ccd_enabled(desc.ccd)
        };
        let body = builder.position(to_isometry(&desc.transform)).build();

        let collider = match desc.shape {
            ShapeDesc::Plane => ColliderBuilder::halfspace(Vector::y_axis()),
            ShapeDesc::Cuboid { half_extents: h } => ColliderBuilder::cuboid(h.x, h.y, h.z),
            ShapeDesc::Sphere { radius } => ColliderBuilder::ball(radius),
        }
        .friction(self.config.friction)
        .restitution(self.config.restitution);
        let collider = match desc.mass {
            MassSpec::Static => collider,
            MassSpec::Mass(m) => collider.mass(m),
            MassSpec::Density(d) => collider.density(d),
        }
        .build();

        let body = self.rigid_body_set.insert(body);
        let collider = self
            .collider_set
            .insert_with_parent(collider, body, &mut self.rigid_body_set);

        let id = BodyId(self.next_id);
        self.next_id += 1;
        self.entries.push(BodyEntry { id, body, collider });
        log::trace!("added body {:?} ({:?})", id, desc.shape.kind());
        Ok(id)
    }

    fn snapshot(&self, entry: &BodyEntry) -> Option<BodySnapshot> {
        let body = self.rigid_body_set.get(entry.body)?;
        let kind = self
            .collider_set
            .get(entry.collider)
            .map(|c| classify(c.shape().shape_type()))
            .unwrap_or(ShapeKind::Unsupported);
        Some(BodySnapshot {
            id: entry.id,
            kind,
            transform: from_isometry(body.position()),
        })
    }

    /// Snapshot of one body by id.
    pub fn body(&self, id: BodyId) -> Option<BodySnapshot> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .and_then(|e| self.snapshot(e))
    }
}

impl Simulation for RapierSimulation {
    fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    fn spawn(
        &mut self,
        shape: ShapeDesc,
        position: Vec3,
        orientation: Quat,
        velocity: Vec3,
    ) -> Result<BodyId, SimulationError> {
        validate_spawn(&shape, position, orientation, velocity)?;
        let desc = BodyDesc::new(shape, Transform::new(position, orientation), 1.0)
            .with_mass(self.config.spawn_mass)
            .with_velocity(velocity)
            .with_angular_damping(self.config.spawn_angular_damping)
            .with_ccd(true);
        self.add_body(&desc)
    }

    fn bodies(&self) -> impl Iterator<Item = BodySnapshot> + '_ {
        self.entries.iter().filter_map(|entry| self.snapshot(entry))
    }

    fn remove_body(&mut self, id: BodyId) -> Result<(), SimulationError> {
        let index = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(SimulationError::UnknownBody(id))?;
        let entry = self.entries.remove(index);
        // removing the body also removes its attached collider
        self.rigid_body_set.remove(
            entry.body,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
        Ok(())
    }

    fn body_count(&self) -> usize {
        self.entries.len()
    }
}

impl Drop for RapierSimulation {
    fn drop(&mut self) {
        let count = self.entries.len();
        while let Some(entry) = self.entries.pop() {
            self.rigid_body_set.remove(
                entry.body,
                &mut self.island_manager,
                &mut self.collider_set,
                &mut self.impulse_joint_set,
                &mut self.multibody_joint_set,
                true,
            );
        }
        log::debug!("physics world released {count} bodies");
    }
}

// ── conversions ────────────────────────────────────────────────────────────

fn classify(shape: ShapeType) -> ShapeKind {
    match shape {
        ShapeType::HalfSpace => ShapeKind::Plane,
        ShapeType::Cuboid => ShapeKind::Box,
        ShapeType::Ball => ShapeKind::Sphere,
        _ => ShapeKind::Unsupported,
    }
}

fn to_isometry(t: &Transform) -> Isometry3<Real> {
    let q = t.rotation;
    Isometry3::from_parts(
        Translation3::new(t.position.x, t.position.y, t.position.z),
        UnitQuaternion::from_quaternion(Quaternion::new(q.w, q.x, q.y, q.z)),
    )
}

fn from_isometry(iso: &Isometry3<Real>) -> Transform {
    let p = iso.translation.vector;
    let q = iso.rotation.coords;
    Transform::new(Vec3::new(p.x, p.y, p.z), Quat::from_xyzw(q.x, q.y, q.z, q.w))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ground() -> BodyDesc {
        BodyDesc::new(ShapeDesc::Plane, Transform::IDENTITY, 0.0)
    }

    fn falling_box_world() -> (RapierSimulation, BodyId) {
        let config = WorldConfig {
            gravity: Vec3::new(0.0, -10.0, 0.0),
            ..Default::default()
        };
        let mut sim = RapierSimulation::initialize(config, &[ground()]).unwrap();
        let id = sim
            .add_body(&BodyDesc::new(
                ShapeDesc::Cuboid { half_extents: Vec3::ONE },
                Transform::from_position(Vec3::new(0.0, 5.0, 0.0)),
                1.0,
            ))
            .unwrap();
        (sim, id)
    }

    #[test]
    fn box_falls_and_rests_on_ground() {
        let (mut sim, id) = falling_box_world();
        let start = sim.body(id).unwrap().transform.position.y;
        let mut lowest = start;
        for _ in 0..120 {
            sim.step(FIXED_TIMESTEP);
            lowest = lowest.min(sim.body(id).unwrap().transform.position.y);
        }
        let end = sim.body(id).unwrap().transform.position.y;
        assert!(end < start);
        assert!((end - 1.0).abs() < 0.05, "resting height {end}");
        assert!(lowest > 0.75, "box sank to {lowest}");
    }

    #[test]
    fn identical_worlds_step_identically() {
        let (mut a, _) = falling_box_world();
        let (mut b, _) = falling_box_world();
        for _ in 0..90 {
            a.step(FIXED_TIMESTEP);
            b.step(FIXED_TIMESTEP);
        }
        let ta: Vec<_> = a.bodies().collect();
        let tb: Vec<_> = b.bodies().collect();
        assert_eq!(ta, tb);
    }

    #[test]
    fn spawned_sphere_is_enumerated_before_stepping() {
        let (mut sim, _) = falling_box_world();
        let before: Vec<BodyId> = sim.bodies().map(|s| s.id).collect();
        let p = Vec3::new(3.0, 7.0, -2.0);
        let id = sim
            .spawn(ShapeDesc::Sphere { radius: 1.0 }, p, Quat::IDENTITY, Vec3::new(0.0, 0.0, -100.0))
            .unwrap();
        assert!(!before.contains(&id));
        let snap = sim.bodies().find(|s| s.id == id).unwrap();
        assert_eq!(snap.kind, ShapeKind::Sphere);
        assert!(snap.transform.position.abs_diff_eq(p, 1e-6));
    }

    #[test]
    fn rejected_spawn_leaves_world_untouched() {
        let (mut sim, _) = falling_box_world();
        let err = sim.spawn(
            ShapeDesc::Sphere { radius: 1.0 },
            Vec3::new(f32::NAN, 0.0, 0.0),
            Quat::IDENTITY,
            Vec3::ZERO,
        );
        assert!(matches!(err, Err(SimulationError::InvalidParameter(_))));
        assert_eq!(sim.body_count(), 2);
    }

    #[test]
    fn shapes_are_classified_from_colliders() {
        let (sim, _) = falling_box_world();
        let kinds: Vec<ShapeKind> = sim.bodies().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![ShapeKind::Plane, ShapeKind::Box]);
    }

    #[test]
    fn remove_body_drops_it_and_rejects_unknown_ids() {
        let (mut sim, id) = falling_box_world();
        sim.remove_body(id).unwrap();
        assert_eq!(sim.body_count(), 1);
        assert!(sim.body(id).is_none());
        assert_eq!(sim.remove_body(id), Err(SimulationError::UnknownBody(id)));
    }

    #[test]
    fn ids_are_not_reused_after_removal() {
        let (mut sim, id) = falling_box_world();
        sim.remove_body(id).unwrap();
        let next = sim
            .spawn(ShapeDesc::Sphere { radius: 0.5 }, Vec3::Y, Quat::IDENTITY, Vec3::ZERO)
            .unwrap();
        assert!(next > id);
    }

    #[test]
    fn dynamic_planes_and_bad_masses_are_rejected() {
        let mut sim = RapierSimulation::new(WorldConfig::default()).unwrap();
        let plane = BodyDesc::new(ShapeDesc::Plane, Transform::IDENTITY, 1.0);
        assert!(sim.add_body(&plane).is_err());
        let cube = BodyDesc::new(ShapeDesc::Cuboid { half_extents: Vec3::ONE }, Transform::IDENTITY, -2.0);
        assert!(sim.add_body(&cube).is_err());
        assert_eq!(sim.body_count(), 0);
    }

    #[test]
    fn isometry_round_trip_preserves_transform() {
        let t = Transform::new(Vec3::new(1.0, -2.0, 3.5), Quat::from_rotation_y(0.8));
        let back = from_isometry(&to_isometry(&t));
        assert!(back.position.abs_diff_eq(t.position, 1e-6));
        assert!(back.rotation.abs_diff_eq(t.rotation, 1e-6));
    }
}
