//! Capability surface of a rigid-body simulation.
//!
//! The renderer only ever sees [`BodySnapshot`]s; which engine produced them
//! is invisible past this trait.

use glam::{Quat, Vec3};
use thiserror::Error;

use crate::transform::Transform;

/// Simulation advance per displayed frame, in seconds.
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;

/// Stable identifier of a simulated body.  Never reused within one world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u64);

/// Closed set of shape categories the renderer knows how to classify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Plane,
    Box,
    Sphere,
    /// Anything the adapter cannot map onto the categories above.
    Unsupported,
}

/// Geometry of a body to be created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeDesc {
    /// Infinite static plane through the body origin with normal +Y.
    Plane,
    Cuboid { half_extents: Vec3 },
    Sphere { radius: f32 },
}

impl ShapeDesc {
    pub fn kind(&self) -> ShapeKind {
        match self {
            ShapeDesc::Plane => ShapeKind::Plane,
            ShapeDesc::Cuboid { .. } => ShapeKind::Box,
            ShapeDesc::Sphere { .. } => ShapeKind::Sphere,
        }
    }

    /// Dimensions must be finite and strictly positive.
    pub fn validate(&self) -> Result<(), SimulationError> {
        let ok = match *self {
            ShapeDesc::Plane => true,
            ShapeDesc::Cuboid { half_extents } => {
                half_extents.is_finite() && half_extents.min_element() > 0.0
            }
            ShapeDesc::Sphere { radius } => radius.is_finite() && radius > 0.0,
        };
        if ok {
            Ok(())
        } else {
            Err(SimulationError::InvalidParameter(format!("bad shape dimensions: {self:?}")))
        }
    }
}

/// Read-only observation of one body for the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodySnapshot {
    pub id: BodyId,
    pub kind: ShapeKind,
    pub transform: Transform,
}

#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    #[error("invalid simulation parameter: {0}")]
    InvalidParameter(String),
    #[error("no body with id {0:?}")]
    UnknownBody(BodyId),
}

/// One owned physics world.
///
/// Enumeration borrows the world immutably, so the borrow checker already
/// forbids holding snapshots across a `step`.
pub trait Simulation {
    /// Advance by exactly `dt` seconds.
    fn step(&mut self, dt: f32);

    /// Insert one dynamic body and return its id.
    ///
    /// Non-finite position, orientation or velocity is rejected before the
    /// world is touched.
    fn spawn(
        &mut self,
        shape: ShapeDesc,
        position: Vec3,
        orientation: Quat,
        velocity: Vec3,
    ) -> Result<BodyId, SimulationError>;

    /// Snapshots of every body, in whatever order the engine keeps them.
    fn bodies(&self) -> impl Iterator<Item = BodySnapshot> + '_;

    /// Remove one body and its collider.
    fn remove_body(&mut self, id: BodyId) -> Result<(), SimulationError>;

    fn body_count(&self) -> usize;
}

/// Shared spawn-parameter check for adapters.
pub fn validate_spawn(
    shape: &ShapeDesc,
    position: Vec3,
    orientation: Quat,
    velocity: Vec3,
) -> Result<(), SimulationError> {
    if matches!(shape, ShapeDesc::Plane) {
        return Err(SimulationError::InvalidParameter(
            "planes are static and cannot be spawned".into(),
        ));
    }
    shape.validate()?;
    if !position.is_finite() {
        return Err(SimulationError::InvalidParameter(format!("non-finite position {position}")));
    }
    if !orientation.is_finite() || orientation.length_squared() < 1e-12 {
        return Err(SimulationError::InvalidParameter(format!("bad orientation {orientation}")));
    }
    if !velocity.is_finite() {
        return Err(SimulationError::InvalidParameter(format!("non-finite velocity {velocity}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_validation_rejects_non_finite_values() {
        let ball = ShapeDesc::Sphere { radius: 1.0 };
        assert!(validate_spawn(&ball, Vec3::ZERO, Quat::IDENTITY, Vec3::ONE).is_ok());
        assert!(validate_spawn(&ball, Vec3::new(f32::NAN, 0.0, 0.0), Quat::IDENTITY, Vec3::ZERO).is_err());
        assert!(validate_spawn(&ball, Vec3::ZERO, Quat::IDENTITY, Vec3::splat(f32::INFINITY)).is_err());
        assert!(validate_spawn(&ball, Vec3::ZERO, Quat::from_xyzw(0.0, 0.0, 0.0, 0.0), Vec3::ZERO).is_err());
    }

    #[test]
    fn planes_and_degenerate_shapes_cannot_be_spawned() {
        assert!(validate_spawn(&ShapeDesc::Plane, Vec3::ZERO, Quat::IDENTITY, Vec3::ZERO).is_err());
        let flat = ShapeDesc::Cuboid { half_extents: Vec3::new(1.0, 0.0, 1.0) };
        assert!(validate_spawn(&flat, Vec3::ZERO, Quat::IDENTITY, Vec3::ZERO).is_err());
        assert!(ShapeDesc::Sphere { radius: -1.0 }.validate().is_err());
    }

    #[test]
    fn descriptors_map_to_kinds() {
        assert_eq!(ShapeDesc::Plane.kind(), ShapeKind::Plane);
        assert_eq!(ShapeDesc::Sphere { radius: 1.0 }.kind(), ShapeKind::Sphere);
        assert_eq!(ShapeDesc::Cuboid { half_extents: Vec3::ONE }.kind(), ShapeKind::Box);
    }
}
