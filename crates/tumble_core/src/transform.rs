//! Rigid world-space transform: position plus orientation.
//!
//! Bodies coming out of the simulation never carry scale, so neither does
//! this type.  Call `.matrix()` to get the model matrix for the GPU.

use glam::{Mat4, Quat, Vec3};

/// World-space rigid transform.
///
/// # Example
/// ```rust,ignore
/// use tumble_core::Transform;
/// use glam::Vec3;
///
/// let t = Transform::from_position(Vec3::new(1.0, 0.0, 0.0));
/// let m = t.matrix();
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// World-space position.
    pub position: Vec3,
    /// Orientation as a unit quaternion.
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// No translation, no rotation.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation: rotation.normalize() }
    }

    /// Construct with a world-space position and identity rotation.
    pub fn from_position(position: Vec3) -> Self {
        Self { position, ..Self::IDENTITY }
    }

    /// Build the model matrix (`T * R`).
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
    }
}
