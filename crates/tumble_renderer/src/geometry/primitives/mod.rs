//! Procedural shape builders.  Every builder validates its parameters before
//! allocating anything and returns a finished [`MeshData`](super::MeshData).
//!
//! All triangles wind counter-clockwise when seen from outside the shape.

mod cuboid;
mod plane;
mod sphere;

pub use cuboid::cuboid;
pub use plane::plane;
pub use sphere::sphere;

use super::GeometryError;

fn positive(name: &str, value: f32) -> Result<f32, GeometryError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(GeometryError::InvalidParameter(format!("{name} must be finite and > 0, got {value}")))
    }
}

fn finite(name: &str, value: f32) -> Result<f32, GeometryError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(GeometryError::InvalidParameter(format!("{name} must be finite, got {value}")))
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    use glam::Vec3;

    /// Geometric normal of a CCW triangle, or `None` when degenerate.
    pub fn face_normal(tri: [[f32; 3]; 3]) -> Option<Vec3> {
        let [a, b, c] = tri.map(Vec3::from);
        let n = (b - a).cross(c - a);
        (n.length() > 1e-6).then(|| n.normalize())
    }

    /// Centroid of a triangle.
    pub fn centroid(tri: [[f32; 3]; 3]) -> Vec3 {
        tri.map(Vec3::from).iter().sum::<Vec3>() / 3.0
    }
}
