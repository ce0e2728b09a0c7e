use crate::geometry::{GeometryError, MeshData};

use super::{finite, positive};

/// Square at height `base`, spanning `[-half_extent, half_extent]` on X and
/// Z, facing +Y.  UVs run from 0 to `uv_scale` so a repeating sampler tiles
/// the texture `uv_scale` times across the quad.
pub fn plane(base: f32, half_extent: f32, uv_scale: f32) -> Result<MeshData, GeometryError> {
    let b = finite("plane base", base)?;
    let s = positive("plane half extent", half_extent)?;
    let t = finite("plane uv scale", uv_scale)?;

    let positions = vec![[-s, b, -s], [s, b, -s], [s, b, s], [-s, b, s]];
    let uvs = vec![[0.0, 0.0], [t, 0.0], [t, t], [0.0, t]];
    let indices = vec![0, 2, 1, 0, 3, 2];

    MeshData::new(positions, uvs, indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::primitives::test_util::face_normal;
    use glam::Vec3;

    #[test]
    fn quad_faces_up() {
        let mesh = plane(0.0, 128.0, 2.0).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.primitive_count(), 2);
        for tri in mesh.triangles() {
            let n = face_normal(tri).unwrap();
            assert!(n.abs_diff_eq(Vec3::Y, 1e-6));
        }
    }

    #[test]
    fn uvs_scale_and_height_is_respected() {
        let mesh = plane(-3.0, 1.0, 4.0).unwrap();
        assert!(mesh.positions().iter().all(|p| p[1] == -3.0));
        assert_eq!(mesh.uvs()[2], [4.0, 4.0]);
    }

    #[test]
    fn rejects_bad_extent() {
        assert!(plane(0.0, 0.0, 1.0).is_err());
        assert!(plane(0.0, -1.0, 1.0).is_err());
        assert!(plane(f32::NAN, 1.0, 1.0).is_err());
        assert!(plane(0.0, 1.0, f32::INFINITY).is_err());
    }
}
