use std::f32::consts::{PI, TAU};

use crate::geometry::{GeometryError, MeshData};

use super::positive;

/// Latitude/longitude sphere centred at the origin.
///
/// Produces `(h_segments + 1) * (v_segments + 1)` vertices; the first and
/// last column sit on the same meridian with `u = 1` and `u = 0`, and the
/// pole rows repeat one vertex per column.  Triangles:
/// `2 * h_segments * v_segments` (those touching a pole are degenerate).
pub fn sphere(radius: f32, h_segments: u32, v_segments: u32) -> Result<MeshData, GeometryError> {
    let r = positive("sphere radius", radius)?;
    if h_segments == 0 || v_segments == 0 {
        return Err(GeometryError::InvalidParameter(format!(
            "sphere needs at least one segment each way, got {h_segments}x{v_segments}"
        )));
    }

    // every vertex must be addressable by a u32 index
    let grid = h_segments
        .checked_add(1)
        .zip(v_segments.checked_add(1))
        .and_then(|(columns, rows)| Some((columns, columns.checked_mul(rows)?)));
    let index_count = h_segments
        .checked_mul(v_segments)
        .and_then(|quads| quads.checked_mul(6));
    let (Some((columns, vertex_count)), Some(index_count)) = (grid, index_count) else {
        return Err(GeometryError::InvalidParameter(format!(
            "sphere grid {h_segments}x{v_segments} is too large for 32-bit indices"
        )));
    };
    let vertex_count = vertex_count as usize;
    let mut positions = Vec::with_capacity(vertex_count);
    let mut uvs = Vec::with_capacity(vertex_count);

    for v in 0..=v_segments {
        let theta = v as f32 * PI / v_segments as f32;
        let (sin_t, cos_t) = theta.sin_cos();
        for h in 0..=h_segments {
            // the seam column reuses phi = 0 so both ends are bit-identical
            let phi = (h % h_segments) as f32 * TAU / h_segments as f32;
            let (sin_p, cos_p) = phi.sin_cos();
            positions.push([r * sin_t * cos_p, r * cos_t, r * sin_t * sin_p]);
            uvs.push([1.0 - h as f32 / h_segments as f32, v as f32 / v_segments as f32]);
        }
    }

    let mut indices = Vec::with_capacity(index_count as usize);
    for v in 0..v_segments {
        for h in 0..h_segments {
            let top_right = v * columns + h;
            let top_left = top_right + 1;
            let lower_right = (v + 1) * columns + h;
            let lower_left = lower_right + 1;
            indices.extend_from_slice(&[
                lower_left, lower_right, top_right,
                lower_left, top_right, top_left,
            ]);
        }
    }

    MeshData::new(positions, uvs, indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::primitives::test_util::{centroid, face_normal};

    #[test]
    fn counts_follow_segment_grid() {
        let mesh = sphere(1.0, 4, 4).unwrap();
        assert_eq!(mesh.vertex_count(), 25);
        assert_eq!(mesh.primitive_count(), 32);
        assert_eq!(mesh.indices().len(), 96);
        assert!(mesh.indices().iter().all(|&i| (i as usize) < mesh.vertex_count()));

        let tall = sphere(1.0, 3, 5).unwrap();
        assert_eq!(tall.vertex_count(), 4 * 6);
        assert_eq!(tall.primitive_count(), 2 * 3 * 5);
    }

    #[test]
    fn north_pole_collapses() {
        let radius = 2.5;
        let mesh = sphere(radius, 8, 6).unwrap();
        for h in 0..=8 {
            assert_eq!(mesh.positions()[h], [0.0, radius, 0.0]);
        }
    }

    #[test]
    fn seam_closes_with_distinct_uvs() {
        let (hs, vs) = (8u32, 6u32);
        let mesh = sphere(1.0, hs, vs).unwrap();
        for v in 0..=vs {
            let first = (v * (hs + 1)) as usize;
            let last = first + hs as usize;
            assert_eq!(mesh.positions()[first], mesh.positions()[last]);
            assert_eq!(mesh.uvs()[first][0], 1.0);
            assert_eq!(mesh.uvs()[last][0], 0.0);
        }
    }

    #[test]
    fn vertices_lie_on_the_sphere() {
        let mesh = sphere(4.0, 32, 32).unwrap();
        for p in mesh.positions() {
            let len = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
            assert!((len - 4.0).abs() < 1e-4);
        }
    }

    #[test]
    fn triangles_face_outward() {
        let mesh = sphere(1.0, 16, 12).unwrap();
        let mut checked = 0;
        for tri in mesh.triangles() {
            // pole triangles have a repeated vertex
            if let Some(n) = face_normal(tri) {
                assert!(n.dot(centroid(tri)) > 0.0, "inward triangle {tri:?}");
                checked += 1;
            }
        }
        assert!(checked >= 2 * 16 * 10);
    }

    #[test]
    fn rejects_zero_segments_and_bad_radius() {
        assert!(matches!(sphere(1.0, 0, 4), Err(GeometryError::InvalidParameter(_))));
        assert!(sphere(1.0, 4, 0).is_err());
        assert!(sphere(0.0, 4, 4).is_err());
        assert!(sphere(-1.0, 4, 4).is_err());
    }

    #[test]
    fn rejects_grids_beyond_u32_indices() {
        assert!(matches!(sphere(1.0, u32::MAX, 1), Err(GeometryError::InvalidParameter(_))));
        assert!(matches!(sphere(1.0, 1, u32::MAX), Err(GeometryError::InvalidParameter(_))));
        // 65537 * 65537 vertices overflows u32
        assert!(matches!(sphere(1.0, 1 << 16, 1 << 16), Err(GeometryError::InvalidParameter(_))));
    }
}
