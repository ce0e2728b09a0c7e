use crate::geometry::{GeometryError, MeshData};

use super::positive;

/// Axis-aligned box centred at the origin with full dimensions `width`
/// (X), `height` (Y) and `length` (Z).
///
/// Faces do not share vertices: 4 per face, 24 in total, each face mapped
/// to the whole `[0, 1]²` UV square.
pub fn cuboid(width: f32, height: f32, length: f32) -> Result<MeshData, GeometryError> {
    let w = positive("box width", width)? * 0.5;
    let h = positive("box height", height)? * 0.5;
    let l = positive("box length", length)? * 0.5;

    // corners listed counter-clockwise seen from outside
    #[rustfmt::skip]
    let faces: [[[f32; 3]; 4]; 6] = [
        // bottom (y-)
        [[ w, -h,  l], [-w, -h,  l], [-w, -h, -l], [ w, -h, -l]],
        // top    (y+)
        [[-w,  h,  l], [ w,  h,  l], [ w,  h, -l], [-w,  h, -l]],
        // left   (x-)
        [[-w, -h, -l], [-w, -h,  l], [-w,  h,  l], [-w,  h, -l]],
        // right  (x+)
        [[ w, -h,  l], [ w, -h, -l], [ w,  h, -l], [ w,  h,  l]],
        // front  (z+)
        [[-w, -h,  l], [ w, -h,  l], [ w,  h,  l], [-w,  h,  l]],
        // back   (z-)
        [[ w, -h, -l], [-w, -h, -l], [-w,  h, -l], [ w,  h, -l]],
    ];
    const FACE_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

    let mut positions = Vec::with_capacity(24);
    let mut uvs = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for corners in faces {
        let base = positions.len() as u32;
        positions.extend_from_slice(&corners);
        uvs.extend_from_slice(&FACE_UVS);
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    MeshData::new(positions, uvs, indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::primitives::test_util::{centroid, face_normal};

    #[test]
    fn counts_match_face_layout() {
        let mesh = cuboid(2.0, 2.0, 2.0).unwrap();
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.uvs().len(), 24);
        assert_eq!(mesh.indices().len(), 36);
        assert_eq!(mesh.primitive_count(), 12);
        assert!(mesh.indices().iter().all(|&i| (i as usize) < mesh.vertex_count()));
    }

    #[test]
    fn every_face_points_outward() {
        let mesh = cuboid(2.25, 2.0, 4.0).unwrap();
        for tri in mesh.triangles() {
            let n = face_normal(tri).unwrap();
            assert!(n.dot(centroid(tri)) > 0.0, "inward triangle {tri:?}");
        }
    }

    #[test]
    fn extents_are_halved() {
        let mesh = cuboid(2.25, 2.0, 4.0).unwrap();
        let max = mesh
            .positions()
            .iter()
            .fold([0.0f32; 3], |m, p| [m[0].max(p[0]), m[1].max(p[1]), m[2].max(p[2])]);
        assert_eq!(max, [1.125, 1.0, 2.0]);
    }

    #[test]
    fn rejects_non_positive_dimensions() {
        assert!(cuboid(0.0, 1.0, 1.0).is_err());
        assert!(cuboid(1.0, -1.0, 1.0).is_err());
        assert!(cuboid(1.0, 1.0, f32::NAN).is_err());
    }
}
