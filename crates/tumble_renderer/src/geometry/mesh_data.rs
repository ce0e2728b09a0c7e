use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("invalid geometry parameter: {0}")]
    InvalidParameter(String),
}

/// Only indexed triangle lists are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Topology {
    #[default]
    TriangleList,
}

/// Immutable indexed triangle mesh with separate position and UV streams.
///
/// Invariants, checked once by [`MeshData::new`]:
/// - `positions.len() == uvs.len()`
/// - `indices.len()` is a multiple of 3
/// - every index is `< positions.len()`
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    positions: Vec<[f32; 3]>,
    uvs: Vec<[f32; 2]>,
    indices: Vec<u32>,
    topology: Topology,
}

impl MeshData {
    pub fn new(
        positions: Vec<[f32; 3]>,
        uvs: Vec<[f32; 2]>,
        indices: Vec<u32>,
    ) -> Result<Self, GeometryError> {
        if positions.len() != uvs.len() {
            return Err(GeometryError::InvalidParameter(format!(
                "{} positions but {} uvs",
                positions.len(),
                uvs.len()
            )));
        }
        if indices.len() % 3 != 0 {
            return Err(GeometryError::InvalidParameter(format!(
                "{} indices do not form whole triangles",
                indices.len()
            )));
        }
        if let Some(bad) = indices.iter().find(|&&i| i as usize >= positions.len()) {
            return Err(GeometryError::InvalidParameter(format!(
                "index {bad} out of range for {} vertices",
                positions.len()
            )));
        }
        Ok(Self { positions, uvs, indices, topology: Topology::TriangleList })
    }

    #[inline]
    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    #[inline]
    pub fn uvs(&self) -> &[[f32; 2]] {
        &self.uvs
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    pub fn primitive_count(&self) -> u32 {
        (self.indices.len() / 3) as u32
    }

    /// Iterate triangles as vertex positions.
    pub fn triangles(&self) -> impl Iterator<Item = [[f32; 3]; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| {
            [
                self.positions[t[0] as usize],
                self.positions[t[1] as usize],
                self.positions[t[2] as usize],
            ]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_streams() {
        let err = MeshData::new(vec![[0.0; 3]; 3], vec![[0.0; 2]; 2], vec![0, 1, 2]);
        assert!(matches!(err, Err(GeometryError::InvalidParameter(_))));
    }

    #[test]
    fn rejects_partial_triangles_and_out_of_range_indices() {
        assert!(MeshData::new(vec![[0.0; 3]; 3], vec![[0.0; 2]; 3], vec![0, 1]).is_err());
        assert!(MeshData::new(vec![[0.0; 3]; 3], vec![[0.0; 2]; 3], vec![0, 1, 3]).is_err());
    }

    #[test]
    fn counts_primitives() {
        let mesh = MeshData::new(vec![[0.0; 3]; 4], vec![[0.0; 2]; 4], vec![0, 1, 2, 0, 2, 3]).unwrap();
        assert_eq!(mesh.primitive_count(), 2);
        assert_eq!(mesh.triangles().count(), 2);
        assert_eq!(mesh.topology(), Topology::TriangleList);
    }
}
