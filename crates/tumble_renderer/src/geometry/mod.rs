//! CPU-side mesh data and the procedural shape builders.

pub mod mesh_data;
pub mod primitives;

pub use mesh_data::{GeometryError, MeshData, Topology};
