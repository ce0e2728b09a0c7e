use std::sync::Arc;

use glam::Vec3;
use tumble_core::ShapeKind;

use crate::geometry::{primitives, GeometryError, MeshData};
use crate::resources::{BufferAllocator, GpuMesh, MeshError};

/// CPU meshes for one scene: the ground quad plus one mesh per drawable
/// shape category.
#[derive(Debug, Clone)]
pub struct SceneGeometry {
    pub ground: MeshData,
    pub cuboid: MeshData,
    pub sphere: MeshData,
}

impl SceneGeometry {
    /// Box and sphere meshes sized to match the colliders they stand for.
    pub fn new(
        box_half_extents: Vec3,
        sphere_radius: f32,
        sphere_segments: u32,
        ground_half_extent: f32,
        ground_uv_scale: f32,
    ) -> Result<Self, GeometryError> {
        let size = box_half_extents * 2.0;
        Ok(Self {
            ground: primitives::plane(0.0, ground_half_extent, ground_uv_scale)?,
            cuboid: primitives::cuboid(size.x, size.y, size.z)?,
            sphere: primitives::sphere(sphere_radius, sphere_segments, sphere_segments)?,
        })
    }
}

/// The fixed category→mesh table plus the ground mesh.
pub struct SceneMeshes<B = Arc<wgpu::Buffer>> {
    pub ground: GpuMesh<B>,
    pub cuboid: GpuMesh<B>,
    pub sphere: GpuMesh<B>,
}

impl<B: Clone> SceneMeshes<B> {
    /// Upload all three meshes.  On failure the ones already uploaded are
    /// released again.
    pub fn upload<A>(alloc: &A, geometry: &SceneGeometry) -> Result<Self, MeshError>
    where
        A: BufferAllocator<Buffer = B>,
    {
        let mut meshes = Self {
            ground: GpuMesh::new("ground"),
            cuboid: GpuMesh::new("box"),
            sphere: GpuMesh::new("sphere"),
        };
        let result = meshes
            .ground
            .upload(alloc, &geometry.ground)
            .and_then(|_| meshes.cuboid.upload(alloc, &geometry.cuboid))
            .and_then(|_| meshes.sphere.upload(alloc, &geometry.sphere));
        match result {
            Ok(()) => Ok(meshes),
            Err(err) => {
                meshes.release(alloc);
                Err(err)
            }
        }
    }

    /// Mesh drawn for bodies of `kind`.  Planes are not in the table (the
    /// ground is drawn on its own) and neither is anything unsupported.
    pub fn for_kind(&self, kind: ShapeKind) -> Option<&GpuMesh<B>> {
        match kind {
            ShapeKind::Box => Some(&self.cuboid),
            ShapeKind::Sphere => Some(&self.sphere),
            ShapeKind::Plane | ShapeKind::Unsupported => None,
        }
    }

    pub fn release<A>(&mut self, alloc: &A)
    where
        A: BufferAllocator<Buffer = B>,
    {
        self.ground.release(alloc);
        self.cuboid.release(alloc);
        self.sphere.release(alloc);
    }
}
