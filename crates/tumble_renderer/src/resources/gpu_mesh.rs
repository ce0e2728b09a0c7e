/// Device-resident copy of a [`MeshData`] and its two-state lifecycle.
///
/// ```text
///   empty ──upload──▶ ready ──release──▶ empty
///     │                 │
///   draw → InvalidState draw → DrawCommand
/// ```
///
/// Buffers are only ever created inside [`GpuMesh::upload`] and only ever
/// freed inside [`GpuMesh::release`]; nothing binds them outside the render
/// pass that consumes the recorded [`DrawCommand`]s.
use std::sync::Arc;

use thiserror::Error;

use crate::geometry::MeshData;
use crate::graph::DrawCommand;

use super::buffer::{BufferAllocator, BufferRole};
use super::instance_buffer::InstanceUniform;
use super::texture::TextureId;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeshError {
    /// Operation not allowed in the resource's current state.
    #[error("invalid mesh state: {0}")]
    InvalidState(String),
    /// The device refused an allocation.
    #[error("device resource error: {0}")]
    DeviceResource(String),
}

/// Fixed vertex layout shared by every mesh: positions in slot 0, UVs in
/// slot 1, 32-bit indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshLayout {
    pub position_slot: u32,
    pub position_stride: u64,
    pub uv_slot: u32,
    pub uv_stride: u64,
    pub index_format: wgpu::IndexFormat,
}

impl MeshLayout {
    pub const STANDARD: Self = Self {
        position_slot: 0,
        position_stride: std::mem::size_of::<[f32; 3]>() as u64,
        uv_slot: 1,
        uv_stride: std::mem::size_of::<[f32; 2]>() as u64,
        index_format: wgpu::IndexFormat::Uint32,
    };

    const POSITION_ATTRIBUTES: [wgpu::VertexAttribute; 1] =
        wgpu::vertex_attr_array![0 => Float32x3];
    const UV_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x2];

    /// Vertex buffer layouts in slot order, for pipeline creation.
    pub fn vertex_buffers() -> [wgpu::VertexBufferLayout<'static>; 2] {
        [
            wgpu::VertexBufferLayout {
                array_stride: Self::STANDARD.position_stride,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &Self::POSITION_ATTRIBUTES,
            },
            wgpu::VertexBufferLayout {
                array_stride: Self::STANDARD.uv_stride,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &Self::UV_ATTRIBUTES,
            },
        ]
    }
}

/// Handles owned by a ready mesh.
#[derive(Debug, Clone)]
pub struct MeshBuffers<B> {
    pub position: B,
    pub uv: B,
    pub index: B,
    pub layout: MeshLayout,
    pub primitive_count: u32,
}

pub struct GpuMesh<B = Arc<wgpu::Buffer>> {
    label: String,
    buffers: Option<MeshBuffers<B>>,
}

impl<B: Clone> GpuMesh<B> {
    /// An empty resource; call [`Self::upload`] before drawing.
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into(), buffers: None }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_ready(&self) -> bool {
        self.buffers.is_some()
    }

    pub fn buffers(&self) -> Option<&MeshBuffers<B>> {
        self.buffers.as_ref()
    }

    /// Copy `mesh` into freshly allocated device buffers.
    ///
    /// Uploading into a ready resource is an `InvalidState` error; release it
    /// first.  If any allocation fails, whatever was already allocated is
    /// freed and the resource stays empty.
    pub fn upload<A>(&mut self, alloc: &A, mesh: &MeshData) -> Result<(), MeshError>
    where
        A: BufferAllocator<Buffer = B>,
    {
        if self.buffers.is_some() {
            return Err(MeshError::InvalidState(format!(
                "`{}` is already uploaded; release it first",
                self.label
            )));
        }

        let streams: [(&str, BufferRole, &[u8]); 3] = [
            ("positions", BufferRole::Vertex, bytemuck::cast_slice(mesh.positions())),
            ("uvs", BufferRole::Vertex, bytemuck::cast_slice(mesh.uvs())),
            ("indices", BufferRole::Index, bytemuck::cast_slice(mesh.indices())),
        ];

        let mut allocated = Vec::with_capacity(streams.len());
        for (stream, role, bytes) in streams {
            match alloc.allocate(&format!("{} {stream}", self.label), role, bytes) {
                Ok(buffer) => allocated.push(buffer),
                Err(err) => {
                    for buffer in allocated {
                        alloc.free(buffer);
                    }
                    log::warn!("upload of `{}` failed: {err}", self.label);
                    return Err(err);
                }
            }
        }

        let [position, uv, index]: [B; 3] = allocated
            .try_into()
            .map_err(|_| MeshError::InvalidState(format!("`{}`: stream count mismatch", self.label)))?;

        self.buffers = Some(MeshBuffers {
            position,
            uv,
            index,
            layout: MeshLayout::STANDARD,
            primitive_count: mesh.primitive_count(),
        });
        log::info!(
            "uploaded mesh `{}`: {} vertices, {} triangles",
            self.label,
            mesh.vertex_count(),
            mesh.primitive_count()
        );
        Ok(())
    }

    /// Record one indexed draw of the whole mesh into `out`.
    pub fn draw(
        &self,
        instance: InstanceUniform,
        texture: TextureId,
        out: &mut Vec<DrawCommand<B>>,
    ) -> Result<(), MeshError> {
        let buffers = self.buffers.as_ref().ok_or_else(|| {
            MeshError::InvalidState(format!("`{}` drawn before upload", self.label))
        })?;
        out.push(DrawCommand {
            position: buffers.position.clone(),
            uv: buffers.uv.clone(),
            index: buffers.index.clone(),
            index_count: 3 * buffers.primitive_count,
            instance,
            texture,
        });
        Ok(())
    }

    /// Free all device buffers.  Releasing an empty resource does nothing.
    pub fn release<A>(&mut self, alloc: &A)
    where
        A: BufferAllocator<Buffer = B>,
    {
        if let Some(buffers) = self.buffers.take() {
            alloc.free(buffers.position);
            alloc.free(buffers.uv);
            alloc.free(buffers.index);
            log::debug!("released mesh `{}`", self.label);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::primitives;
    use crate::resources::buffer::testing::{FakeBuffer, RecordingAllocator};
    use glam::Mat4;

    fn instance() -> InstanceUniform {
        InstanceUniform::new(Mat4::IDENTITY, tumble_core::Color::WHITE)
    }

    #[test]
    fn upload_draw_release_cycle() {
        let alloc = RecordingAllocator::default();
        let cube = primitives::cuboid(2.0, 2.0, 2.0).unwrap();
        let mut mesh: GpuMesh<FakeBuffer> = GpuMesh::new("cube");

        mesh.upload(&alloc, &cube).unwrap();
        assert!(mesh.is_ready());
        assert_eq!(alloc.live_count(), 3);
        assert_eq!(
            alloc.live_roles(),
            vec![BufferRole::Vertex, BufferRole::Vertex, BufferRole::Index]
        );

        let buffers = mesh.buffers().unwrap();
        assert_eq!(buffers.position.len, 24 * 12);
        assert_eq!(buffers.uv.len, 24 * 8);
        assert_eq!(buffers.index.len, 36 * 4);
        assert_eq!(buffers.layout, MeshLayout::STANDARD);

        let mut out = Vec::new();
        mesh.draw(instance(), TextureId::WHITE, &mut out).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].index_count, 36);

        mesh.release(&alloc);
        assert!(!mesh.is_ready());
        assert_eq!(alloc.live_count(), 0);
    }

    #[test]
    fn draw_before_upload_is_invalid_state() {
        let mesh: GpuMesh<FakeBuffer> = GpuMesh::new("nothing");
        let mut out = Vec::new();
        let err = mesh.draw(instance(), TextureId::WHITE, &mut out);
        assert!(matches!(err, Err(MeshError::InvalidState(_))));
        assert!(out.is_empty());
    }

    #[test]
    fn double_upload_is_rejected_without_leaking() {
        let alloc = RecordingAllocator::default();
        let ball = primitives::sphere(1.0, 4, 4).unwrap();
        let mut mesh = GpuMesh::new("ball");
        mesh.upload(&alloc, &ball).unwrap();
        let err = mesh.upload(&alloc, &ball);
        assert!(matches!(err, Err(MeshError::InvalidState(_))));
        assert_eq!(alloc.live_count(), 3);
    }

    #[test]
    fn release_is_idempotent_and_reupload_works() {
        let alloc = RecordingAllocator::default();
        let quad = primitives::plane(0.0, 1.0, 1.0).unwrap();
        let mut mesh = GpuMesh::new("quad");
        mesh.release(&alloc);
        mesh.upload(&alloc, &quad).unwrap();
        mesh.release(&alloc);
        mesh.release(&alloc);
        assert_eq!(alloc.live_count(), 0);
        mesh.upload(&alloc, &quad).unwrap();
        assert!(mesh.is_ready());
        assert_eq!(alloc.live_count(), 3);
    }

    #[test]
    fn failed_allocation_leaves_mesh_empty() {
        for failing_call in 0..3 {
            let alloc = RecordingAllocator::failing_at(failing_call);
            let cube = primitives::cuboid(1.0, 1.0, 1.0).unwrap();
            let mut mesh = GpuMesh::new("cube");
            let err = mesh.upload(&alloc, &cube);
            assert!(matches!(err, Err(MeshError::DeviceResource(_))));
            assert!(!mesh.is_ready());
            assert_eq!(alloc.live_count(), 0, "leak after failing call {failing_call}");
        }
    }

    #[test]
    fn sphere_draw_covers_every_triangle() {
        let alloc = RecordingAllocator::default();
        let ball = primitives::sphere(1.0, 32, 32).unwrap();
        let mut mesh = GpuMesh::new("ball");
        mesh.upload(&alloc, &ball).unwrap();
        let mut out = Vec::new();
        mesh.draw(instance(), TextureId::WHITE, &mut out).unwrap();
        assert_eq!(out[0].index_count as usize, ball.indices().len());
    }
}
