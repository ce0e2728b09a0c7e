/// Device buffer allocation behind a small trait so mesh lifecycles can be
/// exercised without a GPU.
use std::sync::Arc;

use wgpu::util::DeviceExt;

use super::gpu_mesh::MeshError;

/// What a buffer will be bound as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferRole {
    Vertex,
    Index,
}

impl BufferRole {
    fn usages(self) -> wgpu::BufferUsages {
        match self {
            BufferRole::Vertex => wgpu::BufferUsages::VERTEX,
            BufferRole::Index => wgpu::BufferUsages::INDEX,
        }
    }
}

/// Creates and frees immutable device buffers.
pub trait BufferAllocator {
    /// Handle to one device buffer.  Cloning must not duplicate the memory.
    type Buffer: Clone;

    /// Allocate a buffer sized exactly to `contents` and fill it.
    fn allocate(&self, label: &str, role: BufferRole, contents: &[u8]) -> Result<Self::Buffer, MeshError>;

    /// Free the device memory behind `buffer`.
    fn free(&self, buffer: Self::Buffer);
}

impl BufferAllocator for wgpu::Device {
    type Buffer = Arc<wgpu::Buffer>;

    fn allocate(&self, label: &str, role: BufferRole, contents: &[u8]) -> Result<Self::Buffer, MeshError> {
        if contents.is_empty() {
            return Err(MeshError::DeviceResource(format!("`{label}` has no data")));
        }

        let (buffer, error) = error_scoped(self, || {
            self.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage: role.usages(),
            })
        });

        match error {
            Some(err) => {
                buffer.destroy();
                Err(MeshError::DeviceResource(format!("`{label}`: {err}")))
            }
            None => Ok(Arc::new(buffer)),
        }
    }

    fn free(&self, buffer: Self::Buffer) {
        buffer.destroy();
    }
}

/// Run `create` inside validation and out-of-memory error scopes.
///
/// wgpu reports allocation problems asynchronously; the scopes tie any
/// failure to this call instead of a later frame's uncaptured-error handler.
pub(crate) fn error_scoped<T>(device: &wgpu::Device, create: impl FnOnce() -> T) -> (T, Option<wgpu::Error>) {
    device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = create();
    let validation = pollster::block_on(device.pop_error_scope());
    let out_of_memory = pollster::block_on(device.pop_error_scope());
    (value, validation.or(out_of_memory))
}

/// Creates a GPU uniform buffer initialised with `data`.
///
/// The buffer is created with `UNIFORM | COPY_DST` usages so it can be
/// rewritten every frame.
pub fn create_uniform(device: &wgpu::Device, label: &str, data: &[u8]) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: data,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}
