pub mod buffer;
pub mod gpu_mesh;
pub mod instance_buffer;
pub mod texture;

pub use buffer::{BufferAllocator, BufferRole};
pub use gpu_mesh::{GpuMesh, MeshBuffers, MeshError, MeshLayout};
pub use instance_buffer::{InstanceBuffer, InstanceUniform};
pub use texture::{TextureId, TextureSet, WrapMode};
