//! `tumble_renderer` — meshes, GPU resources and the per-frame bridge from
//! the physics world to a wgpu render pass.
//!
//! ## Module layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | `geometry`      | `MeshData`, plane / box / sphere builders                 |
//! | `resources`     | `GpuMesh` lifecycle, buffer allocator, instance buffer, textures |
//! | `graph`         | `FramePacket` / `DrawCommand`                             |
//! | `pipeline`      | bind-group layouts and the world pipeline                 |
//! | `passes`        | `WorldPass`                                               |
//! | `render_target` | depth target                                              |
//! | `scene`         | mesh table, shading policy, `FrameSynchronizer`           |

pub mod context;
pub mod geometry;
pub mod graph;
pub mod passes;
pub mod pipeline;
pub mod render_target;
pub mod resources;
pub mod scene;

use std::sync::Arc;

use thiserror::Error;
use tumble_core::Color;

pub use context::EngineContext;
pub use geometry::{GeometryError, MeshData};
pub use graph::{DrawCommand, FramePacket};
pub use resources::{BufferAllocator, GpuMesh, MeshError, TextureId, WrapMode};
pub use scene::{FrameSynchronizer, SceneGeometry, SceneMeshes, ShadingPolicy};

use passes::WorldPass;
use pipeline::{PipelineLayouts, WorldPipeline};
use render_target::DepthTarget;
use resources::TextureSet;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Mesh(#[from] MeshError),
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
    #[error("texture error: {0}")]
    Texture(String),
}

/// Owns the pipeline, depth target, textures and the frame packet.  Meshes
/// live with the scene that uploads them.
pub struct Renderer {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    depth: DepthTarget,
    world_pass: WorldPass,
    textures: TextureSet,
    packet: FramePacket,
}

impl Renderer {
    pub fn new(
        device: Arc<wgpu::Device>,
        queue: Arc<wgpu::Queue>,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        clear_color: Color,
    ) -> Self {
        let layouts = PipelineLayouts::new(&device);
        let textures = TextureSet::new(&device, &queue, layouts.texture.clone());
        let pipeline = WorldPipeline::new(&device, format, layouts);
        let world_pass = WorldPass::new(&device, pipeline);
        let depth = DepthTarget::new(&device, width, height);
        Self {
            device,
            queue,
            depth,
            world_pass,
            textures,
            packet: FramePacket::new(clear_color),
        }
    }

    /// The device, as a [`BufferAllocator`] for mesh uploads.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn packet_mut(&mut self) -> &mut FramePacket {
        &mut self.packet
    }

    pub fn upload_texture(
        &mut self,
        label: &str,
        width: u32,
        height: u32,
        rgba: &[u8],
        wrap: WrapMode,
    ) -> Result<TextureId, RenderError> {
        self.textures
            .upload_rgba8(&self.device, &self.queue, label, width, height, rgba, wrap)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.depth.resize(&self.device, width, height);
        }
    }

    /// Encode and submit the current packet into `target`.
    pub fn render(&mut self, target: &wgpu::TextureView) {
        self.world_pass.prepare(&self.device, &self.queue, &self.packet);

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Frame Encoder"),
        });
        self.world_pass
            .execute(&mut encoder, target, &self.depth.view, &self.packet, &self.textures);
        self.queue.submit(std::iter::once(encoder.finish()));
    }

    /// Drop every recorded draw and destroy loaded textures.
    pub fn release_textures(&mut self) {
        self.packet.draws.clear();
        self.textures.clear();
    }
}
