/// Data bundle assembled once per frame by the frame synchronizer and
/// consumed by [`crate::passes::WorldPass`].
///
/// The packet only holds buffer handles and per-draw uniforms; passes never
/// see the simulation or the meshes that produced them.
use std::sync::Arc;

use tumble_core::Color;

use crate::resources::{InstanceUniform, TextureId};

// ── 3-D scene ─────────────────────────────────────────────────────────────────

/// A single indexed triangle-list draw, fully resolved to buffer handles.
#[derive(Debug, Clone)]
pub struct DrawCommand<B = Arc<wgpu::Buffer>> {
    /// slot 0
    pub position:    B,
    /// slot 1
    pub uv:          B,
    pub index:       B,
    pub index_count: u32,
    pub instance:    InstanceUniform,
    pub texture:     TextureId,
}

// ── Frame packet ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct FramePacket<B = Arc<wgpu::Buffer>> {
    pub clear_color: Color,
    /// Draws in submission order.
    pub draws:       Vec<DrawCommand<B>>,
}

impl<B> FramePacket<B> {
    pub fn new(clear_color: Color) -> Self {
        Self { clear_color, draws: Vec::new() }
    }
}
