/// 3-D opaque geometry pass.
///
/// Clears colour + depth and emits one indexed draw per [`DrawCommand`] in
/// the packet.  Everything set on the pass (pipeline, bind groups, vertex
/// and index buffers) ends with it, so nothing stays bound between frames.
use wgpu::{
    CommandEncoder, Device, LoadOp, Operations, Queue, RenderPassColorAttachment,
    RenderPassDepthStencilAttachment, RenderPassDescriptor, StoreOp, TextureView,
};

use crate::graph::{DrawCommand, FramePacket};
use crate::pipeline::WorldPipeline;
use crate::resources::{InstanceBuffer, MeshLayout, TextureSet};

pub struct WorldPass {
    pipeline:  WorldPipeline,
    instances: InstanceBuffer,
}

impl WorldPass {
    pub fn new(device: &Device, pipeline: WorldPipeline) -> Self {
        let instances = InstanceBuffer::new(device, &pipeline.layouts.instance, 512);
        Self { pipeline, instances }
    }

    pub fn name(&self) -> &str {
        "World Opaque Pass"
    }

    /// Upload every draw's uniforms into its own slot.
    pub fn prepare(&mut self, device: &Device, queue: &Queue, packet: &FramePacket) {
        self.instances
            .ensure_capacity(device, &self.pipeline.layouts.instance, packet.draws.len());
        for (slot, draw) in packet.draws.iter().enumerate() {
            self.instances.write(queue, slot, &draw.instance);
        }
    }

    pub fn execute(
        &self,
        encoder: &mut CommandEncoder,
        color_view: &TextureView,
        depth_view: &TextureView,
        packet: &FramePacket,
        textures: &TextureSet,
    ) {
        let [r, g, b, a] = packet.clear_color.to_f64_array();
        let mut rpass = encoder.begin_render_pass(&RenderPassDescriptor {
            label: Some(self.name()),
            color_attachments: &[Some(RenderPassColorAttachment {
                view: color_view,
                resolve_target: None,
                ops: Operations {
                    load:  LoadOp::Clear(wgpu::Color { r, g, b, a }),
                    store: StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(Operations {
                    load:  LoadOp::Clear(1.0),
                    store: StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes:    None,
        });

        rpass.set_pipeline(&self.pipeline.inner);
        let layout = MeshLayout::STANDARD;
        for (slot, DrawCommand { position, uv, index, index_count, texture, .. }) in
            packet.draws.iter().enumerate()
        {
            rpass.set_bind_group(0, &self.instances.bind_group, &[self.instances.offset(slot)]);
            rpass.set_bind_group(1, textures.bind_group(*texture), &[]);
            rpass.set_vertex_buffer(layout.position_slot, position.slice(..));
            rpass.set_vertex_buffer(layout.uv_slot, uv.slice(..));
            rpass.set_index_buffer(index.slice(..), layout.index_format);
            rpass.draw_indexed(0..*index_count, 0, 0..1);
        }
    }
}
