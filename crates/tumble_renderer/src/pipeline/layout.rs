/// Bind-group layouts of the world pipeline.
use std::sync::Arc;

use crate::resources::InstanceUniform;

/// Layouts are created once and shared via `Arc` so the instance buffer and
/// the texture set can build bind groups without owning the pipeline.
#[derive(Clone)]
pub struct PipelineLayouts {
    /// group(0) — per-draw [`InstanceUniform`] via a **dynamic** uniform
    /// buffer: one buffer, one bind group, a different offset per draw.
    pub instance: Arc<wgpu::BindGroupLayout>,
    /// group(1) — albedo texture (binding 0) and its sampler (binding 1).
    pub texture: Arc<wgpu::BindGroupLayout>,
}

impl PipelineLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        let instance = Arc::new(device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Layout: Instance (dynamic)"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: wgpu::BufferSize::new(InstanceUniform::SIZE),
                    },
                    count: None,
                }],
            },
        ));

        let texture = Arc::new(device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Layout: Albedo texture"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            },
        ));

        Self { instance, texture }
    }
}
