/// Texture helpers: render-attachment creation for the depth target and the
/// sampled albedo textures addressed by [`TextureId`].
use std::sync::Arc;

use super::buffer::error_scoped;
use crate::RenderError;

/// Descriptor for a 2-D render-attachment texture.
pub struct RenderTextureDesc<'a> {
    pub label: &'a str,
    pub width: u32,
    pub height: u32,
    pub format: wgpu::TextureFormat,
    pub usage: wgpu::TextureUsages,
}

/// Creates a 2-D single-sample texture from a [`RenderTextureDesc`].
pub fn create_render_texture(device: &wgpu::Device, desc: &RenderTextureDesc<'_>) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some(desc.label),
        size: wgpu::Extent3d {
            width: desc.width.max(1),
            height: desc.height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: desc.format,
        usage: desc.usage,
        view_formats: &[],
    })
}

/// Creates a default `TextureView` for a texture (all mips, all layers).
#[inline]
pub fn default_view(texture: &wgpu::Texture) -> wgpu::TextureView {
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

/// Index into a [`TextureSet`].  Id 0 is always the 1×1 white texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextureId(pub usize);

impl TextureId {
    pub const WHITE: Self = Self(0);
}

/// Sampler addressing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapMode {
    Clamp,
    Repeat,
}

struct GpuTexture {
    label: String,
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

/// Every albedo texture the scene uses, each with its own bind group
/// (texture + sampler) for group(1) of the world pipeline.
pub struct TextureSet {
    layout: Arc<wgpu::BindGroupLayout>,
    clamp: wgpu::Sampler,
    repeat: wgpu::Sampler,
    white: GpuTexture,
    loaded: Vec<GpuTexture>,
}

impl TextureSet {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, layout: Arc<wgpu::BindGroupLayout>) -> Self {
        let sampler = |label: &str, mode: wgpu::AddressMode| {
            device.create_sampler(&wgpu::SamplerDescriptor {
                label: Some(label),
                address_mode_u: mode,
                address_mode_v: mode,
                address_mode_w: mode,
                mag_filter: wgpu::FilterMode::Linear,
                min_filter: wgpu::FilterMode::Linear,
                ..Default::default()
            })
        };
        let clamp = sampler("Sampler: clamp", wgpu::AddressMode::ClampToEdge);
        let repeat = sampler("Sampler: repeat", wgpu::AddressMode::Repeat);
        let white = create_gpu_texture(device, queue, &layout, &clamp, "white", 1, 1, &[255; 4]);
        Self { layout, clamp, repeat, white, loaded: Vec::new() }
    }

    /// Upload tightly packed RGBA8 pixels.
    #[allow(clippy::too_many_arguments)]
    pub fn upload_rgba8(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        width: u32,
        height: u32,
        pixels: &[u8],
        wrap: WrapMode,
    ) -> Result<TextureId, RenderError> {
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 || pixels.len() != expected {
            return Err(RenderError::Texture(format!(
                "`{label}`: {width}x{height} needs {expected} bytes, got {}",
                pixels.len()
            )));
        }
        let sampler = match wrap {
            WrapMode::Clamp => &self.clamp,
            WrapMode::Repeat => &self.repeat,
        };
        let (texture, error) = error_scoped(device, || {
            create_gpu_texture(device, queue, &self.layout, sampler, label, width, height, pixels)
        });
        if let Some(err) = error {
            texture.texture.destroy();
            log::warn!("texture `{label}` rejected by the device: {err}");
            return Err(RenderError::Texture(format!("`{label}`: {err}")));
        }
        self.loaded.push(texture);
        log::info!("texture `{label}` ({width}x{height}) uploaded");
        Ok(TextureId(self.loaded.len()))
    }

    /// Bind group for `id`; unknown ids fall back to white.
    pub fn bind_group(&self, id: TextureId) -> &wgpu::BindGroup {
        let entry = match id.0 {
            0 => &self.white,
            n => self.loaded.get(n - 1).unwrap_or(&self.white),
        };
        &entry.bind_group
    }

    /// Destroy every loaded texture; the white default stays.
    pub fn clear(&mut self) {
        for entry in self.loaded.drain(..) {
            log::debug!("destroying texture `{}`", entry.label);
            entry.texture.destroy();
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn create_gpu_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    label: &str,
    width: u32,
    height: u32,
    pixels: &[u8],
) -> GpuTexture {
    let size = wgpu::Extent3d { width, height, depth_or_array_layers: 1 };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::ImageCopyTexture {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        pixels,
        wgpu::ImageDataLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        size,
    );
    let view = default_view(&texture);
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(&view) },
            wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(sampler) },
        ],
    });
    GpuTexture { label: label.to_string(), texture, bind_group }
}
