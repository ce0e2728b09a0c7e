/// Dynamic uniform buffer holding one [`InstanceUniform`] per draw.
///
/// All per-draw data lives in a single buffer.  `WorldPass` binds it once
/// per draw with a different byte offset:
///
/// ```text
/// rpass.set_bind_group(0, &instances.bind_group, &[instances.offset(i)]);
/// ```
///
/// ## Alignment
///
/// Each dynamic-offset element must start on a multiple of
/// `min_uniform_buffer_offset_alignment` (typically 256 bytes), so a slot is
/// `align_up(80, alignment)` bytes even though only 80 are used.
use tumble_core::Color;

use super::buffer::create_uniform;

/// Per-draw shader inputs: the MVP matrix and the albedo tint.
///
/// For flat-colour shading the texture is white and `albedo` carries the
/// colour; for textured shading `albedo` is white.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceUniform {
    pub mvp: [[f32; 4]; 4],
    pub albedo: [f32; 4],
}

impl InstanceUniform {
    pub const SIZE: u64 = std::mem::size_of::<Self>() as u64;

    pub fn new(mvp: glam::Mat4, albedo: Color) -> Self {
        Self { mvp: mvp.to_cols_array_2d(), albedo: albedo.to_array() }
    }
}

/// A growable GPU buffer with one aligned [`InstanceUniform`] per slot.
pub struct InstanceBuffer {
    pub buffer: wgpu::Buffer,
    /// Single bind group that references the whole buffer with a dynamic offset.
    pub bind_group: wgpu::BindGroup,
    /// Byte stride between consecutive slots (≥ 80, multiple of alignment).
    pub stride: u32,
    /// Current capacity in slots.
    capacity: usize,
}

impl InstanceBuffer {
    /// `layout` must be the instance layout with `has_dynamic_offset: true`.
    pub fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, initial_capacity: usize) -> Self {
        let alignment = device.limits().min_uniform_buffer_offset_alignment;
        let stride = align_up(InstanceUniform::SIZE as u32, alignment);

        let capacity = initial_capacity.max(1);
        let buffer = Self::create_buffer(device, capacity, stride);
        let bind_group = Self::create_bind_group(device, layout, &buffer);

        Self { buffer, bind_group, stride, capacity }
    }

    /// Byte offset of slot `index`.
    #[inline]
    pub fn offset(&self, index: usize) -> u32 {
        (index as u32).wrapping_mul(self.stride)
    }

    /// Writes `data` into slot `index`.
    #[inline]
    pub fn write(&self, queue: &wgpu::Queue, index: usize, data: &InstanceUniform) {
        debug_assert!(index < self.capacity, "InstanceBuffer slot out of range");
        queue.write_buffer(&self.buffer, self.offset(index) as u64, bytemuck::bytes_of(data));
    }

    /// Grow (doubling) until `needed` slots fit.  Reallocates the bind group
    /// too, so call this before recording any pass that uses it.
    pub fn ensure_capacity(&mut self, device: &wgpu::Device, layout: &wgpu::BindGroupLayout, needed: usize) {
        if needed <= self.capacity {
            return;
        }
        let mut new_cap = self.capacity;
        while new_cap < needed {
            new_cap *= 2;
        }
        log::debug!("instance buffer grows {} -> {new_cap} slots", self.capacity);
        self.buffer = Self::create_buffer(device, new_cap, self.stride);
        self.bind_group = Self::create_bind_group(device, layout, &self.buffer);
        self.capacity = new_cap;
    }

    // ── Private helpers ──────────────────────────────────────────────────────

    fn create_buffer(device: &wgpu::Device, capacity: usize, stride: u32) -> wgpu::Buffer {
        let size = capacity * stride as usize;
        create_uniform(device, "InstanceBuffer", &vec![0u8; size])
    }

    fn create_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        buffer: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("InstanceBuffer BindGroup"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer,
                    offset: 0,
                    // the window the shader sees at each dynamic offset
                    size: wgpu::BufferSize::new(InstanceUniform::SIZE),
                }),
            }],
        })
    }
}

/// Round `value` up to the next multiple of `alignment` (a power of two).
#[inline]
fn align_up(value: u32, alignment: u32) -> u32 {
    (value + alignment - 1) & !(alignment - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_layout_is_tightly_packed() {
        assert_eq!(InstanceUniform::SIZE, 80);
        let u = InstanceUniform::new(glam::Mat4::from_translation(glam::Vec3::X), Color::RED);
        assert_eq!(u.mvp[3][0], 1.0);
        assert_eq!(u.albedo, [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn align_up_rounds_to_power_of_two() {
        assert_eq!(align_up(80, 256), 256);
        assert_eq!(align_up(256, 256), 256);
        assert_eq!(align_up(80, 16), 80);
        assert_eq!(align_up(81, 64), 128);
    }
}
