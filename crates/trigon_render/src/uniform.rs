use wgpu::{
    BindGroup, BindGroupDescriptor, BindGroupEntry, BindGroupLayout, Buffer, BufferUsages, Device,
    Queue, RenderPass,
    util::{BufferInitDescriptor, DeviceExt},
};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TintUniform {
    pub color: [f32; 4],
}

impl TintUniform {
    /// Tint cycling red & green over time; `seconds` is time since start
    pub fn at(seconds: f32) -> Self {
        Self {
            color: [seconds.cos() / 2.0 + 0.5, seconds.sin() / 2.0 + 0.5, 0.0, 1.0],
        }
    }
}

impl Default for TintUniform {
    fn default() -> Self {
        Self { color: [1.0; 4] }
    }
}

/// The tint buffer & its bind group (group 0)
pub(crate) struct Uniforms {
    buffer: Buffer,
    bind_group: BindGroup,
}

impl Uniforms {
    pub fn new(device: &Device, layout: &BindGroupLayout) -> Self {
        let buffer = device.create_buffer_init(&BufferInitDescriptor {
            label: Some("Tint Uniform Buffer"),
            contents: bytemuck::bytes_of(&TintUniform::default()),
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&BindGroupDescriptor {
            label: Some("Uniform Bind Group"),
            layout,
            entries: &[BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self { buffer, bind_group }
    }

    pub fn write(&self, queue: &Queue, tint: TintUniform) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&tint));
    }

    pub fn bind(&self, pass: &mut RenderPass<'_>) {
        pass.set_bind_group(0, &self.bind_group, &[]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn tint_starts_red_and_half_green() {
        assert_eq!(TintUniform::at(0.0).color, [1.0, 0.5, 0.0, 1.0]);
    }

    #[test]
    fn tint_channels_stay_in_unit_range() {
        for step in 0..100 {
            let color = TintUniform::at(step as f32 * 0.37).color;
            assert!(color.iter().all(|c| (0.0..=1.0).contains(c)));
            assert_eq!(color[3], 1.0);
        }
    }

    #[test]
    fn tint_quarter_turn_is_full_green() {
        let color = TintUniform::at(FRAC_PI_2).color;
        assert!((color[0] - 0.5).abs() < 1e-6);
        assert!((color[1] - 1.0).abs() < 1e-6);
    }
}
