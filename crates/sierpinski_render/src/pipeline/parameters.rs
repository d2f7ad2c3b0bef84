//! The uniform parameter block
//!
//! One buffer shared by the expansion and render programs. A CPU mirror is
//! kept so partial writes can be sliced out of it: the frame range every
//! frame, the depth word only when the depth changed.

use wgpu::util::DeviceExt;

use sierpinski_core::FrameSnapshot;

use super::types::FractalUniforms;

impl FractalUniforms {
    /// Copy the per-frame fields of `frame`
    pub fn apply_frame(&mut self, frame: &FrameSnapshot) {
        self.mvp = frame.mvp;
        self.color = frame.color;
        self.scale = frame.scale;
    }

    /// Bytes of the per-frame fields
    pub fn frame_bytes(&self) -> &[u8] {
        &bytemuck::bytes_of(self)[Self::FRAME_RANGE]
    }
}

/// GPU uniform buffer plus its CPU mirror
pub struct ParameterBlock {
    buffer: wgpu::Buffer,
    uniforms: FractalUniforms,
}

impl ParameterBlock {
    /// Create the block with fixed lighting; the rest is filled per frame
    pub fn new(device: &wgpu::Device, ambient: f32, light_dir: [f32; 3]) -> Self {
        let uniforms = FractalUniforms {
            ambient,
            light_dir,
            ..FractalUniforms::default()
        };
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Fractal Uniform Buffer"),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        Self { buffer, uniforms }
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// The values last written
    pub fn uniforms(&self) -> &FractalUniforms {
        &self.uniforms
    }

    /// Write only the depth word
    pub fn write_depth(&mut self, queue: &wgpu::Queue, depth: u32) {
        self.uniforms.depth = depth;
        queue.write_buffer(
            &self.buffer,
            FractalUniforms::DEPTH_OFFSET as wgpu::BufferAddress,
            bytemuck::bytes_of(&depth),
        );
    }

    /// Write `mvp`, `color` and `scale`
    pub fn write_frame(&mut self, queue: &wgpu::Queue, frame: &FrameSnapshot) {
        self.uniforms.apply_frame(frame);
        queue.write_buffer(&self.buffer, 0, self.uniforms.frame_bytes());
    }
}
