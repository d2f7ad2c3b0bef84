//! GPU-compatible data types for the expansion and render programs
//!
//! These types are designed to match the shader layouts exactly.
//! All types derive Pod and Zeroable for safe GPU buffer operations.

use std::mem::{offset_of, size_of};

use bytemuck::{Pod, Zeroable};
use sierpinski_core::{triangle_count, Triangle, MAX_DEPTH};
use sierpinski_math::Vec3;

/// A vertex of the expanded triangle stream
///
/// Written by the expansion program, read as the vertex buffer.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GpuVertex {
    /// Position (x, y, z, 1)
    pub position: [f32; 4],
    /// Face normal (x, y, z, 0)
    pub normal: [f32; 4],
}

impl GpuVertex {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: [position.x, position.y, position.z, 1.0],
            normal: [normal.x, normal.y, normal.z, 0.0],
        }
    }

    /// The three vertices of a triangle, all carrying its face normal
    pub fn from_triangle(triangle: &Triangle) -> [GpuVertex; 3] {
        let normal = triangle.normal();
        triangle.vertices.map(|v| GpuVertex::new(v, normal))
    }
}

/// The seed point submitted to the expansion program
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct SeedPoint {
    /// Center of the seed tetrahedron (x, y, z, 1)
    pub position: [f32; 4],
}

impl SeedPoint {
    pub fn new(center: Vec3) -> Self {
        Self {
            position: [center.x, center.y, center.z, 1.0],
        }
    }
}

/// The parameter block shared by both programs
/// Layout: 112 bytes total (must match `FractalUniforms` in both shaders)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct FractalUniforms {
    /// Model-view-projection matrix (64 bytes)
    pub mvp: [[f32; 4]; 4],
    /// Face color (12 bytes)
    pub color: [f32; 3],
    /// Seed tetrahedron scale
    pub scale: f32,
    /// Subdivision depth
    pub depth: u32,
    /// Lighting parameters
    pub ambient: f32,
    pub _padding: [f32; 2],
    /// Light direction in model space + padding (16 bytes)
    pub light_dir: [f32; 3],
    pub _padding2: f32,
}

impl Default for FractalUniforms {
    fn default() -> Self {
        Self {
            mvp: sierpinski_math::mat4::IDENTITY,
            color: [1.0; 3],
            scale: 1.0,
            depth: 0,
            ambient: 0.3,
            _padding: [0.0; 2],
            light_dir: [0.0, 1.0, 0.0],
            _padding2: 0.0,
        }
    }
}

impl FractalUniforms {
    /// Byte range rewritten every frame: `mvp`, `color` and `scale`
    pub const FRAME_RANGE: std::ops::Range<usize> = 0..offset_of!(FractalUniforms, depth);

    /// Byte offset of `depth`, written only when the depth changes
    pub const DEPTH_OFFSET: usize = offset_of!(FractalUniforms, depth);
}

/// Threads per workgroup in `expand.wgsl`
pub const EXPAND_WORKGROUP_SIZE: u32 = 64;

/// Size of a single triangle in GpuVertex units (3 vertices)
pub const TRIANGLE_VERTEX_COUNT: usize = 3;

/// Triangles the output buffer must hold: the stream at `MAX_DEPTH`
pub fn max_output_triangles() -> usize {
    triangle_count(MAX_DEPTH)
}

/// Byte size of the output buffer
pub fn output_buffer_size() -> u64 {
    (max_output_triangles() * TRIANGLE_VERTEX_COUNT * size_of::<GpuVertex>()) as u64
}
