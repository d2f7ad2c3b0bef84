//! Pipeline components
//!
//! This module contains the compute pipeline that expands the seed point
//! and the render pipeline that draws the result. Both read the same
//! [`ParameterBlock`].

pub mod types;
pub mod parameters;
pub mod expand_pipeline;
pub mod render_pipeline;

// Re-export types
pub use types::{
    max_output_triangles, output_buffer_size, FractalUniforms, GpuVertex, SeedPoint,
    EXPAND_WORKGROUP_SIZE, TRIANGLE_VERTEX_COUNT,
};

// Re-export pipelines
pub use parameters::ParameterBlock;
pub use expand_pipeline::{workgroup_count, ExpandPipeline};
pub use render_pipeline::{RenderPipeline, DEPTH_FORMAT};
