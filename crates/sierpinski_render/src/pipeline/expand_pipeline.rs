//! Compute pipeline for fractal expansion
//!
//! This pipeline takes the single seed point and writes the full triangle
//! stream for the current depth into a buffer that doubles as the vertex
//! buffer. The stream only changes with depth and scale, so the pass is
//! dispatched only when one of them changed. The CPU backend fills the same
//! buffer through [`ExpandPipeline::upload_triangles`].

use wgpu::util::DeviceExt;

use sierpinski_core::{leaf_count, triangle_count, Triangle, MAX_DEPTH};

use super::parameters::ParameterBlock;
use super::types::{
    max_output_triangles, output_buffer_size, GpuVertex, SeedPoint, EXPAND_WORKGROUP_SIZE,
    TRIANGLE_VERTEX_COUNT,
};
use crate::program::{compile_module, ProgramReport, ProgramSources, ProgramStage, ProgramStep};

/// Workgroups needed to cover every leaf at `depth`
pub fn workgroup_count(depth: u32) -> u32 {
    let leaves = leaf_count(depth.min(MAX_DEPTH)) as u32;
    leaves.div_ceil(EXPAND_WORKGROUP_SIZE)
}

/// Compute pipeline that expands the seed point on the GPU
#[allow(dead_code)] // Fields hold GPU resources that must outlive bind groups
pub struct ExpandPipeline {
    /// The compute pipeline
    pipeline: wgpu::ComputePipeline,
    /// Bind group layout for seed + output + params
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    /// The seed point
    seed_buffer: wgpu::Buffer,
    /// Triangle stream, used as the vertex buffer
    output_buffer: wgpu::Buffer,
    /// (depth, scale) the output buffer currently holds
    expanded: Option<(u32, f32)>,
    vertex_count: u32,
}

impl ExpandPipeline {
    /// Create a new expansion pipeline reading `params`
    pub fn new(
        device: &wgpu::Device,
        sources: &ProgramSources,
        params: &ParameterBlock,
        seed: SeedPoint,
        report: &mut ProgramReport,
    ) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Expand Bind Group Layout"),
            entries: &[
                // Seed point (read-only storage)
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // Output vertices (read-write storage)
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: false },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // Parameter block
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Expand Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let shader = compile_module(device, sources, ProgramStage::Expand, report);

        let pipeline = report.capture(device, ProgramStage::Expand, ProgramStep::Link, || {
            device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some("Expand Compute Pipeline"),
                layout: Some(&pipeline_layout),
                module: &shader,
                entry_point: Some("main"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                cache: None,
            })
        });

        let seed_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Seed Point Buffer"),
            contents: bytemuck::bytes_of(&seed),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        });

        let output_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Expand Output Buffer"),
            size: output_buffer_size(),
            usage: wgpu::BufferUsages::STORAGE
                | wgpu::BufferUsages::VERTEX
                | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Expand Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: seed_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: output_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: params.buffer().as_entire_binding(),
                },
            ],
        });

        Self {
            pipeline,
            bind_group_layout,
            bind_group,
            seed_buffer,
            output_buffer,
            expanded: None,
            vertex_count: 0,
        }
    }

    /// Move the seed point; the next `run` re-expands
    pub fn set_seed(&mut self, queue: &wgpu::Queue, seed: SeedPoint) {
        queue.write_buffer(&self.seed_buffer, 0, bytemuck::bytes_of(&seed));
        self.expanded = None;
    }

    /// Whether the output buffer is stale for (`depth`, `scale`)
    pub fn needs_expansion(&self, depth: u32, scale: f32) -> bool {
        self.expanded != Some((depth, scale))
    }

    /// Record the expansion pass if depth or scale changed
    ///
    /// Reads the depth from the parameter block, so the depth must have
    /// been written before the encoder is submitted. Returns whether a pass
    /// was recorded.
    pub fn run(&mut self, encoder: &mut wgpu::CommandEncoder, depth: u32, scale: f32) -> bool {
        if !self.needs_expansion(depth, scale) {
            return false;
        }
        self.expanded = Some((depth, scale));
        let depth = if depth > MAX_DEPTH {
            log::warn!("Depth {} exceeds the output buffer; expanding to {}", depth, MAX_DEPTH);
            MAX_DEPTH
        } else {
            depth
        };

        {
            let mut compute_pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Expand Compute Pass"),
                timestamp_writes: None,
            });
            compute_pass.set_pipeline(&self.pipeline);
            compute_pass.set_bind_group(0, &self.bind_group, &[]);
            compute_pass.dispatch_workgroups(workgroup_count(depth), 1, 1);
        }

        self.vertex_count = (triangle_count(depth) * TRIANGLE_VERTEX_COUNT) as u32;
        log::debug!("Expanded depth {} on the GPU ({} vertices)", depth, self.vertex_count);
        true
    }

    /// Fill the output buffer from a CPU expansion
    pub fn upload_triangles(
        &mut self,
        queue: &wgpu::Queue,
        triangles: &[Triangle],
        depth: u32,
        scale: f32,
    ) {
        let capacity = max_output_triangles();
        let triangles = if triangles.len() > capacity {
            log::warn!(
                "Dropping {} triangles past the output buffer capacity",
                triangles.len() - capacity
            );
            &triangles[..capacity]
        } else {
            triangles
        };

        let vertices: Vec<GpuVertex> = triangles.iter().flat_map(GpuVertex::from_triangle).collect();
        queue.write_buffer(&self.output_buffer, 0, bytemuck::cast_slice(&vertices));
        self.vertex_count = vertices.len() as u32;
        self.expanded = Some((depth, scale));
    }

    /// Get the output buffer for use as vertex buffer in rendering
    pub fn output_buffer(&self) -> &wgpu::Buffer {
        &self.output_buffer
    }

    /// Vertices currently in the output buffer
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }
}
