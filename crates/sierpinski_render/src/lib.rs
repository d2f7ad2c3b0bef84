//! Sierpinski Rendering Library
//!
//! This crate provides the wgpu side of the renderer: a compute program that
//! expands the seed point into the fractal's triangle stream, and a render
//! program that draws that stream.
//!
//! ## Key Components
//!
//! - [`context::RenderContext`] - WGPU device, queue, and surface management
//! - [`program::ProgramSources`] - WGSL sources, embedded or loaded from disk
//! - [`program::ProgramReport`] - compile/link diagnostics per program stage
//! - [`pipeline::ParameterBlock`] - the `mvp`/`depth`/`scale`/`color` uniform block
//! - [`pipeline::ExpandPipeline`] - compute stage producing the triangle stream
//! - [`pipeline::RenderPipeline`] - draws the stream with depth testing

pub mod context;
pub mod program;
pub mod pipeline;

pub use context::{RenderContext, RenderError};
pub use program::{ProgramError, ProgramReport, ProgramSources, ProgramStage};
pub use pipeline::{ExpandPipeline, ParameterBlock, RenderPipeline};
