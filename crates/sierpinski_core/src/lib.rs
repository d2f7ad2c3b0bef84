//! Core types for the Sierpinski pyramid renderer
//!
//! This crate has no GPU or windowing dependencies, so everything in it runs
//! in plain unit tests.
//!
//! ## Key Components
//!
//! - [`expander::expand`] - recursive tetrahedral subdivision into a triangle stream
//! - [`ExpansionCache`] - remembers the stream of the last requested depth
//! - [`DepthState`] - clamped depth state machine with a one-shot dirty flag
//! - [`OrbitCamera`] - fixed eye, model rotating about a fixed axis
//! - [`FrameController`] - per-frame parameter computation fed to a [`ParameterSink`]

pub mod tetrahedron;
pub mod expander;
pub mod cache;
pub mod depth;
pub mod camera;
pub mod palette;
pub mod frame;

pub use tetrahedron::{Tetrahedron, Triangle, SEED_CORNERS};
pub use expander::{expand, leaves, leaf_count, triangle_count, ExpandError, MAX_EXPAND_DEPTH};
pub use cache::ExpansionCache;
pub use depth::{DepthCommand, DepthState, DEFAULT_DEPTH, MAX_DEPTH};
pub use camera::{CameraSettings, OrbitCamera, MAX_FRAME_DT};
pub use palette::DepthPalette;
pub use frame::{FrameController, FrameSettings, FrameSnapshot, ParameterSink, Viewport};

// Re-export math types for convenience
pub use sierpinski_math::{Vec3, Mat4};
