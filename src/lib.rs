//! Sierpinski Pyramid
//!
//! Application layer of the renderer: configuration, input mapping and the
//! systems driving the window, the frame controller and the GPU.

pub mod config;
pub mod input;
pub mod systems;
