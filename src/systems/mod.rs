//! Application systems
//!
//! Modular systems kept out of main.rs for better organization and testability.

mod render;
mod simulation;
mod window;

pub use render::{RenderSystem, StartupError};
pub use simulation::SimulationSystem;
pub use window::{WindowError, WindowSystem};
