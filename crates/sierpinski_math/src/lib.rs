//! Sierpinski Mathematics Library
//!
//! Small, dependency-light math types used by the fractal expander and the
//! camera.
//!
//! ## Core Types
//!
//! - [`Vec3`] - 3D vector with x, y, z components
//! - [`Mat4`] - 4x4 column-major matrix with projection/view/model helpers

mod vec3;
pub mod mat4;

pub use vec3::Vec3;
pub use mat4::Mat4;
