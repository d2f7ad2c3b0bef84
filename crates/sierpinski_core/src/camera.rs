//! Orbit camera
//!
//! The eye stays fixed and looks at the target; the model spins about a
//! fixed axis. Only the accumulated angle changes between frames.

use sierpinski_math::{mat4, Mat4, Vec3};

/// Largest time step fed to the animation, in seconds
///
/// Keeps the model from jumping after a stall (first frame, window drag).
pub const MAX_FRAME_DT: f32 = 0.25;

/// Fixed camera parameters
#[derive(Clone, Debug, PartialEq)]
pub struct CameraSettings {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    /// Axis the model rotates about (normalized on use)
    pub rotation_axis: Vec3,
    /// Model rotation speed in radians per second
    pub rotation_speed: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            eye: Vec3::new(2.5, 2.0, 2.5),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y: 45.0,
            near: 0.1,
            far: 50.0,
            rotation_axis: Vec3::new(0.2, 1.0, 0.0),
            // 0.003 rad per frame at 60 fps
            rotation_speed: 0.18,
        }
    }
}

/// Camera state: fixed settings plus the accumulated model angle
#[derive(Clone, Debug)]
pub struct OrbitCamera {
    settings: CameraSettings,
    angle: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(CameraSettings::default())
    }
}

impl OrbitCamera {
    /// Create a camera at angle zero
    pub fn new(settings: CameraSettings) -> Self {
        Self { settings, angle: 0.0 }
    }

    /// The fixed settings
    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    /// Accumulated model rotation in radians
    ///
    /// Grows without bound; the trigonometry wraps it.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Advance the rotation by `dt` seconds (clamped to `[0, MAX_FRAME_DT]`)
    pub fn advance(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.clamp(0.0, MAX_FRAME_DT) } else { 0.0 };
        self.angle += self.settings.rotation_speed * dt;
    }

    /// Projection matrix for the given aspect ratio
    pub fn projection(&self, aspect: f32) -> Mat4 {
        mat4::perspective(
            self.settings.fov_y.to_radians(),
            aspect,
            self.settings.near,
            self.settings.far,
        )
    }

    /// View matrix
    pub fn view(&self) -> Mat4 {
        mat4::look_at(self.settings.eye, self.settings.target, self.settings.up)
    }

    /// Model matrix: rotation by the current angle about the rotation axis
    pub fn model(&self) -> Mat4 {
        mat4::axis_angle(self.settings.rotation_axis, self.angle)
    }

    /// `projection * view * model`
    pub fn mvp(&self, aspect: f32) -> Mat4 {
        mat4::mul(self.projection(aspect), mat4::mul(self.view(), self.model()))
    }
}
