//! Frame controller
//!
//! Owns the session state (depth and camera angle) and turns it into the
//! parameter set for one frame. The rendering boundary is the
//! [`ParameterSink`] trait, so frames can be driven without a GPU.
//!
//! Per-frame order:
//! 1. upload depth if dirty (once per change)
//! 2. advance the camera angle by `dt`
//! 3. aspect ratio from the polled viewport
//! 4. `projection * view * model`
//! 5. color and scale derived from depth
//! 6. hand the snapshot to the sink

use sierpinski_math::{Mat4, Vec3};

use crate::camera::{CameraSettings, OrbitCamera};
use crate::depth::{DepthCommand, DepthState, DEFAULT_DEPTH};
use crate::expander::triangle_count;
use crate::palette::DepthPalette;
use crate::tetrahedron::Tetrahedron;

/// Receiver of per-frame parameters (the GPU uniform block in the app)
pub trait ParameterSink {
    /// Called only on frames where the depth changed
    fn upload_depth(&mut self, depth: u32);

    /// Called every frame with the transform, scale and color
    fn upload_frame(&mut self, frame: &FrameSnapshot);
}

/// Framebuffer size in physical pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height; 1.0 for a zero-height (minimized) viewport
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    /// Whether there is nothing to draw into
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Everything the draw of one frame needs
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSnapshot {
    pub mvp: Mat4,
    pub depth: u32,
    pub scale: f32,
    pub color: [f32; 3],
    pub aspect: f32,
    pub angle: f32,
    /// Whether the depth was pushed to the sink this frame
    pub depth_uploaded: bool,
}

impl FrameSnapshot {
    /// Triangles the expansion stage emits for this frame
    pub fn triangle_count(&self) -> usize {
        triangle_count(self.depth)
    }
}

/// Startup parameters of the controller
#[derive(Clone, Debug)]
pub struct FrameSettings {
    pub initial_depth: u32,
    pub scale: f32,
    pub seed: Vec3,
    pub palette: DepthPalette,
    pub camera: CameraSettings,
}

impl Default for FrameSettings {
    fn default() -> Self {
        Self {
            initial_depth: DEFAULT_DEPTH,
            scale: 0.9,
            seed: Vec3::ZERO,
            palette: DepthPalette::default(),
            camera: CameraSettings::default(),
        }
    }
}

/// Session state plus the per-frame update
pub struct FrameController {
    depth: DepthState,
    camera: OrbitCamera,
    palette: DepthPalette,
    scale: f32,
    seed: Vec3,
}

impl Default for FrameController {
    fn default() -> Self {
        Self::new(FrameSettings::default())
    }
}

impl FrameController {
    pub fn new(settings: FrameSettings) -> Self {
        Self {
            depth: DepthState::new(settings.initial_depth),
            camera: OrbitCamera::new(settings.camera),
            palette: settings.palette,
            scale: settings.scale,
            seed: settings.seed,
        }
    }

    /// Apply a depth transition; returns whether the depth changed
    pub fn apply(&mut self, command: DepthCommand) -> bool {
        self.depth.apply(command)
    }

    /// Current depth
    pub fn depth(&self) -> u32 {
        self.depth.value()
    }

    /// Whether a depth change is pending upload
    pub fn is_depth_dirty(&self) -> bool {
        self.depth.is_dirty()
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// The seed point submitted to the expansion stage
    pub fn seed_point(&self) -> Vec3 {
        self.seed
    }

    /// The canonical tetrahedron the seed point expands to
    pub fn seed_tetrahedron(&self) -> Tetrahedron {
        Tetrahedron::from_seed(self.seed, self.scale)
    }

    /// Run the per-frame computation and hand the result to `sink`
    pub fn update<S: ParameterSink + ?Sized>(
        &mut self,
        viewport: Viewport,
        dt: f32,
        sink: &mut S,
    ) -> FrameSnapshot {
        // 1. Depth re-sync, at most once per change
        let depth_uploaded = match self.depth.take_dirty() {
            Some(depth) => {
                sink.upload_depth(depth);
                log::info!("Depth set to {}", depth);
                true
            }
            None => false,
        };

        // 2. Animate
        self.camera.advance(dt);

        // 3-4. Transforms
        let aspect = viewport.aspect();
        let mvp = self.camera.mvp(aspect);

        // 5. Depth-derived visuals
        let depth = self.depth.value();
        let color = self.palette.color_for(depth);

        let snapshot = FrameSnapshot {
            mvp,
            depth,
            scale: self.scale,
            color,
            aspect,
            angle: self.camera.angle(),
            depth_uploaded,
        };

        // 6. Hand off
        sink.upload_frame(&snapshot);
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        depths: Vec<u32>,
        frames: Vec<FrameSnapshot>,
    }

    impl ParameterSink for RecordingSink {
        fn upload_depth(&mut self, depth: u32) {
            self.depths.push(depth);
        }

        fn upload_frame(&mut self, frame: &FrameSnapshot) {
            self.frames.push(frame.clone());
        }
    }

    const VIEWPORT: Viewport = Viewport { width: 900, height: 700 };

    #[test]
    fn test_first_frame_uploads_initial_depth() {
        let mut controller = FrameController::default();
        let mut sink = RecordingSink::default();
        let frame = controller.update(VIEWPORT, 1.0 / 60.0, &mut sink);
        assert_eq!(sink.depths, vec![3]);
        assert!(frame.depth_uploaded);
        assert_eq!(frame.triangle_count(), 256);
    }

    #[test]
    fn test_depth_uploaded_once_per_change() {
        let mut controller = FrameController::default();
        let mut sink = RecordingSink::default();
        controller.update(VIEWPORT, 0.016, &mut sink);

        controller.apply(DepthCommand::Increase);
        for _ in 0..10 {
            controller.update(VIEWPORT, 0.016, &mut sink);
        }
        assert_eq!(sink.depths, vec![3, 4]);
        assert_eq!(sink.frames.len(), 11);
        assert!(sink.frames[1].depth_uploaded);
        assert!(sink.frames[2..].iter().all(|f| !f.depth_uploaded));
    }

    #[test]
    fn test_several_changes_in_one_frame_upload_once() {
        let mut controller = FrameController::default();
        let mut sink = RecordingSink::default();
        controller.apply(DepthCommand::Increase);
        controller.apply(DepthCommand::Decrease);
        controller.apply(DepthCommand::Decrease);
        controller.update(VIEWPORT, 0.016, &mut sink);
        assert_eq!(sink.depths, vec![2]);
    }

    #[test]
    fn test_aspect_from_viewport() {
        let mut controller = FrameController::default();
        let mut sink = RecordingSink::default();
        let frame = controller.update(VIEWPORT, 0.0, &mut sink);
        assert!((frame.aspect - 900.0 / 700.0).abs() < 1e-6);
        assert_eq!(frame.mvp, controller.camera().mvp(900.0 / 700.0));
    }

    #[test]
    fn test_viewport_aspect_guard() {
        assert_eq!(Viewport::new(800, 0).aspect(), 1.0);
        assert!(Viewport::new(800, 0).is_empty());
        assert!(!VIEWPORT.is_empty());
    }

    #[test]
    fn test_angle_advances_each_frame() {
        let mut controller = FrameController::default();
        let mut sink = RecordingSink::default();
        let a = controller.update(VIEWPORT, 0.1, &mut sink).angle;
        let b = controller.update(VIEWPORT, 0.1, &mut sink).angle;
        assert!(b > a && a > 0.0);
    }

    #[test]
    fn test_visuals_follow_depth() {
        let mut controller = FrameController::default();
        let mut sink = RecordingSink::default();
        let shallow = controller.update(VIEWPORT, 0.0, &mut sink);
        controller.apply(DepthCommand::Increase);
        let deeper = controller.update(VIEWPORT, 0.0, &mut sink);

        assert_eq!(shallow.scale, 0.9);
        assert_eq!(deeper.scale, 0.9);
        assert_eq!(deeper.color, DepthPalette::default().color_for(4));
        assert_ne!(shallow.color, deeper.color);
    }

    #[test]
    fn test_seed_tetrahedron_uses_scale() {
        let controller = FrameController::default();
        let seed = controller.seed_tetrahedron();
        assert_eq!(seed, Tetrahedron::from_seed(Vec3::ZERO, 0.9));
    }
}
