//! Frame simulation system
//!
//! Manages the per-frame update:
//! - Delta time calculation
//! - Depth commands from input
//! - Handing the frame's parameters to the renderer

use std::time::Instant;
use sierpinski_core::{FrameController, FrameSettings, FrameSnapshot, ParameterSink, Viewport};

use crate::input::InputAction;

/// Manages the frame controller and the frame clock
pub struct SimulationSystem {
    controller: FrameController,
    last_frame: Instant,
}

impl SimulationSystem {
    /// Create a new simulation system
    pub fn new(settings: FrameSettings) -> Self {
        Self {
            controller: FrameController::new(settings),
            last_frame: Instant::now(),
        }
    }

    /// Apply an input action; returns whether the depth changed
    ///
    /// Actions without a depth command are ignored here.
    pub fn handle_action(&mut self, action: InputAction) -> bool {
        match action.depth_command() {
            Some(command) => self.controller.apply(command),
            None => false,
        }
    }

    /// Run one frame against `sink`
    ///
    /// The controller caps the time step, so a long stall (first frame,
    /// window drag) does not make the model jump.
    pub fn update<S: ParameterSink + ?Sized>(
        &mut self,
        viewport: Viewport,
        sink: &mut S,
    ) -> FrameSnapshot {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;

        self.controller.update(viewport, dt, sink)
    }

    /// Restart the frame clock (after a skipped frame)
    pub fn reset_clock(&mut self) {
        self.last_frame = Instant::now();
    }

    pub fn controller(&self) -> &FrameController {
        &self.controller
    }
}

impl Default for SimulationSystem {
    fn default() -> Self {
        Self::new(FrameSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct NullSink {
        depths: Vec<u32>,
    }

    impl ParameterSink for NullSink {
        fn upload_depth(&mut self, depth: u32) {
            self.depths.push(depth);
        }

        fn upload_frame(&mut self, _frame: &FrameSnapshot) {}
    }

    #[test]
    fn test_depth_actions_reach_controller() {
        let mut sim = SimulationSystem::default();
        assert!(sim.handle_action(InputAction::IncreaseDepth));
        assert_eq!(sim.controller().depth(), 4);
        assert!(sim.handle_action(InputAction::ResetDepth));
        assert_eq!(sim.controller().depth(), 3);
        assert!(sim.handle_action(InputAction::DecreaseDepth));
        assert_eq!(sim.controller().depth(), 2);
    }

    #[test]
    fn test_non_depth_actions_ignored() {
        let mut sim = SimulationSystem::default();
        assert!(!sim.handle_action(InputAction::ToggleFullscreen));
        assert!(!sim.handle_action(InputAction::Exit));
        assert_eq!(sim.controller().depth(), 3);
    }

    #[test]
    fn test_update_uploads_pending_depth_once() {
        let mut sim = SimulationSystem::default();
        let mut sink = NullSink::default();
        let viewport = Viewport::new(900, 700);

        let first = sim.update(viewport, &mut sink);
        let second = sim.update(viewport, &mut sink);
        assert!(first.depth_uploaded);
        assert!(!second.depth_uploaded);
        assert_eq!(sink.depths, vec![3]);
    }

    #[test]
    fn test_frame_time_is_capped() {
        let mut sim = SimulationSystem::default();
        let mut sink = NullSink::default();
        sim.last_frame = Instant::now() - std::time::Duration::from_secs(5);
        let frame = sim.update(Viewport::new(900, 700), &mut sink);
        let max_angle = sierpinski_core::CameraSettings::default().rotation_speed
            * sierpinski_core::MAX_FRAME_DT;
        assert!(frame.angle <= max_angle + 1e-6);
    }
}
