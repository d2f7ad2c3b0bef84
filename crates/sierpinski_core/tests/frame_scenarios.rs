//! Integration tests for the input -> frame -> expansion pipeline
//!
//! These tests drive the frame controller the way the render loop does:
//! 1. Depth commands mutate the controller
//! 2. Each frame pushes parameters to a sink
//! 3. The expansion at the resulting depth has the expected size

use sierpinski_core::{
    expand, DepthCommand, ExpansionCache, FrameController, FrameSnapshot, ParameterSink,
    Viewport, MAX_DEPTH,
};

/// Counts uploads the way the GPU uniform block would see them
#[derive(Default)]
struct CountingSink {
    depth_uploads: Vec<u32>,
    frame_uploads: usize,
    last_frame: Option<FrameSnapshot>,
}

impl ParameterSink for CountingSink {
    fn upload_depth(&mut self, depth: u32) {
        self.depth_uploads.push(depth);
    }

    fn upload_frame(&mut self, frame: &FrameSnapshot) {
        self.frame_uploads += 1;
        self.last_frame = Some(frame.clone());
    }
}

const VIEWPORT: Viewport = Viewport { width: 900, height: 700 };
const DT: f32 = 1.0 / 60.0;

// ==================== Depth Scenarios ====================

#[test]
fn test_increase_to_cap_and_stay() {
    let mut controller = FrameController::default();
    assert_eq!(controller.depth(), 3);

    for _ in 0..4 {
        controller.apply(DepthCommand::Increase);
    }
    assert_eq!(controller.depth(), 6);

    controller.apply(DepthCommand::Increase);
    assert_eq!(controller.depth(), MAX_DEPTH);

    let triangles = expand(controller.seed_tetrahedron(), controller.depth() as i32).unwrap();
    assert_eq!(triangles.len(), 16384);
}

#[test]
fn test_reset_from_any_state() {
    for increases in 0..=3 {
        for decreases in 0..=4 {
            let mut controller = FrameController::default();
            for _ in 0..increases {
                controller.apply(DepthCommand::Increase);
            }
            for _ in 0..decreases {
                controller.apply(DepthCommand::Decrease);
            }
            controller.apply(DepthCommand::Reset);
            assert_eq!(controller.depth(), 3);

            let triangles = expand(controller.seed_tetrahedron(), controller.depth() as i32).unwrap();
            assert_eq!(triangles.len(), 256);
        }
    }
}

#[test]
fn test_decrease_floor() {
    let mut controller = FrameController::default();
    for _ in 0..10 {
        controller.apply(DepthCommand::Decrease);
    }
    assert_eq!(controller.depth(), 0);
    let triangles = expand(controller.seed_tetrahedron(), 0).unwrap();
    assert_eq!(triangles.len(), 4);
}

// ==================== Dirty Flag Discipline ====================

#[test]
fn test_idle_frames_do_not_upload_depth() {
    let mut controller = FrameController::default();
    let mut sink = CountingSink::default();

    for _ in 0..100 {
        controller.update(VIEWPORT, DT, &mut sink);
    }
    assert_eq!(sink.depth_uploads, vec![3], "only the initial depth is uploaded");
    assert_eq!(sink.frame_uploads, 100);
}

#[test]
fn test_upload_on_the_frame_of_the_event_only() {
    let mut controller = FrameController::default();
    let mut sink = CountingSink::default();
    controller.update(VIEWPORT, DT, &mut sink);

    // Event lands between frame 1 and frame 2
    controller.apply(DepthCommand::Decrease);
    let frame = controller.update(VIEWPORT, DT, &mut sink);
    assert!(frame.depth_uploaded);

    for _ in 0..20 {
        let frame = controller.update(VIEWPORT, DT, &mut sink);
        assert!(!frame.depth_uploaded);
    }
    assert_eq!(sink.depth_uploads, vec![3, 2]);
}

#[test]
fn test_boundary_noop_does_not_upload() {
    let mut controller = FrameController::default();
    let mut sink = CountingSink::default();
    for _ in 0..3 {
        controller.apply(DepthCommand::Increase);
    }
    controller.update(VIEWPORT, DT, &mut sink);
    assert_eq!(sink.depth_uploads, vec![6]);

    controller.apply(DepthCommand::Increase);
    controller.update(VIEWPORT, DT, &mut sink);
    assert_eq!(sink.depth_uploads, vec![6]);
}

// ==================== Frame Parameters ====================

#[test]
fn test_aspect_ratio_for_900_by_700() {
    let mut controller = FrameController::default();
    let mut sink = CountingSink::default();
    let frame = controller.update(VIEWPORT, DT, &mut sink);

    assert!((frame.aspect - 1.2857).abs() < 1e-4);
    let expected = controller.camera().mvp(900.0 / 700.0);
    assert_eq!(frame.mvp, expected);
    assert_eq!(sink.last_frame.as_ref(), Some(&frame));
}

#[test]
fn test_resize_is_picked_up_next_frame() {
    let mut controller = FrameController::default();
    let mut sink = CountingSink::default();
    controller.update(VIEWPORT, DT, &mut sink);
    let frame = controller.update(Viewport::new(1280, 720), DT, &mut sink);
    assert!((frame.aspect - 1280.0 / 720.0).abs() < 1e-6);
}

#[test]
fn test_cache_follows_controller_depth() {
    let mut controller = FrameController::default();
    let mut cache = ExpansionCache::new(controller.seed_tetrahedron());
    let mut sink = CountingSink::default();

    for step in 0..30 {
        if step == 10 {
            controller.apply(DepthCommand::Increase);
        }
        let frame = controller.update(VIEWPORT, DT, &mut sink);
        let triangles = cache.triangles(frame.depth).unwrap();
        assert_eq!(triangles.len(), frame.triangle_count());
    }
    assert_eq!(cache.expansions(), 2);
}
