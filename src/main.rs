//! Sierpinski Pyramid
//!
//! Renders a rotating Sierpinski tetrahedron whose recursion depth is
//! changed from the keyboard.

use std::process::ExitCode;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::WindowId,
};

use sierpinski::config::AppConfig;
use sierpinski::input::{InputAction, InputMapper};
use sierpinski::systems::{RenderSystem, SimulationSystem, WindowSystem};
use sierpinski_core::Viewport;
use sierpinski_render::RenderError;

/// Main application state
struct App {
    /// Application configuration
    config: AppConfig,
    window: Option<WindowSystem>,
    render: Option<RenderSystem>,
    simulation: SimulationSystem,
    /// Set by Escape, honored at the top of the next frame
    exit_requested: bool,
    /// Set when the app stops on a fatal error
    failed: bool,
}

impl App {
    fn new(config: AppConfig) -> Self {
        let simulation = SimulationSystem::new(config.frame_settings());
        Self {
            config,
            window: None,
            render: None,
            simulation,
            exit_requested: false,
            failed: false,
        }
    }

    /// Log a fatal error and stop the event loop
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: &dyn std::error::Error) {
        log::error!("{}", error);
        self.failed = true;
        event_loop.exit();
    }

    fn handle_action(&mut self, action: InputAction) {
        match action {
            InputAction::Exit => self.exit_requested = true,
            InputAction::ToggleFullscreen => {
                if let Some(window) = &self.window {
                    window.toggle_fullscreen();
                }
            }
            _ => {
                self.simulation.handle_action(action);
            }
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            log::info!("Exit requested");
            event_loop.exit();
            return;
        }

        let (Some(window), Some(render)) = (&self.window, &mut self.render) else {
            return;
        };

        // Poll the framebuffer size every frame
        let size = window.inner_size();
        let viewport = Viewport::new(size.width, size.height);
        if viewport.is_empty() {
            // Minimized: nothing to draw into
            self.simulation.reset_clock();
            window.request_redraw();
            return;
        }
        if size != render.size() {
            render.resize(size);
        }

        let frame = self.simulation.update(viewport, render);
        if frame.depth_uploaded {
            window.update_title(frame.depth, frame.triangle_count());
        }

        match render.render_frame(&frame) {
            Ok(()) => {}
            Err(RenderError::SurfaceLost) => render.recover_surface(),
            Err(e @ RenderError::OutOfMemory) => {
                self.fail(event_loop, &e);
                return;
            }
            Err(e) => log::warn!("Surface error: {}", e),
        }

        window.request_redraw();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match WindowSystem::create(event_loop, &self.config.window) {
            Ok(window) => window,
            Err(e) => return self.fail(event_loop, &e),
        };

        let controller = self.simulation.controller();
        let render = match RenderSystem::new(
            window.window().clone(),
            &self.config.rendering,
            self.config.window.vsync,
            controller.seed_point(),
            controller.scale(),
        ) {
            Ok(render) => render,
            Err(e) => return self.fail(event_loop, &e),
        };

        window.request_redraw();
        self.window = Some(window);
        self.render = Some(render);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                // Presses and key repeats both map
                if let PhysicalKey::Code(key) = event.physical_key {
                    if let Some(action) = InputMapper::map_keyboard(key, event.state) {
                        self.handle_action(action);
                    }
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }
}

fn main() -> ExitCode {
    // Configuration first, so the log level can come from it
    let (config, config_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    // Initialize logging (RUST_LOG overrides the configured level)
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.debug.log_level.as_str()),
    )
    .init();
    if let Some(e) = config_error {
        log::warn!("Failed to load config: {}. Using defaults.", e);
    }
    log::info!("Starting Sierpinski Pyramid");

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("Failed to create event loop: {}", e);
            return ExitCode::FAILURE;
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {}", e);
        return ExitCode::FAILURE;
    }

    if app.failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
