//! GPU rendering system
//!
//! Manages GPU rendering including:
//! - Render context and surface
//! - The parameter block, as the frame controller's [`ParameterSink`]
//! - Expansion (compute program or CPU cache) and the render pipeline
//! - Frame rendering

use std::fmt;
use std::sync::Arc;
use winit::{dpi::PhysicalSize, window::Window};

use sierpinski_core::{ExpansionCache, FrameSnapshot, ParameterSink, Tetrahedron, Vec3};
use sierpinski_render::{
    pipeline::SeedPoint, ExpandPipeline, ParameterBlock, ProgramError, ProgramReport,
    ProgramSources, RenderContext, RenderError, RenderPipeline,
};

use crate::config::{ExpansionBackend, RenderingConfig};

/// Failure while bringing up the renderer
#[derive(Debug)]
pub enum StartupError {
    /// Surface, adapter or device could not be acquired
    Render(RenderError),
    /// Shader sources unreadable, or a program failed in strict mode
    Program(ProgramError),
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartupError::Render(e) => write!(f, "{}", e),
            StartupError::Program(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for StartupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StartupError::Render(e) => Some(e),
            StartupError::Program(e) => Some(e),
        }
    }
}

impl From<RenderError> for StartupError {
    fn from(e: RenderError) -> Self {
        StartupError::Render(e)
    }
}

impl From<ProgramError> for StartupError {
    fn from(e: ProgramError) -> Self {
        StartupError::Program(e)
    }
}

/// Manages GPU rendering
pub struct RenderSystem {
    context: RenderContext,
    parameters: ParameterBlock,
    expand_pipeline: ExpandPipeline,
    render_pipeline: RenderPipeline,
    /// Present only for the CPU expansion backend
    cache: Option<ExpansionCache>,
    clear_color: wgpu::Color,
}

impl RenderSystem {
    /// Create render system from window and config
    ///
    /// `seed` and `scale` define the seed tetrahedron; the CPU backend
    /// expands it directly, the GPU backend receives the seed point.
    pub fn new(
        window: Arc<Window>,
        config: &RenderingConfig,
        vsync: bool,
        seed: Vec3,
        scale: f32,
    ) -> Result<Self, StartupError> {
        let sources = ProgramSources::load(config.shader_dir.as_deref())?;

        let context = pollster::block_on(RenderContext::new(window, vsync))?;

        let parameters = ParameterBlock::new(
            &context.device,
            config.ambient_strength,
            config.light_dir,
        );

        let mut report = ProgramReport::new();
        let expand_pipeline = ExpandPipeline::new(
            &context.device,
            &sources,
            &parameters,
            SeedPoint::new(seed),
            &mut report,
        );
        let mut render_pipeline = RenderPipeline::new(
            &context.device,
            context.format(),
            &sources,
            &parameters,
            config.cull_back_faces,
            &mut report,
        );

        if report.is_clean() {
            log::info!("Programs built");
        } else if config.strict_programs {
            report.into_result()?;
        } else {
            log::warn!(
                "{} program error(s); continuing with unusable programs",
                report.errors().len()
            );
        }

        render_pipeline.ensure_depth_texture(
            &context.device,
            context.config.width,
            context.config.height,
        );

        let cache = match config.expansion {
            ExpansionBackend::Gpu => None,
            ExpansionBackend::Cpu => Some(ExpansionCache::new(Tetrahedron::from_seed(seed, scale))),
        };
        log::info!("Expansion backend: {:?}", config.expansion);

        let bg = config.background_color;
        Ok(Self {
            context,
            parameters,
            expand_pipeline,
            render_pipeline,
            cache,
            clear_color: wgpu::Color {
                r: bg[0] as f64,
                g: bg[1] as f64,
                b: bg[2] as f64,
                a: bg[3] as f64,
            },
        })
    }

    /// Handle window resize
    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        self.context.resize(size);
        self.render_pipeline.ensure_depth_texture(
            &self.context.device,
            self.context.config.width,
            self.context.config.height,
        );
    }

    /// Reconfigure the surface after it was lost or outdated
    pub fn recover_surface(&mut self) {
        self.context.reconfigure();
    }

    /// Get current surface size
    pub fn size(&self) -> PhysicalSize<u32> {
        self.context.size
    }

    /// Expand if needed and draw `frame`
    ///
    /// The frame's parameters must already be in the parameter block, which
    /// is where [`SimulationSystem::update`](super::SimulationSystem::update)
    /// puts them.
    pub fn render_frame(&mut self, frame: &FrameSnapshot) -> Result<(), RenderError> {
        // Get surface texture
        let output = match self.context.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                return Err(RenderError::SurfaceLost)
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RenderError::OutOfMemory),
            Err(e) => return Err(RenderError::Other(format!("{:?}", e))),
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        // Expansion only runs when depth or scale changed
        match self.cache.as_mut() {
            None => {
                self.expand_pipeline.run(&mut encoder, frame.depth, frame.scale);
            }
            Some(cache) => {
                if self.expand_pipeline.needs_expansion(frame.depth, frame.scale) {
                    match cache.triangles(frame.depth) {
                        Ok(triangles) => self.expand_pipeline.upload_triangles(
                            &self.context.queue,
                            triangles,
                            frame.depth,
                            frame.scale,
                        ),
                        Err(e) => log::error!("CPU expansion failed: {}", e),
                    }
                }
            }
        }

        self.render_pipeline.render(
            &mut encoder,
            &view,
            self.expand_pipeline.output_buffer(),
            self.expand_pipeline.vertex_count(),
            self.clear_color,
        );

        self.context.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

impl ParameterSink for RenderSystem {
    fn upload_depth(&mut self, depth: u32) {
        self.parameters.write_depth(&self.context.queue, depth);
    }

    fn upload_frame(&mut self, frame: &FrameSnapshot) {
        self.parameters.write_frame(&self.context.queue, frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_error_display() {
        let err = StartupError::from(RenderError::NoAdapter);
        assert_eq!(err.to_string(), RenderError::NoAdapter.to_string());

        let err = StartupError::from(ProgramError::Io {
            path: "shaders/expand.wgsl".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        });
        assert!(err.to_string().contains("expand.wgsl"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
