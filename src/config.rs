//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`SPK_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::{Path, PathBuf};

use sierpinski_core::{CameraSettings, DepthPalette, FrameSettings, Vec3};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Window configuration
    #[serde(default)]
    pub window: WindowConfig,
    /// Camera configuration
    #[serde(default)]
    pub camera: CameraConfig,
    /// Fractal configuration
    #[serde(default)]
    pub fractal: FractalConfig,
    /// Rendering configuration
    #[serde(default)]
    pub rendering: RenderingConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`SPK_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        // Optional
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // SPK_FRACTAL__INITIAL_DEPTH=5 -> fractal.initial_depth = 5
        figment = figment.merge(Env::prefixed("SPK_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }

    /// Startup parameters for the frame controller
    pub fn frame_settings(&self) -> FrameSettings {
        FrameSettings {
            initial_depth: self.fractal.initial_depth,
            scale: self.fractal.scale,
            seed: Vec3::from_array(self.fractal.seed),
            palette: DepthPalette::new(
                Vec3::from_array(self.fractal.shallow_color),
                Vec3::from_array(self.fractal.deep_color),
            ),
            camera: self.camera.to_settings(),
        }
    }
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// Start in fullscreen mode
    pub fullscreen: bool,
    /// Enable VSync
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Sierpinski Pyramid".to_string(),
            width: 900,
            height: 700,
            fullscreen: false,
            vsync: true,
        }
    }
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Eye position [x, y, z]
    pub eye: [f32; 3],
    /// Look-at target [x, y, z]
    pub target: [f32; 3],
    /// Up vector [x, y, z]
    pub up: [f32; 3],
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Axis the pyramid spins about
    pub rotation_axis: [f32; 3],
    /// Spin speed in radians per second
    pub rotation_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        let settings = CameraSettings::default();
        Self {
            eye: settings.eye.to_array(),
            target: settings.target.to_array(),
            up: settings.up.to_array(),
            fov: settings.fov_y,
            near: settings.near,
            far: settings.far,
            rotation_axis: settings.rotation_axis.to_array(),
            rotation_speed: settings.rotation_speed,
        }
    }
}

impl CameraConfig {
    pub fn to_settings(&self) -> CameraSettings {
        CameraSettings {
            eye: Vec3::from_array(self.eye),
            target: Vec3::from_array(self.target),
            up: Vec3::from_array(self.up),
            fov_y: self.fov,
            near: self.near,
            far: self.far,
            rotation_axis: Vec3::from_array(self.rotation_axis),
            rotation_speed: self.rotation_speed,
        }
    }
}

/// Fractal configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FractalConfig {
    /// Depth at startup and after a reset (clamped to 0..=6)
    pub initial_depth: u32,
    /// Seed tetrahedron scale
    pub scale: f32,
    /// Seed point [x, y, z]
    pub seed: [f32; 3],
    /// Color at depth 0
    pub shallow_color: [f32; 3],
    /// Color at the maximum depth
    pub deep_color: [f32; 3],
}

impl Default for FractalConfig {
    fn default() -> Self {
        let settings = FrameSettings::default();
        Self {
            initial_depth: settings.initial_depth,
            scale: settings.scale,
            seed: settings.seed.to_array(),
            shallow_color: settings.palette.shallow.to_array(),
            deep_color: settings.palette.deep.to_array(),
        }
    }
}

/// Where the triangle stream is produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpansionBackend {
    /// Compute program on the GPU
    #[default]
    Gpu,
    /// Recursive expander on the CPU, uploaded on depth changes
    Cpu,
}

/// Rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderingConfig {
    /// Where the fractal is expanded
    pub expansion: ExpansionBackend,
    /// Background color [r, g, b, a]
    pub background_color: [f32; 4],
    /// Cull faces wound clockwise on screen
    pub cull_back_faces: bool,
    /// Directory holding `expand.wgsl` and `render.wgsl`; embedded sources when unset
    pub shader_dir: Option<PathBuf>,
    /// Treat program compile/link failures as fatal
    pub strict_programs: bool,
    /// Light direction in model space [x, y, z]
    pub light_dir: [f32; 3],
    /// Ambient light strength
    pub ambient_strength: f32,
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            expansion: ExpansionBackend::Gpu,
            background_color: [0.05, 0.06, 0.08, 1.0],
            cull_back_faces: true,
            shader_dir: None,
            strict_programs: false,
            light_dir: [0.5, 1.0, 0.3],
            ambient_strength: 0.3,
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.window.title, "Sierpinski Pyramid");
        assert_eq!(config.window.width, 900);
        assert_eq!(config.window.height, 700);
        assert_eq!(config.fractal.initial_depth, 3);
        assert_eq!(config.rendering.expansion, ExpansionBackend::Gpu);
        assert!(!config.rendering.strict_programs);
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("title"));
        assert!(toml.contains("initial_depth"));
        assert!(toml.contains("expansion = \"gpu\""));
    }

    #[test]
    fn test_default_frame_settings_match_controller_defaults() {
        let settings = AppConfig::default().frame_settings();
        let expected = FrameSettings::default();
        assert_eq!(settings.initial_depth, expected.initial_depth);
        assert_eq!(settings.scale, expected.scale);
        assert_eq!(settings.seed, expected.seed);
        assert_eq!(settings.palette, expected.palette);
        assert_eq!(settings.camera, expected.camera);
    }

    #[test]
    fn test_frame_settings_carry_overrides() {
        let mut config = AppConfig::default();
        config.fractal.initial_depth = 5;
        config.camera.fov = 60.0;
        config.fractal.seed = [1.0, 0.0, -1.0];

        let settings = config.frame_settings();
        assert_eq!(settings.initial_depth, 5);
        assert_eq!(settings.camera.fov_y, 60.0);
        assert_eq!(settings.seed, Vec3::new(1.0, 0.0, -1.0));
    }
}
