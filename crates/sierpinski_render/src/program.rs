//! GPU programs and their diagnostics
//!
//! The two WGSL programs are embedded in the binary and can be overridden by
//! a directory on disk. Compile and link failures are caught with wgpu error
//! scopes, logged with the stage that failed, and collected in a
//! [`ProgramReport`] so the caller decides whether they are fatal.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// One of the two GPU programs
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProgramStage {
    /// Compute program turning the seed point into triangles
    Expand,
    /// Vertex and fragment program drawing the triangles
    Render,
}

impl ProgramStage {
    /// Stage name used in diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            ProgramStage::Expand => "expand (compute)",
            ProgramStage::Render => "render (vertex/fragment)",
        }
    }

    /// File name of the stage's source in a shader directory
    pub fn file_name(&self) -> &'static str {
        match self {
            ProgramStage::Expand => "expand.wgsl",
            ProgramStage::Render => "render.wgsl",
        }
    }
}

/// Which half of program creation failed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProgramStep {
    /// Shader module creation
    Compile,
    /// Pipeline creation against the module
    Link,
}

impl fmt::Display for ProgramStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgramStep::Compile => write!(f, "compile"),
            ProgramStep::Link => write!(f, "link"),
        }
    }
}

/// Error loading or building a program
#[derive(Debug)]
pub enum ProgramError {
    /// A shader file could not be read
    Io { path: PathBuf, source: io::Error },
    /// The device rejected a module or pipeline
    Build {
        stage: ProgramStage,
        step: ProgramStep,
        message: String,
    },
}

impl fmt::Display for ProgramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgramError::Io { path, source } => {
                write!(f, "Failed to read shader {}: {}", path.display(), source)
            }
            ProgramError::Build { stage, step, message } => {
                write!(f, "Failed to {} {} program: {}", step, stage.name(), message)
            }
        }
    }
}

impl std::error::Error for ProgramError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProgramError::Io { source, .. } => Some(source),
            ProgramError::Build { .. } => None,
        }
    }
}

/// WGSL source of both programs
#[derive(Clone, Debug)]
pub struct ProgramSources {
    pub expand: String,
    pub render: String,
}

impl Default for ProgramSources {
    fn default() -> Self {
        Self::embedded()
    }
}

impl ProgramSources {
    /// The sources compiled into the binary
    pub fn embedded() -> Self {
        Self {
            expand: include_str!("shaders/expand.wgsl").to_string(),
            render: include_str!("shaders/render.wgsl").to_string(),
        }
    }

    /// Load both sources from `dir`, or use the embedded ones when `None`
    ///
    /// An unreadable file is an error; there is no per-file fallback.
    pub fn load(dir: Option<&Path>) -> Result<Self, ProgramError> {
        let Some(dir) = dir else {
            return Ok(Self::embedded());
        };
        log::info!("Loading shaders from {}", dir.display());
        Ok(Self {
            expand: read_source(dir, ProgramStage::Expand)?,
            render: read_source(dir, ProgramStage::Render)?,
        })
    }

    /// Source text for `stage`
    pub fn source(&self, stage: ProgramStage) -> &str {
        match stage {
            ProgramStage::Expand => &self.expand,
            ProgramStage::Render => &self.render,
        }
    }
}

fn read_source(dir: &Path, stage: ProgramStage) -> Result<String, ProgramError> {
    let path = dir.join(stage.file_name());
    fs::read_to_string(&path).map_err(|source| ProgramError::Io { path, source })
}

/// Build diagnostics collected while creating the programs
#[derive(Debug, Default)]
pub struct ProgramReport {
    errors: Vec<ProgramError>,
}

impl ProgramReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `build` inside a validation error scope
    ///
    /// Whatever `build` returns is handed back even when the device reported
    /// an error; the object is then unusable but drawing with it only logs.
    pub fn capture<T>(
        &mut self,
        device: &wgpu::Device,
        stage: ProgramStage,
        step: ProgramStep,
        build: impl FnOnce() -> T,
    ) -> T {
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let built = build();
        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            self.record(ProgramError::Build {
                stage,
                step,
                message: error.to_string(),
            });
        }
        built
    }

    /// Log and keep an error
    pub fn record(&mut self, error: ProgramError) {
        log::error!("{}", error);
        self.errors.push(error);
    }

    pub fn errors(&self) -> &[ProgramError] {
        &self.errors
    }

    /// Whether every capture succeeded
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// The first recorded error, if any
    pub fn into_result(self) -> Result<(), ProgramError> {
        match self.errors.into_iter().next() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Compile `stage` from `sources`, capturing diagnostics in `report`
pub fn compile_module(
    device: &wgpu::Device,
    sources: &ProgramSources,
    stage: ProgramStage,
    report: &mut ProgramReport,
) -> wgpu::ShaderModule {
    report.capture(device, stage, ProgramStep::Compile, || {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(stage.file_name()),
            source: wgpu::ShaderSource::Wgsl(sources.source(stage).into()),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("sierpinski_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_embedded_sources_have_entry_points() {
        let sources = ProgramSources::embedded();
        assert!(sources.expand.contains("@compute"));
        assert!(sources.render.contains("fn vs_main"));
        assert!(sources.render.contains("fn fs_main"));
    }

    #[test]
    fn test_load_none_is_embedded() {
        let sources = ProgramSources::load(None).unwrap();
        assert_eq!(sources.expand, ProgramSources::embedded().expand);
    }

    #[test]
    fn test_load_from_directory() {
        let dir = scratch_dir("load");
        fs::write(dir.join("expand.wgsl"), "// expand").unwrap();
        fs::write(dir.join("render.wgsl"), "// render").unwrap();

        let sources = ProgramSources::load(Some(&dir)).unwrap();
        assert_eq!(sources.source(ProgramStage::Expand), "// expand");
        assert_eq!(sources.source(ProgramStage::Render), "// render");
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = scratch_dir("missing");
        fs::write(dir.join("expand.wgsl"), "// expand").unwrap();

        let err = ProgramSources::load(Some(&dir)).unwrap_err();
        match &err {
            ProgramError::Io { path, .. } => assert!(path.ends_with("render.wgsl")),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.to_string().contains("render.wgsl"));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_report_keeps_first_error() {
        let mut report = ProgramReport::new();
        assert!(report.is_clean());

        report.record(ProgramError::Build {
            stage: ProgramStage::Render,
            step: ProgramStep::Link,
            message: "bad".into(),
        });
        report.record(ProgramError::Build {
            stage: ProgramStage::Expand,
            step: ProgramStep::Compile,
            message: "worse".into(),
        });
        assert_eq!(report.errors().len(), 2);

        let err = report.into_result().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to link render (vertex/fragment) program: bad"
        );
    }
}
