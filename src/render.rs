//! Diagram file output and external renderer integration
//!
//! This module provides:
//! - Placement and writing of the Mermaid description file
//! - Execution of the Mermaid CLI (`mmdc`) to produce an image

use crate::error::RenderError;
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Output;
use tokio::process::Command;
use tracing::debug;

/// Default renderer executable
pub const DEFAULT_RENDERER: &str = "mmdc";

/// Extension of the diagram description file
const DIAGRAM_EXTENSION: &str = "mmd";

/// Path of the description file that accompanies an image
///
/// `graph.png` becomes `graph.mmd`; a path without an extension gains one.
pub fn diagram_path_for(output: &Path) -> PathBuf {
    output.with_extension(DIAGRAM_EXTENSION)
}

/// Write the diagram description, creating parent directories as needed
pub fn write_diagram(path: &Path, diagram: &str) -> Result<(), RenderError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| RenderError::write_diagram(path, e))?;
    }
    fs::write(path, diagram).map_err(|e| RenderError::write_diagram(path, e))
}

/// Trait for turning a diagram description file into an image
#[async_trait]
pub trait DiagramRenderer: Send + Sync {
    /// Render `diagram` into `output`
    async fn render(&self, diagram: &Path, output: &Path) -> Result<(), RenderError>;
}

/// Renderer that runs the Mermaid CLI
#[derive(Debug, Clone)]
pub struct MermaidCli {
    program: PathBuf,
}

impl MermaidCli {
    /// Create a renderer running the given executable
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Arguments passed to the renderer
    fn render_args<'a>(diagram: &'a Path, output: &'a Path) -> [&'a std::ffi::OsStr; 4] {
        [
            "-i".as_ref(),
            diagram.as_os_str(),
            "-o".as_ref(),
            output.as_os_str(),
        ]
    }

    /// Run the renderer and capture output
    async fn run_command(&self, diagram: &Path, output: &Path) -> std::io::Result<Output> {
        let mut cmd = Command::new(&self.program);
        cmd.args(Self::render_args(diagram, output)).kill_on_drop(true);
        cmd.output().await
    }
}

impl Default for MermaidCli {
    fn default() -> Self {
        Self::new(DEFAULT_RENDERER)
    }
}

#[async_trait]
impl DiagramRenderer for MermaidCli {
    async fn render(&self, diagram: &Path, output: &Path) -> Result<(), RenderError> {
        let program = self.program.display().to_string();
        debug!(
            renderer = %program,
            diagram = %diagram.display(),
            output = %output.display(),
            "running renderer"
        );

        let result = self
            .run_command(diagram, output)
            .await
            .map_err(|source| RenderError::Spawn {
                program: program.clone(),
                source,
            })?;

        if result.status.success() {
            Ok(())
        } else {
            Err(RenderError::Failed {
                program,
                status: result.status.to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            })
        }
    }
}
