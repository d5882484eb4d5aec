//! External graph-layout renderer invocation

use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

use super::format::RasterFormat;
use crate::core::{ViewerError, ViewerResult};

pub const DEFAULT_PROGRAM: &str = "dot";

/// Turns a graph-description file into a raster image file.
///
/// Implementations block until the output is complete.
pub trait GraphRenderer {
    fn render(&self, input: &Path, output: &Path) -> ViewerResult<()>;

    /// Human-readable command line, for diagnostics
    fn describe(&self, input: &Path, output: &Path) -> String;
}

impl<R: GraphRenderer + ?Sized> GraphRenderer for Box<R> {
    fn render(&self, input: &Path, output: &Path) -> ViewerResult<()> {
        (**self).render(input, output)
    }

    fn describe(&self, input: &Path, output: &Path) -> String {
        (**self).describe(input, output)
    }
}

/// Graphviz-compatible subprocess: `<program> <input> -o <output> -T<format>`
#[derive(Debug, Clone)]
pub struct DotRenderer {
    program: String,
    format: RasterFormat,
}

impl DotRenderer {
    pub fn new(program: impl Into<String>, format: RasterFormat) -> Self {
        Self {
            program: program.into(),
            format,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn format(&self) -> RasterFormat {
        self.format
    }

    pub fn command(&self, input: &Path, output: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg(input)
            .arg("-o")
            .arg(output)
            .arg(format!("-T{}", self.format.graphviz_name()));
        command
    }
}

impl Default for DotRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM, RasterFormat::default())
    }
}

impl GraphRenderer for DotRenderer {
    fn render(&self, input: &Path, output: &Path) -> ViewerResult<()> {
        let command_line = self.describe(input, output);
        debug!("Running '{}'", command_line);

        let result = self
            .command(input, output)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ViewerError::RendererSpawn {
                command: command_line.clone(),
                source,
            })?;

        if !result.status.success() {
            return Err(ViewerError::RendererFailed {
                command: command_line,
                status: result.status.to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).into_owned(),
            });
        }
        Ok(())
    }

    fn describe(&self, input: &Path, output: &Path) -> String {
        format!(
            "{} {} -o {} -T{}",
            self.program,
            input.display(),
            output.display(),
            self.format.graphviz_name()
        )
    }
}
