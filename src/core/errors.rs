/*!
# Error System for Integrator Viewer

Every failure the viewer can observe. Only `WorkspaceCreate` is fatal;
the rendering errors are caught by the pipeline and turned into a
placeholder image.
*/

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type ViewerResult<T> = Result<T, ViewerError>;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("Failed to create a temporary directory: {source}")]
    WorkspaceCreate {
        #[source]
        source: io::Error,
    },

    #[error("Failed to write graph description {}: {source}", path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to run '{command}': {source}")]
    RendererSpawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to run '{command}' (returned {status}){}", format_stderr(stderr))]
    RendererFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("Failed to remove stale output {}: {source}", path.display())]
    StaleOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("'{command}' reported success but produced no output at {}", path.display())]
    MissingOutput { command: String, path: PathBuf },

    #[error("Failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to read results from {}: {source}", path.display())]
    TreeLoad {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed results document: {0}")]
    TreeFormat(#[from] serde_json::Error),

    #[error("Invalid node path '{0}'")]
    InvalidPath(String),
}

fn format_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {}", trimmed)
    }
}

/// Stage of the rendering pipeline in which a failure happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStep {
    Serializing,
    Rendering,
    Displaying,
}

impl fmt::Display for RenderStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderStep::Serializing => write!(f, "serializing"),
            RenderStep::Rendering => write!(f, "rendering"),
            RenderStep::Displaying => write!(f, "displaying"),
        }
    }
}

/// A recoverable rendering failure, recorded by the pipeline for the UI
#[derive(Debug)]
pub struct RenderFailure {
    pub step: RenderStep,
    pub error: ViewerError,
}

impl RenderFailure {
    pub fn new(step: RenderStep, error: ViewerError) -> Self {
        Self { step, error }
    }
}

impl fmt::Display for RenderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.step, self.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renderer_failed_message_includes_stderr() {
        let err = ViewerError::RendererFailed {
            command: "dot a.dot -o a.png -Tpng".to_string(),
            status: "exit status: 1".to_string(),
            stderr: "syntax error in line 1\n".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to run 'dot a.dot -o a.png -Tpng' (returned exit status: 1): syntax error in line 1"
        );
    }

    #[test]
    fn test_renderer_failed_message_without_stderr() {
        let err = ViewerError::RendererFailed {
            command: "dot".to_string(),
            status: "exit status: 2".to_string(),
            stderr: "  ".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to run 'dot' (returned exit status: 2)");
    }

    #[test]
    fn test_render_failure_display() {
        let failure = RenderFailure::new(
            RenderStep::Rendering,
            ViewerError::MissingOutput {
                command: "true /tmp/x/out.dot -o /tmp/x/out.png -Tpng".to_string(),
                path: PathBuf::from("/tmp/x/out.png"),
            },
        );
        assert_eq!(
            failure.to_string(),
            "[rendering] 'true /tmp/x/out.dot -o /tmp/x/out.png -Tpng' reported success but produced no output at /tmp/x/out.png"
        );
    }

    #[test]
    fn test_serialize_message_names_graph_description() {
        let err = ViewerError::Serialize {
            path: PathBuf::from("/tmp/x/out.dot"),
            source: io::Error::new(io::ErrorKind::Other, "disk full"),
        };
        assert_eq!(
            err.to_string(),
            "Failed to write graph description /tmp/x/out.dot: disk full"
        );
    }
}
