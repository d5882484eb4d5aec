/*!
# Scoped Render Workspace

One private temporary directory per viewer process. Every render
overwrites the same two files inside it: the graph description and the
output image. The directory is removed exactly once, either by an explicit
`release` on the shutdown path or by `Drop` if teardown is skipped.
*/

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{info, warn};

use crate::core::{ViewerError, ViewerResult};
use crate::render::RasterFormat;

pub const DEFAULT_PREFIX: &str = "integrator_";
pub const GRAPH_FILE_STEM: &str = "out";

#[derive(Debug)]
pub struct RenderWorkspace {
    dir: Option<TempDir>,
    root: PathBuf,
    graph_path: PathBuf,
    image_path: PathBuf,
}

impl RenderWorkspace {
    /// Create a uniquely named directory under the system temp root
    pub fn acquire(prefix: &str, format: RasterFormat) -> ViewerResult<Self> {
        let dir = tempfile::Builder::new()
            .prefix(prefix)
            .tempdir()
            .map_err(|source| ViewerError::WorkspaceCreate { source })?;
        Ok(Self::from_dir(dir, format))
    }

    /// Same as `acquire`, but under an explicit parent directory
    pub fn acquire_in<P: AsRef<Path>>(
        parent: P,
        prefix: &str,
        format: RasterFormat,
    ) -> ViewerResult<Self> {
        let dir = tempfile::Builder::new()
            .prefix(prefix)
            .tempdir_in(parent)
            .map_err(|source| ViewerError::WorkspaceCreate { source })?;
        Ok(Self::from_dir(dir, format))
    }

    fn from_dir(dir: TempDir, format: RasterFormat) -> Self {
        let root = dir.path().to_path_buf();
        let graph_path = root.join(format!("{}.dot", GRAPH_FILE_STEM));
        let image_path = root.join(format!("{}.{}", GRAPH_FILE_STEM, format.extension()));
        info!("Render workspace at {}", root.display());
        Self {
            dir: Some(dir),
            root,
            graph_path,
            image_path,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.root
    }

    pub fn graph_description_path(&self) -> &Path {
        &self.graph_path
    }

    pub fn output_image_path(&self) -> &Path {
        &self.image_path
    }

    pub fn is_released(&self) -> bool {
        self.dir.is_none()
    }

    /// Recursively remove the directory. Later calls do nothing.
    pub fn release(&mut self) {
        let Some(dir) = self.dir.take() else {
            return;
        };
        match dir.close() {
            Ok(()) => info!("Removed render workspace {}", self.root.display()),
            Err(e) => warn!("Warning: failed to delete {}: {}", self.root.display(), e),
        }
    }
}

impl Drop for RenderWorkspace {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_creates_directory() {
        let ws = RenderWorkspace::acquire(DEFAULT_PREFIX, RasterFormat::Png).unwrap();
        assert!(ws.dir().is_dir());
        assert!(ws
            .dir()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with(DEFAULT_PREFIX));
        assert_eq!(ws.graph_description_path(), ws.dir().join("out.dot"));
        assert_eq!(ws.output_image_path(), ws.dir().join("out.png"));
    }

    #[test]
    fn test_release_removes_contents() {
        let mut ws = RenderWorkspace::acquire(DEFAULT_PREFIX, RasterFormat::Gif).unwrap();
        std::fs::write(ws.graph_description_path(), "digraph {}").unwrap();
        std::fs::write(ws.output_image_path(), b"GIF89a").unwrap();
        let dir = ws.dir().to_path_buf();

        ws.release();
        assert!(ws.is_released());
        assert!(!dir.exists());

        // second release is a no-op
        ws.release();
        assert!(!dir.exists());
    }

    #[test]
    fn test_drop_releases() {
        let dir = {
            let ws = RenderWorkspace::acquire(DEFAULT_PREFIX, RasterFormat::Png).unwrap();
            ws.dir().to_path_buf()
        };
        assert!(!dir.exists());
    }

    #[test]
    fn test_two_workspaces_never_share_paths() {
        let a = RenderWorkspace::acquire(DEFAULT_PREFIX, RasterFormat::Png).unwrap();
        let b = RenderWorkspace::acquire(DEFAULT_PREFIX, RasterFormat::Png).unwrap();
        assert_ne!(a.dir(), b.dir());
    }

    #[test]
    fn test_acquire_failure_is_reported() {
        let err = RenderWorkspace::acquire_in("/nonexistent/parent/dir", "x_", RasterFormat::Png)
            .unwrap_err();
        assert!(matches!(err, ViewerError::WorkspaceCreate { .. }));
        assert!(err.to_string().starts_with("Failed to create a temporary directory"));
    }
}
