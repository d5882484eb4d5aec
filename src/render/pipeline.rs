/*!
# Selection-Driven Rendering Pipeline

Turns "the user selected attempt N" into the image shown in the image
pane, synchronously:

```text
Idle -> Serializing -> Rendering -> Displaying -> Idle
                 \            \            \
                  +------------+------------+-> Fallback -> Idle
```

Every failure is caught where it happens, logged, recorded as
`last_failure`, and answered with the placeholder image. Nothing here
returns an error to the event loop.
*/

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use tracing::{debug, warn};

use super::display::DisplayImage;
use super::renderer::GraphRenderer;
use crate::core::{RenderFailure, RenderStep, ViewerError, ViewerResult};
use crate::model::{AttemptId, ResultTree, Tag};
use crate::workspace::RenderWorkspace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Serializing,
    Rendering,
    Displaying,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// Not a render target (synthetic root or loop row)
    Ignored,
    /// A fresh image or the placeholder is now current
    Displayed,
}

pub struct RenderPipeline<R: GraphRenderer> {
    workspace: RenderWorkspace,
    renderer: R,
    state: PipelineState,
    trace: Vec<PipelineState>,
    current: DisplayImage,
    last_failure: Option<RenderFailure>,
    render_count: usize,
    fallback_count: usize,
}

impl<R: GraphRenderer> RenderPipeline<R> {
    pub fn new(workspace: RenderWorkspace, renderer: R) -> Self {
        Self {
            workspace,
            renderer,
            state: PipelineState::Idle,
            trace: Vec::new(),
            current: DisplayImage::placeholder(),
            last_failure: None,
            render_count: 0,
            fallback_count: 0,
        }
    }

    /// Handle one selection-changed event
    pub fn select(&mut self, tree: &ResultTree, item: Option<Tag>) -> SelectionOutcome {
        let Some(Tag::Attempt(id)) = item else {
            return SelectionOutcome::Ignored;
        };

        self.trace.clear();
        self.render_count += 1;

        match self.run(tree, id) {
            Ok(image) => {
                debug!(
                    "Rendered '{}' ({}x{})",
                    tree.attempt(id).short_header(),
                    image.width(),
                    image.height()
                );
                self.last_failure = None;
                self.current = image;
            }
            Err(failure) => {
                self.transition(PipelineState::Fallback);
                warn!(step = %failure.step, "{}", failure.error);
                self.fallback_count += 1;
                self.last_failure = Some(failure);
                self.current = DisplayImage::placeholder();
            }
        }

        self.transition(PipelineState::Idle);
        SelectionOutcome::Displayed
    }

    fn run(&mut self, tree: &ResultTree, id: AttemptId) -> Result<DisplayImage, RenderFailure> {
        self.transition(PipelineState::Serializing);
        self.serialize(tree, id)
            .map_err(|e| RenderFailure::new(RenderStep::Serializing, e))?;

        self.transition(PipelineState::Rendering);
        self.render()
            .map_err(|e| RenderFailure::new(RenderStep::Rendering, e))?;

        self.transition(PipelineState::Displaying);
        DisplayImage::load(self.workspace.output_image_path())
            .map_err(|e| RenderFailure::new(RenderStep::Displaying, e))
    }

    fn serialize(&self, tree: &ResultTree, id: AttemptId) -> ViewerResult<()> {
        let path = self.workspace.graph_description_path();
        let to_error = |source: io::Error| ViewerError::Serialize {
            path: path.to_path_buf(),
            source,
        };

        let file = File::create(path).map_err(to_error)?;
        let mut writer = BufWriter::new(file);
        tree.describe_as_dot(id, &mut writer).map_err(to_error)?;
        writer.flush().map_err(to_error)
    }

    fn render(&self) -> ViewerResult<()> {
        let input = self.workspace.graph_description_path();
        let output = self.workspace.output_image_path();

        // The previous node's image must never survive into this render
        match fs::remove_file(output) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(ViewerError::StaleOutput {
                    path: output.to_path_buf(),
                    source,
                })
            }
        }

        self.renderer.render(input, output)?;

        if !output.is_file() {
            return Err(ViewerError::MissingOutput {
                command: self.renderer.describe(input, output),
                path: output.to_path_buf(),
            });
        }
        Ok(())
    }

    fn transition(&mut self, next: PipelineState) {
        self.state = next;
        self.trace.push(next);
    }

    /// Always `Idle` between selection events
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// States visited by the most recent render, ending in `Idle`
    pub fn last_trace(&self) -> &[PipelineState] {
        &self.trace
    }

    pub fn current_image(&self) -> &DisplayImage {
        &self.current
    }

    pub fn last_failure(&self) -> Option<&RenderFailure> {
        self.last_failure.as_ref()
    }

    pub fn render_count(&self) -> usize {
        self.render_count
    }

    pub fn fallback_count(&self) -> usize {
        self.fallback_count
    }

    pub fn workspace(&self) -> &RenderWorkspace {
        &self.workspace
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Teardown hook for the shutdown path
    pub fn shutdown(&mut self) {
        self.workspace.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ResultTreeBuilder;
    use crate::render::RasterFormat;
    use crate::workspace::DEFAULT_PREFIX;
    use image::{Rgba, RgbaImage};
    use std::cell::Cell;
    use std::path::Path;

    /// Writes a 2x2 PNG and counts invocations
    #[derive(Default)]
    struct PaintingRenderer {
        calls: Cell<usize>,
    }

    impl GraphRenderer for PaintingRenderer {
        fn render(&self, _input: &Path, output: &Path) -> ViewerResult<()> {
            self.calls.set(self.calls.get() + 1);
            RgbaImage::from_pixel(2, 2, Rgba([0, 0, 255, 255]))
                .save(output)
                .map_err(|source| ViewerError::Decode {
                    path: output.to_path_buf(),
                    source,
                })
        }

        fn describe(&self, _input: &Path, _output: &Path) -> String {
            "paint".to_string()
        }
    }

    struct FailingRenderer;

    impl GraphRenderer for FailingRenderer {
        fn render(&self, _input: &Path, _output: &Path) -> ViewerResult<()> {
            Err(ViewerError::RendererFailed {
                command: "dot".to_string(),
                status: "exit status: 1".to_string(),
                stderr: String::new(),
            })
        }

        fn describe(&self, _input: &Path, _output: &Path) -> String {
            "dot".to_string()
        }
    }

    fn tree() -> ResultTree {
        let mut b = ResultTreeBuilder::new("main");
        let root = b.root();
        b.add_call(root, "helper");
        let peel = b.add_peel(root, "for.body");
        b.add_iteration(peel, "iteration 0");
        b.build()
    }

    fn pipeline<R: GraphRenderer>(renderer: R) -> RenderPipeline<R> {
        let ws = RenderWorkspace::acquire(DEFAULT_PREFIX, RasterFormat::Png).unwrap();
        RenderPipeline::new(ws, renderer)
    }

    #[test]
    fn test_initial_image_is_placeholder() {
        let p = pipeline(PaintingRenderer::default());
        assert!(p.current_image().is_placeholder());
        assert_eq!(p.state(), PipelineState::Idle);
    }

    #[test]
    fn test_successful_render_trace() {
        let tree = tree();
        let mut p = pipeline(PaintingRenderer::default());
        assert_eq!(p.select(&tree, Some(tree.root_tag())), SelectionOutcome::Displayed);
        assert_eq!(
            p.last_trace(),
            [
                PipelineState::Serializing,
                PipelineState::Rendering,
                PipelineState::Displaying,
                PipelineState::Idle
            ]
        );
        assert!(!p.current_image().is_placeholder());
        assert!(p.last_failure().is_none());
        assert_eq!(p.state(), PipelineState::Idle);
    }

    #[test]
    fn test_peel_and_synthetic_root_are_not_render_targets() {
        let tree = tree();
        let mut p = pipeline(PaintingRenderer::default());
        let peel = tree.peels().next().unwrap().self_tag();
        assert_eq!(p.select(&tree, Some(peel)), SelectionOutcome::Ignored);
        assert_eq!(p.select(&tree, None), SelectionOutcome::Ignored);
        assert_eq!(p.renderer().calls.get(), 0);
        assert_eq!(p.render_count(), 0);
    }

    #[test]
    fn test_failure_trace_and_placeholder() {
        let tree = tree();
        let mut p = pipeline(FailingRenderer);
        p.select(&tree, Some(tree.root_tag()));
        assert_eq!(
            p.last_trace(),
            [
                PipelineState::Serializing,
                PipelineState::Rendering,
                PipelineState::Fallback,
                PipelineState::Idle
            ]
        );
        assert!(p.current_image().is_placeholder());
        assert_eq!(p.last_failure().unwrap().step, RenderStep::Rendering);
        assert_eq!(p.fallback_count(), 1);
    }

    #[test]
    fn test_serialize_failure_skips_renderer() {
        let tree = tree();
        let mut p = pipeline(PaintingRenderer::default());
        fs::remove_dir_all(p.workspace().dir()).unwrap();

        p.select(&tree, Some(tree.root_tag()));
        assert_eq!(p.renderer().calls.get(), 0);
        assert_eq!(p.last_failure().unwrap().step, RenderStep::Serializing);
        assert!(p.current_image().is_placeholder());
        assert_eq!(
            p.last_trace(),
            [PipelineState::Serializing, PipelineState::Fallback, PipelineState::Idle]
        );
    }

    #[test]
    fn test_success_after_failure_clears_last_failure() {
        let tree = tree();
        let ws = RenderWorkspace::acquire(DEFAULT_PREFIX, RasterFormat::Png).unwrap();
        let mut p: RenderPipeline<Box<dyn GraphRenderer>> =
            RenderPipeline::new(ws, Box::new(FailingRenderer));
        p.select(&tree, Some(tree.root_tag()));
        assert!(p.last_failure().is_some());

        p.renderer = Box::new(PaintingRenderer::default());
        p.select(&tree, Some(tree.root_tag()));
        assert!(p.last_failure().is_none());
        assert!(!p.current_image().is_placeholder());
    }

    #[test]
    fn test_shutdown_removes_workspace() {
        let tree = tree();
        let mut p = pipeline(FailingRenderer);
        let dir = p.workspace().dir().to_path_buf();
        p.select(&tree, Some(tree.root_tag()));
        p.shutdown();
        assert!(!dir.exists());
        assert!(p.workspace().is_released());
    }
}
