/*!
# Integrator Result Viewer

Interactive inspector for the result tree of a speculative
program-specialization pass. Every integration attempt (a function body
hypothetically inlined at a call site, or the top-level function) becomes a
node; nested call sites become its children, and loop peeling is recorded as
a peel node whose children are the attempts made for each peeled iteration.

The viewer shows the tree on the left and, for the selected attempt, the
call graph rooted at it, laid out by an external Graphviz-compatible
program and drawn as a raster image.

## Architecture

```text
Integrator Viewer
├── Model        - ResultTree arena, Tag, JSON loader, DOT serialization
├── Navigation   - parent/children/label/container view over the tree
├── Workspace    - scoped temporary directory for graph and image files
├── Render       - renderer subprocess, raster decoding, selection pipeline
├── Config       - TOML settings for renderer, workspace and logging
└── Shell        - ratatui two-pane terminal viewer
```

## Usage

```bash
# Interactive viewer
integrator view results.json

# Print the hierarchy with child-index paths
integrator tree results.json

# Graph description of one attempt
integrator dot results.json --node 0/2 --output attempt.dot

# Render every attempt into a directory
integrator export results.json --out-dir graphs/ --format png
```

### Library
```rust,no_run
use integrator::{IntegrationTreeModel, ResultTree};

let tree = ResultTree::load_from_file("results.json")?;
let model = IntegrationTreeModel::new(&tree);
for (depth, tag) in model.walk_depth_first() {
    println!("{}{}", "  ".repeat(depth), model.label(Some(tag)));
}
# Ok::<(), integrator::ViewerError>(())
```
*/

pub mod cli_common;
pub mod config;
pub mod core;
pub mod model;
pub mod navigation;
pub mod render;
pub mod shell;
pub mod workspace;

pub use config::ViewerConfig;
pub use core::{RenderFailure, RenderStep, ViewerError, ViewerResult};
pub use model::{
    AttemptId, AttemptNode, PeelId, PeelNode, ResultTree, ResultTreeBuilder, Tag, TagKind,
};
pub use navigation::IntegrationTreeModel;
pub use render::{
    DisplayImage, DotRenderer, GraphRenderer, PipelineState, RasterFormat, RenderPipeline,
    SelectionOutcome,
};
pub use workspace::RenderWorkspace;

/// Everything the interactive viewer needs, handed over by the entry point
#[derive(Debug, Clone)]
pub struct ViewerStartup {
    pub tree: ResultTree,
    pub config: ViewerConfig,
}

impl ViewerStartup {
    pub fn new(tree: ResultTree, config: ViewerConfig) -> Self {
        Self { tree, config }
    }
}
