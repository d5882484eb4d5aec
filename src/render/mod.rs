/*!
# Rendering

Graph-description serialization is done by the model; this module owns
everything after that: the external renderer, the decoded image and the
per-selection pipeline that ties them to the workspace.
*/

pub mod display;
pub mod format;
pub mod pipeline;
pub mod renderer;

pub use display::{DisplayImage, ImageOrigin};
pub use format::RasterFormat;
pub use pipeline::{PipelineState, RenderPipeline, SelectionOutcome};
pub use renderer::{DotRenderer, GraphRenderer, DEFAULT_PROGRAM};
