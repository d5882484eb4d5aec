/*!
# Core Module

Error handling shared by the model, the rendering pipeline and the shell.
*/

pub mod errors;

pub use errors::{RenderFailure, RenderStep, ViewerError, ViewerResult};
