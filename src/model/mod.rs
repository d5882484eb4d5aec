/*!
# Result Node Model

The hierarchy of speculative specialization decisions produced by the
analysis engine: attempt nodes (function scopes) containing peel nodes
(loops), which contain one attempt node per peeled iteration.

The model is read-only. It is built once (by `ResultTreeBuilder` or the
JSON loader) and then only navigated and serialized.
*/

pub mod dot;
pub mod loader;
pub mod node;
pub mod tag;
pub mod tree;

pub use dot::{GraphEdge, GraphNode, IntegrationGraph};
pub use loader::{AttemptDocument, ChildDocument, LoopDocument};
pub use node::{AttemptNode, PeelNode};
pub use tag::{AttemptId, PeelId, Tag, TagKind};
pub use tree::{ResultTree, ResultTreeBuilder};
