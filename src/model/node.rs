//! Attempt and peel nodes of the integration result hierarchy

use super::tag::{AttemptId, PeelId, Tag};

/// One speculative scope: a function body hypothetically integrated at a
/// call site, or the top-level function under analysis.
#[derive(Debug, Clone)]
pub struct AttemptNode {
    pub(crate) id: AttemptId,
    pub(crate) parent: Option<Tag>,
    pub(crate) header: String,
    pub(crate) details: Vec<String>,
    /// Nested call sites (`Tag::Attempt`) and loops (`Tag::Peel`) in discovery order
    pub(crate) children: Vec<Tag>,
}

impl AttemptNode {
    pub fn id(&self) -> AttemptId {
        self.id
    }

    pub fn self_tag(&self) -> Tag {
        Tag::Attempt(self.id)
    }

    /// `None` for the root of the hierarchy
    pub fn parent_tag(&self) -> Option<Tag> {
        self.parent
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn child_tag(&self, i: usize) -> Tag {
        self.children[i]
    }

    pub fn children(&self) -> &[Tag] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn short_header(&self) -> &str {
        &self.header
    }

    /// Annotation lines attached by the analysis (folded loads, dead blocks, ...)
    pub fn details(&self) -> &[String] {
        &self.details
    }
}

/// Speculative peeling of one loop; each child is one peeled iteration.
#[derive(Debug, Clone)]
pub struct PeelNode {
    pub(crate) id: PeelId,
    pub(crate) parent: AttemptId,
    pub(crate) header: String,
    pub(crate) iterations: Vec<AttemptId>,
}

impl PeelNode {
    pub fn id(&self) -> PeelId {
        self.id
    }

    pub fn self_tag(&self) -> Tag {
        Tag::Peel(self.id)
    }

    /// A loop always lives inside some attempt scope
    pub fn parent_tag(&self) -> Tag {
        Tag::Attempt(self.parent)
    }

    pub fn child_count(&self) -> usize {
        self.iterations.len()
    }

    pub fn child_tag(&self, i: usize) -> Tag {
        Tag::Attempt(self.iterations[i])
    }

    pub fn iterations(&self) -> &[AttemptId] {
        &self.iterations
    }

    pub fn short_header(&self) -> &str {
        &self.header
    }
}
