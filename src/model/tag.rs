//! Discriminated node references used for all cross-kind navigation

use std::fmt;

/// Index of an `AttemptNode` inside its `ResultTree`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttemptId(pub(crate) u32);

/// Index of a `PeelNode` inside its `ResultTree`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeelId(pub(crate) u32);

impl AttemptId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl PeelId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Node kind carried by a `Tag`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    /// Speculative function scope (call site or top level)
    Attempt,
    /// Speculative peeling of one loop
    Peel,
}

impl TagKind {
    pub fn label(&self) -> &'static str {
        match self {
            TagKind::Attempt => "attempt",
            TagKind::Peel => "peel",
        }
    }
}

/// Identity of one node in the hierarchy.
///
/// The variant is the node kind, so a tag can never be resolved as the
/// wrong kind of node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Attempt(AttemptId),
    Peel(PeelId),
}

impl Tag {
    pub fn kind(&self) -> TagKind {
        match self {
            Tag::Attempt(_) => TagKind::Attempt,
            Tag::Peel(_) => TagKind::Peel,
        }
    }

    pub fn as_attempt(&self) -> Option<AttemptId> {
        match self {
            Tag::Attempt(id) => Some(*id),
            Tag::Peel(_) => None,
        }
    }

    pub fn as_peel(&self) -> Option<PeelId> {
        match self {
            Tag::Peel(id) => Some(*id),
            Tag::Attempt(_) => None,
        }
    }
}

impl From<AttemptId> for Tag {
    fn from(id: AttemptId) -> Self {
        Tag::Attempt(id)
    }
}

impl From<PeelId> for Tag {
    fn from(id: PeelId) -> Self {
        Tag::Peel(id)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Attempt(id) => write!(f, "attempt#{}", id.0),
            Tag::Peel(id) => write!(f, "peel#{}", id.0),
        }
    }
}
