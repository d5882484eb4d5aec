//! Arena holding every node of one compilation unit's integration results

use super::node::{AttemptNode, PeelNode};
use super::tag::{AttemptId, PeelId, Tag};

/// Immutable result hierarchy handed to the viewer by the analysis engine.
///
/// Nodes reference each other through `Tag`s, which are indices into this
/// arena; a tag is only meaningful for the tree that issued it.
#[derive(Debug, Clone)]
pub struct ResultTree {
    attempts: Vec<AttemptNode>,
    peels: Vec<PeelNode>,
}

impl ResultTree {
    pub fn root(&self) -> AttemptId {
        AttemptId(0)
    }

    pub fn root_tag(&self) -> Tag {
        Tag::Attempt(self.root())
    }

    pub fn root_node(&self) -> &AttemptNode {
        &self.attempts[0]
    }

    /// Panics on an id issued by a different tree
    pub fn attempt(&self, id: AttemptId) -> &AttemptNode {
        &self.attempts[id.index()]
    }

    /// Panics on an id issued by a different tree
    pub fn peel(&self, id: PeelId) -> &PeelNode {
        &self.peels[id.index()]
    }

    pub fn attempts(&self) -> impl Iterator<Item = &AttemptNode> {
        self.attempts.iter()
    }

    pub fn peels(&self) -> impl Iterator<Item = &PeelNode> {
        self.peels.iter()
    }

    pub fn attempt_count(&self) -> usize {
        self.attempts.len()
    }

    pub fn peel_count(&self) -> usize {
        self.peels.len()
    }

    /// Total number of nodes of both kinds
    pub fn len(&self) -> usize {
        self.attempts.len() + self.peels.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, tag: Tag) -> bool {
        match tag {
            Tag::Attempt(id) => id.index() < self.attempts.len(),
            Tag::Peel(id) => id.index() < self.peels.len(),
        }
    }
}

/// Incremental construction of a `ResultTree`.
///
/// Children are recorded in the order they are added. The signatures only
/// allow loops under attempts and iterations under loops.
#[derive(Debug)]
pub struct ResultTreeBuilder {
    attempts: Vec<AttemptNode>,
    peels: Vec<PeelNode>,
}

impl ResultTreeBuilder {
    pub fn new(root_header: impl Into<String>) -> Self {
        let root = AttemptNode {
            id: AttemptId(0),
            parent: None,
            header: root_header.into(),
            details: Vec::new(),
            children: Vec::new(),
        };
        Self {
            attempts: vec![root],
            peels: Vec::new(),
        }
    }

    pub fn root(&self) -> AttemptId {
        AttemptId(0)
    }

    /// Record a call site integrated speculatively inside `parent`
    pub fn add_call(&mut self, parent: AttemptId, header: impl Into<String>) -> AttemptId {
        let id = self.push_attempt(Tag::Attempt(parent), header.into());
        self.attempts[parent.index()].children.push(Tag::Attempt(id));
        id
    }

    /// Record a loop inside `parent` that the analysis tried to peel
    pub fn add_peel(&mut self, parent: AttemptId, header: impl Into<String>) -> PeelId {
        let id = PeelId(self.peels.len() as u32);
        self.peels.push(PeelNode {
            id,
            parent,
            header: header.into(),
            iterations: Vec::new(),
        });
        self.attempts[parent.index()].children.push(Tag::Peel(id));
        id
    }

    /// Record the next peeled iteration of `peel`
    pub fn add_iteration(&mut self, peel: PeelId, header: impl Into<String>) -> AttemptId {
        let id = self.push_attempt(Tag::Peel(peel), header.into());
        self.peels[peel.index()].iterations.push(id);
        id
    }

    pub fn add_detail(&mut self, attempt: AttemptId, line: impl Into<String>) {
        self.attempts[attempt.index()].details.push(line.into());
    }

    pub fn build(self) -> ResultTree {
        ResultTree {
            attempts: self.attempts,
            peels: self.peels,
        }
    }

    fn push_attempt(&mut self, parent: Tag, header: String) -> AttemptId {
        let id = AttemptId(self.attempts.len() as u32);
        self.attempts.push(AttemptNode {
            id,
            parent: Some(parent),
            header,
            details: Vec::new(),
            children: Vec::new(),
        });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ResultTree {
        let mut b = ResultTreeBuilder::new("main");
        let root = b.root();
        let call = b.add_call(root, "parse_args");
        let peel = b.add_peel(root, "loop for.body");
        b.add_iteration(peel, "iteration 0");
        b.add_iteration(peel, "iteration 1");
        b.add_detail(call, "load %argc folded to 3");
        b.build()
    }

    #[test]
    fn test_root_has_no_parent() {
        let tree = sample();
        assert_eq!(tree.root_node().parent_tag(), None);
        assert_eq!(tree.root_node().short_header(), "main");
    }

    #[test]
    fn test_children_in_insertion_order() {
        let tree = sample();
        let root = tree.root_node();
        assert_eq!(root.child_count(), 2);
        assert_eq!(root.child_tag(0).kind(), crate::model::TagKind::Attempt);
        assert_eq!(root.child_tag(1).kind(), crate::model::TagKind::Peel);

        let peel = tree.peel(root.child_tag(1).as_peel().unwrap());
        let headers: Vec<_> = peel
            .iterations()
            .iter()
            .map(|id| tree.attempt(*id).short_header())
            .collect();
        assert_eq!(headers, vec!["iteration 0", "iteration 1"]);
    }

    #[test]
    fn test_parent_links_are_consistent() {
        let tree = sample();
        for attempt in tree.attempts() {
            for &child in attempt.children() {
                let parent = match child {
                    Tag::Attempt(id) => tree.attempt(id).parent_tag(),
                    Tag::Peel(id) => Some(tree.peel(id).parent_tag()),
                };
                assert_eq!(parent, Some(attempt.self_tag()));
            }
        }
        for peel in tree.peels() {
            for i in 0..peel.child_count() {
                let id = peel.child_tag(i).as_attempt().unwrap();
                assert_eq!(tree.attempt(id).parent_tag(), Some(peel.self_tag()));
            }
        }
    }

    #[test]
    fn test_counts() {
        let tree = sample();
        assert_eq!(tree.attempt_count(), 4);
        assert_eq!(tree.peel_count(), 1);
        assert_eq!(tree.len(), 5);
        assert!(tree.contains(Tag::Peel(PeelId(0))));
        assert!(!tree.contains(Tag::Peel(PeelId(1))));
    }
}
