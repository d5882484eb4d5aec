/*!
# Tree Navigation Adapter

Presents the heterogeneous result hierarchy as one uniform tree. This is
the only code that distinguishes attempt nodes from peel nodes; the shell,
the CLI and the export command work purely in terms of `Option<Tag>`, where
`None` is the synthetic root container whose only child is the real root.
*/

use crate::core::{ViewerError, ViewerResult};
use crate::model::{ResultTree, Tag};

#[derive(Debug, Clone, Copy)]
pub struct IntegrationTreeModel<'a> {
    tree: &'a ResultTree,
}

impl<'a> IntegrationTreeModel<'a> {
    pub fn new(tree: &'a ResultTree) -> Self {
        Self { tree }
    }

    pub fn tree(&self) -> &'a ResultTree {
        self.tree
    }

    pub fn column_count(&self) -> usize {
        1
    }

    pub fn column_type(&self, _column: usize) -> &'static str {
        "string"
    }

    /// Caption for a tree row; empty for the synthetic root
    pub fn label(&self, item: Option<Tag>) -> &'a str {
        match item {
            None => "",
            Some(Tag::Attempt(id)) => self.tree.attempt(id).short_header(),
            Some(Tag::Peel(id)) => self.tree.peel(id).short_header(),
        }
    }

    pub fn parent_of(&self, item: Option<Tag>) -> Option<Tag> {
        match item {
            None => None,
            Some(Tag::Attempt(id)) => self.tree.attempt(id).parent_tag(),
            Some(Tag::Peel(id)) => Some(self.tree.peel(id).parent_tag()),
        }
    }

    /// Loops are always expandable, even with zero recorded iterations
    pub fn is_container(&self, item: Option<Tag>) -> bool {
        match item {
            None => true,
            Some(Tag::Attempt(id)) => self.tree.attempt(id).has_children(),
            Some(Tag::Peel(_)) => true,
        }
    }

    pub fn children_of(&self, item: Option<Tag>) -> Vec<Tag> {
        match item {
            None => vec![self.tree.root_tag()],
            Some(Tag::Attempt(id)) => {
                let node = self.tree.attempt(id);
                (0..node.child_count()).map(|i| node.child_tag(i)).collect()
            }
            Some(Tag::Peel(id)) => {
                let node = self.tree.peel(id);
                (0..node.child_count()).map(|i| node.child_tag(i)).collect()
            }
        }
    }

    /// Every node in depth-first pre-order with its depth (real root at 0)
    pub fn walk_depth_first(&self) -> Vec<(usize, Tag)> {
        let mut out = Vec::with_capacity(self.tree.len());
        let mut stack: Vec<(usize, Tag)> = self
            .children_of(None)
            .into_iter()
            .rev()
            .map(|tag| (0, tag))
            .collect();

        while let Some((depth, tag)) = stack.pop() {
            out.push((depth, tag));
            for child in self.children_of(Some(tag)).into_iter().rev() {
                stack.push((depth + 1, child));
            }
        }
        out
    }

    /// Chain of ancestors of `tag`, outermost first, excluding `tag` itself
    pub fn ancestors(&self, tag: Tag) -> Vec<Tag> {
        let mut chain = Vec::new();
        let mut current = self.parent_of(Some(tag));
        while let Some(parent) = current {
            chain.push(parent);
            current = self.parent_of(Some(parent));
        }
        chain.reverse();
        chain
    }

    /// Resolve a child-index path such as `0/2/1` starting at the real root.
    /// An empty path (or `/`) names the root itself.
    pub fn resolve_path(&self, path: &str) -> ViewerResult<Tag> {
        let mut current = self.tree.root_tag();
        for part in path.split('/').filter(|p| !p.is_empty()) {
            let index: usize = part
                .trim()
                .parse()
                .map_err(|_| ViewerError::InvalidPath(path.to_string()))?;
            current = *self
                .children_of(Some(current))
                .get(index)
                .ok_or_else(|| ViewerError::InvalidPath(path.to_string()))?;
        }
        Ok(current)
    }

    /// Inverse of `resolve_path`
    pub fn path_of(&self, tag: Tag) -> String {
        let mut parts = Vec::new();
        let mut current = tag;
        while let Some(parent) = self.parent_of(Some(current)) {
            let index = self
                .children_of(Some(parent))
                .iter()
                .position(|&t| t == current)
                .unwrap_or(0);
            parts.push(index.to_string());
            current = parent;
        }
        parts.reverse();
        parts.join("/")
    }
}
