//! In-document heading outline.

use serde::Serialize;

/// One heading in a document outline.
///
/// `name` may carry inline markup from the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineNode {
    pub depth: u32,
    pub name: String,
    pub id: String,
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    /// Total number of nodes in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(OutlineNode::subtree_len)
            .sum::<usize>()
    }
}
