//! Tree node types

use super::MerkleTree;
use crate::model::Digest;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a node in its tree's arena
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position in arena order (breadth-first, root is 0)
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which side of its parent a child hangs on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// A node's position relative to its parent
///
/// Leaf vs. internal mirrors whether the node has children; the side is
/// what the renderer and shallow equality care about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    LeafLeft,
    LeafRight,
    InternalLeft,
    InternalRight,
    Root,
}

impl Role {
    /// Role for a child attached on `side`
    pub fn child(is_leaf: bool, side: Side) -> Self {
        match (is_leaf, side) {
            (true, Side::Left) => Role::LeafLeft,
            (true, Side::Right) => Role::LeafRight,
            (false, Side::Left) => Role::InternalLeft,
            (false, Side::Right) => Role::InternalRight,
        }
    }

    /// Side of the parent, `None` for the root
    pub fn side(&self) -> Option<Side> {
        match self {
            Role::LeafLeft | Role::InternalLeft => Some(Side::Left),
            Role::LeafRight | Role::InternalRight => Some(Side::Right),
            Role::Root => None,
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self, Role::Root)
    }

    pub fn is_left(&self) -> bool {
        self.side() == Some(Side::Left)
    }

    pub fn is_right(&self) -> bool {
        self.side() == Some(Side::Right)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::LeafLeft => "leaf_left",
            Role::LeafRight => "leaf_right",
            Role::InternalLeft => "internal_left",
            Role::InternalRight => "internal_right",
            Role::Root => "root",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A vertex in the tree arena
///
/// Fully initialized when created: children and parent are arena indices,
/// the parent link being a back-reference that owns nothing.
#[derive(Clone, Debug)]
pub struct Node {
    pub(crate) digest: Digest,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Option<(NodeId, NodeId)>,
    pub(crate) role: Role,
}

impl Node {
    pub fn digest(&self) -> &Digest {
        &self.digest
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        self.children
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

/// A borrowed view of one node together with the tree it lives in
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a MerkleTree,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(tree: &'a MerkleTree, id: NodeId) -> Self {
        NodeRef { tree, id }
    }

    fn node(&self) -> &'a Node {
        &self.tree.arena()[self.id.0]
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn digest(&self) -> &'a Digest {
        &self.node().digest
    }

    pub fn role(&self) -> Role {
        self.node().role
    }

    pub fn is_leaf(&self) -> bool {
        self.node().is_leaf()
    }

    pub fn is_root(&self) -> bool {
        self.node().parent.is_none()
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.node().parent.map(|id| NodeRef::new(self.tree, id))
    }

    pub fn left(&self) -> Option<NodeRef<'a>> {
        self.children().map(|(left, _)| left)
    }

    pub fn right(&self) -> Option<NodeRef<'a>> {
        self.children().map(|(_, right)| right)
    }

    /// Both children, or `None` for a leaf
    pub fn children(&self) -> Option<(NodeRef<'a>, NodeRef<'a>)> {
        self.node()
            .children
            .map(|(l, r)| (NodeRef::new(self.tree, l), NodeRef::new(self.tree, r)))
    }

    /// The other child of this node's parent
    pub fn sibling(&self) -> Option<NodeRef<'a>> {
        let (left, right) = self.parent()?.children()?;
        if left.id == self.id {
            Some(right)
        } else {
            Some(left)
        }
    }

    /// Walks the parent chain upward, excluding this node
    pub fn ancestors(&self) -> Ancestors<'a> {
        Ancestors {
            next: self.parent(),
        }
    }

    /// Number of edges between this node and the root
    pub fn depth(&self) -> usize {
        self.ancestors().count()
    }

    /// Whether this node compares equal to its parent's left child
    ///
    /// Uses shallow equality, so a right child whose neighbourhood digests
    /// match its left sibling's also answers true.
    pub fn is_left_child(&self) -> bool {
        self.parent()
            .and_then(|p| p.left())
            .is_some_and(|left| left == *self)
    }
}

/// Shallow equality: own digest plus the digests of parent, left and right
impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.digest() == other.digest()
            && self.parent().map(|n| n.digest()) == other.parent().map(|n| n.digest())
            && self.left().map(|n| n.digest()) == other.left().map(|n| n.digest())
            && self.right().map(|n| n.digest()) == other.right().map(|n| n.digest())
    }
}

impl Eq for NodeRef<'_> {}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("digest", self.digest())
            .field("role", &self.role())
            .finish()
    }
}

/// Iterator over a node's ancestors, nearest first
pub struct Ancestors<'a> {
    next: Option<NodeRef<'a>>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.next = current.parent();
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::Identity;

    fn tree(items: &[&str]) -> MerkleTree {
        MerkleTree::build(items, &Identity).unwrap()
    }

    #[test]
    fn test_role_for_child() {
        assert_eq!(Role::child(true, Side::Left), Role::LeafLeft);
        assert_eq!(Role::child(false, Side::Right), Role::InternalRight);
        assert!(Role::InternalLeft.is_left());
        assert!(Role::LeafRight.is_right());
        assert_eq!(Role::Root.side(), None);
    }

    #[test]
    fn test_parent_child_links() {
        let t = tree(&["A", "B", "C", "D"]);
        let root = t.root();
        let (left, right) = root.children().unwrap();

        assert_eq!(left.parent().unwrap().id(), root.id());
        assert_eq!(right.parent().unwrap().id(), root.id());
        assert_eq!(left.role(), Role::InternalLeft);
        assert_eq!(right.role(), Role::InternalRight);
        assert_eq!(left.sibling().unwrap().id(), right.id());
        assert!(root.sibling().is_none());
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let t = tree(&["A", "B", "C", "D"]);
        let leaf_c = t.leaf(2).unwrap();
        let chain: Vec<String> = leaf_c.ancestors().map(|n| n.digest().to_text()).collect();
        assert_eq!(chain, vec!["CD", "ABCD"]);
        assert_eq!(leaf_c.depth(), 2);
        assert_eq!(t.root().depth(), 0);
    }

    #[test]
    fn test_shallow_equality_across_trees() {
        let t1 = tree(&["A", "B", "C", "D"]);
        let t2 = tree(&["A", "B", "C", "D"]);

        assert_eq!(t1.leaf(1).unwrap(), t2.leaf(1).unwrap());
        assert_eq!(t1.root(), t2.root());
        assert_ne!(t1.leaf(0).unwrap(), t1.leaf(1).unwrap());
    }

    #[test]
    fn test_shallow_equality_ignores_deeper_structure() {
        // Same node digest, same parent digest, but different grandparents.
        let t1 = tree(&["A", "B", "C", "D"]);
        let t2 = tree(&["A", "B", "X", "Y"]);

        let ab1 = t1.root().left().unwrap();
        let ab2 = t2.root().left().unwrap();
        assert_ne!(ab1, ab2);

        let a1 = t1.leaf(0).unwrap();
        let a2 = t2.leaf(0).unwrap();
        assert_eq!(a1, a2);
    }

    #[test]
    fn test_is_left_child() {
        let t = tree(&["A", "B"]);
        assert!(t.leaf(0).unwrap().is_left_child());
        assert!(!t.leaf(1).unwrap().is_left_child());
        assert!(!t.root().is_left_child());
    }
}
