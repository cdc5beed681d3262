//! Arena-backed Merkle tree

use super::builder::Draft;
use super::{BuildStrategy, Node, NodeId, NodeRef, OrderingPolicy, Role, Side, TreeBuilder};
use crate::hasher::{DigestEncoding, DigestFunction};
use crate::model::Digest;
use crate::{Error, Result};
use std::collections::VecDeque;

/// A fully built, immutable Merkle tree
///
/// Nodes live in a flat arena in breadth-first order, the root at index 0.
/// Children are owned through the arena; parent links are plain indices.
#[derive(Clone, Debug)]
pub struct MerkleTree {
    nodes: Vec<Node>,
    /// Leaf indices, left to right
    leaves: Vec<NodeId>,
    hasher: String,
    encoding: DigestEncoding,
    strategy: BuildStrategy,
    ordering: OrderingPolicy,
}

impl MerkleTree {
    /// Build with the default builder (caller order, balanced split)
    pub fn build<T, H>(items: &[T], hasher: &H) -> Result<Self>
    where
        T: AsRef<[u8]>,
        H: DigestFunction + ?Sized,
    {
        TreeBuilder::new().build(items, hasher)
    }

    /// Lay a finished draft into the arena
    ///
    /// Breadth-first, so child indices are handed out before the parent is
    /// stored and each node is created with its final links and role.
    pub(crate) fn from_draft(
        root: Draft,
        hasher: &str,
        encoding: DigestEncoding,
        strategy: BuildStrategy,
        ordering: OrderingPolicy,
    ) -> Self {
        let mut nodes = Vec::new();
        let mut queue = VecDeque::new();
        let mut next_id = 1;

        queue.push_back((root, None, Role::Root));

        while let Some((draft, parent, role)) = queue.pop_front() {
            let id = NodeId(nodes.len());

            let node = match draft {
                Draft::Leaf(digest) => Node {
                    digest,
                    parent,
                    children: None,
                    role,
                },
                Draft::Branch {
                    digest,
                    left,
                    right,
                } => {
                    let left_id = NodeId(next_id);
                    let right_id = NodeId(next_id + 1);
                    next_id += 2;

                    let left_role = Role::child(left.is_leaf(), Side::Left);
                    let right_role = Role::child(right.is_leaf(), Side::Right);
                    queue.push_back((*left, Some(id), left_role));
                    queue.push_back((*right, Some(id), right_role));

                    Node {
                        digest,
                        parent,
                        children: Some((left_id, right_id)),
                        role,
                    }
                }
            };

            nodes.push(node);
        }

        debug_assert_eq!(nodes.len(), next_id);

        let mut tree = MerkleTree {
            nodes,
            leaves: Vec::new(),
            hasher: hasher.to_string(),
            encoding,
            strategy,
            ordering,
        };
        tree.leaves = tree
            .preorder()
            .filter(|n| n.is_leaf())
            .map(|n| n.id())
            .collect();
        tree
    }

    pub(crate) fn arena(&self) -> &[Node] {
        &self.nodes
    }

    pub fn root(&self) -> NodeRef<'_> {
        NodeRef::new(self, NodeId(0))
    }

    pub fn root_digest(&self) -> &Digest {
        &self.nodes[0].digest
    }

    /// Look up a node by id
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        (id.0 < self.nodes.len()).then(|| NodeRef::new(self, id))
    }

    /// All nodes in arena (breadth-first) order
    pub fn nodes(&self) -> impl Iterator<Item = NodeRef<'_>> + '_ {
        (0..self.nodes.len()).map(move |i| NodeRef::new(self, NodeId(i)))
    }

    /// Depth-first, left before right
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder {
            stack: vec![self.root()],
        }
    }

    /// Leaves in left-to-right order
    pub fn leaves(&self) -> impl Iterator<Item = NodeRef<'_>> + '_ {
        self.leaves.iter().map(move |id| NodeRef::new(self, *id))
    }

    /// The leaf built from the `index`-th item (after ordering)
    pub fn leaf(&self, index: usize) -> Option<NodeRef<'_>> {
        self.leaves.get(index).map(|id| NodeRef::new(self, *id))
    }

    /// Total number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree has at least its root
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    /// Longest root-to-leaf path, in edges
    pub fn depth(&self) -> usize {
        self.leaves().map(|leaf| leaf.depth()).max().unwrap_or(0)
    }

    /// Name of the digest function that built this tree
    pub fn hasher_name(&self) -> &str {
        &self.hasher
    }

    pub fn encoding(&self) -> DigestEncoding {
        self.encoding
    }

    pub fn strategy(&self) -> BuildStrategy {
        self.strategy
    }

    pub fn ordering(&self) -> OrderingPolicy {
        self.ordering
    }

    /// Compare the root against a digest stored elsewhere
    pub fn verify_root(&self, expected: &Digest) -> Result<()> {
        if self.root_digest() == expected {
            Ok(())
        } else {
            Err(Error::RootMismatch {
                expected: expected.to_hex(),
                actual: self.root_digest().to_hex(),
            })
        }
    }

    /// Recompute every internal digest from its children
    ///
    /// Returns the first node whose stored digest disagrees.
    pub fn check_composition<H>(&self, hasher: &H) -> Result<Option<NodeId>>
    where
        H: DigestFunction + ?Sized,
    {
        for node in self.nodes() {
            if let Some((left, right)) = node.children() {
                let expected = hasher.combine(left.digest(), right.digest())?;
                if &expected != node.digest() {
                    return Ok(Some(node.id()));
                }
            }
        }
        Ok(None)
    }
}

/// Pre-order traversal driven by an explicit stack
pub struct Preorder<'a> {
    stack: Vec<NodeRef<'a>>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if let Some((left, right)) = node.children() {
            self.stack.push(right);
            self.stack.push(left);
        }
        Some(node)
    }
}

/// Build with the default builder and return the root digest
pub fn compute_root<T, H>(items: &[T], hasher: &H) -> Result<Digest>
where
    T: AsRef<[u8]>,
    H: DigestFunction + ?Sized,
{
    TreeBuilder::new().compute_root(items, hasher)
}
