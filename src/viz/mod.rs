//! Visualization support for Merkle trees
//!
//! This module renders a tree as an indented ASCII diagram and exports
//! it as a serializable structure for other tools.

mod render;

pub use render::{
    format_digest, render, Renderer, LEFT_BRANCH, LEFT_FILL, RIGHT_BRANCH, RIGHT_FILL,
};

use crate::model::Digest;
use crate::tree::{BuildStrategy, MerkleTree, NodeId, OrderingPolicy, Role};
use serde::{Deserialize, Serialize};

/// A node in export format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeExport {
    /// Arena index
    pub id: NodeId,
    /// The node digest (hex)
    pub digest: Digest,
    /// Position relative to the parent
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<NodeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<NodeId>,
}

/// Export format for a whole tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeExport {
    /// The root digest (hex)
    pub root: Digest,
    /// Name of the digest function
    pub hasher: String,
    pub strategy: BuildStrategy,
    pub ordering: OrderingPolicy,
    pub leaf_count: usize,
    pub node_count: usize,
    /// Longest root-to-leaf path, in edges
    pub depth: usize,
    /// All nodes, breadth-first from the root
    pub nodes: Vec<NodeExport>,
}

impl TreeExport {
    pub fn from_tree(tree: &MerkleTree) -> Self {
        let nodes = tree
            .nodes()
            .map(|node| NodeExport {
                id: node.id(),
                digest: node.digest().clone(),
                role: node.role(),
                parent: node.parent().map(|p| p.id()),
                left: node.left().map(|n| n.id()),
                right: node.right().map(|n| n.id()),
            })
            .collect();

        TreeExport {
            root: tree.root_digest().clone(),
            hasher: tree.hasher_name().to_string(),
            strategy: tree.strategy(),
            ordering: tree.ordering(),
            leaf_count: tree.leaf_count(),
            node_count: tree.len(),
            depth: tree.depth(),
            nodes,
        }
    }
}

impl From<&MerkleTree> for TreeExport {
    fn from(tree: &MerkleTree) -> Self {
        TreeExport::from_tree(tree)
    }
}
