//! Balanced binary Merkle tree
//!
//! This implements a hash tree where:
//! - Each leaf holds the digest of one input item
//! - Each internal node holds `h(left ++ right)` of its two children
//! - The root digest commits to every item and to their order

mod builder;
mod merkle;
mod node;

pub use builder::{BuildStrategy, OrderingPolicy, TreeBuilder};
pub use merkle::{compute_root, MerkleTree, Preorder};
pub use node::{Ancestors, Node, NodeId, NodeRef, Role, Side};
