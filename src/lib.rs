//! # mtree
//!
//! Balanced binary Merkle trees over ordered byte items.
//!
//! A tree commits to every item with a single root digest while keeping the
//! whole node hierarchy around, so the position and ancestry of any item
//! can be inspected or drawn.
//!
//! ## Core Concepts
//!
//! - **Digest functions**: pluggable, deterministic `bytes -> bytes` maps
//!   (BLAKE3 by default, SHA-256, identity, or any closure)
//! - **Strategies**: recursive balanced split, or level-by-level pairwise
//!   reduction that carries an odd node forward unchanged
//! - **Ordering**: keep the caller's item order, or sort canonically so the
//!   root only depends on the set of items
//! - **Rendering**: an indented ASCII diagram built from each node's
//!   ancestor chain
//!
//! ## Example
//!
//! ```
//! use mtree::hasher::Identity;
//! use mtree::{viz, MerkleTree};
//!
//! let tree = MerkleTree::build(&["A", "B", "C", "D"], &Identity)?;
//! assert_eq!(tree.root_digest().to_text(), "ABCD");
//! print!("{}", viz::Renderer::new().render(&tree));
//! # Ok::<(), mtree::Error>(())
//! ```

pub mod config;
pub mod hasher;
pub mod logging;
pub mod model;
pub mod tree;
pub mod viz;

mod error;

pub use config::{Config, OutputFormat};
pub use error::{BoxError, Error, Result};
pub use hasher::{DigestEncoding, DigestFunction, HashAlgorithm};
pub use model::Digest;
pub use tree::{
    compute_root, BuildStrategy, MerkleTree, NodeId, NodeRef, OrderingPolicy, Role, TreeBuilder,
};
pub use viz::{Renderer, TreeExport};
