//! Tree builder for constructing balanced Merkle trees

use super::MerkleTree;
use crate::hasher::DigestFunction;
use crate::model::Digest;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use tracing::{debug, info, instrument, trace};

/// Order in which items become leaves
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OrderingPolicy {
    /// Leaves follow the caller's order
    #[default]
    Preserve,
    /// Items are sorted byte-lexicographically before hashing, so the root
    /// only depends on the set of items
    Canonical,
}

impl OrderingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderingPolicy::Preserve => "preserve",
            OrderingPolicy::Canonical => "canonical",
        }
    }
}

impl fmt::Display for OrderingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How leaves are combined into a tree
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum BuildStrategy {
    /// Split `[start, end]` at `(start + end) / 2` recursively
    #[default]
    #[serde(rename = "split")]
    #[value(name = "split")]
    BalancedSplit,
    /// Pair adjacent nodes level by level; an odd node out is carried to
    /// the next level unchanged, after that level's parents
    #[serde(rename = "pairwise")]
    #[value(name = "pairwise")]
    PairwiseReduction,
}

impl BuildStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildStrategy::BalancedSplit => "split",
            BuildStrategy::PairwiseReduction => "pairwise",
        }
    }
}

impl fmt::Display for BuildStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owned intermediate tree with digests computed bottom-up
///
/// Laid out into the arena by [`MerkleTree::from_draft`] once complete.
#[derive(Debug)]
pub(crate) enum Draft {
    Leaf(Digest),
    Branch {
        digest: Digest,
        left: Box<Draft>,
        right: Box<Draft>,
    },
}

impl Draft {
    pub(crate) fn digest(&self) -> &Digest {
        match self {
            Draft::Leaf(digest) => digest,
            Draft::Branch { digest, .. } => digest,
        }
    }

    pub(crate) fn is_leaf(&self) -> bool {
        matches!(self, Draft::Leaf(_))
    }

    fn join<H: DigestFunction + ?Sized>(left: Draft, right: Draft, hasher: &H) -> Result<Draft> {
        let digest = hasher.combine(left.digest(), right.digest())?;
        trace!(left = %left.digest(), right = %right.digest(), parent = %digest, "Combined pair");
        Ok(Draft::Branch {
            digest,
            left: Box::new(left),
            right: Box::new(right),
        })
    }
}

/// Builds a [`MerkleTree`] from a sequence of byte items
///
/// ```
/// use mtree::hasher::Identity;
/// use mtree::tree::{BuildStrategy, OrderingPolicy, TreeBuilder};
///
/// let tree = TreeBuilder::new()
///     .ordering(OrderingPolicy::Canonical)
///     .strategy(BuildStrategy::PairwiseReduction)
///     .build(&["B", "A"], &Identity)?;
/// assert_eq!(tree.root().digest().to_text(), "AB");
/// # Ok::<(), mtree::Error>(())
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct TreeBuilder {
    ordering: OrderingPolicy,
    strategy: BuildStrategy,
}

impl TreeBuilder {
    /// Builder with caller ordering and the balanced split strategy
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ordering(mut self, ordering: OrderingPolicy) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn strategy(mut self, strategy: BuildStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Build the tree
    ///
    /// Every item is hashed into a leaf first; internal digests are
    /// `h(left ++ right)`. Fails with [`Error::EmptyInput`] before hashing
    /// anything when `items` is empty. Errors from the digest function are
    /// returned unchanged.
    #[instrument(
        skip_all,
        fields(
            items = items.len(),
            hasher = hasher.name(),
            strategy = %self.strategy,
            ordering = %self.ordering
        )
    )]
    pub fn build<T, H>(&self, items: &[T], hasher: &H) -> Result<MerkleTree>
    where
        T: AsRef<[u8]>,
        H: DigestFunction + ?Sized,
    {
        let start = Instant::now();

        if items.is_empty() {
            debug!("Refusing to build from empty input");
            return Err(Error::EmptyInput);
        }

        let mut ordered: Vec<&[u8]> = items.iter().map(|item| item.as_ref()).collect();
        if self.ordering == OrderingPolicy::Canonical {
            ordered.sort();
        }

        let leaves = ordered
            .into_iter()
            .map(|item| hasher.digest(item).map(Draft::Leaf))
            .collect::<Result<Vec<_>>>()?;
        debug!(leaf_count = leaves.len(), "Hashed leaves");

        let root = match self.strategy {
            BuildStrategy::BalancedSplit => split(leaves, hasher)?,
            BuildStrategy::PairwiseReduction => reduce(leaves, hasher)?,
        };

        let tree = MerkleTree::from_draft(
            root,
            hasher.name(),
            hasher.encoding(),
            self.strategy,
            self.ordering,
        );

        info!(
            root = %tree.root_digest(),
            node_count = tree.len(),
            depth = tree.depth(),
            duration_us = start.elapsed().as_micros() as u64,
            "Tree build completed"
        );

        Ok(tree)
    }

    /// Build the tree and return only its root digest
    pub fn compute_root<T, H>(&self, items: &[T], hasher: &H) -> Result<Digest>
    where
        T: AsRef<[u8]>,
        H: DigestFunction + ?Sized,
    {
        let tree = self.build(items, hasher)?;
        Ok(tree.root_digest().clone())
    }
}

/// Recursive balanced split over a non-empty run of leaves
///
/// Splitting locally at `(len - 1) / 2` is the same cut as
/// `(start + end) / 2` on absolute indices.
fn split<H: DigestFunction + ?Sized>(mut nodes: Vec<Draft>, hasher: &H) -> Result<Draft> {
    debug_assert!(!nodes.is_empty());

    if nodes.len() == 1 {
        return nodes.pop().ok_or(Error::EmptyInput);
    }

    let mid = (nodes.len() - 1) / 2;
    let right_half = nodes.split_off(mid + 1);

    let left = split(nodes, hasher)?;
    let right = split(right_half, hasher)?;
    Draft::join(left, right, hasher)
}

/// Level-by-level pairwise reduction over a non-empty run of leaves
fn reduce<H: DigestFunction + ?Sized>(mut level: Vec<Draft>, hasher: &H) -> Result<Draft> {
    let mut round = 0usize;

    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len() / 2 + 1);
        let mut nodes = level.into_iter();

        while let Some(left) = nodes.next() {
            match nodes.next() {
                Some(right) => next.push(Draft::join(left, right, hasher)?),
                None => {
                    trace!(round, carried = %left.digest(), "Carrying odd node to next level");
                    next.push(left);
                }
            }
        }

        round += 1;
        level = next;
    }

    level.pop().ok_or(Error::EmptyInput)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::{Blake3, FnDigest, Identity};

    fn text_root(items: &[&str], strategy: BuildStrategy) -> String {
        TreeBuilder::new()
            .strategy(strategy)
            .build(items, &Identity)
            .unwrap()
            .root_digest()
            .to_text()
    }

    #[test]
    fn test_empty_input_rejected() {
        let items: [&str; 0] = [];
        for strategy in [BuildStrategy::BalancedSplit, BuildStrategy::PairwiseReduction] {
            let err = TreeBuilder::new()
                .strategy(strategy)
                .build(&items, &Blake3)
                .unwrap_err();
            assert!(matches!(err, Error::EmptyInput));
        }
    }

    #[test]
    fn test_single_item_is_root_leaf() {
        let tree = MerkleTree::build(&["X"], &Blake3).unwrap();
        let root = tree.root();

        assert!(root.is_leaf());
        assert!(root.parent().is_none());
        assert_eq!(root.role(), crate::tree::Role::Root);
        assert_eq!(*root.digest(), Blake3.digest(b"X").unwrap());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_four_items_root_composition() {
        let tree = MerkleTree::build(&["A", "B", "C", "D"], &Blake3).unwrap();

        let h = |d: &[u8]| Blake3.digest(d).unwrap();
        let ab = h(&h(b"A").concat(&h(b"B")));
        let cd = h(&h(b"C").concat(&h(b"D")));
        let expected = h(&ab.concat(&cd));

        assert_eq!(*tree.root_digest(), expected);
    }

    #[test]
    fn test_split_shape_for_odd_counts() {
        // [A B C] [D E], then [A B] [C]
        assert_eq!(
            text_root(&["A", "B", "C", "D", "E"], BuildStrategy::BalancedSplit),
            "ABCDE"
        );
        assert_eq!(
            text_root(&["A", "B", "C", "D", "E"], BuildStrategy::PairwiseReduction),
            "ABCDE"
        );
        let tree = MerkleTree::build(&["A", "B", "C", "D", "E"], &Identity).unwrap();
        let (left, right) = tree.root().children().unwrap();
        assert_eq!(left.digest().to_text(), "ABC");
        assert_eq!(right.digest().to_text(), "DE");
        assert_eq!(left.left().unwrap().digest().to_text(), "AB");
        assert_eq!(left.right().unwrap().digest().to_text(), "C");
    }

    #[test]
    fn test_pairwise_carries_odd_node() {
        let tree = TreeBuilder::new()
            .strategy(BuildStrategy::PairwiseReduction)
            .build(&["A", "B", "C", "D", "E"], &Identity)
            .unwrap();

        // [AB CD E] -> [ABCD E] -> [ABCDE]
        let (left, right) = tree.root().children().unwrap();
        assert_eq!(left.digest().to_text(), "ABCD");
        assert_eq!(right.digest().to_text(), "E");
        assert!(right.is_leaf());
        assert_eq!(right.depth(), 1);
    }

    #[test]
    fn test_strategies_agree_on_three_and_differ_on_six() {
        let split = TreeBuilder::new()
            .build(&["A", "B", "C"], &Blake3)
            .unwrap();
        let pairwise = TreeBuilder::new()
            .strategy(BuildStrategy::PairwiseReduction)
            .build(&["A", "B", "C"], &Blake3)
            .unwrap();

        // Both give ((A B) C) for three items.
        assert_eq!(split.root_digest(), pairwise.root_digest());

        let six = ["A", "B", "C", "D", "E", "F"];
        let split = TreeBuilder::new().build(&six, &Blake3).unwrap();
        let pairwise = TreeBuilder::new()
            .strategy(BuildStrategy::PairwiseReduction)
            .build(&six, &Blake3)
            .unwrap();
        assert_ne!(split.root_digest(), pairwise.root_digest());
    }

    #[test]
    fn test_canonical_ordering_sorts_bytes() {
        let builder = TreeBuilder::new().ordering(OrderingPolicy::Canonical);
        let tree = builder.build(&["D", "B", "A", "C"], &Identity).unwrap();
        assert_eq!(tree.root_digest().to_text(), "ABCD");

        let preserved = TreeBuilder::new()
            .build(&["D", "B", "A", "C"], &Identity)
            .unwrap();
        assert_eq!(preserved.root_digest().to_text(), "DBAC");
    }

    #[test]
    fn test_digest_function_error_propagates() {
        let failing = FnDigest::new("picky", |data: &[u8]| {
            if data == b"bad" {
                Err(Error::digest_function("picky", "rejected input"))
            } else {
                Ok(Digest::from_bytes(data))
            }
        });

        let err = MerkleTree::build(&["ok", "bad"], &failing).unwrap_err();
        match err {
            Error::DigestFunction { name, source } => {
                assert_eq!(name, "picky");
                assert_eq!(source.to_string(), "rejected input");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_compute_root_matches_build() {
        let items = ["alpha", "beta", "gamma"];
        let root = TreeBuilder::new().compute_root(&items, &Blake3).unwrap();
        let tree = MerkleTree::build(&items, &Blake3).unwrap();
        assert_eq!(&root, tree.root_digest());
    }
}
