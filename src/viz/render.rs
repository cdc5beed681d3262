//! Indented ASCII rendering of a Merkle tree

use crate::hasher::DigestEncoding;
use crate::model::Digest;
use crate::tree::{MerkleTree, NodeRef};

/// Filler for an ancestor that is a right child
pub const RIGHT_FILL: &str = "|  ";
/// Filler for an ancestor that is a left child
pub const LEFT_FILL: &str = "   ";
/// Connector in front of a left child
pub const LEFT_BRANCH: &str = "L__";
/// Connector in front of a right child
pub const RIGHT_BRANCH: &str = "|--";

/// Renders one line per node, pre-order, left child first
///
/// Indentation is derived from each node's own ancestor chain; no level
/// counter is carried through the traversal.
#[derive(Clone, Copy, Debug, Default)]
pub struct Renderer {
    encoding: Option<DigestEncoding>,
}

impl Renderer {
    /// Renderer that follows the tree's own digest encoding
    pub fn new() -> Self {
        Self::default()
    }

    /// Force hex or text labels regardless of the digest function
    pub fn with_encoding(mut self, encoding: DigestEncoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    pub fn render(&self, tree: &MerkleTree) -> String {
        let encoding = self.encoding.unwrap_or_else(|| tree.encoding());
        let mut out = String::new();

        for node in tree.preorder() {
            out.push_str(&prefix(&node));
            out.push_str(connector(&node));
            out.push_str(&format_digest(node.digest(), encoding));
            out.push('\n');
        }

        out
    }
}

/// Render `tree` with the given label encoding
pub fn render(tree: &MerkleTree, encoding: DigestEncoding) -> String {
    Renderer::new().with_encoding(encoding).render(tree)
}

/// Fillers for every non-root ancestor, outermost first
fn prefix(node: &NodeRef<'_>) -> String {
    let mut fills: Vec<&str> = node
        .ancestors()
        .filter(|ancestor| !ancestor.role().is_root())
        .map(|ancestor| {
            if ancestor.role().is_right() {
                RIGHT_FILL
            } else {
                LEFT_FILL
            }
        })
        .collect();
    fills.reverse();
    fills.concat()
}

fn connector(node: &NodeRef<'_>) -> &'static str {
    match node.parent() {
        None => "",
        Some(_) if node.is_left_child() => LEFT_BRANCH,
        Some(_) => RIGHT_BRANCH,
    }
}

/// Hex for binary digests, verbatim text otherwise
pub fn format_digest(digest: &Digest, encoding: DigestEncoding) -> String {
    match encoding {
        DigestEncoding::Binary => digest.to_hex(),
        DigestEncoding::Text => digest.to_text(),
    }
}
