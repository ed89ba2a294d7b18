//! The prefix tree holding a union of CIDR blocks.

mod dump;
mod merge;
mod node;
mod range;

use std::net::IpAddr;

use log::trace;

use crate::config::MergeMode;
use crate::types::af;
use crate::types::errors::{InvariantViolation, NetmaskError};
use crate::types::{Cidr, Family, U128};

pub use dump::TreeDump;

use merge::{Fast, Strict};
use node::Node;
use range::Blocks;

//------------ NetTree -------------------------------------------------------

/// A set of addresses, kept as the smallest possible collection of disjoint
/// CIDR blocks.
///
/// IPv4 and IPv6 share one 128-bit space (IPv4 lives at `::ffff:0:0/96`).
/// Blocks are added by merging trees: [merge](NetTree::merge) consumes both
/// sides, so no part of a tree can be reached from two places. Sibling
/// blocks are aggregated as soon as they meet, so the tree is minimal after
/// every single merge, not only at the end.
///
/// ```
/// use netmask::NetTree;
///
/// let a = NetTree::from_addr("10.0.0.0".parse()?, 25)?;
/// let b = NetTree::from_addr("10.0.0.128".parse()?, 25)?;
/// let merged = a.merge(b);
///
/// let blocks: Vec<String> = merged.iter().map(|c| c.to_string()).collect();
/// assert_eq!(blocks, vec!["10.0.0.0/24"]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Default)]
pub struct NetTree {
    root: Option<Box<Node>>,
    mode: MergeMode,
}

impl NetTree {
    /// An empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty tree that merges in the given mode.
    pub fn with_mode(mode: MergeMode) -> Self {
        NetTree { root: None, mode }
    }

    pub fn mode(&self) -> MergeMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: MergeMode) {
        self.mode = mode;
    }

    /// A tree holding the single block `network/len`, with `len` on the
    /// internal 128-bit scale (an IPv4 /24 is 120). Fails for lengths over
    /// 128.
    pub fn leaf(
        network: U128,
        len: u8,
        family: Family,
    ) -> Result<Self, NetmaskError> {
        Ok(NetTree {
            root: Some(Node::leaf(network, len, family)?),
            mode: MergeMode::default(),
        })
    }

    /// A tree holding the single block `addr/len`, with `len` as written for
    /// the address family of `addr`.
    pub fn from_addr(addr: IpAddr, len: u8) -> Result<Self, NetmaskError> {
        let (network, family) = af::from_ipaddr(addr);
        let len = family
            .internal_len(len)
            .ok_or(NetmaskError::PrefixLengthInvalid)?;
        Self::leaf(network, len, family)
    }

    /// A tree holding exactly the inclusive range between `lo` and `hi`, in
    /// either order.
    pub fn from_range(lo: U128, hi: U128, family: Family) -> Self {
        let mut tree = NetTree::new();
        tree.insert_range(lo, hi, family);
        tree
    }

    /// Union of two trees. Both are consumed; the result merges strictly if
    /// either side did.
    pub fn merge(mut self, other: NetTree) -> NetTree {
        self.insert(other);
        self
    }

    /// Merge `other` into this tree.
    pub fn insert(&mut self, other: NetTree) {
        self.mode = self.mode.combine(other.mode);
        self.root = self.merge_root(other.root);
    }

    /// Merge the inclusive range between `lo` and `hi` into this tree, one
    /// block at a time.
    pub fn insert_range(&mut self, lo: U128, hi: U128, family: Family) {
        trace!("range {:?} - {:?} {}", lo, hi, family);
        for (network, len) in Blocks::new(lo, hi) {
            // `Blocks` never yields a length over 128.
            if let Ok(leaf) = Node::leaf(network, len, family) {
                self.root = self.merge_root(Some(leaf));
            }
        }
    }

    fn merge_root(&mut self, other: Option<Box<Node>>) -> Option<Box<Node>> {
        let root = self.root.take();
        match self.mode {
            MergeMode::Fast => merge::merge::<Fast>(root, other),
            MergeMode::Strict => merge::merge::<Strict>(root, other),
        }
    }

    /// Call `visitor` once for every block, in ascending address order.
    pub fn walk<F: FnMut(&Cidr)>(&self, mut visitor: F) {
        if let Some(root) = &self.root {
            root.walk(&mut visitor);
        }
    }

    /// The blocks in ascending address order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            stack: self.root.as_deref().into_iter().collect(),
        }
    }

    /// The number of blocks.
    pub fn len(&self) -> usize {
        self.root.as_ref().map_or(0, |r| r.leaf_count())
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// The family tag of the root node, `None` for an empty tree. Once any
    /// IPv6 input has been merged in this is [Family::V6].
    pub fn family(&self) -> Option<Family> {
        self.root.as_ref().map(|r| r.family)
    }

    /// Validate every node in the tree.
    pub fn check(&self) -> Result<(), InvariantViolation> {
        match &self.root {
            Some(root) => root.check_all(),
            None => Ok(()),
        }
    }

    /// A drawing of the tree structure, for debugging.
    pub fn dump(&self) -> TreeDump<'_> {
        TreeDump {
            root: self.root.as_deref(),
        }
    }

    /// Drop every block.
    pub fn clear(&mut self) {
        self.root = None;
    }
}

impl std::fmt::Debug for NetTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl Extend<NetTree> for NetTree {
    fn extend<T: IntoIterator<Item = NetTree>>(&mut self, iter: T) {
        for tree in iter {
            self.insert(tree);
        }
    }
}

impl FromIterator<NetTree> for NetTree {
    fn from_iter<T: IntoIterator<Item = NetTree>>(iter: T) -> Self {
        let mut tree = NetTree::new();
        tree.extend(iter);
        tree
    }
}

impl FromIterator<inetnum::addr::Prefix> for NetTree {
    fn from_iter<T: IntoIterator<Item = inetnum::addr::Prefix>>(
        iter: T,
    ) -> Self {
        iter.into_iter()
            // A `Prefix` always has a length that fits its family.
            .filter_map(|pfx| NetTree::from_addr(pfx.addr(), pfx.len()).ok())
            .collect()
    }
}

impl<'a> IntoIterator for &'a NetTree {
    type Item = Cidr;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

//------------ Iter ----------------------------------------------------------

/// Iterator over the blocks of a [NetTree], in ascending order.
pub struct Iter<'a> {
    stack: Vec<&'a Node>,
}

impl Iterator for Iter<'_> {
    type Item = Cidr;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            match &node.children {
                None => return Some(node.to_cidr()),
                Some(ch) => {
                    self.stack.push(&ch.right);
                    self.stack.push(&ch.left);
                }
            }
        }
        None
    }
}
