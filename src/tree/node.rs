use std::fmt;

use crate::types::af::{self, Family};
use crate::types::errors::{InvariantViolation, NetmaskError};
use crate::types::{Cidr, U128};

//------------ Node ----------------------------------------------------------

// A node in the prefix tree. A leaf is one block of the set. A branch has
// no block of its own, it is the union of exactly two children that split
// at bit `len`: the left child has a zero there, the right child a one.
// Having both children in one `Option` rules out one-child nodes.
pub(crate) struct Node {
    pub(crate) network: U128,
    pub(crate) len: u8,
    pub(crate) family: Family,
    pub(crate) children: Option<Children>,
}

pub(crate) struct Children {
    pub(crate) left: Box<Node>,
    pub(crate) right: Box<Node>,
}

impl Node {
    /// Create a leaf for `network/len`, on the internal 128-bit scale. Bits
    /// of `network` beyond `len` are cleared.
    pub(crate) fn leaf(
        network: U128,
        len: u8,
        family: Family,
    ) -> Result<Box<Node>, NetmaskError> {
        if len > U128::BITS {
            return Err(NetmaskError::PrefixLengthInvalid);
        }
        Ok(Box::new(Node {
            network: network.truncate_to_len(len),
            len,
            family,
            children: None,
        }))
    }

    pub(crate) fn branch(
        len: u8,
        family: Family,
        left: Box<Node>,
        right: Box<Node>,
    ) -> Box<Node> {
        Box::new(Node {
            network: left.network.truncate_to_len(len),
            len,
            family,
            children: Some(Children { left, right }),
        })
    }

    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    // A node that started out as IPv4 may have grown beyond the mapped
    // block; it is only shown as IPv4 if it is still inside it.
    pub(crate) fn is_v4(&self) -> bool {
        self.family == Family::V4 && af::is_v4_mapped(self.network)
    }

    pub(crate) fn to_cidr(&self) -> Cidr {
        let family = if self.is_v4() { Family::V4 } else { Family::V6 };
        Cidr::new(family, self.network, self.len)
    }

    pub(crate) fn summary(&self) -> String {
        format!("{:?}/{}", self.network, self.len)
    }

    // Replace two sibling leaves that together fill this node's block with
    // the block itself.
    pub(crate) fn aggregate(&mut self) {
        let collapse = match &self.children {
            Some(ch) => {
                ch.left.is_leaf()
                    && ch.right.is_leaf()
                    && ch.left.len == self.len + 1
                    && ch.right.len == self.len + 1
            }
            None => false,
        };
        if collapse {
            self.children = None;
        }
    }

    // Check the invariants that involve this node and its direct children
    // only.
    pub(crate) fn coherent(&self) -> Result<(), &'static str> {
        if self.len > U128::BITS {
            return Err("prefix length out of range");
        }
        if self.network.truncate_to_len(self.len) != self.network {
            return Err("network has bits set beyond its length");
        }
        let Some(ch) = &self.children else {
            return Ok(());
        };
        for (child, side) in [(&ch.left, false), (&ch.right, true)] {
            if child.len <= self.len {
                return Err("child is not longer than its parent");
            }
            if child.network.truncate_to_len(self.len) != self.network {
                return Err("child lies outside its parent");
            }
            if child.network.bit(self.len) != side {
                return Err("child is on the wrong side");
            }
        }
        if ch.left.is_leaf()
            && ch.right.is_leaf()
            && ch.left.len == self.len + 1
            && ch.right.len == self.len + 1
        {
            return Err("sibling leaves were not aggregated");
        }
        Ok(())
    }

    // Check every node in the subtree.
    pub(crate) fn check_all(&self) -> Result<(), InvariantViolation> {
        if let Err(reason) = self.coherent() {
            return Err(self.violation(reason, "-".into(), "-".into()));
        }
        if let Some(ch) = &self.children {
            ch.left.check_all()?;
            ch.right.check_all()?;
        }
        Ok(())
    }

    pub(crate) fn violation(
        &self,
        reason: &'static str,
        a: String,
        b: String,
    ) -> InvariantViolation {
        let (left, right) = match &self.children {
            Some(ch) => (
                format!("{} {}", ch.left.summary(), ch.left.network.bit(self.len) as u8),
                format!("{} {}", ch.right.summary(), ch.right.network.bit(self.len) as u8),
            ),
            None => ("-".into(), "-".into()),
        };
        InvariantViolation {
            reason,
            a,
            b,
            c: self.summary(),
            left,
            right,
        }
    }

    pub(crate) fn walk<F: FnMut(&Cidr)>(&self, visitor: &mut F) {
        match &self.children {
            None => visitor(&self.to_cidr()),
            Some(ch) => {
                ch.left.walk(visitor);
                ch.right.walk(visitor);
            }
        }
    }

    pub(crate) fn leaf_count(&self) -> usize {
        match &self.children {
            None => 1,
            Some(ch) => ch.left.leaf_count() + ch.right.leaf_count(),
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("Node");
        d.field("network", &self.network)
            .field("len", &self.len)
            .field("family", &self.family);
        if let Some(ch) = &self.children {
            d.field("left", &ch.left).field("right", &ch.right);
        }
        d.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_is_canonical() -> Result<(), Box<dyn std::error::Error>> {
        let leaf = Node::leaf(U128::MAX, 100, Family::V6)?;
        assert_eq!(leaf.network, U128::mask(100));
        assert!(leaf.is_leaf());
        assert!(leaf.coherent().is_ok());
        Ok(())
    }

    #[test]
    fn leaf_too_long() {
        assert_eq!(
            Node::leaf(U128::ZERO, 129, Family::V6).err(),
            Some(NetmaskError::PrefixLengthInvalid)
        );
    }

    #[test]
    fn v4_needs_tag_and_mapped_network() -> Result<(), Box<dyn std::error::Error>> {
        let mapped = af::v4_to_u128("10.0.0.1".parse()?);
        assert!(Node::leaf(mapped, 128, Family::V4)?.is_v4());
        assert!(!Node::leaf(mapped, 128, Family::V6)?.is_v4());
        // grown beyond ::ffff:0:0/96
        assert!(!Node::leaf(mapped, 80, Family::V4)?.is_v4());
        Ok(())
    }

    #[test]
    fn aggregate_collapses_full_pair() -> Result<(), Box<dyn std::error::Error>> {
        let left = Node::leaf(U128::ZERO, 1, Family::V6)?;
        let right = Node::leaf(U128::mask(1), 1, Family::V6)?;
        let mut node = Node::branch(0, Family::V6, left, right);
        assert_eq!(
            node.coherent(),
            Err("sibling leaves were not aggregated")
        );
        node.aggregate();
        assert!(node.is_leaf());
        assert_eq!(node.len, 0);
        Ok(())
    }

    #[test]
    fn coherent_rejects_misplaced_child() -> Result<(), Box<dyn std::error::Error>> {
        let left = Node::leaf(U128::mask(1), 2, Family::V6)?;
        let right = Node::leaf(U128::ZERO, 2, Family::V6)?;
        let node = Node::branch(0, Family::V6, left, right);
        assert_eq!(node.coherent(), Err("child is on the wrong side"));
        Ok(())
    }
}
