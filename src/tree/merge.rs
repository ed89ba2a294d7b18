//! The union of two trees.
//!
//! Merging is destructive: both inputs are moved in, and every node either
//! ends up in the result or is dropped. The recursion is written once, in
//! [merge_step], and is generic over a [MergeStep] that decides what happens
//! around each step. [Fast] does nothing extra, [Strict] re-checks the
//! invariants of every node it produces and aborts on the first violation.

use log::{error, trace};

use crate::types::errors::InvariantViolation;

use super::node::{Children, Node};

pub(crate) trait MergeStep {
    fn step(a: Box<Node>, b: Box<Node>) -> Box<Node>;
}

pub(crate) struct Fast;

impl MergeStep for Fast {
    fn step(a: Box<Node>, b: Box<Node>) -> Box<Node> {
        merge_step::<Fast>(a, b)
    }
}

pub(crate) struct Strict;

impl MergeStep for Strict {
    fn step(a: Box<Node>, b: Box<Node>) -> Box<Node> {
        let (sa, sb) = (a.summary(), b.summary());
        let c = merge_step::<Strict>(a, b);
        if let Err(reason) = c.coherent() {
            abort(c.violation(reason, sa, sb));
        }
        c
    }
}

// Continuing would hand out wrong blocks, so there is no way to recover
// from this.
#[allow(clippy::panic)]
fn abort(violation: InvariantViolation) -> ! {
    error!("{}", violation);
    panic!("{}", violation);
}

/// Union of two possibly empty trees.
pub(crate) fn merge<M: MergeStep>(
    a: Option<Box<Node>>,
    b: Option<Box<Node>>,
) -> Option<Box<Node>> {
    match (a, b) {
        (None, b) => b,
        (a, None) => a,
        (Some(a), Some(b)) => Some(M::step(a, b)),
    }
}

fn merge_step<M: MergeStep>(a: Box<Node>, b: Box<Node>) -> Box<Node> {
    let len = a.network.longest_common_prefix(b.network);
    trace!(
        "merge {:?}/{} {:?}/{} lcp {}",
        a.network,
        a.len,
        b.network,
        b.len,
        len
    );

    let mut c = if len < a.len && len < b.len {
        merge_split(a, b, len)
    } else if a.len < b.len {
        merge_child::<M>(a, b)
    } else if b.len < a.len {
        merge_child::<M>(b, a)
    } else {
        merge_same::<M>(a, b)
    };

    // Runs on the way back up at every level, so sibling pairs that only
    // become complete deep in the recursion still collapse all the way.
    c.aggregate();
    c
}

// Disjoint blocks: hang both under a new branch at the first differing bit.
fn merge_split(a: Box<Node>, b: Box<Node>, len: u8) -> Box<Node> {
    let family = a.family.merge(b.family);
    if b.network.bit(len) {
        Node::branch(len, family, a, b)
    } else {
        Node::branch(len, family, b, a)
    }
}

// `a` is a strict ancestor of `b`.
fn merge_child<M: MergeStep>(mut a: Box<Node>, b: Box<Node>) -> Box<Node> {
    // A leaf `a` already covers all of `b`, which is dropped here.
    if let Some(Children { left, right }) = a.children.take() {
        a.children = Some(if b.network.bit(a.len) {
            Children {
                left,
                right: M::step(right, b),
            }
        } else {
            Children {
                left: M::step(left, b),
                right,
            }
        });
    }
    a
}

// Same block length, and since the common prefix is at least that long,
// the same block.
fn merge_same<M: MergeStep>(mut a: Box<Node>, b: Box<Node>) -> Box<Node> {
    if a.is_leaf() {
        return a;
    }
    if b.is_leaf() {
        return b;
    }
    a.family = a.family.merge(b.family);
    if let (Some(ca), Some(cb)) = (a.children.take(), b.children) {
        a.children = Some(Children {
            left: M::step(ca.left, cb.left),
            right: M::step(ca.right, cb.right),
        });
    }
    a
}
