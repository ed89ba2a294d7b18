use std::fmt;

use super::node::Node;

// Each column of the drawing is one level of the tree. A left child is
// printed above its parent and a right child below it, so a column only
// needs a bar between the two. Nodes have zero or two children, so there
// are no lone-child corners to draw.
const SPACE: &str = " ";
const BETWEEN: &str = "│";
const LEFT: &str = "┌";
const PARENT: &str = "┤";
const RIGHT: &str = "└";
const LEAF: &str = "╴";

/// A drawing of a tree, one node per line, produced by
/// [NetTree::dump](crate::NetTree::dump).
pub struct TreeDump<'a> {
    pub(crate) root: Option<&'a Node>,
}

impl fmt::Display for TreeDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(root) = self.root else {
            return writeln!(f, "(empty)");
        };
        let mut pre = vec![SPACE; usize::from(u8::MAX) + 2];
        if let Some(ch) = &root.children {
            dump_node(f, &ch.left, &mut pre, 0)?;
        }
        print_node(f, root, &pre, 0)?;
        if let Some(ch) = &root.children {
            dump_node(f, &ch.right, &mut pre, 0)?;
        }
        Ok(())
    }
}

fn set(pre: &mut [&'static str], i: usize, s: &'static str) {
    if let Some(slot) = pre.get_mut(i) {
        *slot = s;
    }
}

fn dump_node(
    f: &mut fmt::Formatter<'_>,
    node: &Node,
    pre: &mut [&'static str],
    depth: usize,
) -> fmt::Result {
    set(pre, depth + 1, SPACE);
    if let Some(ch) = &node.children {
        dump_node(f, &ch.left, pre, depth + 1)?;
    }
    let own = match pre.get(depth) {
        Some(&SPACE) => LEFT,
        _ => RIGHT,
    };
    set(pre, depth, own);
    print_node(f, node, pre, depth + 1)?;
    set(pre, depth, if own == LEFT { BETWEEN } else { SPACE });
    if let Some(ch) = &node.children {
        dump_node(f, &ch.right, pre, depth + 1)?;
    }
    Ok(())
}

fn print_node(
    f: &mut fmt::Formatter<'_>,
    node: &Node,
    pre: &[&'static str],
    depth: usize,
) -> fmt::Result {
    let art: String = pre.iter().take(depth).copied().collect();
    let tip = if node.is_leaf() { LEAF } else { PARENT };
    writeln!(f, "{:?}/{:<3} {}{}", node.network, node.len, art, tip)
}
