#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]

//! A library that turns lists of addresses, ranges and prefixes into the
//! smallest equivalent list of CIDR blocks.
//!
//! IPv4 and IPv6 share a single 128-bit address space, with IPv4 living in
//! the IPv4-mapped block `::ffff:0:0/96`. The set is kept in a binary prefix
//! tree ([NetTree]) in which every node has either no children or two, and
//! sibling blocks that together cover their parent are collapsed as soon as
//! they meet. Trees are combined by a destructive merge: both inputs are
//! consumed, and the result is again minimal.
//!
//! Inclusive address ranges are decomposed into maximal aligned blocks, see
//! [NetTree::insert_range]. Text input is handled by [parse], output by
//! [render].
//!
//! The `netmask` binary (behind the default `cli` feature) is the command
//! line front end.
mod types;

#[macro_use]
mod macros;

mod tree;

/// Run configuration and merge modes
pub mod config;

/// Reading address specs
pub mod parse;

/// Output styles
pub mod render;

/// Hostname resolution
pub mod resolve;

// re-exports
pub use inetnum::addr;

// Public Interfaces on the root of the crate

/// The prefix tree, its iterator and debugging dump
pub use tree::{Iter, NetTree, TreeDump};

/// The 128-bit value type all addresses are stored as
pub use types::U128;

/// A block of the set as handed out by a tree walk
pub use types::Cidr;

/// The IPv4/IPv6 provenance tag of a block
pub use types::Family;

/// Helpers for the IPv4-mapped embedding
pub use types::af;

/// Error types
pub use types::errors;

// Used in tests
#[doc(hidden)]
pub use types::test_types;
