//------------ Config --------------------------------------------------------

//! Configuration for a netmask run.
//!
//! The library itself only needs a [MergeMode], carried by every
//! [NetTree](crate::NetTree). The rest of [Config] describes how input is
//! read and output is written, and is filled in by the command line front
//! end.
//!
//! ```
//! use netmask::config::{Config, MergeMode};
//! use netmask::render::OutputStyle;
//!
//! let config = Config {
//!     output: OutputStyle::Range,
//!     merge_mode: MergeMode::Strict,
//!     ..Default::default()
//! };
//! assert!(config.dns);
//! ```

use crate::render::OutputStyle;

/// Defines whether merges re-check the tree invariants after every step.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MergeMode {
    /// Plain merging.
    #[default]
    Fast,
    /// Every node produced by a merge step is validated. A violation is
    /// logged with a dump of the offending nodes and the process panics.
    /// Considerably slower, meant for debugging and as a test oracle.
    Strict,
}

impl MergeMode {
    /// The mode for the union of two trees: strict if either side is.
    pub fn combine(self, other: MergeMode) -> MergeMode {
        match (self, other) {
            (MergeMode::Fast, MergeMode::Fast) => MergeMode::Fast,
            _ => MergeMode::Strict,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// How each block is printed.
    pub output: OutputStyle,
    /// Resolve entries that are not address literals as hostnames.
    pub dns: bool,
    /// Arguments name files (or `-` for stdin) holding whitespace
    /// separated entries, instead of being entries themselves.
    pub files: bool,
    /// Print a drawing of the final tree.
    pub debug: bool,
    pub merge_mode: MergeMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: OutputStyle::Cidr,
            dns: true,
            files: false,
            debug: false,
            merge_mode: MergeMode::Fast,
        }
    }
}
