use std::fmt;

/// Possible errors returned while turning input into blocks. All of these
/// are recoverable: the offending entry produces no block and the caller
/// may carry on with the next one. Corruption of a tree is a different kind
/// of failure, see [InvariantViolation].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetmaskError {
    /// The requested prefix length cannot exist: more than 128 bits, or
    /// more than 32 bits for an IPv4 address.
    PrefixLengthInvalid,
    /// A mask was given that is not a run of ones followed by zeros.
    MaskInvalid,
    /// Adding an offset to an address went past the top of the address
    /// space.
    AddressOverflow,
    /// The text could not be read as an address, mask, or range.
    Unparsable(String),
    /// A hostname could not be resolved, or resolution is disabled.
    Unresolvable(String),
    /// A range bound resolved to more than one address.
    AmbiguousBound(String),
}

impl std::error::Error for NetmaskError {}

impl fmt::Display for NetmaskError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NetmaskError::PrefixLengthInvalid => {
                write!(f, "Error: The specified prefix length is invalid.")
            }
            NetmaskError::MaskInvalid => {
                write!(f, "Error: The mask is not contiguous.")
            }
            NetmaskError::AddressOverflow => {
                write!(
                    f,
                    "Error: The range extends past the end of the address \
                    space."
                )
            }
            NetmaskError::Unparsable(s) => {
                write!(f, "Error: Cannot parse \"{}\".", s)
            }
            NetmaskError::Unresolvable(s) => {
                write!(f, "Error: Cannot resolve \"{}\".", s)
            }
            NetmaskError::AmbiguousBound(s) => {
                write!(
                    f,
                    "Error: Range bound \"{}\" resolves to more than one \
                    address.",
                    s
                )
            }
        }
    }
}

//------------ InvariantViolation --------------------------------------------

/// An unrecoverable error: a merge step produced a node that breaks the
/// tree invariants. Everything emitted from such a tree would be suspect, so
/// the strict merge never returns this to the caller, it aborts with it.
///
/// The fields hold one-line summaries (`<hex network>/<len>`) of the two
/// inputs to the failing step, the produced node and its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    pub reason: &'static str,
    pub a: String,
    pub b: String,
    pub c: String,
    pub left: String,
    pub right: String,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "FATAL: tree invariant violated: {}", self.reason)?;
        writeln!(f, "a={}", self.a)?;
        writeln!(f, "b={}", self.b)?;
        writeln!(f, "c={}", self.c)?;
        writeln!(f, "l={}", self.left)?;
        write!(f, "r={}", self.right)
    }
}

impl std::error::Error for InvariantViolation {}
