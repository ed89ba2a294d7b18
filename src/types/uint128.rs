use std::cmp::Ordering;
use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor, Not};

//------------ U128 ----------------------------------------------------------

/// A 128-bit unsigned value with most-significant-bit-first bit numbering.
///
/// Bit 0 is the most significant bit, matching network byte order, so that
/// a prefix of length `n` is exactly the bits `0..n`. Every operation is
/// total: shift amounts are clamped and out-of-range bit indexes read as
/// zero, so there is no input for which these methods panic.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct U128(u128);

impl U128 {
    /// The number of bits in the value.
    pub const BITS: u8 = 128;

    pub const ZERO: U128 = U128(0);
    pub const ONE: U128 = U128(1);
    pub const MAX: U128 = U128(u128::MAX);

    pub const fn new(value: u128) -> Self {
        U128(value)
    }

    /// Build a value from its high and low 64-bit halves.
    pub const fn from_parts(high: u64, low: u64) -> Self {
        U128(((high as u128) << 64) | low as u128)
    }

    pub const fn to_u128(self) -> u128 {
        self.0
    }

    pub const fn high(self) -> u64 {
        (self.0 >> 64) as u64
    }

    pub const fn low(self) -> u64 {
        self.0 as u64
    }

    pub const fn to_be_bytes(self) -> [u8; 16] {
        self.0.to_be_bytes()
    }

    pub const fn from_be_bytes(bytes: [u8; 16]) -> Self {
        U128(u128::from_be_bytes(bytes))
    }

    /// Add two values, returning the wrapped sum and whether the addition
    /// carried out of the top bit. Callers must treat a carry as an error:
    /// a range that wraps past the end of the address space is malformed.
    pub const fn add(self, rhs: U128) -> (U128, bool) {
        let (sum, overflow) = self.0.overflowing_add(rhs.0);
        (U128(sum), overflow)
    }

    /// Three-way comparison.
    pub fn compare(self, rhs: U128) -> Ordering {
        self.0.cmp(&rhs.0)
    }

    /// Number of set bits. For a valid mask this is its prefix length.
    pub const fn popcount(self) -> u8 {
        self.0.count_ones() as u8
    }

    /// Number of leading zero bits, 128 for zero.
    pub const fn leading_zero_count(self) -> u8 {
        self.0.leading_zeros() as u8
    }

    /// A value with the top `len` bits set and the rest clear. `len` is
    /// clamped to 128.
    pub const fn mask(len: u8) -> Self {
        match len {
            0 => U128(0),
            1..=127 => U128(u128::MAX << (128 - len as u32)),
            _ => U128(u128::MAX),
        }
    }

    /// Clear every bit at position `len` and beyond.
    pub const fn truncate_to_len(self, len: u8) -> Self {
        U128(self.0 & U128::mask(len).0)
    }

    /// Bit `i` counted from the most significant bit. Indexes past the end
    /// read as zero.
    pub const fn bit(self, i: u8) -> bool {
        if i < 128 {
            (self.0 >> (127 - i as u32)) & 1 == 1
        } else {
            false
        }
    }

    /// True iff the value is a run of ones followed only by zeros. Zero and
    /// all-ones are both valid masks.
    pub const fn is_valid_mask(self) -> bool {
        // Inverting a contiguous mask leaves a run of trailing ones, and
        // adding one to that clears all of them at once.
        let inv = !self.0;
        inv & inv.wrapping_add(1) == 0
    }

    /// Length of the longest common prefix of `self` and `other`, 0..=128.
    pub const fn longest_common_prefix(self, other: U128) -> u8 {
        U128(self.0 ^ other.0).leading_zero_count()
    }
}

impl PartialOrd for U128 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for U128 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(*other)
    }
}

impl BitAnd for U128 {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self::Output {
        U128(self.0 & rhs.0)
    }
}

impl BitOr for U128 {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self::Output {
        U128(self.0 | rhs.0)
    }
}

impl BitXor for U128 {
    type Output = Self;
    fn bitxor(self, rhs: Self) -> Self::Output {
        U128(self.0 ^ rhs.0)
    }
}

impl Not for U128 {
    type Output = Self;
    fn not(self) -> Self::Output {
        U128(!self.0)
    }
}

impl From<u128> for U128 {
    fn from(value: u128) -> Self {
        U128(value)
    }
}

impl From<U128> for u128 {
    fn from(value: U128) -> Self {
        value.0
    }
}

impl From<std::net::Ipv6Addr> for U128 {
    fn from(addr: std::net::Ipv6Addr) -> Self {
        U128(u128::from(addr))
    }
}

impl From<U128> for std::net::Ipv6Addr {
    fn from(value: U128) -> Self {
        std::net::Ipv6Addr::from(value.0)
    }
}

impl fmt::Debug for U128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}{:016x}", self.high(), self.low())
    }
}

impl fmt::LowerHex for U128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl fmt::Binary for U128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Binary::fmt(&self.0, f)
    }
}
