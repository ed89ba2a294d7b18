use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use serde_derive::Serialize;

use super::uint128::U128;

//------------ Family --------------------------------------------------------

/// The provenance of a block: did it enter the set as IPv4 or as IPv6?
///
/// Both families live in one 128-bit space. IPv4 addresses are embedded at
/// `::ffff:a.b.c.d` and their prefix lengths are stored with an offset of
/// [`V4_LEN_OFFSET`]. The tag only steers how a block is displayed, it never
/// takes part in the set algebra.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    V4,
    V6,
}

impl Family {
    /// The family of the union of a `self` block and an `other` block. Once
    /// either side is IPv6 the result is IPv6, and there is no way back.
    pub fn merge(self, other: Family) -> Family {
        match (self, other) {
            (Family::V4, Family::V4) => Family::V4,
            _ => Family::V6,
        }
    }

    /// Number of address bits as seen from the outside.
    pub fn bits(self) -> u8 {
        match self {
            Family::V4 => 32,
            Family::V6 => 128,
        }
    }

    /// Translate an external prefix length into the internal 0..=128 one.
    /// Returns `None` for lengths that cannot exist in this family.
    pub fn internal_len(self, len: u8) -> Option<u8> {
        match self {
            Family::V4 if len <= 32 => Some(len + V4_LEN_OFFSET),
            Family::V6 if len <= 128 => Some(len),
            _ => None,
        }
    }
}

impl std::fmt::Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Family::V4 => write!(f, "IPv4"),
            Family::V6 => write!(f, "IPv6"),
        }
    }
}

//------------ IPv4 embedding -----------------------------------------------

/// The offset between an IPv4 prefix length and its internal length.
pub const V4_LEN_OFFSET: u8 = 96;

/// The top 96 bits of every embedded IPv4 address.
pub const V4_MAPPED_PREFIX: U128 = U128::from_parts(0, 0x0000_ffff_0000_0000);

/// Embed an IPv4 address in the 128-bit space.
pub fn v4_to_u128(addr: Ipv4Addr) -> U128 {
    V4_MAPPED_PREFIX | U128::new(u32::from(addr) as u128)
}

/// The IPv4 address held in the low 32 bits of `value`.
pub fn u128_to_v4(value: U128) -> Ipv4Addr {
    Ipv4Addr::from(value.low() as u32)
}

/// True if `value` lies within the IPv4-mapped block `::ffff:0:0/96`.
pub fn is_v4_mapped(value: U128) -> bool {
    value.truncate_to_len(V4_LEN_OFFSET) == V4_MAPPED_PREFIX
}

/// The embedded value and family of a `std` address.
pub fn from_ipaddr(addr: IpAddr) -> (U128, Family) {
    match addr {
        IpAddr::V4(a) => (v4_to_u128(a), Family::V4),
        IpAddr::V6(a) => (U128::from(a), Family::V6),
    }
}

/// Turn an embedded value back into a `std` address of the given family.
pub fn to_ipaddr(value: U128, family: Family) -> IpAddr {
    match family {
        Family::V4 => IpAddr::V4(u128_to_v4(value)),
        Family::V6 => IpAddr::V6(Ipv6Addr::from(value)),
    }
}
