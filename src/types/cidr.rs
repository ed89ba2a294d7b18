use std::net::IpAddr;

use super::af::{self, Family, V4_LEN_OFFSET};
use super::uint128::U128;

//------------ Cidr ----------------------------------------------------------

/// One block of the set, as handed out by [walk](crate::NetTree::walk) and
/// [iter](crate::NetTree::iter).
///
/// The family here is the display family of the leaf: IPv4 only if the
/// leaf was tagged IPv4 and its network still lies in `::ffff:0:0/96`.
/// Lengths are kept internally on the 128-bit scale; [Cidr::prefix_len]
/// translates them back.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Cidr {
    family: Family,
    network: U128,
    len: u8,
}

impl Cidr {
    pub(crate) fn new(family: Family, network: U128, len: u8) -> Self {
        Cidr {
            family,
            network,
            len,
        }
    }

    pub fn family(&self) -> Family {
        self.family
    }

    /// The network address on the 128-bit scale.
    pub fn network(&self) -> U128 {
        self.network
    }

    /// The mask on the 128-bit scale.
    pub fn mask(&self) -> U128 {
        U128::mask(self.len)
    }

    /// The last address in the block, on the 128-bit scale.
    pub fn last(&self) -> U128 {
        self.network | !self.mask()
    }

    /// The prefix length on the 128-bit scale.
    pub fn internal_len(&self) -> u8 {
        self.len
    }

    /// The prefix length as written for this family, e.g. 24 for an IPv4
    /// /24.
    pub fn prefix_len(&self) -> u8 {
        match self.family {
            Family::V4 => self.len.saturating_sub(V4_LEN_OFFSET),
            Family::V6 => self.len,
        }
    }

    pub fn addr(&self) -> IpAddr {
        af::to_ipaddr(self.network, self.family)
    }

    pub fn mask_addr(&self) -> IpAddr {
        af::to_ipaddr(self.mask(), self.family)
    }

    pub fn last_addr(&self) -> IpAddr {
        af::to_ipaddr(self.last(), self.family)
    }

    /// Whether `value` falls inside this block.
    pub fn contains(&self, value: U128) -> bool {
        value.truncate_to_len(self.len) == self.network
    }

    /// The bytes of the address as shown for this family: the last 4 for
    /// IPv4, all 16 for IPv6.
    pub(crate) fn family_bytes(&self, value: U128) -> Vec<u8> {
        let bytes = value.to_be_bytes();
        match self.family {
            Family::V4 => bytes.iter().skip(12).copied().collect(),
            Family::V6 => bytes.to_vec(),
        }
    }
}

impl std::fmt::Display for Cidr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.addr(), self.prefix_len())
    }
}

impl TryFrom<Cidr> for inetnum::addr::Prefix {
    type Error = inetnum::addr::PrefixError;

    fn try_from(value: Cidr) -> Result<Self, Self::Error> {
        Self::new(value.addr(), value.prefix_len())
    }
}
