//! Reading address specs.
//!
//! A spec is one of
//!
//! * `address`
//! * `address/mask`, where the mask is a prefix length or an address-shaped
//!   (possibly Cisco wildcard) mask
//! * `address,address` or `address,+offset`, an inclusive range
//! * `address:address` or `address:+offset`, the older range syntax
//!
//! An address is an IPv6 literal, an IPv4 address in any of the forms
//! `inet_aton(3)` accepts (`a.b.c.d`, `a.b.c`, `a.b`, `a`, with each part
//! decimal, `0`-prefixed octal or `0x`-prefixed hex), or a hostname.

use std::net::{Ipv4Addr, Ipv6Addr};

use log::debug;

use crate::config::MergeMode;
use crate::resolve::Resolver;
use crate::tree::NetTree;
use crate::types::af::{self, Family};
use crate::types::errors::NetmaskError;
use crate::types::U128;

//------------ SpecParser ----------------------------------------------------

/// Turns spec strings into trees, resolving hostnames through `R`.
#[derive(Clone, Debug, Default)]
pub struct SpecParser<R> {
    resolver: R,
    mode: MergeMode,
}

impl<R: Resolver> SpecParser<R> {
    pub fn new(resolver: R) -> Self {
        SpecParser {
            resolver,
            mode: MergeMode::default(),
        }
    }

    /// Build the trees for each spec in `mode`.
    pub fn with_mode(resolver: R, mode: MergeMode) -> Self {
        SpecParser { resolver, mode }
    }

    pub fn parse(&self, text: &str) -> Result<NetTree, NetmaskError> {
        let tree = self.parse_inner(text)?;
        debug!("{:?} -> {:?}", text, tree);
        Ok(tree)
    }

    fn parse_inner(&self, text: &str) -> Result<NetTree, NetmaskError> {
        if let Some((addr, mask)) = text.split_once('/') {
            let mut tree = NetTree::with_mode(self.mode);
            for (value, family) in self.parse_addr(addr)? {
                tree.insert(apply_mask(value, family, mask)?);
            }
            return Ok(tree);
        }

        if let Some((lo, hi)) = text.split_once(',') {
            return self.parse_range(lo, hi);
        }

        let addr_err = match self.parse_addr(text) {
            Ok(addrs) => {
                let mut tree = NetTree::with_mode(self.mode);
                for (value, family) in addrs {
                    tree.insert(NetTree::leaf(value, U128::BITS, family)?);
                }
                return Ok(tree);
            }
            Err(err) => err,
        };

        // Only reached when the whole text is not an address, so IPv6
        // literals never end up here.
        if let Some((lo, hi)) = text.split_once(':') {
            if let Some(tree) = self.parse_reverse_offset(lo, hi)? {
                return Ok(tree);
            }
            return self.parse_range(lo, hi);
        }

        Err(addr_err)
    }

    // `lo,hi`, `lo,+offset` and their `:` counterparts.
    fn parse_range(&self, lo: &str, hi: &str) -> Result<NetTree, NetmaskError> {
        let (lo_value, lo_family) = self.parse_bound(lo)?;
        let (hi_text, offset) = match hi.strip_prefix('+') {
            Some(rest) => (rest, true),
            None => (hi, false),
        };
        let (mut hi_value, hi_family) = self.parse_bound(hi_text)?;

        if offset {
            // An offset written like an IPv4 address only counts with its
            // 32 address bits, not with the mapped prefix.
            if hi_family == Family::V4 {
                hi_value = U128::new(u128::from(hi_value.low() as u32));
            }
            let (sum, overflow) = lo_value.add(hi_value);
            if overflow {
                return Err(NetmaskError::AddressOverflow);
            }
            hi_value = sum;
        }

        let mut tree = NetTree::with_mode(self.mode);
        tree.insert_range(lo_value, hi_value, lo_family.merge(hi_family));
        Ok(tree)
    }

    // The legacy `N:+-M` form: the IPv4 range from `N - M` up to `N`, with
    // the subtraction wrapping in 32 bits.
    fn parse_reverse_offset(
        &self,
        lo: &str,
        hi: &str,
    ) -> Result<Option<NetTree>, NetmaskError> {
        let Some(n) = hi.strip_prefix("+-").and_then(parse_numeral) else {
            return Ok(None);
        };
        let (lo_value, lo_family) = self.parse_bound(lo)?;
        let top = (lo_value.low() as u32).wrapping_sub(n as u32);
        let top = af::v4_to_u128(Ipv4Addr::from(top));

        let mut tree = NetTree::with_mode(self.mode);
        tree.insert_range(lo_value, top, lo_family.merge(Family::V4));
        Ok(Some(tree))
    }

    fn parse_bound(&self, text: &str) -> Result<(U128, Family), NetmaskError> {
        match self.parse_addr(text)?.as_slice() {
            [single] => Ok(*single),
            _ => Err(NetmaskError::AmbiguousBound(text.to_string())),
        }
    }

    fn parse_addr(&self, text: &str) -> Result<Vec<(U128, Family)>, NetmaskError> {
        if let Ok(addr) = text.parse::<Ipv6Addr>() {
            return Ok(vec![(U128::from(addr), Family::V6)]);
        }
        if let Some(addr) = parse_inet_aton(text) {
            return Ok(vec![(af::v4_to_u128(addr), Family::V4)]);
        }
        if text.is_empty() {
            return Err(NetmaskError::Unparsable(text.to_string()));
        }
        Ok(self
            .resolver
            .resolve(text)?
            .into_iter()
            .map(af::from_ipaddr)
            .collect())
    }
}

/// Parse a single spec, resolving hostnames through `resolver`.
pub fn parse_spec<R: Resolver>(
    text: &str,
    resolver: R,
) -> Result<NetTree, NetmaskError> {
    SpecParser::new(resolver).parse(text)
}

//------------ Masks ---------------------------------------------------------

fn apply_mask(
    value: U128,
    family: Family,
    text: &str,
) -> Result<NetTree, NetmaskError> {
    if let Some(n) = parse_numeral(text) {
        let len = u8::try_from(n)
            .ok()
            .and_then(|n| family.internal_len(n))
            .ok_or(NetmaskError::PrefixLengthInvalid)?;
        return NetTree::leaf(value, len, family);
    }

    let mask = match family {
        Family::V6 => {
            let addr = text
                .parse::<Ipv6Addr>()
                .map_err(|_| NetmaskError::Unparsable(text.to_string()))?;
            let mask = U128::from(addr);
            // A wildcard mask has its ones at the bottom.
            if !mask.bit(0) && mask.bit(127) {
                !mask
            } else {
                mask
            }
        }
        Family::V4 => {
            let mut v = parse_inet_aton(text)
                .map(u32::from)
                .ok_or_else(|| NetmaskError::Unparsable(text.to_string()))?;
            if v & 1 == 1 && v >> 31 == 0 {
                v = !v;
            }
            U128::from_parts(u64::MAX, 0xffff_ffff_0000_0000 | u64::from(v))
        }
    };

    if !mask.is_valid_mask() {
        return Err(NetmaskError::MaskInvalid);
    }
    NetTree::leaf(value & mask, mask.popcount(), family)
}

//------------ Numerals ------------------------------------------------------

// An unsigned number in C notation: `0x` hex, leading-zero octal, or
// decimal. No signs, no surrounding whitespace.
fn parse_numeral(text: &str) -> Option<u64> {
    let (digits, radix) = if let Some(hex) = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        (hex, 16)
    } else if let Some(oct) = text.strip_prefix('0') {
        if oct.is_empty() {
            return Some(0);
        }
        (oct, 8)
    } else {
        (text, 10)
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    u64::from_str_radix(digits, radix).ok()
}

// The classic IPv4 forms: up to four dot-separated numerals, where the
// last one fills all remaining bytes.
fn parse_inet_aton(text: &str) -> Option<Ipv4Addr> {
    let parts = text
        .split('.')
        .map(parse_numeral)
        .collect::<Option<Vec<_>>>()?;
    let (last, init) = parts.split_last()?;
    if init.len() > 3 {
        return None;
    }

    let mut value: u32 = 0;
    for (i, part) in init.iter().enumerate() {
        let byte = u8::try_from(*part).ok()?;
        value |= u32::from(byte) << (24 - 8 * i);
    }
    let last = u32::try_from(*last).ok()?;
    if last > u32::MAX >> (8 * init.len()) {
        return None;
    }
    Some(Ipv4Addr::from(value | last))
}
