#[cfg(test)]
use std::error::Error;

use super::af::{self, Family};
use super::{Cidr, U128};

//------------ U128 bit twiddling --------------------------------------------

#[test]
fn test_mask_lengths() -> Result<(), Box<dyn Error>> {
    assert_eq!(U128::mask(0), U128::ZERO);
    assert_eq!(U128::mask(128), U128::MAX);
    assert_eq!(U128::mask(200), U128::MAX);
    assert_eq!(U128::mask(1), U128::new(1 << 127));
    assert_eq!(U128::mask(64), U128::from_parts(u64::MAX, 0));
    assert_eq!(U128::mask(120).low(), 0xffff_ffff_ffff_ff00);

    for len in 0..=128 {
        let mask = U128::mask(len);
        assert!(mask.is_valid_mask(), "mask({}) is not contiguous", len);
        assert_eq!(mask.popcount(), len);
    }
    Ok(())
}

#[test]
fn test_is_valid_mask() {
    assert!(U128::ZERO.is_valid_mask());
    assert!(U128::MAX.is_valid_mask());
    assert!(!U128::ONE.is_valid_mask());
    assert!(!U128::from_parts(u64::MAX, 1).is_valid_mask());
    assert!(!U128::from_parts(0xff00_ff00_0000_0000, 0).is_valid_mask());
}

#[test]
fn test_add_carries() {
    assert_eq!(U128::new(5).add(U128::new(7)), (U128::new(12), false));
    assert_eq!(U128::MAX.add(U128::ONE), (U128::ZERO, true));
    assert_eq!(
        U128::from_parts(0, u64::MAX).add(U128::ONE),
        (U128::from_parts(1, 0), false)
    );
}

#[test]
fn test_bits_msb_first() {
    let v = U128::from_parts(1 << 63, 1);
    assert!(v.bit(0));
    assert!(!v.bit(1));
    assert!(v.bit(127));
    assert!(!v.bit(128));
    assert!(!v.bit(255));
}

#[test]
fn test_common_prefix() {
    let a = U128::from_parts(0xf000_0000_0000_0000, 0);
    let b = U128::from_parts(0xf800_0000_0000_0000, 0);
    assert_eq!(a.longest_common_prefix(b), 4);
    assert_eq!(a.longest_common_prefix(a), 128);
    assert_eq!(U128::ZERO.longest_common_prefix(U128::MAX), 0);
    assert_eq!(U128::ZERO.leading_zero_count(), 128);
}

#[test]
fn test_truncate_and_order() {
    let v = U128::new(0x1234_5678);
    assert_eq!(v.truncate_to_len(124), U128::new(0x1234_5670));
    assert_eq!(v.truncate_to_len(0), U128::ZERO);
    assert!(U128::ONE < U128::from_parts(1, 0));
    assert_eq!(format!("{:?}", U128::ONE), format!("{:032x}", 1));
}

//------------ IPv4 embedding -------------------------------------------------

#[test]
fn test_v4_mapping() -> Result<(), Box<dyn Error>> {
    let addr = "192.0.2.1".parse()?;
    let value = af::v4_to_u128(addr);
    assert_eq!(value, U128::from("::ffff:192.0.2.1".parse::<std::net::Ipv6Addr>()?));
    assert!(af::is_v4_mapped(value));
    assert_eq!(af::u128_to_v4(value), addr);
    assert!(!af::is_v4_mapped(U128::new(u128::from(u32::from(addr)))));
    Ok(())
}

#[test]
fn test_family_lengths() {
    assert_eq!(Family::V4.internal_len(24), Some(120));
    assert_eq!(Family::V4.internal_len(33), None);
    assert_eq!(Family::V6.internal_len(128), Some(128));
    assert_eq!(Family::V6.internal_len(129), None);
    assert_eq!(Family::V4.merge(Family::V4), Family::V4);
    assert_eq!(Family::V4.merge(Family::V6), Family::V6);
    assert_eq!(Family::V6.merge(Family::V4), Family::V6);
}

#[test]
fn test_cidr_accessors() -> Result<(), Box<dyn Error>> {
    let cidr = Cidr::new(
        Family::V4,
        af::v4_to_u128("10.1.0.0".parse()?),
        112,
    );
    assert_eq!(cidr.prefix_len(), 16);
    assert_eq!(cidr.to_string(), "10.1.0.0/16");
    assert_eq!(cidr.mask_addr().to_string(), "255.255.0.0");
    assert_eq!(cidr.last_addr().to_string(), "10.1.255.255");
    assert!(cidr.contains(af::v4_to_u128("10.1.200.3".parse()?)));
    assert!(!cidr.contains(af::v4_to_u128("10.2.0.0".parse()?)));
    assert_eq!(cidr.family_bytes(cidr.network()), vec![10, 1, 0, 0]);

    let pfx = inetnum::addr::Prefix::try_from(cidr)?;
    assert_eq!(pfx.to_string(), "10.1.0.0/16");
    Ok(())
}
