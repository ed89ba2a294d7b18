//! Printing blocks.
//!
//! Every style renders one [Cidr] per line. Addresses are shown in their
//! display family, so an IPv4 block prints dotted quads and only its 32
//! address bits in the numeric styles.

use log::error;
use serde_derive::Serialize;

use crate::types::af::{self, Family};
use crate::types::Cidr;

/// The number of addresses in `::/0`, the only block whose `!mask + 1` overflows a `u128`.
const WHOLE_SPACE_COUNT: &str = "340282366920938463463374607431768211456";

//------------ OutputStyle ---------------------------------------------------

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputStyle {
    /// `address/netmask`
    Standard,
    /// `address/length`
    #[default]
    Cidr,
    /// `address wildcard`, with the host bits set in the mask.
    Cisco,
    /// `first-last (count)`
    Range,
    /// Address and netmask in hex.
    Hex,
    /// Address and netmask in octal.
    Octal,
    /// Address and netmask in binary, one group per byte.
    Binary,
    /// One JSON object per block.
    Json,
}

impl OutputStyle {
    /// Render one block, without a trailing newline.
    pub fn render(&self, cidr: &Cidr) -> String {
        match self {
            OutputStyle::Standard => format!(
                "{:>15}/{:<15}",
                cidr.addr().to_string(),
                cidr.mask_addr().to_string()
            ),
            OutputStyle::Cidr => {
                format!("{:>15}/{}", cidr.addr().to_string(), cidr.prefix_len())
            }
            OutputStyle::Cisco => format!(
                "{:>15} {:<15}",
                cidr.addr().to_string(),
                af::to_ipaddr(!cidr.mask(), cidr.family()).to_string()
            ),
            OutputStyle::Range => format!(
                "{:>15}-{:<15} ({})",
                cidr.addr().to_string(),
                cidr.last_addr().to_string(),
                block_size(cidr)
            ),
            OutputStyle::Hex => format!(
                "0x{}/0x{}",
                regroup(&cidr.family_bytes(cidr.network()), 4),
                regroup(&cidr.family_bytes(cidr.mask()), 4)
            ),
            OutputStyle::Octal => format!(
                "0{}/0{}",
                regroup(&cidr.family_bytes(cidr.network()), 3),
                regroup(&cidr.family_bytes(cidr.mask()), 3)
            ),
            OutputStyle::Binary => format!(
                "{} / {}",
                binary_groups(&cidr.family_bytes(cidr.network())),
                binary_groups(&cidr.family_bytes(cidr.mask()))
            ),
            OutputStyle::Json => {
                let row = JsonBlock {
                    family: cidr.family(),
                    network: cidr.addr().to_string(),
                    prefix_len: cidr.prefix_len(),
                    mask: cidr.mask_addr().to_string(),
                };
                serde_json::to_string(&row).unwrap_or_else(|err| {
                    error!("cannot serialize {}: {}", cidr, err);
                    String::new()
                })
            }
        }
    }
}

#[derive(Serialize)]
struct JsonBlock {
    family: Family,
    network: String,
    prefix_len: u8,
    mask: String,
}

// The count of addresses in the block, in decimal.
fn block_size(cidr: &Cidr) -> String {
    match (!cidr.mask()).to_u128().checked_add(1) {
        Some(n) => n.to_string(),
        None => WHOLE_SPACE_COUNT.to_string(),
    }
}

// Re-chunk a big-endian byte string into digits of `bits` bits each (1 to
// 4). When the total is not a multiple of `bits`, the first digit is
// padded with zeros on the left.
fn regroup(bytes: &[u8], bits: u32) -> String {
    let mask = (1u32 << bits) - 1;
    let total = 8 * bytes.len() as u32;
    let mut have = (bits - total % bits) % bits;
    let mut pending: u32 = 0;
    let mut out = String::with_capacity((total / bits + 1) as usize);
    for &byte in bytes {
        pending = (pending << 8) | u32::from(byte);
        have += 8;
        while have >= bits {
            if let Some(c) = char::from_digit((pending >> (have - bits)) & mask, 16) {
                out.push(c);
            }
            have -= bits;
        }
    }
    out
}

fn binary_groups(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:08b}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
