use log::trace;

use crate::types::U128;

//------------ Blocks --------------------------------------------------------

/// The minimal sequence of CIDR blocks covering the inclusive range
/// `[lo, hi]`, in ascending order, as `(network, len)` pairs on the
/// 128-bit scale.
///
/// Each block is the largest one that starts at the first address not yet
/// covered and stays inside the range. Bounds given in reverse order are
/// swapped. The iterator is lazy so that callers can merge each block as it
/// comes out.
pub(crate) struct Blocks {
    lo: U128,
    hi: U128,
    cur: Option<U128>,
}

impl Blocks {
    pub(crate) fn new(lo: U128, hi: U128) -> Self {
        let (lo, hi) = if lo > hi { (hi, lo) } else { (lo, hi) };
        Blocks {
            lo,
            hi,
            cur: Some(lo),
        }
    }
}

impl Iterator for Blocks {
    type Item = (U128, u8);

    fn next(&mut self) -> Option<Self::Item> {
        let cur = self.cur?;

        // Grow the block one bit at a time for as long as both of its ends
        // stay inside the range.
        let mut len = U128::BITS;
        while len > 0 {
            let mask = U128::mask(len - 1);
            if cur & mask < self.lo || cur | !mask > self.hi {
                break;
            }
            len -= 1;
        }

        let last = cur | !U128::mask(len);
        let (next, overflow) = last.add(U128::ONE);
        // Wrapping past the top of the address space ends the range too.
        self.cur = if overflow || next > self.hi {
            None
        } else {
            Some(next)
        };

        trace!("range block {:?}/{}", cur, len);
        Some((cur, len))
    }
}
