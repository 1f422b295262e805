use crate::square::Square;

/// One bit per square, a1 = bit 0 through h8 = bit 63.
pub type Bitboard = u64;

/// Bit-set operations shared by everything that walks occupancy sets.
pub trait BitboardExt {
    fn set_bit(&mut self, sq: Square);
    fn is_set(self, sq: Square) -> bool;
    fn bit_count(self) -> u32;
    fn is_empty(self) -> bool;
    fn pop_lsb(&mut self) -> u8;
}

impl BitboardExt for Bitboard {
    #[inline(always)]
    fn set_bit(&mut self, sq: Square) {
        *self |= 1u64 << sq.index();
    }

    #[inline(always)]
    fn is_set(self, sq: Square) -> bool {
        self & (1u64 << sq.index()) != 0
    }

    #[inline(always)]
    fn bit_count(self) -> u32 {
        self.count_ones()
    }

    #[inline(always)]
    fn is_empty(self) -> bool {
        self == 0
    }

    /// Remove the lowest set bit and return its square index.
    /// Calling this on an empty board is a contract violation.
    #[inline(always)]
    fn pop_lsb(&mut self) -> u8 {
        debug_assert!(*self != 0, "pop_lsb on empty bitboard");
        let lsb = self.trailing_zeros() as u8;
        *self &= *self - 1;
        lsb
    }
}

/// Iterates set bits from lowest to highest square index.
pub struct BitIter(pub Bitboard);

impl Iterator for BitIter {
    type Item = u8;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0 == 0 {
            None
        } else {
            let lsb = self.0.trailing_zeros() as u8;
            self.0 &= self.0 - 1;
            Some(lsb)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_test_bits() {
        let mut bb: Bitboard = 0;
        bb.set_bit(Square::from_index(0));
        bb.set_bit(Square::from_index(63));
        assert!(bb.is_set(Square::from_index(0)));
        assert!(bb.is_set(Square::from_index(63)));
        assert!(!bb.is_set(Square::from_index(31)));
        assert_eq!(bb.bit_count(), 2);
    }

    #[test]
    fn pop_lsb_walks_upward() {
        let mut bb: Bitboard = (1 << 3) | (1 << 17) | (1 << 60);
        assert_eq!(bb.pop_lsb(), 3);
        assert_eq!(bb.pop_lsb(), 17);
        assert_eq!(bb.pop_lsb(), 60);
        assert!(bb.is_empty());
    }

    #[test]
    fn bit_iter_matches_pop_order() {
        let bb: Bitboard = 0x8100_0000_0000_0081;
        let squares: Vec<u8> = BitIter(bb).collect();
        assert_eq!(squares, vec![0, 7, 56, 63]);
    }
}
