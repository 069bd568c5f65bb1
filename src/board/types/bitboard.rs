//! Bitboard type and operations.

use super::square::Square;

/// A 64-bit bitboard representing piece positions or attack squares.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Bitboard(pub u64);

impl Bitboard {
    pub const EMPTY: Bitboard = Bitboard(0);

    /// Light squares (b1, d1, ..., a2, c2, ...)
    pub const LIGHT_SQUARES: Bitboard = Bitboard(0x55AA55AA55AA55AA);
    /// Dark squares (a1, c1, ..., b2, d2, ...)
    pub const DARK_SQUARES: Bitboard = Bitboard(0xAA55AA55AA55AA55);

    /// Create a bitboard with a single square set
    #[inline]
    #[must_use]
    pub const fn from_square(sq: Square) -> Self {
        Bitboard(1 << sq.as_index())
    }

    /// Returns an iterator over the squares set in this bitboard
    #[inline]
    #[must_use]
    pub fn iter(self) -> BitboardIter {
        BitboardIter(self)
    }

    /// Returns true if the bitboard is empty
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns the number of set bits (population count)
    #[inline]
    #[must_use]
    pub const fn popcount(self) -> u32 {
        self.0.count_ones()
    }

    /// Returns true if the given square is set
    #[inline]
    #[must_use]
    pub const fn contains(self, sq: Square) -> bool {
        (self.0 & (1 << sq.as_index())) != 0
    }

    #[inline]
    pub(crate) fn insert(&mut self, sq: Square) {
        self.0 |= 1 << sq.as_index();
    }

    #[inline]
    pub(crate) fn remove(&mut self, sq: Square) {
        self.0 &= !(1 << sq.as_index());
    }
}

fn pop_lsb(bb: &mut Bitboard) -> Square {
    let idx = bb.0.trailing_zeros() as usize;
    bb.0 &= bb.0 - 1;
    Square::from_index_unchecked(idx)
}

/// Iterator over set bits in a Bitboard
pub struct BitboardIter(Bitboard);

impl Iterator for BitboardIter {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0.is_empty() {
            None
        } else {
            Some(pop_lsb(&mut self.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iter_yields_set_squares() {
        let a1 = Square::from_index(0).unwrap();
        let h8 = Square::from_index(63).unwrap();
        let mut bb = Bitboard::EMPTY;
        bb.insert(a1);
        bb.insert(h8);
        assert_eq!(bb.popcount(), 2);
        assert_eq!(bb.iter().collect::<Vec<_>>(), vec![a1, h8]);
        bb.remove(a1);
        assert!(!bb.contains(a1));
        assert!(bb.contains(h8));
    }

    #[test]
    fn test_square_color_masks() {
        let a1 = Square::from_index(0).unwrap();
        assert!(Bitboard::DARK_SQUARES.contains(a1));
        for sq in Square::all() {
            assert_eq!(Bitboard::LIGHT_SQUARES.contains(sq), sq.is_light());
        }
    }
}
