use std::fmt;
use std::str::FromStr;

/// A board square, indexed a1 = 0 through h8 = 63 (rank-major).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square(u8);

impl Square {
    /// Build from a raw 0-63 index.
    #[inline(always)]
    pub fn from_index(idx: u8) -> Self {
        debug_assert!(idx < 64, "square index out of range: {}", idx);
        Square(idx)
    }

    /// Build from file (0 = a) and rank (0 = rank 1).
    #[inline(always)]
    pub fn from_file_rank(file: u8, rank: u8) -> Self {
        debug_assert!(file < 8 && rank < 8, "file/rank out of range: {}/{}", file, rank);
        Square(rank * 8 + file)
    }

    #[inline(always)]
    pub fn index(self) -> u8 {
        self.0
    }

    /// Rank 0-7, where rank 1 = 0.
    #[inline(always)]
    pub fn rank(self) -> u8 {
        self.0 >> 3
    }

    /// File 0-7, where file a = 0.
    #[inline(always)]
    pub fn file(self) -> u8 {
        self.0 & 7
    }

    /// Vertical mirror (a1 <-> a8). The piece-square tables are written
    /// rank 8 first, so White lookups go through this.
    #[inline(always)]
    pub fn flip_rank(self) -> Square {
        Square(self.0 ^ 56)
    }
}

impl FromStr for Square {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(format!("expected an algebraic square, got `{}`", s));
        }
        let file = bytes[0].wrapping_sub(b'a');
        let rank = bytes[1].wrapping_sub(b'1');
        if file > 7 || rank > 7 {
            return Err(format!("expected an algebraic square, got `{}`", s));
        }
        Ok(Square(rank * 8 + file))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file()) as char, self.rank() + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algebraic_round_trip() {
        for name in ["a1", "e4", "h8", "c6"] {
            let sq = Square::from_str(name).expect("valid square name");
            assert_eq!(sq.to_string(), name);
        }
    }

    #[test]
    fn rejects_bad_names() {
        for bad in ["", "e", "e9", "i4", "e44", "4e"] {
            assert!(Square::from_str(bad).is_err(), "`{}` should not parse", bad);
        }
    }

    #[test]
    fn flip_rank_mirrors_vertically() {
        let e2 = Square::from_str("e2").unwrap();
        let e7 = Square::from_str("e7").unwrap();
        assert_eq!(e2.flip_rank(), e7);
        assert_eq!(e7.flip_rank(), e2);
        assert_eq!(Square::from_index(0).flip_rank().index(), 56);
    }

    #[test]
    fn file_rank_decomposition() {
        let d5 = Square::from_file_rank(3, 4);
        assert_eq!(d5.file(), 3);
        assert_eq!(d5.rank(), 4);
        assert_eq!(d5.index(), 35);
    }
}
