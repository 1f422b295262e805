// src/board/castle_bits.rs

use crate::board::Color;
use std::fmt;

/// Underlying bit type for castling rights.
pub type CastleBits = u8;

pub const CASTLE_WK: CastleBits = 0b0001;
pub const CASTLE_WQ: CastleBits = 0b0010;
pub const CASTLE_BK: CastleBits = 0b0100;
pub const CASTLE_BQ: CastleBits = 0b1000;

/// The four castling permissions of a position, packed into one byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CastlingRights(CastleBits);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const ALL: CastlingRights =
        CastlingRights(CASTLE_WK | CASTLE_WQ | CASTLE_BK | CASTLE_BQ);

    /// Wrap raw castle bits.
    #[inline(always)]
    pub const fn from_bits(bits: CastleBits) -> Self {
        CastlingRights(bits)
    }

    /// Parse the castling field of a FEN string: `-` or any subset of `KQkq`.
    /// Returns None on characters outside that alphabet.
    pub fn from_fen(field: &str) -> Option<Self> {
        if field == "-" {
            return Some(CastlingRights::NONE);
        }
        if field.is_empty() {
            return None;
        }
        let mut bits = 0;
        for c in field.chars() {
            bits |= match c {
                'K' => CASTLE_WK,
                'Q' => CASTLE_WQ,
                'k' => CASTLE_BK,
                'q' => CASTLE_BQ,
                _ => return None,
            };
        }
        Some(CastlingRights(bits))
    }

    #[inline(always)]
    pub fn bits(self) -> CastleBits {
        self.0
    }

    #[inline(always)]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline(always)]
    pub fn has(self, flag: CastleBits) -> bool {
        self.0 & flag != 0
    }

    #[inline(always)]
    pub fn king_side(self, color: Color) -> bool {
        match color {
            Color::White => self.has(CASTLE_WK),
            Color::Black => self.has(CASTLE_BK),
        }
    }

    #[inline(always)]
    pub fn queen_side(self, color: Color) -> bool {
        match color {
            Color::White => self.has(CASTLE_WQ),
            Color::Black => self.has(CASTLE_BQ),
        }
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "-");
        }
        if self.has(CASTLE_WK) {
            write!(f, "K")?;
        }
        if self.has(CASTLE_WQ) {
            write!(f, "Q")?;
        }
        if self.has(CASTLE_BK) {
            write!(f, "k")?;
        }
        if self.has(CASTLE_BQ) {
            write!(f, "q")?;
        }
        Ok(())
    }
}
