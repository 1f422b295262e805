#[cfg(feature = "external-board")]
mod external;
mod fen;

pub mod castle_bits;
pub use castle_bits::*;
pub use fen::{FenError, START_FEN};

use crate::bitboard::{BitIter, Bitboard, BitboardExt};
use crate::square::Square;
use std::fmt;
use std::str::FromStr;

// Empty square value; no packed piece code 0-13 coincides with 255
pub(crate) const EMPTY_SQ: u8 = 0xFF;

/// Which side is to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Color {
    White,
    Black,
}

/// The six piece kinds, color-agnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl Color {
    pub fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Decode a 0/1 value into a Color.
    #[inline(always)]
    pub(crate) fn from_u8(v: u8) -> Self {
        match v {
            0 => Color::White,
            1 => Color::Black,
            _ => panic!("Invalid Color encoding: {}", v),
        }
    }
}

impl std::ops::Not for Color {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.opposite()
    }
}

impl PieceType {
    /// All piece kinds, board-array order.
    pub const ALL: [PieceType; 6] = [
        PieceType::Pawn,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Queen,
        PieceType::King,
    ];

    /// Decode a 0-5 value into a PieceType.
    #[inline(always)]
    pub(crate) fn from_u8(v: u8) -> Self {
        match v {
            0 => PieceType::Pawn,
            1 => PieceType::Knight,
            2 => PieceType::Bishop,
            3 => PieceType::Rook,
            4 => PieceType::Queen,
            5 => PieceType::King,
            _ => panic!("Invalid PieceType encoding: {}", v),
        }
    }
}

/// A position snapshot: piece placement plus the FEN bookkeeping fields.
///
/// Built once from a FEN string and read-only afterwards; the placement
/// primitive is private to construction, so nothing can move a piece on
/// a position that has been handed out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    /// Lookup table for each square: 0xFF = empty, else (color << 3) | kind.
    piece_on_sq: [u8; 64],
    /// One occupancy set per piece kind, both colors merged.
    piece_bb: [Bitboard; 6],
    /// One occupancy set per color.
    occ: [Bitboard; 2],
    side_to_move: Color,
    castling: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
}

impl Position {
    /// All-empty board, White to move. The construction paths fill it in.
    fn empty() -> Self {
        Position {
            piece_on_sq: [EMPTY_SQ; 64],
            piece_bb: [0; 6],
            occ: [0; 2],
            side_to_move: Color::White,
            castling: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Construction-time primitive; unreachable once a position is built.
    fn set_piece(&mut self, color: Color, pt: PieceType, sq: Square) {
        let i = sq.index() as usize;
        debug_assert!(
            self.piece_on_sq[i] == EMPTY_SQ,
            "square {} set twice during construction",
            sq
        );
        self.piece_bb[pt as usize].set_bit(sq);
        self.occ[color as usize].set_bit(sq);
        self.piece_on_sq[i] = (color as u8) << 3 | (pt as u8);
    }

    /// The standard starting position.
    pub fn startpos() -> Self {
        Position::from_fen(START_FEN).expect("start position FEN must parse")
    }

    #[inline(always)]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// En-passant target square, if one exists.
    #[inline(always)]
    pub fn ep_square(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline(always)]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    /// Half-move clock (fifty-move rule counter).
    #[inline(always)]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    /// Full-move number (starts at 1, increments after Black moves).
    #[inline(always)]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Bitboard of all pieces of one kind, both colors.
    #[inline(always)]
    pub fn piece_type_bb(&self, pt: PieceType) -> Bitboard {
        self.piece_bb[pt as usize]
    }

    /// Bitboard of all pieces for one side.
    #[inline(always)]
    pub fn occupancies(&self, color: Color) -> Bitboard {
        self.occ[color as usize]
    }

    /// Bitboard of all pieces (both colors).
    #[inline(always)]
    pub fn occupied(&self) -> Bitboard {
        self.occ[0] | self.occ[1]
    }

    /// Number of `color` pieces of kind `pt`.
    #[inline(always)]
    pub fn piece_count(&self, color: Color, pt: PieceType) -> u32 {
        (self.piece_type_bb(pt) & self.occupancies(color)).bit_count()
    }

    /// Returns the color and kind of the piece on `sq`, or None if empty.
    #[inline(always)]
    pub fn piece_on(&self, sq: Square) -> Option<(Color, PieceType)> {
        let val = self.piece_on_sq[sq.index() as usize];
        if val == EMPTY_SQ {
            None
        } else {
            let color = Color::from_u8((val >> 3) & 1);
            let pt = PieceType::from_u8(val & 0b111);
            Some((color, pt))
        }
    }

    /// Kind of the piece on an occupied square. Panics if `sq` is empty.
    #[inline(always)]
    pub(crate) fn piece_type_on(&self, sq: Square) -> PieceType {
        let val = self.piece_on_sq[sq.index() as usize];
        debug_assert!(val != EMPTY_SQ, "piece_type_on empty square {}", sq);
        PieceType::from_u8(val & 0b111)
    }

    /// Cross-checks the bitboards against the square lookup table.
    /// Returns Ok if consistent, Err describing the first mismatch.
    pub fn validate(&self) -> Result<(), String> {
        if self.occ[0] & self.occ[1] != 0 {
            return Err("color occupancies overlap".to_string());
        }

        let mut seen: Bitboard = 0;
        for pt in PieceType::ALL {
            let bb = self.piece_type_bb(pt);
            if seen & bb != 0 {
                return Err(format!("{:?} board overlaps another piece kind", pt));
            }
            seen |= bb;
        }
        if seen != self.occupied() {
            return Err("piece-kind boards do not cover the occupancy".to_string());
        }

        for idx in BitIter(self.occupied()) {
            let sq = Square::from_index(idx);
            match self.piece_on(sq) {
                Some((color, pt)) => {
                    if !self.piece_type_bb(pt).is_set(sq) || !self.occupancies(color).is_set(sq) {
                        return Err(format!("square {} disagrees with its bitboards", sq));
                    }
                }
                None => {
                    return Err(format!("occupied square {} empty in the lookup table", sq));
                }
            }
        }

        let filled = self.piece_on_sq.iter().filter(|&&v| v != EMPTY_SQ).count();
        if filled != self.occupied().bit_count() as usize {
            return Err("lookup table holds pieces off the occupancy".to_string());
        }

        Ok(())
    }
}

impl FromStr for Position {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_fen(s)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_codes_round_trip() {
        let pos = Position::startpos();
        let e1: Square = "e1".parse().expect("valid square");
        let d8: Square = "d8".parse().expect("valid square");
        let e4: Square = "e4".parse().expect("valid square");

        assert_eq!(pos.piece_on(e1), Some((Color::White, PieceType::King)));
        assert_eq!(pos.piece_on(d8), Some((Color::Black, PieceType::Queen)));
        assert_eq!(pos.piece_on(e4), None);
        assert_eq!(pos.piece_type_on(e1), PieceType::King);
    }

    #[test]
    fn startpos_counts() {
        let pos = Position::startpos();
        assert_eq!(pos.piece_count(Color::White, PieceType::Pawn), 8);
        assert_eq!(pos.piece_count(Color::Black, PieceType::Pawn), 8);
        assert_eq!(pos.piece_count(Color::White, PieceType::Queen), 1);
        assert_eq!(pos.occupied().count_ones(), 32);
        assert_eq!(pos.side_to_move(), Color::White);
        assert_eq!(pos.castling(), CastlingRights::ALL);
        assert_eq!(pos.ep_square(), None);
    }

    #[test]
    fn color_negation() {
        assert_eq!(!Color::White, Color::Black);
        assert_eq!(Color::Black.opposite(), Color::White);
    }

    #[test]
    fn startpos_is_consistent() {
        assert_eq!(Position::startpos().validate(), Ok(()));
    }
}
