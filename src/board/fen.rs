//! FEN parsing and rendering for [`Position`].
//!
//! Parsing is strict: all six fields must be present and well formed, and
//! anything else is rejected with a [`FenError`] naming the offending
//! token. Nothing is silently defaulted.

use super::{CastlingRights, Color, PieceType, Position};
use crate::square::Square;
use std::error::Error;
use std::fmt;

/// FEN of the standard starting position.
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Reasons a FEN string can be rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    /// Not exactly six whitespace-separated fields.
    FieldCount(usize),
    /// Board field without exactly eight `/`-separated ranks.
    RankCount(usize),
    /// Unknown character in the board field.
    PieceChar(char),
    /// A rank describing more or fewer than eight files.
    RankWidth(String),
    /// Side-to-move field other than `w` or `b`.
    SideToMove(String),
    /// Castling field with characters outside `KQkq-`.
    Castling(String),
    /// En-passant field that is neither `-` nor a square name.
    EnPassant(String),
    /// Non-numeric half-move or full-move field.
    Clock(String),
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::FieldCount(n) => write!(f, "expected 6 FEN fields, found {}", n),
            FenError::RankCount(n) => write!(f, "expected 8 ranks in the board field, found {}", n),
            FenError::PieceChar(c) => write!(f, "invalid piece character `{}`", c),
            FenError::RankWidth(rank) => {
                write!(f, "rank `{}` does not describe exactly 8 files", rank)
            }
            FenError::SideToMove(s) => write!(f, "side to move must be `w` or `b`, found `{}`", s),
            FenError::Castling(s) => write!(f, "invalid castling field `{}`", s),
            FenError::EnPassant(s) => write!(f, "invalid en-passant field `{}`", s),
            FenError::Clock(s) => write!(f, "invalid clock field `{}`", s),
        }
    }
}

impl Error for FenError {}

fn piece_from_char(c: char) -> Option<(Color, PieceType)> {
    let pt = match c.to_ascii_lowercase() {
        'p' => PieceType::Pawn,
        'n' => PieceType::Knight,
        'b' => PieceType::Bishop,
        'r' => PieceType::Rook,
        'q' => PieceType::Queen,
        'k' => PieceType::King,
        _ => return None,
    };
    let color = if c.is_ascii_uppercase() {
        Color::White
    } else {
        Color::Black
    };
    Some((color, pt))
}

fn piece_to_char(color: Color, pt: PieceType) -> char {
    let c = match pt {
        PieceType::Pawn => 'p',
        PieceType::Knight => 'n',
        PieceType::Bishop => 'b',
        PieceType::Rook => 'r',
        PieceType::Queen => 'q',
        PieceType::King => 'k',
    };
    match color {
        Color::White => c.to_ascii_uppercase(),
        Color::Black => c,
    }
}

impl Position {
    /// Parse a full six-field FEN string.
    pub fn from_fen(fen: &str) -> Result<Position, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(FenError::FieldCount(fields.len()));
        }

        let mut pos = Position::empty();

        // Field 1: piece placement, rank 8 down to rank 1.
        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::RankCount(ranks.len()));
        }
        for (i, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - i as u8;
            let mut file: u32 = 0;
            for c in rank_str.chars() {
                match c.to_digit(10) {
                    Some(skip @ 1..=8) => file += skip,
                    Some(_) => return Err(FenError::PieceChar(c)),
                    None => match piece_from_char(c) {
                        Some((color, pt)) => {
                            if file >= 8 {
                                return Err(FenError::RankWidth((*rank_str).to_string()));
                            }
                            pos.set_piece(color, pt, Square::from_file_rank(file as u8, rank));
                            file += 1;
                        }
                        None => return Err(FenError::PieceChar(c)),
                    },
                }
            }
            if file != 8 {
                return Err(FenError::RankWidth((*rank_str).to_string()));
            }
        }

        // Field 2: side to move.
        pos.side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::SideToMove(other.to_string())),
        };

        // Field 3: castling availability.
        pos.castling = CastlingRights::from_fen(fields[2])
            .ok_or_else(|| FenError::Castling(fields[2].to_string()))?;

        // Field 4: en-passant target square.
        pos.en_passant = match fields[3] {
            "-" => None,
            sq => Some(
                sq.parse::<Square>()
                    .map_err(|_| FenError::EnPassant(sq.to_string()))?,
            ),
        };

        // Fields 5 and 6: half-move clock and full-move number.
        pos.halfmove_clock = fields[4]
            .parse()
            .map_err(|_| FenError::Clock(fields[4].to_string()))?;
        pos.fullmove_number = fields[5]
            .parse()
            .map_err(|_| FenError::Clock(fields[5].to_string()))?;

        debug_assert_eq!(pos.validate(), Ok(()));
        Ok(pos)
    }

    /// Render the position back to a FEN string.
    pub fn to_fen(&self) -> String {
        use std::fmt::Write;

        let mut fen = String::new();
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match self.piece_on(Square::from_file_rank(file, rank)) {
                    Some((color, pt)) => {
                        if empty > 0 {
                            let _ = write!(fen, "{}", empty);
                            empty = 0;
                        }
                        fen.push(piece_to_char(color, pt));
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                let _ = write!(fen, "{}", empty);
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        let stm = match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        };
        let _ = write!(fen, " {} {}", stm, self.castling);
        match self.en_passant {
            Some(sq) => {
                let _ = write!(fen, " {}", sq);
            }
            None => fen.push_str(" -"),
        }
        let _ = write!(fen, " {} {}", self.halfmove_clock, self.fullmove_number);

        fen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyphs_round_trip() {
        for (c, color, pt) in [
            ('P', Color::White, PieceType::Pawn),
            ('n', Color::Black, PieceType::Knight),
            ('K', Color::White, PieceType::King),
            ('q', Color::Black, PieceType::Queen),
        ] {
            assert_eq!(piece_from_char(c), Some((color, pt)));
            assert_eq!(piece_to_char(color, pt), c);
        }
        assert_eq!(piece_from_char('x'), None);
        assert_eq!(piece_from_char('1'), None);
    }

    #[test]
    fn startpos_renders_itself() {
        let pos = Position::from_fen(START_FEN).expect("start FEN parses");
        assert_eq!(pos.to_fen(), START_FEN);
    }
}
