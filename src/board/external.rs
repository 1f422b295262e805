//! Construction from positions held by the `chess` crate.
//!
//! Tuning drivers often keep fully legal `chess::Board` values around;
//! this adapter turns one into a [`Position`] without a FEN round trip.
//! Only the state the evaluator reads is carried over faithfully: piece
//! placement, side to move, and castling rights. The clocks restart at
//! their defaults, and the en-passant slot stays empty because the
//! `chess` crate tracks that square relative to the pawn rather than as
//! the FEN target square.

use super::{CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ, CastlingRights, Color, PieceType, Position};
use crate::square::Square;

fn piece_kind(piece: chess::Piece) -> PieceType {
    match piece {
        chess::Piece::Pawn => PieceType::Pawn,
        chess::Piece::Knight => PieceType::Knight,
        chess::Piece::Bishop => PieceType::Bishop,
        chess::Piece::Rook => PieceType::Rook,
        chess::Piece::Queen => PieceType::Queen,
        chess::Piece::King => PieceType::King,
    }
}

fn piece_color(color: chess::Color) -> Color {
    match color {
        chess::Color::White => Color::White,
        chess::Color::Black => Color::Black,
    }
}

impl From<&chess::Board> for Position {
    fn from(board: &chess::Board) -> Self {
        let mut pos = Position::empty();

        // Both crates index squares a1 = 0 through h8 = 63.
        for sq in chess::ALL_SQUARES {
            let (Some(piece), Some(color)) = (board.piece_on(sq), board.color_on(sq)) else {
                continue;
            };
            pos.set_piece(
                piece_color(color),
                piece_kind(piece),
                Square::from_index(sq.to_index() as u8),
            );
        }

        pos.side_to_move = piece_color(board.side_to_move());

        let mut bits = 0;
        let white = board.castle_rights(chess::Color::White);
        let black = board.castle_rights(chess::Color::Black);
        if white.has_kingside() {
            bits |= CASTLE_WK;
        }
        if white.has_queenside() {
            bits |= CASTLE_WQ;
        }
        if black.has_kingside() {
            bits |= CASTLE_BK;
        }
        if black.has_queenside() {
            bits |= CASTLE_BQ;
        }
        pos.castling = CastlingRights::from_bits(bits);

        debug_assert_eq!(pos.validate(), Ok(()));
        pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_conversion_matches_fen_parsing() {
        let external = chess::Board::default();
        let converted = Position::from(&external);
        let reference = Position::startpos();

        assert_eq!(converted.occupied(), reference.occupied());
        assert_eq!(converted.side_to_move(), reference.side_to_move());
        assert_eq!(converted.castling(), reference.castling());
        for pt in PieceType::ALL {
            assert_eq!(converted.piece_type_bb(pt), reference.piece_type_bb(pt));
        }
        for color in [Color::White, Color::Black] {
            assert_eq!(converted.occupancies(color), reference.occupancies(color));
        }
    }

    #[test]
    fn conversion_preserves_side_to_move_and_castling() {
        use std::str::FromStr;

        // After 1. e4 it is Black's turn and every right is intact.
        let board =
            chess::Board::from_str("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1")
                .unwrap();
        let pos = Position::from(&board);

        assert_eq!(pos.side_to_move(), Color::Black);
        assert_eq!(pos.castling(), CastlingRights::ALL);
        assert_eq!(pos.piece_count(Color::White, PieceType::Pawn), 8);
        // En passant is deliberately dropped by the adapter.
        assert_eq!(pos.ep_square(), None);
    }
}
