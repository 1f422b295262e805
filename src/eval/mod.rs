//! Tapered evaluation with a per-parameter occurrence trace.
//!
//! Every evaluation returns two things: the tapered score and an
//! [`EvalTrace`] counting, per color, how often each tunable parameter was
//! touched. The trace flattens into the coefficient vector a Texel-style
//! tuner consumes; see the `params` module for the flattening.

pub mod score;
pub mod tables;

use crate::bitboard::BitboardExt;
use crate::board::{Color, FenError, PieceType, Position};
use crate::params::{self, CoefficientVec};
use crate::square::Square;

use score::PackedScore;
use tables::{
    BASELINE, GAME_PHASE_INCREMENTS, MAX_GAME_PHASE, NUM_PIECE_TYPES, NUM_SQUARES, Weights,
};

/// Per-color occurrence counts, one cell per tunable parameter.
///
/// Mirrors the shape of the static tables; index cells by
/// `Color as usize`. Created zeroed for every evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalTrace {
    pub piece_values: [[i16; 2]; NUM_PIECE_TYPES],
    pub psqt: [[[i16; 2]; NUM_SQUARES]; NUM_PIECE_TYPES],
    pub tempo: [i16; 2],
}

impl Default for EvalTrace {
    fn default() -> Self {
        EvalTrace {
            piece_values: [[0; 2]; NUM_PIECE_TYPES],
            psqt: [[[0; 2]; NUM_SQUARES]; NUM_PIECE_TYPES],
            tempo: [0; 2],
        }
    }
}

/// Everything the tuning pipeline needs from one position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalResult {
    /// Tapered score in centipawns, from White's point of view.
    pub score: i32,
    /// One entry per tunable parameter: white count minus black count.
    pub coefficients: CoefficientVec,
}

/// Remaining-material phase in [0, 24]: knights and bishops weigh 1,
/// rooks 2, queens 4, both colors counted. Promotions can push the raw
/// sum past the cap, hence the clip.
pub fn game_phase(pos: &Position) -> i32 {
    let phase = GAME_PHASE_INCREMENTS[PieceType::Knight as usize]
        * pos.piece_type_bb(PieceType::Knight).bit_count() as i32
        + GAME_PHASE_INCREMENTS[PieceType::Bishop as usize]
            * pos.piece_type_bb(PieceType::Bishop).bit_count() as i32
        + GAME_PHASE_INCREMENTS[PieceType::Rook as usize]
            * pos.piece_type_bb(PieceType::Rook).bit_count() as i32
        + GAME_PHASE_INCREMENTS[PieceType::Queen as usize]
            * pos.piece_type_bb(PieceType::Queen).bit_count() as i32;

    phase.min(MAX_GAME_PHASE)
}

/// Side-relative table index. The tables are written rank 8 first, so
/// White is mirrored vertically and Black reads as-is.
#[inline(always)]
fn relative_square(color: Color, sq: Square) -> usize {
    match color {
        Color::White => sq.flip_rank().index() as usize,
        Color::Black => sq.index() as usize,
    }
}

const MATERIAL_KINDS: [PieceType; 5] = [
    PieceType::Pawn,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Rook,
    PieceType::Queen,
];

fn evaluate_material(
    pos: &Position,
    weights: &Weights,
    trace: &mut EvalTrace,
    us: Color,
) -> PackedScore {
    let them = !us;
    let mut material = PackedScore::ZERO;

    for pt in MATERIAL_KINDS {
        let ours = pos.piece_count(us, pt) as i32;
        let theirs = pos.piece_count(them, pt) as i32;

        material += weights.piece_values[pt as usize] * (ours - theirs);

        // The trace records each side's own count, not the difference.
        trace.piece_values[pt as usize][us as usize] += ours as i16;
        trace.piece_values[pt as usize][them as usize] += theirs as i16;
    }

    material
}

fn evaluate_psqt(
    pos: &Position,
    weights: &Weights,
    trace: &mut EvalTrace,
    us: Color,
) -> PackedScore {
    let them = !us;
    let mut psqt = PackedScore::ZERO;

    let mut ours = pos.occupancies(us);
    while !ours.is_empty() {
        let sq = Square::from_index(ours.pop_lsb());
        let pt = pos.piece_type_on(sq) as usize;
        let rel = relative_square(us, sq);

        psqt += weights.psqt[pt][rel];
        trace.psqt[pt][rel][us as usize] += 1;
    }

    let mut theirs = pos.occupancies(them);
    while !theirs.is_empty() {
        let sq = Square::from_index(theirs.pop_lsb());
        let pt = pos.piece_type_on(sq) as usize;
        let rel = relative_square(them, sq);

        psqt -= weights.psqt[pt][rel];
        trace.psqt[pt][rel][them as usize] += 1;
    }

    psqt
}

/// Score `pos` with `weights` and record every parameter occurrence.
///
/// The score is tapered centipawns from White's point of view: the
/// mover-relative total is negated once, here, when Black is to move.
pub fn evaluate(pos: &Position, weights: &Weights) -> (i32, EvalTrace) {
    let us = pos.side_to_move();
    let mut trace = EvalTrace::default();

    let total = evaluate_material(pos, weights, &mut trace, us)
        + evaluate_psqt(pos, weights, &mut trace, us)
        + weights.tempo;
    trace.tempo[us as usize] += 1;

    let tapered = total.taper(game_phase(pos));

    let score = match us {
        Color::White => tapered,
        Color::Black => -tapered,
    };

    (score, trace)
}

/// Parse `fen` and evaluate it with the baseline weights.
pub fn evaluate_fen(fen: &str) -> Result<EvalResult, FenError> {
    let pos: Position = fen.parse()?;
    let (score, trace) = evaluate(&pos, &BASELINE);
    Ok(EvalResult {
        score,
        coefficients: params::coefficients(&trace),
    })
}

/// Evaluate a board held by the `chess` crate with the baseline weights.
#[cfg(feature = "external-board")]
pub fn evaluate_external(board: &chess::Board) -> EvalResult {
    let pos = Position::from(board);
    let (score, trace) = evaluate(&pos, &BASELINE);
    EvalResult {
        score,
        coefficients: params::coefficients(&trace),
    }
}
