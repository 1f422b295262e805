//! Flattening between the nested evaluation tables and the flat vectors a
//! tuning pipeline works with.
//!
//! The parameter order is: piece values (pawn through king), then each
//! piece-square table piece-major/square-minor, then tempo. Everything
//! that touches a flat vector must agree on that order, so all of the
//! traversals here run through one slot walker.

use arrayvec::ArrayVec;
use once_cell::sync::OnceCell;
use std::fmt::Write;
use tracing::debug;

use crate::board::Color;
use crate::eval::EvalTrace;
use crate::eval::score::{PackedScore, s};
use crate::eval::tables::{BASELINE, NUM_PIECE_TYPES, NUM_SQUARES, Weights};

/// Total number of tunable parameters.
pub const NUM_PARAMS: usize = NUM_PIECE_TYPES + NUM_PIECE_TYPES * NUM_SQUARES + 1;

/// One (midgame, endgame) value pair as the optimizer sees it.
pub type ParamPair = [f64; 2];

/// Flat per-parameter coefficients, fixed capacity, heap-free.
pub type CoefficientVec = ArrayVec<i16, NUM_PARAMS>;

/// Settings advertised to the tuning driver. They do not affect the
/// evaluation itself.
pub mod settings {
    /// Sigmoid scaling constant the driver should start from.
    pub const PREFERRED_K: f64 = 2.0;
    pub const MAX_EPOCHS: u32 = 5000;
    pub const INITIAL_LEARNING_RATE: f64 = 1.0;
    pub const LEARNING_RATE_DROP_INTERVAL: u32 = 10_000;
    pub const LEARNING_RATE_DROP_RATIO: f64 = 1.0;
    /// Start every parameter from zero instead of the baseline tables.
    pub const RETUNE_FROM_ZERO: bool = true;
}

/// Address of one tunable value inside the nested tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    PieceValue(usize),
    Psqt(usize, usize),
    Tempo,
}

/// Visits every tunable slot in the canonical order. This is the only
/// place that order is written down.
fn for_each_slot(mut visit: impl FnMut(Slot)) {
    for pt in 0..NUM_PIECE_TYPES {
        visit(Slot::PieceValue(pt));
    }
    for pt in 0..NUM_PIECE_TYPES {
        for sq in 0..NUM_SQUARES {
            visit(Slot::Psqt(pt, sq));
        }
    }
    visit(Slot::Tempo);
}

fn baseline_value(slot: Slot) -> PackedScore {
    match slot {
        Slot::PieceValue(pt) => BASELINE.piece_values[pt],
        Slot::Psqt(pt, sq) => BASELINE.psqt[pt][sq],
        Slot::Tempo => BASELINE.tempo,
    }
}

/// The baseline tables flattened for the optimizer, computed once per
/// process.
pub fn initial_parameters() -> &'static [ParamPair] {
    static INITIAL: OnceCell<Vec<ParamPair>> = OnceCell::new();
    INITIAL.get_or_init(|| {
        let mut parameters = Vec::with_capacity(NUM_PARAMS);
        for_each_slot(|slot| {
            let value = baseline_value(slot);
            parameters.push([value.mg() as f64, value.eg() as f64]);
        });
        debug!(count = parameters.len(), "initial parameters flattened");
        parameters
    })
}

/// Flatten a trace into white-minus-black occurrence counts.
///
/// Entry `i` is the partial derivative of the white-relative, pre-taper
/// score with respect to parameter `i`.
pub fn coefficients(trace: &EvalTrace) -> CoefficientVec {
    let mut coefficients = CoefficientVec::new();
    for_each_slot(|slot| {
        let cell = match slot {
            Slot::PieceValue(pt) => trace.piece_values[pt],
            Slot::Psqt(pt, sq) => trace.psqt[pt][sq],
            Slot::Tempo => trace.tempo,
        };
        coefficients.push(cell[Color::White as usize] - cell[Color::Black as usize]);
    });
    coefficients
}

/// Rebuild a full table set from a tuned flat vector, rounding each value
/// to the nearest integer.
///
/// Panics if `parameters` does not hold exactly [`NUM_PARAMS`] entries.
pub fn reconstruct(parameters: &[ParamPair]) -> Weights {
    assert_eq!(
        parameters.len(),
        NUM_PARAMS,
        "parameter vector has the wrong length"
    );

    let mut weights = Weights::baseline();
    let mut index = 0;
    for_each_slot(|slot| {
        let value = rounded(parameters[index]);
        match slot {
            Slot::PieceValue(pt) => weights.piece_values[pt] = value,
            Slot::Psqt(pt, sq) => weights.psqt[pt][sq] = value,
            Slot::Tempo => weights.tempo = value,
        }
        index += 1;
    });
    weights
}

fn rounded(pair: ParamPair) -> PackedScore {
    s(pair[0].round() as i32, pair[1].round() as i32)
}

const PIECE_NAMES: [&str; NUM_PIECE_TYPES] =
    ["pawn", "knight", "bishop", "rook", "queen", "king"];

fn fmt_score(value: PackedScore) -> String {
    format!("s({}, {})", value.mg(), value.eg())
}

/// Render a table set as Rust source literals, mirroring the shapes in
/// `eval::tables`.
pub fn render(weights: &Weights) -> String {
    let mut out = String::new();

    let values: Vec<String> = weights.piece_values.iter().map(|v| fmt_score(*v)).collect();
    let _ = writeln!(
        out,
        "pub const PIECE_VALUES: [PackedScore; NUM_PIECE_TYPES] = ["
    );
    let _ = writeln!(out, "    {},", values.join(", "));
    let _ = writeln!(out, "];");
    let _ = writeln!(out);

    let _ = writeln!(out, "#[rustfmt::skip]");
    let _ = writeln!(
        out,
        "pub const ALL_PSQT: [[PackedScore; NUM_SQUARES]; NUM_PIECE_TYPES] = ["
    );
    for (pt, table) in weights.psqt.iter().enumerate() {
        let _ = writeln!(out, "    // {}", PIECE_NAMES[pt]);
        let _ = writeln!(out, "    [");
        for row in table.chunks(8) {
            let cells: Vec<String> = row.iter().map(|v| fmt_score(*v)).collect();
            let _ = writeln!(out, "        {},", cells.join(", "));
        }
        let _ = writeln!(out, "    ],");
    }
    let _ = writeln!(out, "];");
    let _ = writeln!(out);

    let _ = writeln!(
        out,
        "pub const TEMPO: PackedScore = {};",
        fmt_score(weights.tempo)
    );

    debug!(parameters = NUM_PARAMS, "rendered parameter tables");
    out
}
