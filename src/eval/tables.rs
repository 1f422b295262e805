//! Baseline evaluation weights.
//!
//! The piece-square tables are written rank 8 first: White reads them
//! through `Square::flip_rank`, Black reads them directly. Values are the
//! compiled-in defaults; tuned replacements travel as [`Weights`].

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::{debug, instrument};

use crate::eval::score::{PackedScore, s};

pub const NUM_PIECE_TYPES: usize = 6;
pub const NUM_SQUARES: usize = 64;

/// Phase contribution per piece kind, pawn through king.
pub const GAME_PHASE_INCREMENTS: [i32; NUM_PIECE_TYPES] = [0, 1, 1, 2, 4, 0];
pub const MAX_GAME_PHASE: i32 = 24;

/// Tapered material values, pawn through king.
pub const PIECE_VALUES: [PackedScore; NUM_PIECE_TYPES] = [
    s(82, 94),
    s(337, 281),
    s(365, 297),
    s(477, 512),
    s(1025, 936),
    s(0, 0),
];

#[rustfmt::skip]
const PAWN_TABLE: [PackedScore; NUM_SQUARES] = [
    s(0, 0),    s(0, 0),    s(0, 0),   s(0, 0),    s(0, 0),    s(0, 0),    s(0, 0),   s(0, 0),
    s(98, 178), s(134, 173), s(61, 158), s(95, 134), s(68, 147), s(126, 132), s(34, 165), s(-11, 187),
    s(-6, 94),  s(7, 100),  s(26, 85), s(31, 67),  s(65, 56),  s(56, 53),  s(25, 82), s(-20, 84),
    s(-14, 32), s(13, 24),  s(6, 13),  s(21, 5),   s(23, -2),  s(12, 4),   s(17, 17), s(-23, 17),
    s(-27, 13), s(-2, 9),   s(-5, -3), s(12, -7),  s(17, -7),  s(6, -8),   s(10, 3),  s(-25, -1),
    s(-26, 4),  s(-4, 7),   s(-4, -6), s(-10, 1),  s(3, 0),    s(3, -5),   s(33, -1), s(-12, -8),
    s(-35, 13), s(-1, 8),   s(-20, 8), s(-23, 10), s(-15, 13), s(24, 0),   s(38, 2),  s(-22, -7),
    s(0, 0),    s(0, 0),    s(0, 0),   s(0, 0),    s(0, 0),    s(0, 0),    s(0, 0),   s(0, 0),
];

#[rustfmt::skip]
const KNIGHT_TABLE: [PackedScore; NUM_SQUARES] = [
    s(-167, -58), s(-89, -38), s(-34, -13), s(-49, -28), s(61, -31),  s(-97, -27), s(-15, -63), s(-107, -99),
    s(-73, -25),  s(-41, -8),  s(72, -25),  s(36, -2),   s(23, -9),   s(62, -25),  s(7, -24),   s(-17, -52),
    s(-47, -24),  s(60, -20),  s(37, 10),   s(65, 9),    s(84, -1),   s(129, -9),  s(73, -19),  s(44, -41),
    s(-9, -17),   s(17, 3),    s(19, 22),   s(53, 22),   s(37, 22),   s(69, 11),   s(18, 8),    s(22, -18),
    s(-13, -18),  s(4, -6),    s(16, 16),   s(13, 25),   s(28, 16),   s(19, 17),   s(21, 4),    s(-8, -18),
    s(-23, -23),  s(-9, -3),   s(12, -1),   s(10, 15),   s(19, 10),   s(17, -3),   s(25, -20),  s(-16, -22),
    s(-29, -42),  s(-53, -20), s(-12, -10), s(-3, -5),   s(-1, -2),   s(18, -20),  s(-14, -23), s(-19, -44),
    s(-105, -29), s(-21, -51), s(-58, -23), s(-33, -15), s(-17, -22), s(-28, -18), s(-19, -50), s(-23, -64),
];

#[rustfmt::skip]
const BISHOP_TABLE: [PackedScore; NUM_SQUARES] = [
    s(-29, -14), s(4, -21),   s(-82, -11), s(-37, -8),  s(-25, -7),  s(-42, -9),  s(7, -17),   s(-8, -24),
    s(-26, -8),  s(16, -4),   s(-18, 7),   s(-13, -12), s(30, -3),   s(59, -13),  s(18, -4),   s(-47, -14),
    s(-16, 2),   s(37, -8),   s(43, 0),    s(40, -1),   s(35, -2),   s(50, 6),    s(37, 0),    s(-2, 4),
    s(-4, -3),   s(5, 9),     s(19, 12),   s(50, 9),    s(37, 14),   s(37, 10),   s(7, 3),     s(-2, 2),
    s(-6, -6),   s(13, 3),    s(13, 13),   s(26, 19),   s(34, 7),    s(12, 10),   s(10, -3),   s(4, -9),
    s(0, -12),   s(15, -3),   s(15, 8),    s(15, 10),   s(14, 13),   s(27, 3),    s(18, -7),   s(10, -15),
    s(4, -14),   s(15, -18),  s(16, -7),   s(0, -1),    s(7, 4),     s(21, -9),   s(33, -15),  s(1, -27),
    s(-33, -23), s(-3, -9),   s(-14, -23), s(-21, -5),  s(-13, -9),  s(-12, -16), s(-39, -5),  s(-21, -17),
];

#[rustfmt::skip]
const ROOK_TABLE: [PackedScore; NUM_SQUARES] = [
    s(32, 13),  s(42, 10),  s(32, 18),  s(51, 15),  s(63, 12), s(9, 12),   s(31, 8),   s(43, 5),
    s(27, 11),  s(32, 13),  s(58, 13),  s(62, 11),  s(80, -3), s(67, 3),   s(26, 8),   s(44, 3),
    s(-5, 7),   s(19, 7),   s(26, 7),   s(36, 5),   s(17, 4),  s(45, -3),  s(61, -5),  s(16, -3),
    s(-24, 4),  s(-11, 3),  s(7, 13),   s(26, 1),   s(24, 2),  s(35, 1),   s(-8, -1),  s(-20, 2),
    s(-36, 3),  s(-26, 5),  s(-12, 8),  s(-1, 4),   s(9, -5),  s(-7, -6),  s(6, -8),   s(-23, -11),
    s(-45, -4), s(-25, 0),  s(-16, -5), s(-17, -1), s(3, -7),  s(0, -12),  s(-5, -8),  s(-33, -16),
    s(-44, -6), s(-16, -6), s(-20, 0),  s(-9, 2),   s(-1, -9), s(11, -9),  s(-6, -11), s(-71, -3),
    s(-19, -9), s(-13, 2),  s(1, 3),    s(17, -1),  s(16, -5), s(7, -13),  s(-37, 4),  s(-26, -20),
];

#[rustfmt::skip]
const QUEEN_TABLE: [PackedScore; NUM_SQUARES] = [
    s(-28, -9),  s(0, 22),    s(29, 22),  s(12, 27),  s(59, 27),  s(44, 19),  s(43, 10),  s(45, 20),
    s(-24, -17), s(-39, 20),  s(-5, 32),  s(1, 41),   s(-16, 58), s(57, 25),  s(28, 30),  s(54, 0),
    s(-13, -20), s(-17, 6),   s(7, 9),    s(8, 49),   s(29, 47),  s(56, 35),  s(47, 19),  s(57, 9),
    s(-27, 3),   s(-27, 22),  s(-16, 24), s(-16, 45), s(-1, 57),  s(17, 40),  s(-2, 57),  s(1, 36),
    s(-9, -18),  s(-26, 28),  s(-9, 19),  s(-10, 47), s(-2, 31),  s(-4, 34),  s(3, 39),   s(-3, 23),
    s(-14, -16), s(2, -27),   s(-11, 15), s(-2, 6),   s(-5, 9),   s(2, 17),   s(14, 10),  s(5, 5),
    s(-35, -22), s(-8, -23),  s(11, -30), s(2, -16),  s(8, -16),  s(15, -23), s(-3, -36), s(1, -32),
    s(-1, -33),  s(-18, -28), s(-9, -22), s(10, -43), s(-15, -5), s(-25, -32), s(-31, -20), s(-50, -41),
];

#[rustfmt::skip]
const KING_TABLE: [PackedScore; NUM_SQUARES] = [
    s(-65, -74), s(23, -35),  s(16, -18),  s(-15, -18), s(-56, -11), s(-34, 15),  s(2, 4),    s(13, -17),
    s(29, -12),  s(-1, 17),   s(-20, 14),  s(-7, 17),   s(-8, 17),   s(-4, 38),   s(-38, 23), s(-29, 11),
    s(-9, 10),   s(24, 17),   s(2, 23),    s(-16, 15),  s(-20, 20),  s(6, 45),    s(22, 44),  s(-22, 13),
    s(-17, -8),  s(-20, 22),  s(-12, 24),  s(-27, 27),  s(-30, 26),  s(-25, 33),  s(-14, 26), s(-36, 3),
    s(-49, -18), s(-1, -4),   s(-27, 21),  s(-39, 24),  s(-46, 27),  s(-44, 23),  s(-33, 9),  s(-51, -11),
    s(-14, -19), s(-14, -3),  s(-22, 11),  s(-46, 21),  s(-44, 23),  s(-30, 16),  s(-15, 7),  s(-27, -9),
    s(1, -27),   s(7, -11),   s(-8, 4),    s(-64, 13),  s(-43, 14),  s(-16, 4),   s(9, -5),   s(8, -17),
    s(-15, -53), s(36, -34),  s(12, -21),  s(-54, -11), s(8, -28),   s(-28, -14), s(24, -24), s(14, -43),
];

/// All piece-square tables, pawn through king.
pub const ALL_PSQT: [[PackedScore; NUM_SQUARES]; NUM_PIECE_TYPES] = [
    PAWN_TABLE,
    KNIGHT_TABLE,
    BISHOP_TABLE,
    ROOK_TABLE,
    QUEEN_TABLE,
    KING_TABLE,
];

/// Bonus for the side to move.
pub const TEMPO: PackedScore = s(0, 0);

/// One complete, owned set of evaluation tables.
///
/// [`BASELINE`] is the compiled-in set; tuned sets come from
/// `params::reconstruct` or from a file written by [`Weights::save`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weights {
    pub piece_values: [PackedScore; NUM_PIECE_TYPES],
    #[serde(with = "flat_psqt")]
    pub psqt: [[PackedScore; NUM_SQUARES]; NUM_PIECE_TYPES],
    pub tempo: PackedScore,
}

/// The compiled-in table set.
pub static BASELINE: Weights = Weights {
    piece_values: PIECE_VALUES,
    psqt: ALL_PSQT,
    tempo: TEMPO,
};

impl Weights {
    /// Owned copy of the compiled-in tables.
    pub fn baseline() -> Self {
        BASELINE.clone()
    }

    /// Write the set to `path` in bincode form.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), WeightsIoError> {
        let file = File::create(path.as_ref())?;
        bincode::serialize_into(BufWriter::new(file), self)?;
        debug!(path = %path.as_ref().display(), "weights saved");
        Ok(())
    }

    /// Read a set previously written by [`Weights::save`].
    #[instrument(skip_all)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, WeightsIoError> {
        let file = File::open(path.as_ref())?;
        let weights = bincode::deserialize_from(BufReader::new(file))?;
        debug!(path = %path.as_ref().display(), "weights loaded");
        Ok(weights)
    }
}

/// Field codec for the nested square tables.
///
/// serde's derives stop at 32-element arrays, so the tables cross the
/// wire as one flat, length-prefixed run of scores.
mod flat_psqt {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::{NUM_PIECE_TYPES, NUM_SQUARES};
    use crate::eval::score::PackedScore;

    type Psqt = [[PackedScore; NUM_SQUARES]; NUM_PIECE_TYPES];

    pub fn serialize<S: Serializer>(psqt: &Psqt, serializer: S) -> Result<S::Ok, S::Error> {
        let flat: Vec<PackedScore> = psqt.iter().flatten().copied().collect();
        flat.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Psqt, D::Error> {
        let flat = Vec::<PackedScore>::deserialize(deserializer)?;
        if flat.len() != NUM_PIECE_TYPES * NUM_SQUARES {
            return Err(D::Error::invalid_length(
                flat.len(),
                &"384 piece-square scores",
            ));
        }
        let mut psqt = [[PackedScore::ZERO; NUM_SQUARES]; NUM_PIECE_TYPES];
        for (slot, score) in psqt.iter_mut().flatten().zip(flat) {
            *slot = score;
        }
        Ok(psqt)
    }
}

/// Failures while reading or writing a weights file.
#[derive(Debug)]
pub enum WeightsIoError {
    Io(std::io::Error),
    Codec(bincode::Error),
}

impl std::fmt::Display for WeightsIoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeightsIoError::Io(e) => write!(f, "weights file I/O error: {}", e),
            WeightsIoError::Codec(e) => write!(f, "weights file encoding error: {}", e),
        }
    }
}

impl std::error::Error for WeightsIoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WeightsIoError::Io(e) => Some(e),
            WeightsIoError::Codec(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for WeightsIoError {
    fn from(e: std::io::Error) -> Self {
        WeightsIoError::Io(e)
    }
}

impl From<bincode::Error> for WeightsIoError {
    fn from(e: bincode::Error) -> Self {
        WeightsIoError::Codec(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_shapes_hold() {
        assert_eq!(PIECE_VALUES.len(), NUM_PIECE_TYPES);
        assert_eq!(ALL_PSQT.len(), NUM_PIECE_TYPES);
        for table in &ALL_PSQT {
            assert_eq!(table.len(), NUM_SQUARES);
        }
    }

    #[test]
    fn pawn_edges_are_zero() {
        // No pawn can stand on its first or last rank.
        for sq in 0..8 {
            assert_eq!(PAWN_TABLE[sq], PackedScore::ZERO);
            assert_eq!(PAWN_TABLE[56 + sq], PackedScore::ZERO);
        }
    }

    #[test]
    fn king_carries_no_material_value() {
        assert_eq!(PIECE_VALUES[5], PackedScore::ZERO);
    }

    #[test]
    fn weights_survive_the_codec() {
        let bytes = bincode::serialize(&BASELINE).expect("serialize");
        let back: Weights = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(back, BASELINE);
    }

    #[test]
    fn short_square_runs_are_rejected() {
        let mut bytes = bincode::serialize(&BASELINE).expect("serialize");
        // The run length sits right after the six piece values.
        bytes[48..56].copy_from_slice(&383u64.to_le_bytes());
        let err = bincode::deserialize::<Weights>(&bytes).unwrap_err();
        assert!(err.to_string().contains("384"), "got: {err}");
    }
}
