pub mod bitboard;
pub mod board;
pub mod eval;
#[cfg(feature = "cli")]
pub mod logger;
pub mod params;
pub mod square;
