use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use crate::eval::tables::MAX_GAME_PHASE;

/// A midgame/endgame score pair, kept separate until tapering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PackedScore {
    mg: i32,
    eg: i32,
}

/// Shorthand constructor used throughout the tables.
#[inline(always)]
pub const fn s(mg: i32, eg: i32) -> PackedScore {
    PackedScore { mg, eg }
}

impl PackedScore {
    pub const ZERO: PackedScore = s(0, 0);

    #[inline(always)]
    pub fn mg(self) -> i32 {
        self.mg
    }

    #[inline(always)]
    pub fn eg(self) -> i32 {
        self.eg
    }

    /// Blend the two phases: full midgame at phase 24, full endgame at 0.
    /// Integer division, truncating toward zero.
    #[inline(always)]
    pub fn taper(self, phase: i32) -> i32 {
        (self.mg * phase + self.eg * (MAX_GAME_PHASE - phase)) / MAX_GAME_PHASE
    }
}

impl Add for PackedScore {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        s(self.mg + rhs.mg, self.eg + rhs.eg)
    }
}

impl Sub for PackedScore {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        s(self.mg - rhs.mg, self.eg - rhs.eg)
    }
}

impl AddAssign for PackedScore {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for PackedScore {
    #[inline(always)]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for PackedScore {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self {
        s(-self.mg, -self.eg)
    }
}

impl Mul<i32> for PackedScore {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: i32) -> Self {
        s(self.mg * rhs, self.eg * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn componentwise_arithmetic() {
        let a = s(10, -4);
        let b = s(-3, 7);
        assert_eq!(a + b, s(7, 3));
        assert_eq!(a - b, s(13, -11));
        assert_eq!(-a, s(-10, 4));
        assert_eq!(a * 3, s(30, -12));

        let mut acc = PackedScore::ZERO;
        acc += a;
        acc -= b;
        assert_eq!(acc, s(13, -11));
    }

    #[test]
    fn taper_at_the_endpoints() {
        let v = s(82, 94);
        assert_eq!(v.taper(MAX_GAME_PHASE), 82);
        assert_eq!(v.taper(0), 94);
    }

    #[test]
    fn taper_truncates_toward_zero() {
        // 12/24 phase: (1*12 + 0*12) / 24 = 0 both for positive and
        // negative inputs, never floored to -1.
        assert_eq!(s(1, 0).taper(12), 0);
        assert_eq!(s(-1, 0).taper(12), 0);
        assert_eq!(s(-1, -1).taper(12), -1);
    }
}
