//! Small signed fixed-point numbers, parameterised by total bits and a
//! scale shift.
//!
//! A `Fixed<B, S>` represents `raw * 2^(S - B)`. Addition wraps; callers
//! pick `B` with enough headroom for their worst-case sums (the accumulator
//! uses 32 bits for exactly this reason). The widening multiply always goes
//! through a 64-bit intermediate, which covers every `B1 + B2 <= 64` the
//! network needs.

use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Fixed<const BITS: u32, const SHIFT: i32> {
    raw: i32,
}

impl<const BITS: u32, const SHIFT: i32> Fixed<BITS, SHIFT> {
    pub const ZERO: Self = Fixed { raw: 0 };

    #[inline(always)]
    #[must_use]
    pub const fn from_raw(raw: i32) -> Self {
        Fixed { raw }
    }

    #[inline(always)]
    #[must_use]
    pub const fn raw(self) -> i32 {
        self.raw
    }

    /// Construct from a real value, rounding to nearest.
    #[must_use]
    pub fn from_f32(value: f32) -> Self {
        let scale = (BITS as i32 - SHIFT) as f32;
        Fixed {
            raw: (value * scale.exp2()).round() as i32,
        }
    }

    /// Exact up to the target mantissa.
    #[must_use]
    pub fn to_f32(self) -> f32 {
        self.raw as f32 * ((SHIFT - BITS as i32) as f32).exp2()
    }

    #[must_use]
    pub fn to_f64(self) -> f64 {
        f64::from(self.raw) * f64::from((SHIFT - BITS as i32) as f32).exp2()
    }

    /// Scalar integer multiply. Keeps `(B, S)` and may overflow; callers
    /// must know their headroom.
    #[inline(always)]
    #[must_use]
    pub fn small_mul(self, k: i32) -> Self {
        Fixed {
            raw: self.raw.wrapping_mul(k),
        }
    }
}

impl<const BITS: u32, const SHIFT: i32> Add for Fixed<BITS, SHIFT> {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Fixed {
            raw: self.raw.wrapping_add(rhs.raw),
        }
    }
}

impl<const BITS: u32, const SHIFT: i32> Sub for Fixed<BITS, SHIFT> {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Fixed {
            raw: self.raw.wrapping_sub(rhs.raw),
        }
    }
}

impl<const BITS: u32, const SHIFT: i32> AddAssign for Fixed<BITS, SHIFT> {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Self) {
        self.raw = self.raw.wrapping_add(rhs.raw);
    }
}

impl<const BITS: u32, const SHIFT: i32> SubAssign for Fixed<BITS, SHIFT> {
    #[inline(always)]
    fn sub_assign(&mut self, rhs: Self) {
        self.raw = self.raw.wrapping_sub(rhs.raw);
    }
}

impl<const BITS: u32, const SHIFT: i32> Neg for Fixed<BITS, SHIFT> {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self {
        Fixed {
            raw: self.raw.wrapping_neg(),
        }
    }
}

impl<const BITS: u32, const SHIFT: i32> fmt::Debug for Fixed<BITS, SHIFT> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fixed<{BITS},{SHIFT}>({} = {})", self.raw, self.to_f64())
    }
}

/// Product of two `Fixed` values, with a 64-bit raw.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct WideFixed<const BITS: u32, const SHIFT: i32> {
    raw: i64,
}

impl<const BITS: u32, const SHIFT: i32> WideFixed<BITS, SHIFT> {
    #[inline(always)]
    #[must_use]
    pub const fn raw(self) -> i64 {
        self.raw
    }

    #[must_use]
    pub fn to_f64(self) -> f64 {
        self.raw as f64 * f64::from((SHIFT - BITS as i32) as f32).exp2()
    }
}

/// Widening multiply: `(B1, S1) x (B2, S2) -> (B1 + B2, S1 + S2)`.
///
/// The output parameters are checked rather than computed (const-generic
/// arithmetic in return position is not expressible on stable), so a
/// mismatched call site fails loudly in debug builds.
#[inline]
#[must_use]
pub fn widening_mul<
    const B1: u32,
    const S1: i32,
    const B2: u32,
    const S2: i32,
    const OB: u32,
    const OS: i32,
>(
    lhs: Fixed<B1, S1>,
    rhs: Fixed<B2, S2>,
) -> WideFixed<OB, OS> {
    debug_assert!(OB == B1 + B2, "widening_mul bit-width mismatch");
    debug_assert!(OS == S1 + S2, "widening_mul scale-shift mismatch");
    WideFixed {
        raw: i64::from(lhs.raw()) * i64::from(rhs.raw()),
    }
}

/// The accumulator's element type: 32-bit raw, scale shift 8.
pub type AccFixed = Fixed<32, 8>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_round_trip_is_exact() {
        let x = Fixed::<32, 8>::from_f32(0.03125);
        assert_eq!(x.to_f32(), 0.03125);
        let y = Fixed::<32, 8>::from_f32(-1.5);
        assert_eq!(y.to_f32(), -1.5);
    }

    #[test]
    fn rounds_to_nearest() {
        // One raw step of Fixed<8, 7> is 2^-1; 0.7 rounds to 0.5... raw 1.
        let x = Fixed::<8, 7>::from_f32(0.7);
        assert_eq!(x.raw(), 1);
        let y = Fixed::<8, 7>::from_f32(0.8);
        assert_eq!(y.raw(), 2);
    }

    #[test]
    fn addition_matches_raw_arithmetic() {
        let a = Fixed::<32, 8>::from_raw(1000);
        let b = Fixed::<32, 8>::from_raw(-300);
        assert_eq!((a + b).raw(), 700);
        assert_eq!((a - b).raw(), 1300);
        let mut c = a;
        c += b;
        assert_eq!(c, Fixed::from_raw(700));
    }

    #[test]
    fn widening_mul_adds_bits_and_shifts() {
        let a = Fixed::<8, 7>::from_f32(0.5);
        let b = Fixed::<8, 7>::from_f32(0.5);
        let p: WideFixed<16, 14> = widening_mul(a, b);
        assert_eq!(p.to_f64(), 0.25);
    }

    #[test]
    fn small_mul_keeps_type() {
        let a = AccFixed::from_f32(0.25);
        assert_eq!(a.small_mul(-1), -a);
        assert_eq!(a.small_mul(4).to_f32(), 1.0);
    }
}
