//! Q16.16 signed fixed-point scalar.
//!
//! Every geometry, depth and lighting value inside the renderer is a
//! [`Fixed16`]; floats only appear at load time and in the viewer.
//!
//! * `*` rounds to nearest and saturates instead of wrapping.
//! * `/` widens to 64 bits and never panics: a zero divisor yields
//!   [`Fixed16::MAX`] or [`Fixed16::MIN`] depending on the dividend's sign.

use std::{
    fmt,
    ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign},
};

/// Number of fractional bits.
pub const FRACTION_BITS: u32 = 16;

const ROUND_BIAS: i64 = 1 << (FRACTION_BITS - 1);
const FRACTION_MASK: i64 = (1 << FRACTION_BITS) - 1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Fixed16(pub i32);

impl Fixed16 {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(1 << FRACTION_BITS);
    pub const HALF: Self = Self(1 << (FRACTION_BITS - 1));
    pub const MAX: Self = Self(i32::MAX);
    pub const MIN: Self = Self(i32::MIN);

    /// Exact for every integer in `-32768..=32767`.
    #[inline(always)]
    pub const fn from_int(x: i32) -> Self {
        Self(x << FRACTION_BITS)
    }

    /// Load-time conversion; never used in the per-frame path.
    pub fn from_f32(x: f32) -> Self {
        Self::saturate((x as f64 * Self::ONE.0 as f64).round() as i64)
    }

    pub fn to_f32(self) -> f32 {
        self.0 as f32 / Self::ONE.0 as f32
    }

    /// Clamp a wide intermediate into the 32-bit range.
    #[inline(always)]
    pub fn saturate(wide: i64) -> Self {
        Self(wide.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
    }

    fn saturate_wide(wide: i128) -> Self {
        Self(wide.clamp(i32::MIN as i128, i32::MAX as i128) as i32)
    }

    /// Largest integer `<= self`.
    #[inline(always)]
    pub const fn floor(self) -> i32 {
        self.0 >> FRACTION_BITS
    }

    /// Smallest integer `>= self`.
    #[inline(always)]
    pub const fn ceil(self) -> i32 {
        ((self.0 as i64 + FRACTION_MASK) >> FRACTION_BITS) as i32
    }

    /// Nearest integer, halves round up.
    #[inline(always)]
    pub const fn round(self) -> i32 {
        ((self.0 as i64 + ROUND_BIAS) >> FRACTION_BITS) as i32
    }

    #[inline(always)]
    pub fn abs(self) -> Self {
        Self(self.0.saturating_abs())
    }

    /// Scale by a plain integer.
    #[inline(always)]
    pub fn mul_int(self, n: i32) -> Self {
        Self(self.0.saturating_mul(n))
    }

    /// `1 / self`, saturating on zero.
    #[inline(always)]
    pub fn recip(self) -> Self {
        Self::ONE / self
    }

    /// `a * b / c` with a 64-bit intermediate.
    ///
    /// More precise than `(a * b) / c` and cannot overflow halfway, which
    /// matters when `c` is a near-plane depth.
    #[inline]
    pub fn mul_div(a: Self, b: Self, c: Self) -> Self {
        let num = a.0 as i64 * b.0 as i64;
        if c.0 == 0 {
            return if num >= 0 { Self::MAX } else { Self::MIN };
        }
        Self::saturate(num / c.0 as i64)
    }

    /// `a * b * c` with a 128-bit intermediate.
    #[inline]
    pub fn mul3(a: Self, b: Self, c: Self) -> Self {
        let wide = a.0 as i128 * b.0 as i128 * c.0 as i128;
        Self::saturate_wide(wide >> (2 * FRACTION_BITS))
    }

    /// Euclidean length of `(dx, dz)`.
    pub fn length(dx: Self, dz: Self) -> Self {
        let sq = (dx.0 as i64 * dx.0 as i64) as u64 + (dz.0 as i64 * dz.0 as i64) as u64;
        Self::saturate(sq.isqrt() as i64)
    }
}

impl Add for Fixed16 {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Fixed16 {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Fixed16 {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Fixed16 {
    #[inline(always)]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for Fixed16 {
    type Output = Self;
    #[inline(always)]
    fn neg(self) -> Self {
        Self(self.0.saturating_neg())
    }
}

impl Mul for Fixed16 {
    type Output = Self;
    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        Self::saturate((self.0 as i64 * rhs.0 as i64 + ROUND_BIAS) >> FRACTION_BITS)
    }
}

impl Div for Fixed16 {
    type Output = Self;
    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        if rhs.0 == 0 {
            return if self.0 >= 0 { Self::MAX } else { Self::MIN };
        }
        Self::saturate(((self.0 as i64) << FRACTION_BITS) / rhs.0 as i64)
    }
}

impl fmt::Display for Fixed16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.to_f32())
    }
}
