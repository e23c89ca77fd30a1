//! The `ExtendedFloat` scalar backend: a 128-bit double-double extended float (~31-32 decimal
//! digits), built on the `twofloat` crate's [`TwoFloat`].

use core::cmp::Ordering;
use core::fmt;
use core::ops::{Add, Div, Mul, Neg, Sub};

use twofloat::TwoFloat;

use super::Scalar;

/// A 128-bit double-double extended-precision floating-point value.
///
/// Needs no construction context: like `f64`, every `ExtendedFloat` carries its own precision
/// implicitly (the fixed double-double representation), so `Scalar::Context` is `()`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExtendedFloat(TwoFloat);

impl ExtendedFloat {
    /// Wraps a [`TwoFloat`] directly.
    #[must_use]
    #[inline]
    pub const fn from_two_float(value: TwoFloat) -> Self {
        Self(value)
    }

    /// Unwraps the underlying [`TwoFloat`].
    #[must_use]
    #[inline]
    pub const fn into_two_float(self) -> TwoFloat {
        self.0
    }
}

impl fmt::Display for ExtendedFloat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Add for ExtendedFloat {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for ExtendedFloat {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Mul for ExtendedFloat {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self(self.0 * rhs.0)
    }
}

impl Div for ExtendedFloat {
    type Output = Self;
    #[inline]
    fn div(self, rhs: Self) -> Self {
        Self(self.0 / rhs.0)
    }
}

impl Neg for ExtendedFloat {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Scalar for ExtendedFloat {
    type Context = ();

    #[inline]
    fn context(&self) -> Self::Context {}

    #[inline]
    fn zero(_ctx: &Self::Context) -> Self {
        Self(TwoFloat::from(0.0))
    }

    #[inline]
    fn one(_ctx: &Self::Context) -> Self {
        Self(TwoFloat::from(1.0))
    }

    #[inline]
    fn nan(_ctx: &Self::Context) -> Self {
        Self(TwoFloat::from(f64::NAN))
    }

    #[inline]
    fn infinity(_ctx: &Self::Context) -> Self {
        Self(TwoFloat::from(f64::INFINITY))
    }

    #[inline]
    fn from_f64(_ctx: &Self::Context, value: f64) -> Self {
        Self(TwoFloat::from(value))
    }

    #[inline]
    fn to_f64(&self) -> f64 {
        f64::from(self.0)
    }

    #[inline]
    fn abs(self) -> Self {
        Self(self.0.abs())
    }

    #[inline]
    fn sqrt(self) -> Self {
        Self(self.0.sqrt())
    }

    #[inline]
    fn compare(&self, other: &Self) -> Option<Ordering> {
        self.0.partial_cmp(&other.0)
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.0 == TwoFloat::from(0.0)
    }

    #[inline]
    fn is_nan(&self) -> bool {
        f64::from(self.0).is_nan()
    }

    #[inline]
    fn is_infinite(&self) -> bool {
        f64::from(self.0).is_infinite()
    }

    #[inline]
    fn is_negative(&self) -> bool {
        self.0 < TwoFloat::from(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_one_roundtrip() {
        let z = ExtendedFloat::zero(&());
        let o = ExtendedFloat::one(&());
        assert!(z.is_zero());
        assert_eq!(o.to_f64(), 1.0);
    }

    #[test]
    fn arithmetic_matches_f64_closely() {
        let a = ExtendedFloat::from_f64(&(), 1.0);
        let b = ExtendedFloat::from_f64(&(), 3.0);
        let q = a / b;
        assert!((q.to_f64() - (1.0 / 3.0)).abs() < 1e-15);
    }

    #[test]
    fn sqrt_of_two() {
        let two = ExtendedFloat::from_f64(&(), 2.0);
        let root = two.sqrt();
        assert!((root.to_f64() - std::f64::consts::SQRT_2).abs() < 1e-15);
    }
}
