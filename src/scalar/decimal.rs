//! The `DecimalFloat` scalar backend: arbitrary precision configured per-instance via a
//! [`DecimalContext`] (precision in bits, rounding mode), built on `rug::Float` (MPFR bindings).

use core::cmp::Ordering;
use core::fmt;
use core::ops::{Add, Div, Mul, Neg, Sub};

use rug::Float;
use rug::float::{Round, Special};

use super::Scalar;

/// Precision and rounding configuration for [`DecimalFloat`].
///
/// Captured once at [`crate::LinearSolver`] construction and invariant for the solver's
/// lifetime, per the spec's data model for the arbitrary-precision backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecimalContext {
    /// Working precision, in bits (MPFR's native unit).
    pub precision: u32,
    /// Rounding mode applied when converting `f64` boundary values into this precision.
    pub rounding: Round,
}

impl DecimalContext {
    /// A context at the given bit precision, rounding to nearest.
    #[must_use]
    pub const fn with_precision(precision: u32) -> Self {
        Self {
            precision,
            rounding: Round::Nearest,
        }
    }
}

impl Default for DecimalContext {
    /// 256 bits (~77 decimal digits), comfortably exceeding the spec's "arbitrary decimal
    /// precision" examples without requiring the caller to pick a number up front.
    fn default() -> Self {
        Self::with_precision(256)
    }
}

/// An arbitrary-precision decimal-like value (an MPFR binary float under the hood) paired with
/// the [`DecimalContext`] it was constructed under.
#[derive(Clone, Debug)]
pub struct DecimalFloat {
    value: Float,
    ctx: DecimalContext,
}

impl DecimalFloat {
    /// Wraps a `rug::Float` directly, pairing it with the context that produced it.
    #[must_use]
    pub const fn from_float(value: Float, ctx: DecimalContext) -> Self {
        Self { value, ctx }
    }

    /// Borrows the underlying `rug::Float`.
    #[must_use]
    pub const fn as_float(&self) -> &Float {
        &self.value
    }
}

impl PartialEq for DecimalFloat {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Some(Ordering::Equal)
    }
}

impl fmt::Display for DecimalFloat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}

impl Add for DecimalFloat {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        let prec = self.value.prec().max(rhs.value.prec());
        let ctx = self.ctx.clone();
        Self {
            value: Float::with_val(prec, &self.value + &rhs.value),
            ctx,
        }
    }
}

impl Sub for DecimalFloat {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        let prec = self.value.prec().max(rhs.value.prec());
        let ctx = self.ctx.clone();
        Self {
            value: Float::with_val(prec, &self.value - &rhs.value),
            ctx,
        }
    }
}

impl Mul for DecimalFloat {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        let prec = self.value.prec().max(rhs.value.prec());
        let ctx = self.ctx.clone();
        Self {
            value: Float::with_val(prec, &self.value * &rhs.value),
            ctx,
        }
    }
}

impl Div for DecimalFloat {
    type Output = Self;
    fn div(self, rhs: Self) -> Self {
        let prec = self.value.prec().max(rhs.value.prec());
        let ctx = self.ctx.clone();
        Self {
            value: Float::with_val(prec, &self.value / &rhs.value),
            ctx,
        }
    }
}

impl Neg for DecimalFloat {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            value: -self.value,
            ctx: self.ctx,
        }
    }
}

impl Scalar for DecimalFloat {
    type Context = DecimalContext;

    #[inline]
    fn context(&self) -> Self::Context {
        self.ctx.clone()
    }

    fn zero(ctx: &Self::Context) -> Self {
        Self {
            value: Float::with_val(ctx.precision, 0),
            ctx: ctx.clone(),
        }
    }

    fn one(ctx: &Self::Context) -> Self {
        Self {
            value: Float::with_val(ctx.precision, 1),
            ctx: ctx.clone(),
        }
    }

    fn nan(ctx: &Self::Context) -> Self {
        Self {
            value: Float::with_val(ctx.precision, Special::Nan),
            ctx: ctx.clone(),
        }
    }

    fn infinity(ctx: &Self::Context) -> Self {
        Self {
            value: Float::with_val(ctx.precision, Special::Infinity),
            ctx: ctx.clone(),
        }
    }

    fn from_f64(ctx: &Self::Context, value: f64) -> Self {
        let (value, _rounding_direction) =
            Float::with_val_round(ctx.precision, value, ctx.rounding);
        Self {
            value,
            ctx: ctx.clone(),
        }
    }

    fn to_f64(&self) -> f64 {
        self.value.to_f64()
    }

    fn abs(self) -> Self {
        Self {
            value: self.value.abs(),
            ctx: self.ctx,
        }
    }

    fn sqrt(self) -> Self {
        Self {
            value: self.value.sqrt(),
            ctx: self.ctx,
        }
    }

    fn compare(&self, other: &Self) -> Option<Ordering> {
        self.value.partial_cmp(&other.value)
    }

    fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    fn is_nan(&self) -> bool {
        self.value.is_nan()
    }

    fn is_infinite(&self) -> bool {
        self.value.is_infinite()
    }

    fn is_negative(&self) -> bool {
        self.value.is_sign_negative() && !self.value.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_one_constants() {
        let ctx = DecimalContext::with_precision(128);
        assert!(DecimalFloat::zero(&ctx).is_zero());
        assert!((DecimalFloat::one(&ctx).to_f64() - 1.0).abs() < 1e-30);
    }

    #[test]
    fn division_respects_precision() {
        let ctx = DecimalContext::with_precision(128);
        let a = DecimalFloat::from_f64(&ctx, 1.0);
        let b = DecimalFloat::from_f64(&ctx, 3.0);
        let q = a / b;
        assert!((q.to_f64() - (1.0 / 3.0)).abs() < 1e-15);
    }

    #[test]
    fn nan_and_infinity_predicates() {
        let ctx = DecimalContext::default();
        assert!(DecimalFloat::nan(&ctx).is_nan());
        assert!(DecimalFloat::infinity(&ctx).is_infinite());
    }

    #[test]
    fn context_propagates_through_arithmetic() {
        let ctx = DecimalContext::with_precision(512);
        let a = DecimalFloat::from_f64(&ctx, 2.0);
        let b = DecimalFloat::from_f64(&ctx, 3.0);
        let sum = a + b;
        assert_eq!(sum.context(), ctx);
    }
}
