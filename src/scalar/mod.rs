//! Scalar arithmetic abstraction.
//!
//! Every algorithm in this crate (LU, Cholesky, refinement, the auxiliary matrix ops) is
//! written once against the [`Scalar`] trait and runs unchanged at three precisions: [`f64`],
//! the 128-bit extended [`ExtendedFloat`], and the arbitrary-precision [`DecimalFloat`].
//!
//! `DecimalFloat` needs a precision/rounding [`Scalar::Context`] to construct fresh values
//! (zero, one, NaN, infinity, or a value converted from `f64`); `f64` and `ExtendedFloat` do
//! not, so their `Context` is `()`. A [`crate::LinearSolver`] captures its scalar's context
//! once at construction and threads it through every place the core needs a fresh scalar,
//! rather than the core calling a context-free constant constructor.

mod binary;
mod decimal;
mod extended;

use core::cmp::Ordering;
use core::fmt;
use core::ops::{Add, Div, Mul, Neg, Sub};

pub use decimal::{DecimalContext, DecimalFloat};
pub use extended::ExtendedFloat;

/// Capability set required of a scalar type to drive the solver's algorithms.
///
/// Equality between two scalars is defined as `compare(..) == Ordering::Equal`, never bit- or
/// representation-equality, since [`DecimalFloat`] values with different internal
/// representations can be numerically equal.
pub trait Scalar:
    Clone
    + fmt::Debug
    + fmt::Display
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    /// Precision/rounding configuration needed to construct fresh values of this scalar.
    /// `()` for backends with no such configuration.
    type Context: Clone + fmt::Debug;

    /// The context this value was constructed under.
    fn context(&self) -> Self::Context;

    /// Additive identity under the given context.
    fn zero(ctx: &Self::Context) -> Self;

    /// Multiplicative identity under the given context.
    fn one(ctx: &Self::Context) -> Self;

    /// A NaN sentinel under the given context.
    fn nan(ctx: &Self::Context) -> Self;

    /// A positive-infinity sentinel under the given context.
    fn infinity(ctx: &Self::Context) -> Self;

    /// Converts an `f64` boundary value into this scalar under the given context.
    fn from_f64(ctx: &Self::Context, value: f64) -> Self;

    /// Converts this scalar to `f64` for diagnostics and condition-number reporting.
    fn to_f64(&self) -> f64;

    /// Absolute value.
    #[must_use]
    fn abs(self) -> Self;

    /// Square root.
    #[must_use]
    fn sqrt(self) -> Self;

    /// Three-way comparison. NaN compares as neither less, greater, nor equal to anything,
    /// including itself, matching IEEE-754 semantics for the binary backend.
    fn compare(&self, other: &Self) -> Option<Ordering>;

    /// `true` iff this value compares equal to zero.
    fn is_zero(&self) -> bool;

    /// `true` iff this value is NaN.
    fn is_nan(&self) -> bool;

    /// `true` iff this value is positive or negative infinity.
    fn is_infinite(&self) -> bool;

    /// `true` iff this value compares less than zero.
    fn is_negative(&self) -> bool;

    /// `true` iff this value is finite (neither NaN nor infinite).
    #[inline]
    fn is_finite(&self) -> bool {
        !self.is_nan() && !self.is_infinite()
    }

    /// `self > other` under [`Scalar::compare`], `false` if the two do not compare.
    #[inline]
    fn gt(&self, other: &Self) -> bool {
        self.compare(other) == Some(Ordering::Greater)
    }

    /// `self == other` under [`Scalar::compare`].
    #[inline]
    fn scalar_eq(&self, other: &Self) -> bool {
        self.compare(other) == Some(Ordering::Equal)
    }
}
