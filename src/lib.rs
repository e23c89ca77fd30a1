#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Dense, precision-polymorphic linear algebra for square real matrices.
//!
//! This crate solves linear systems, inverts matrices, and computes determinants, norms, and
//! condition numbers with one algorithm body ([`LinearSolver`]) that runs unchanged at three
//! precisions via the [`Scalar`] trait: `f64`, the 128-bit extended [`ExtendedFloat`], and the
//! arbitrary-precision [`DecimalFloat`].
//!
//! - LU decomposition with partial pivoting and optional row equilibration, driving the general
//!   solver, matrix solver, inversion, and determinant ([`lu`]).
//! - Cholesky (`LL'`) decomposition for symmetric positive-definite matrices ([`cholesky`]).
//! - Iterative refinement that reuses a cached decomposition to improve solution accuracy
//!   ([`refine`]).
//!
//! Out of scope: sparse storage, rectangular matrices, eigenproblems, SVD/QR, parallelism, and
//! thread-safety. [`LinearSolver`] is sequential and single-caller.

mod cholesky;
mod equilibrate;
mod lu;
mod matrix;
pub mod scalar;
mod solver;
mod sum;
mod triangular;
mod refine;

use core::fmt;

/// Maximum number of iterative-refinement passes before giving up and returning the best
/// iterate found so far.
pub const MAX_REFINE_ITERS: u32 = 20;

/// Floor on the refinement damping factor; refinement gives up once the correction factor has
/// been halved below this.
pub const MIN_CORRECTION_FACTOR: f64 = 0.125;

/// The sticky factorization-failure state reported by [`LinearSolver::error_code`].
///
/// Unlike [`LaError`], this does not carry [`LaError::SizeMismatch`] or [`LaError::NotFinite`]:
/// those are per-call input-validation failures, not latched factorization state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ErrorCode {
    /// No factorization has failed.
    #[default]
    Ok,
    /// Cholesky detected `A[i][j] != A[j][i]`.
    Asymmetric,
    /// Cholesky detected a non-positive, infinite, or NaN pivot square.
    NonSpd,
    /// LU encountered a zero (or non-finite) pivot.
    NonInvertible,
}

/// Linear algebra errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LaError {
    /// A right-hand side or operand's dimensions are inconsistent with `A`.
    SizeMismatch {
        /// The dimension `A` (or the other operand) required.
        expected: usize,
        /// The dimension actually supplied.
        found: usize,
    },
    /// A non-finite value (NaN/∞) was encountered in an input.
    NotFinite {
        /// The row being processed when the non-finite value was detected.
        row: usize,
        /// The column being processed when the non-finite value was detected.
        col: usize,
    },
    /// LU encountered a zero (or non-finite) pivot: the matrix is numerically singular.
    NonInvertible {
        /// The column where a suitable pivot could not be found.
        pivot_col: usize,
    },
    /// Cholesky detected `A[i][j] != A[j][i]`.
    Asymmetric {
        /// The row of the asymmetric entry.
        row: usize,
        /// The column of the asymmetric entry.
        col: usize,
    },
    /// Cholesky detected a non-positive, infinite, or NaN pivot square: the matrix is not
    /// symmetric positive-definite.
    NonSpd {
        /// The row/column where the pivot square was not a valid positive value.
        pivot_col: usize,
    },
}

impl fmt::Display for LaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::SizeMismatch { expected, found } => {
                write!(f, "size mismatch: expected dimension {expected}, found {found}")
            }
            Self::NotFinite { row, col } => {
                write!(f, "non-finite value encountered at ({row}, {col})")
            }
            Self::NonInvertible { pivot_col } => {
                write!(f, "singular matrix: no usable pivot at column {pivot_col}")
            }
            Self::Asymmetric { row, col } => {
                write!(f, "asymmetric matrix at ({row}, {col}): Cholesky requires A[i][j] == A[j][i]")
            }
            Self::NonSpd { pivot_col } => {
                write!(
                    f,
                    "not symmetric positive-definite: non-positive pivot square at column {pivot_col}"
                )
            }
        }
    }
}

impl std::error::Error for LaError {}

pub use cholesky::Cholesky;
pub use lu::Lu;
pub use matrix::Matrix;
pub use scalar::{DecimalContext, DecimalFloat, ExtendedFloat, Scalar};
pub use solver::LinearSolver;

/// Re-exports the common surface for `use la_precise::prelude::*;`.
pub mod prelude {
    pub use crate::{
        Cholesky, DecimalContext, DecimalFloat, ErrorCode, ExtendedFloat, LaError, LinearSolver,
        Lu, Matrix, Scalar,
    };
}
