//! Forward/back substitution shared by the LU and Cholesky engines.
//!
//! LU's factors carry a unit-diagonal `L` (the division by the diagonal happens once, at
//! factorization time, and is folded into the stored multipliers), so its forward solve never
//! divides; Cholesky's `L` is not unit-diagonal, so its forward and back solves each divide by
//! `L[i][i]`/`L[k][k]`. Per the crate's open question on refinement precision, neither loop here
//! goes through [`crate::sum::kahan_sum`] — only the matrix-multiply, norm, and residual paths do.

use crate::LaError;
use crate::matrix::Matrix;
use crate::scalar::Scalar;

/// Forward-solves `L z = y` for a unit-lower-triangular `L` stored (with multipliers) in the
/// strictly-lower part of `factors`. Mutates `x` in place; `x` starts as the (already permuted
/// and scaled) right-hand side `y`.
pub fn forward_substitute_unit_lower<S: Scalar>(factors: &Matrix<S>, x: &mut [S]) {
    let n = factors.dim();
    for i in 0..n {
        let row = factors.row(i);
        for k in 0..i {
            let term = x[k].clone() * row[k].clone();
            x[i] = x[i].clone() - term;
        }
    }
}

/// Back-solves `U x = z` for the upper-triangular (including diagonal) `U` stored in `factors`.
/// Mutates `x` in place.
///
/// # Errors
/// Returns [`LaError::NonInvertible`] if a diagonal entry is (numerically) zero.
pub fn back_substitute_upper<S: Scalar>(factors: &Matrix<S>, x: &mut [S]) -> Result<(), LaError> {
    let n = factors.dim();
    for ii in 0..n {
        let i = n - 1 - ii;
        let row = factors.row(i);
        for k in (i + 1)..n {
            let term = x[k].clone() * row[k].clone();
            x[i] = x[i].clone() - term;
        }
        if row[i].is_zero() {
            return Err(LaError::NonInvertible { pivot_col: i });
        }
        x[i] = x[i].clone() / row[i].clone();
    }
    Ok(())
}

/// Column-wise variant of [`forward_substitute_unit_lower`] for an N-column right-hand side
/// matrix `b`, mutated in place ("spoils B" — the caller is responsible for copying first).
pub fn forward_substitute_unit_lower_cols<S: Scalar>(factors: &Matrix<S>, b: &mut Matrix<S>) {
    let n = factors.dim();
    for col in 0..n {
        for i in 0..n {
            let row = factors.row(i);
            let mut acc = b.get(i, col).expect("col in bounds");
            for k in 0..i {
                let term = b.get(k, col).expect("col in bounds") * row[k].clone();
                acc = acc - term;
            }
            b.set(i, col, acc);
        }
    }
}

/// Column-wise variant of [`back_substitute_upper`] for an N-column right-hand side matrix `b`,
/// mutated in place.
///
/// # Errors
/// Returns [`LaError::NonInvertible`] if a diagonal entry is (numerically) zero.
pub fn back_substitute_upper_cols<S: Scalar>(
    factors: &Matrix<S>,
    b: &mut Matrix<S>,
) -> Result<(), LaError> {
    let n = factors.dim();
    for col in 0..n {
        for ii in 0..n {
            let i = n - 1 - ii;
            let row = factors.row(i);
            let mut acc = b.get(i, col).expect("col in bounds");
            for k in (i + 1)..n {
                let term = b.get(k, col).expect("col in bounds") * row[k].clone();
                acc = acc - term;
            }
            if row[i].is_zero() {
                return Err(LaError::NonInvertible { pivot_col: i });
            }
            b.set(i, col, acc / row[i].clone());
        }
    }
    Ok(())
}
