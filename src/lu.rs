//! LU decomposition and its solves.

use crate::LaError;
use crate::equilibrate;
use crate::matrix::Matrix;
use crate::scalar::Scalar;
use crate::triangular::{
    back_substitute_upper, back_substitute_upper_cols, forward_substitute_unit_lower,
    forward_substitute_unit_lower_cols,
};

/// LU decomposition (`PA = LU`) with partial pivoting and optional row equilibration.
///
/// The strictly-lower part of `factors` holds the unit-diagonal `L` multipliers; the upper part
/// (including the diagonal) holds `U`. `pivot` is the row permutation chosen during elimination;
/// `row_scales` is the equilibration factor applied to each original row before factoring (all
/// ones when equilibration was not requested).
#[derive(Clone, Debug, PartialEq)]
pub struct Lu<S: Scalar> {
    factors: Matrix<S>,
    pivot: Vec<usize>,
    row_scales: Vec<S>,
    det_sign: f64,
}

impl<S: Scalar> Lu<S> {
    /// Factors `a`, optionally equilibrating rows first.
    ///
    /// # Errors
    /// Returns [`LaError::NonInvertible`] if no usable pivot is found at some column, or
    /// [`LaError::NotFinite`] if a non-finite entry is encountered while scanning for one.
    pub fn factor(ctx: &S::Context, a: &Matrix<S>, need_to_scale: bool) -> Result<Self, LaError> {
        let n = a.dim();
        let row_scales = if need_to_scale {
            equilibrate::row_scales::<S>(ctx, a)
        } else {
            vec![S::one(ctx); n]
        };
        let mut w = equilibrate::scaled_copy(a, &row_scales);

        let mut pivot: Vec<usize> = (0..n).collect();
        let mut det_sign = 1.0;

        for i in 0..n {
            let mut pivot_row = i;
            let mut pivot_abs = w.get(i, i).expect("in bounds").abs();
            if !pivot_abs.is_finite() {
                return Err(LaError::NotFinite { row: i, col: i });
            }

            for r in (i + 1)..n {
                let v = w.get(r, i).expect("in bounds").abs();
                if !v.is_finite() {
                    return Err(LaError::NotFinite { row: r, col: i });
                }
                if v.gt(&pivot_abs) {
                    pivot_abs = v;
                    pivot_row = r;
                }
            }

            if pivot_row != i {
                w.swap_rows(i, pivot_row);
                pivot.swap(i, pivot_row);
                det_sign = -det_sign;
            }

            if w.get(i, i).expect("in bounds").is_zero() {
                return Err(LaError::NonInvertible { pivot_col: i });
            }
            let inv = S::one(ctx) / w.get(i, i).expect("in bounds");

            for j in (i + 1)..n {
                let w_ji = w.get(j, i).expect("in bounds");
                if w_ji.is_zero() {
                    continue;
                }
                let f = w_ji * inv.clone();
                w.set(j, i, f.clone());
                for k in (i + 1)..n {
                    let updated = w.get(j, k).expect("in bounds")
                        - w.get(i, k).expect("in bounds") * f.clone();
                    w.set(j, k, updated);
                }
            }
        }

        Ok(Self {
            factors: w,
            pivot,
            row_scales,
            det_sign,
        })
    }

    /// Solves `A x = b` using this factorization.
    ///
    /// # Errors
    /// Returns [`LaError::NonInvertible`] if a diagonal of `U` is (numerically) zero.
    pub fn solve_vec(&self, b: &[S]) -> Result<Vec<S>, LaError> {
        let n = self.factors.dim();
        let mut x: Vec<S> = (0..n)
            .map(|i| b[self.pivot[i]].clone() * self.row_scales[self.pivot[i]].clone())
            .collect();
        forward_substitute_unit_lower(&self.factors, &mut x);
        back_substitute_upper(&self.factors, &mut x)?;
        Ok(x)
    }

    /// Solves `A X = B` for a square right-hand side, mutating `b` in place ("spoils B"): the
    /// caller is responsible for copying first if the original must survive.
    ///
    /// # Errors
    /// Returns [`LaError::NonInvertible`] if a diagonal of `U` is (numerically) zero, or
    /// [`LaError::SizeMismatch`] if `b`'s dimension disagrees with this factorization's.
    pub fn solve_matrix_inplace(&self, b: &mut Matrix<S>) -> Result<(), LaError> {
        let n = self.factors.dim();
        if b.dim() != n {
            return Err(LaError::SizeMismatch {
                expected: n,
                found: b.dim(),
            });
        }

        let permuted_rows: Vec<Vec<S>> = (0..n)
            .map(|i| {
                b.row(self.pivot[i])
                    .iter()
                    .map(|v| v.clone() * self.row_scales[self.pivot[i]].clone())
                    .collect()
            })
            .collect();
        *b = Matrix::from_rows(permuted_rows).expect("dimensions preserved from a valid b");

        forward_substitute_unit_lower_cols(&self.factors, b);
        back_substitute_upper_cols(&self.factors, b)
    }

    /// Determinant of the original (unscaled) matrix: `det_sign * Π U[i][i] / Π row_scales[i]`.
    #[must_use]
    pub fn det(&self) -> S {
        let n = self.factors.dim();
        let ctx = self.factors.row(0)[0].context();
        let mut det = if self.det_sign < 0.0 {
            -S::one(&ctx)
        } else {
            S::one(&ctx)
        };
        for i in 0..n {
            det = det * self.factors.get(i, i).expect("in bounds");
            det = det / self.row_scales[i].clone();
        }
        det
    }
}
