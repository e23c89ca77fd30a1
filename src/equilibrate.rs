//! Row equilibration: per-row scale factors that balance a matrix before LU factorization.
//!
//! Scaling each row by the reciprocal of its absolute row sum keeps partial pivoting from being
//! skewed by rows with disproportionately large magnitudes. Degenerate (all-zero) rows get a
//! scale of one; LU's own pivot check is what reports singularity, not equilibration.

use crate::matrix::Matrix;
use crate::scalar::Scalar;
use crate::sum::kahan_sum;

/// Computes `row_scales[i] = 1 / Σⱼ |a[i][j]|`, or `1` when that row sum is zero.
#[must_use]
pub fn row_scales<S: Scalar>(ctx: &S::Context, a: &Matrix<S>) -> Vec<S> {
    let n = a.dim();
    (0..n)
        .map(|i| {
            let row_sum = kahan_sum::<S, _>(ctx, a.row(i).iter().map(|x| x.clone().abs()));
            if row_sum.is_zero() {
                S::one(ctx)
            } else {
                S::one(ctx) / row_sum
            }
        })
        .collect()
}

/// Builds a fresh matrix with row `i` of `a` multiplied by `scales[i]`.
#[must_use]
pub fn scaled_copy<S: Scalar>(a: &Matrix<S>, scales: &[S]) -> Matrix<S> {
    let n = a.dim();
    let rows = (0..n)
        .map(|i| {
            a.row(i)
                .iter()
                .map(|v| v.clone() * scales[i].clone())
                .collect()
        })
        .collect();
    Matrix::from_rows(rows).expect("row count and row lengths preserved from a valid source matrix")
}
