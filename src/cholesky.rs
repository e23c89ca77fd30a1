//! Cholesky (`LL'`) decomposition and its solves.
//!
//! Unlike the LDLT factorization this grew from, `L` here is not unit-diagonal: `L[i][i] =
//! sqrt(d)` is folded directly into the stored factor, so both the forward and back solves divide
//! by the diagonal rather than deferring that division to a separate `D` solve. No pivoting, no
//! equilibration: a non-SPD input is reported as an error, not salvaged.

use crate::LaError;
use crate::matrix::Matrix;
use crate::scalar::Scalar;
use crate::sum::kahan_sum;

/// Lower-triangular Cholesky factor `L` such that `A = L L'`. The upper triangle is left zero.
#[derive(Clone, Debug, PartialEq)]
pub struct Cholesky<S: Scalar> {
    factors: Matrix<S>,
}

impl<S: Scalar> Cholesky<S> {
    /// Factors the symmetric positive-definite matrix `a`.
    ///
    /// # Errors
    /// Returns [`LaError::Asymmetric`] if `a[i][j] != a[j][i]` for some `i > j` (exact equality
    /// under [`Scalar::compare`], not a tolerance). Returns [`LaError::NonSpd`] if a diagonal
    /// pivot square is non-positive, infinite, or NaN.
    pub fn factor(ctx: &S::Context, a: &Matrix<S>) -> Result<Self, LaError> {
        let n = a.dim();
        let mut l = Matrix::<S>::zero(ctx, n);

        for i in 0..n {
            let mut row_below_diag = Vec::with_capacity(i);
            for j in 0..i {
                let a_ij = a.get(i, j).expect("in bounds");
                let a_ji = a.get(j, i).expect("in bounds");
                if !a_ij.scalar_eq(&a_ji) {
                    return Err(LaError::Asymmetric { row: i, col: j });
                }

                let mut cross = S::zero(ctx);
                for k in 0..j {
                    let term = l.get(i, k).expect("in bounds") * l.get(j, k).expect("in bounds");
                    cross = cross + term;
                }
                let l_jj = l.get(j, j).expect("in bounds");
                let s = (a_ij - cross) / l_jj;
                l.set(i, j, s.clone());
                row_below_diag.push(s);
            }
            let sum2 = kahan_sum::<S, _>(ctx, row_below_diag.into_iter().map(|s| s.clone() * s));

            let d = a.get(i, i).expect("in bounds") - sum2;
            if d.is_negative() || d.is_zero() || !d.is_finite() {
                return Err(LaError::NonSpd { pivot_col: i });
            }
            l.set(i, i, d.sqrt());
        }

        Ok(Self { factors: l })
    }

    /// Solves `A x = b` using `L` then `L'`.
    pub fn solve_vec(&self, b: &[S]) -> Vec<S> {
        let n = self.factors.dim();
        let mut x = b.to_vec();

        for i in 0..n {
            for k in 0..i {
                let term = x[k].clone() * self.factors.get(i, k).expect("in bounds");
                x[i] = x[i].clone() - term;
            }
            x[i] = x[i].clone() / self.factors.get(i, i).expect("in bounds");
        }

        for ii in 0..n {
            let k = n - 1 - ii;
            for i in (k + 1)..n {
                let term = x[i].clone() * self.factors.get(i, k).expect("in bounds");
                x[k] = x[k].clone() - term;
            }
            x[k] = x[k].clone() / self.factors.get(k, k).expect("in bounds");
        }

        x
    }

    /// Determinant of the original matrix: the square of the product of `L`'s diagonal.
    #[must_use]
    pub fn det(&self) -> S {
        let n = self.factors.dim();
        let ctx = self.factors.row(0)[0].context();
        let mut diag_product = S::one(&ctx);
        for i in 0..n {
            diag_product = diag_product * self.factors.get(i, i).expect("in bounds");
        }
        diag_product.clone() * diag_product
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_approx(a: f64, b: f64, eps: f64) {
        assert!((a - b).abs() <= eps, "{a} !~= {b} (eps={eps})");
    }

    #[test]
    fn solve_2x2_spd() {
        let a = Matrix::<f64>::from_rows(vec![vec![4.0, 2.0], vec![2.0, 3.0]]).unwrap();
        let chol = Cholesky::factor(&(), &a).unwrap();
        let x = chol.solve_vec(&[1.0, 2.0]);
        assert_approx(x[0], -0.125, 1e-12);
        assert_approx(x[1], 0.75, 1e-12);
    }

    #[test]
    fn det_matches_product_of_diagonal_squared() {
        let a = Matrix::<f64>::from_rows(vec![vec![4.0, 2.0], vec![2.0, 3.0]]).unwrap();
        let chol = Cholesky::factor(&(), &a).unwrap();
        assert_approx(chol.det(), 8.0, 1e-12);
    }

    #[test]
    fn rejects_asymmetric_input() {
        let a = Matrix::<f64>::from_rows(vec![vec![4.0, 2.0], vec![3.0, 3.0]]).unwrap();
        let err = Cholesky::factor(&(), &a).unwrap_err();
        assert_eq!(err, LaError::Asymmetric { row: 1, col: 0 });
    }

    #[test]
    fn rejects_non_positive_pivot() {
        let a = Matrix::<f64>::from_rows(vec![vec![1.0, 2.0], vec![2.0, 1.0]]).unwrap();
        let err = Cholesky::factor(&(), &a).unwrap_err();
        assert_eq!(err, LaError::NonSpd { pivot_col: 1 });
    }

    #[test]
    fn agrees_with_lu_on_an_spd_system() {
        use crate::lu::Lu;
        let a = Matrix::<f64>::from_rows(vec![vec![6.0, 2.0], vec![2.0, 5.0]]).unwrap();
        let chol = Cholesky::factor(&(), &a).unwrap().solve_vec(&[1.0, 1.0]);
        let lu = Lu::factor(&(), &a, false).unwrap().solve_vec(&[1.0, 1.0]).unwrap();
        assert_approx(chol[0], lu[0], 1e-9);
        assert_approx(chol[1], lu[1], 1e-9);
    }

    #[test]
    fn solve_and_det_round_trip_on_extended_float() {
        use crate::scalar::ExtendedFloat;
        let rows = vec![
            vec![ExtendedFloat::from_f64(&(), 4.0), ExtendedFloat::from_f64(&(), 2.0)],
            vec![ExtendedFloat::from_f64(&(), 2.0), ExtendedFloat::from_f64(&(), 3.0)],
        ];
        let a = Matrix::<ExtendedFloat>::from_rows(rows).unwrap();
        let chol = Cholesky::factor(&(), &a).unwrap();
        let b = [ExtendedFloat::from_f64(&(), 1.0), ExtendedFloat::from_f64(&(), 2.0)];
        let x = chol.solve_vec(&b);
        assert_approx(x[0].to_f64(), -0.125, 1e-27);
        assert_approx(x[1].to_f64(), 0.75, 1e-27);
        assert_approx(chol.det().to_f64(), 8.0, 1e-27);
    }

    #[test]
    fn solve_and_det_round_trip_on_decimal_float() {
        use crate::scalar::{DecimalContext, DecimalFloat};
        let ctx = DecimalContext::with_precision(256);
        let rows = vec![
            vec![DecimalFloat::from_f64(&ctx, 4.0), DecimalFloat::from_f64(&ctx, 2.0)],
            vec![DecimalFloat::from_f64(&ctx, 2.0), DecimalFloat::from_f64(&ctx, 3.0)],
        ];
        let a = Matrix::<DecimalFloat>::from_rows(rows).unwrap();
        let chol = Cholesky::factor(&ctx, &a).unwrap();
        let b = [DecimalFloat::from_f64(&ctx, 1.0), DecimalFloat::from_f64(&ctx, 2.0)];
        let x = chol.solve_vec(&b);
        assert_approx(x[0].to_f64(), -0.125, 1e-60);
        assert_approx(x[1].to_f64(), 0.75, 1e-60);
        assert_approx(chol.det().to_f64(), 8.0, 1e-60);
    }
}
