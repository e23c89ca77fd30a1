//! Iterative refinement: reuse a cached decomposition to improve solution accuracy.
//!
//! Both the vector and matrix forms share the same damped-correction, best-iterate-retention
//! loop (§4.7): compute the residual at working precision, accept the iterate only if its error
//! improves on the best seen so far, halve the damping factor otherwise, and give up once the
//! damping factor underflows [`crate::MIN_CORRECTION_FACTOR`]. The residual is always computed
//! with the crate's one matrix-multiply implementation ([`Matrix::multiply_vector`] /
//! [`Matrix::multiply_matrix`]), which sums via [`crate::sum::kahan_sum`]; the correction itself
//! — `solve_correction` — is whatever the caller's cached factorization provides and is never
//! re-derived here.

use crate::LaError;
use crate::MAX_REFINE_ITERS;
use crate::MIN_CORRECTION_FACTOR;
use crate::matrix::Matrix;
use crate::scalar::Scalar;
use crate::sum::kahan_sum;

/// Refines an initial solution `x0` of `a x = b`, using `solve_correction` to solve `a delta =
/// residual` against the same cached factorization that produced `x0`.
///
/// # Errors
/// Propagates whatever `solve_correction` or the internal matrix-vector multiply returns.
pub fn refine_vector<S, F>(
    ctx: &S::Context,
    a: &Matrix<S>,
    b: &[S],
    x0: Vec<S>,
    mut solve_correction: F,
) -> Result<Vec<S>, LaError>
where
    S: Scalar,
    F: FnMut(&[S]) -> Result<Vec<S>, LaError>,
{
    let mut x = x0;
    let mut best_x = x.clone();
    let mut best_error: Option<S> = None;
    let mut correction_factor = 1.0_f64;

    for _ in 0..MAX_REFINE_ITERS {
        let ax = a.multiply_vector(&x)?;
        let residual: Vec<S> = ax
            .into_iter()
            .zip(b.iter())
            .map(|(axi, bi)| axi - bi.clone())
            .collect();
        let err = kahan_sum::<S, _>(ctx, residual.iter().map(|r| r.clone() * r.clone()));

        let improved = match &best_error {
            None => true,
            Some(best) => err.compare(best) == Some(core::cmp::Ordering::Less),
        };

        if improved {
            best_error = Some(err.clone());
            best_x = x.clone();
            if err.is_zero() {
                return Ok(best_x);
            }
        } else {
            correction_factor /= 2.0;
            if correction_factor < MIN_CORRECTION_FACTOR {
                return Ok(best_x);
            }
        }

        let delta = solve_correction(&residual)?;
        let factor = S::from_f64(ctx, correction_factor);
        x = x
            .into_iter()
            .zip(delta.into_iter())
            .map(|(xi, di)| xi - factor.clone() * di)
            .collect();
    }

    Ok(best_x)
}

/// Matrix right-hand-side form of [`refine_vector`]: error is root-mean-square over all `N^2`
/// residual entries rather than sum-of-squares, both monotone in the residual norm.
///
/// # Errors
/// Propagates whatever `solve_correction` or the internal matrix-matrix multiply returns.
pub fn refine_matrix<S, F>(
    ctx: &S::Context,
    a: &Matrix<S>,
    b: &Matrix<S>,
    x0: Matrix<S>,
    mut solve_correction: F,
) -> Result<Matrix<S>, LaError>
where
    S: Scalar,
    F: FnMut(&Matrix<S>) -> Result<Matrix<S>, LaError>,
{
    let n = a.dim();
    let n_sq = S::from_f64(ctx, (n * n) as f64);
    let mut x = x0;
    let mut best_x = x.clone();
    let mut best_error: Option<S> = None;
    let mut correction_factor = 1.0_f64;

    for _ in 0..MAX_REFINE_ITERS {
        let ax = a.multiply_matrix(&x)?;
        let residual = ax.subtract(b)?;
        let sum_sq =
            kahan_sum::<S, _>(ctx, residual.iter_entries().map(|r| r.clone() * r.clone()));
        let err = (sum_sq / n_sq.clone()).sqrt();

        let improved = match &best_error {
            None => true,
            Some(best) => err.compare(best) == Some(core::cmp::Ordering::Less),
        };

        if improved {
            best_error = Some(err.clone());
            best_x = x.clone();
            if err.is_zero() {
                return Ok(best_x);
            }
        } else {
            correction_factor /= 2.0;
            if correction_factor < MIN_CORRECTION_FACTOR {
                return Ok(best_x);
            }
        }

        let delta = solve_correction(&residual)?;
        let factor = S::from_f64(ctx, correction_factor);
        x = x.subtract(&delta.multiply_scalar(&factor))?;
    }

    Ok(best_x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lu::Lu;

    #[test]
    fn refinement_does_not_worsen_an_already_exact_solution() {
        let a = Matrix::<f64>::from_rows(vec![vec![2.0, 0.0], vec![0.0, 3.0]]).unwrap();
        let lu = Lu::factor(&(), &a, false).unwrap();
        let b = [4.0, 9.0];
        let x0 = lu.solve_vec(&b).unwrap();

        let refined = refine_vector(&(), &a, &b, x0.clone(), |r| lu.solve_vec(r)).unwrap();
        assert!((refined[0] - x0[0]).abs() < 1e-12);
        assert!((refined[1] - x0[1]).abs() < 1e-12);
    }

    #[test]
    fn refinement_improves_a_perturbed_starting_iterate() {
        let a = Matrix::<f64>::from_rows(vec![vec![4.0, 1.0], vec![2.0, 5.0]]).unwrap();
        let lu = Lu::factor(&(), &a, false).unwrap();
        let b = [6.0, 7.0];
        let exact = lu.solve_vec(&b).unwrap();

        let perturbed: Vec<f64> = exact.iter().map(|v| v + 0.05).collect();
        let refined = refine_vector(&(), &a, &b, perturbed.clone(), |r| lu.solve_vec(r)).unwrap();

        let err_before: f64 = exact
            .iter()
            .zip(perturbed.iter())
            .map(|(e, p)| (e - p).powi(2))
            .sum();
        let err_after: f64 = exact
            .iter()
            .zip(refined.iter())
            .map(|(e, r)| (e - r).powi(2))
            .sum();
        assert!(err_after <= err_before);
    }
}
