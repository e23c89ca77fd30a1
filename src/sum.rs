//! Kahan-compensated summation, shared by every reduction of more than two terms.

use crate::scalar::Scalar;

/// Accumulates `terms` with Kahan compensation.
///
/// For each input `x`: `y = x - c; t = sum + y; c = (t - sum) - y; sum = t`. Used by the
/// matrix-matrix and matrix-vector inner products, the row norms used by equilibration and the
/// infinity-norm, and the residual aggregation in iterative refinement. Per the spec's open
/// question on triangular-solve summation, the forward/back substitution loops do NOT go
/// through this helper — only the paths named above do.
pub fn kahan_sum<S, I>(ctx: &S::Context, terms: I) -> S
where
    S: Scalar,
    I: IntoIterator<Item = S>,
{
    let mut sum = S::zero(ctx);
    let mut c = S::zero(ctx);
    for x in terms {
        let y = x - c;
        let t = sum + y;
        c = (t - sum) - y;
        sum = t;
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_plain_values() {
        let terms = vec![1.0_f64, 2.0, 3.0, 4.0];
        assert_eq!(kahan_sum::<f64, _>(&(), terms), 10.0);
    }

    #[test]
    fn matches_naive_sum_for_well_scaled_values() {
        let terms: Vec<f64> = (1..=100).map(f64::from).collect();
        let expected: f64 = terms.iter().sum();
        assert!((kahan_sum::<f64, _>(&(), terms) - expected).abs() < 1e-9);
    }

    #[test]
    fn reduces_error_relative_to_naive_sum_for_ill_conditioned_inputs() {
        // A classic Kahan demonstration: one large value followed by many small ones whose
        // contribution a naive left-to-right sum would lose to rounding.
        let mut terms = vec![1.0e16_f64];
        terms.extend(std::iter::repeat_n(1.0_f64, 10_000));
        terms.push(-1.0e16);

        let naive: f64 = terms.iter().copied().fold(0.0, |acc, x| acc + x);
        let compensated = kahan_sum::<f64, _>(&(), terms);

        assert_eq!(compensated, 10_000.0);
        assert!((naive - 10_000.0).abs() >= (compensated - 10_000.0).abs());
    }
}
