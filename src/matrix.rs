//! Heap-allocated square matrices, generic over the scalar backend.
//!
//! The teacher crate stored fixed-size matrices inline as `[[f64; D]; D]`. This crate's
//! matrices are runtime-sized (the spec's property tests range N up to 200), so [`Matrix`] is
//! `Vec<Vec<S>>`-backed; row-major, one `Vec<S>` per row, all rows the same length. `Scalar`
//! values are only `Clone` (the arbitrary-precision backend owns heap-allocated GMP state, so
//! it cannot be `Copy`), so every read that feeds an owned computation clones explicitly.

use crate::LaError;
use crate::scalar::Scalar;
use crate::sum::kahan_sum;

/// Square matrix of dimension `N`, stored row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix<S> {
    rows: Vec<Vec<S>>,
}

impl<S: Scalar> Matrix<S> {
    /// Builds a matrix from row-major storage.
    ///
    /// # Errors
    /// Returns [`LaError::SizeMismatch`] if the matrix is empty, non-square (row count != column
    /// count), or any row's length differs from the others.
    pub fn from_rows(rows: Vec<Vec<S>>) -> Result<Self, LaError> {
        let n = rows.len();
        if n == 0 {
            return Err(LaError::SizeMismatch {
                expected: 0,
                found: 0,
            });
        }
        for row in &rows {
            if row.len() != n {
                return Err(LaError::SizeMismatch {
                    expected: n,
                    found: row.len(),
                });
            }
        }
        Ok(Self { rows })
    }

    /// All-zeros `n x n` matrix.
    #[must_use]
    pub fn zero(ctx: &S::Context, n: usize) -> Self {
        Self {
            rows: (0..n)
                .map(|_| (0..n).map(|_| S::zero(ctx)).collect())
                .collect(),
        }
    }

    /// The `n x n` identity matrix.
    #[must_use]
    pub fn unity(ctx: &S::Context, n: usize) -> Self {
        let mut m = Self::zero(ctx, n);
        for i in 0..n {
            m.rows[i][i] = S::one(ctx);
        }
        m
    }

    /// Side length `N` of this square matrix.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.rows.len()
    }

    /// Borrows a full row.
    #[must_use]
    pub fn row(&self, r: usize) -> &[S] {
        &self.rows[r]
    }

    /// Get a clone of an element with bounds checking.
    #[must_use]
    pub fn get(&self, r: usize, c: usize) -> Option<S> {
        self.rows.get(r).and_then(|row| row.get(c)).cloned()
    }

    /// Set an element with bounds checking. Returns `true` if the index was in-bounds.
    pub fn set(&mut self, r: usize, c: usize, value: S) -> bool {
        if let Some(row) = self.rows.get_mut(r) {
            if let Some(slot) = row.get_mut(c) {
                *slot = value;
                return true;
            }
        }
        false
    }

    /// Swaps two whole rows in place (used by LU's partial pivoting).
    pub fn swap_rows(&mut self, a: usize, b: usize) {
        self.rows.swap(a, b);
    }

    /// `true` iff every entry is finite.
    #[must_use]
    pub fn all_finite(&self) -> bool {
        self.rows.iter().flatten().all(Scalar::is_finite)
    }

    /// Iterates over every entry in row-major order (used by the refinement loop's residual
    /// aggregation).
    pub fn iter_entries(&self) -> impl Iterator<Item = &S> {
        self.rows.iter().flatten()
    }

    /// Row-sum (infinity) norm: the maximum over rows of the sum of absolute values in that row,
    /// each row sum accumulated with Kahan compensation.
    #[must_use]
    pub fn inf_norm(&self) -> S {
        let ctx = self.rows[0][0].context();
        let mut max_row_sum = S::zero(&ctx);
        for row in &self.rows {
            let row_sum = kahan_sum::<S, _>(&ctx, row.iter().map(|x| x.clone().abs()));
            if row_sum.gt(&max_row_sum) {
                max_row_sum = row_sum;
            }
        }
        max_row_sum
    }

    /// Fresh transpose, `out[i][j] = self[j][i]`.
    #[must_use]
    pub fn transpose(&self) -> Self {
        let n = self.dim();
        let mut out = self.clone();
        for i in 0..n {
            for j in 0..n {
                out.rows[i][j] = self.rows[j][i].clone();
            }
        }
        out
    }

    /// Elementwise scalar multiply, producing a fresh matrix.
    #[must_use]
    pub fn multiply_scalar(&self, s: &S) -> Self {
        let mut out = self.clone();
        for row in &mut out.rows {
            for v in row.iter_mut() {
                *v = v.clone() * s.clone();
            }
        }
        out
    }

    /// Matrix-matrix product `self * rhs` (N^3), inner products via Kahan-compensated summation.
    ///
    /// # Errors
    /// Returns [`LaError::SizeMismatch`] if `rhs` is not the same dimension as `self`.
    pub fn multiply_matrix(&self, rhs: &Self) -> Result<Self, LaError> {
        let n = self.dim();
        if rhs.dim() != n {
            return Err(LaError::SizeMismatch {
                expected: n,
                found: rhs.dim(),
            });
        }
        let ctx = self.rows[0][0].context();
        let mut out = Self::zero(&ctx, n);
        for i in 0..n {
            for j in 0..n {
                let terms = (0..n).map(|k| self.rows[i][k].clone() * rhs.rows[k][j].clone());
                out.rows[i][j] = kahan_sum::<S, _>(&ctx, terms);
            }
        }
        Ok(out)
    }

    /// Matrix-vector product `self * v` (N^2): elementwise product into a scratch row, then
    /// Kahan-compensated summation.
    ///
    /// # Errors
    /// Returns [`LaError::SizeMismatch`] if `v`'s length differs from `self`'s dimension.
    pub fn multiply_vector(&self, v: &[S]) -> Result<Vec<S>, LaError> {
        let n = self.dim();
        if v.len() != n {
            return Err(LaError::SizeMismatch {
                expected: n,
                found: v.len(),
            });
        }
        let ctx = self.rows[0][0].context();
        Ok((0..n)
            .map(|i| {
                let terms = (0..n).map(|k| self.rows[i][k].clone() * v[k].clone());
                kahan_sum::<S, _>(&ctx, terms)
            })
            .collect())
    }

    /// Elementwise addition.
    ///
    /// # Errors
    /// Returns [`LaError::SizeMismatch`] if `rhs` is not the same dimension as `self`.
    pub fn add(&self, rhs: &Self) -> Result<Self, LaError> {
        self.zip_elementwise(rhs, |a, b| a + b)
    }

    /// Elementwise subtraction.
    ///
    /// # Errors
    /// Returns [`LaError::SizeMismatch`] if `rhs` is not the same dimension as `self`.
    pub fn subtract(&self, rhs: &Self) -> Result<Self, LaError> {
        self.zip_elementwise(rhs, |a, b| a - b)
    }

    fn zip_elementwise(&self, rhs: &Self, f: impl Fn(S, S) -> S) -> Result<Self, LaError> {
        let n = self.dim();
        if rhs.dim() != n {
            return Err(LaError::SizeMismatch {
                expected: n,
                found: rhs.dim(),
            });
        }
        let mut out = self.clone();
        for i in 0..n {
            for j in 0..n {
                out.rows[i][j] = f(self.rows[i][j].clone(), rhs.rows[i][j].clone());
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_set_bounds_checked() {
        let mut m = Matrix::<f64>::zero(&(), 2);
        assert!(m.set(0, 0, 1.0));
        assert_eq!(m.get(0, 0), Some(1.0));

        assert!(!m.set(2, 0, 1.0));
        assert_eq!(m.get(2, 0), None);
    }

    #[test]
    fn inf_norm_max_row_sum() {
        let m = Matrix::<f64>::from_rows(vec![vec![1.0, -2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(m.inf_norm(), 7.0);
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        let err = Matrix::<f64>::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert_eq!(
            err,
            LaError::SizeMismatch {
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn transpose_swaps_off_diagonal() {
        let m = Matrix::<f64>::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let t = m.transpose();
        assert_eq!(t.get(0, 1), Some(3.0));
        assert_eq!(t.get(1, 0), Some(2.0));
    }

    #[test]
    fn unity_is_multiplicative_identity() {
        let m = Matrix::<f64>::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let i = Matrix::<f64>::unity(&(), 2);
        let product = m.multiply_matrix(&i).unwrap();
        assert_eq!(product, m);
    }

    #[test]
    fn multiply_vector_size_mismatch() {
        let m = Matrix::<f64>::unity(&(), 2);
        let err = m.multiply_vector(&[1.0, 2.0, 3.0]).unwrap_err();
        assert_eq!(
            err,
            LaError::SizeMismatch {
                expected: 2,
                found: 3
            }
        );
    }
}
