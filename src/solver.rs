//! The public solver facade: caches decompositions and drives every exposed operation.

use crate::cholesky::Cholesky;
use crate::lu::Lu;
use crate::matrix::Matrix;
use crate::refine;
use crate::scalar::Scalar;
use crate::{ErrorCode, LaError};

/// Which factorization produced the solver's most recent solution; iterative refinement reuses
/// it rather than re-deriving a factorization of its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LastMethod {
    None,
    Lu,
    Cholesky,
}

/// Solves linear systems, inverts matrices, and computes determinants, norms, and condition
/// numbers for a fixed matrix `A`, caching whatever decomposition its operations need.
///
/// Caches are populated lazily on first use and retained for the instance's lifetime; there is
/// no "invalidate" operation. `LU` and `Cholesky` failures are independent and sticky: once
/// either factorization fails, every subsequent call in that family fails immediately without
/// re-attempting it. `error_code()` is reset at the start of every LU-family solve (so a stale
/// Cholesky failure cannot mask a working LU) but **not** at the start of a Cholesky-family
/// solve — this asymmetry is carried over deliberately, not fixed; see `DESIGN.md`.
pub struct LinearSolver<S: Scalar> {
    a: Matrix<S>,
    ctx: S::Context,
    need_to_scale: bool,

    lu: Option<Lu<S>>,
    lu_error: bool,
    chol: Option<Cholesky<S>>,
    chol_error: bool,
    error_code: ErrorCode,

    determinant: Option<S>,
    norm: Option<S>,
    inversion: Option<Matrix<S>>,

    last_method: LastMethod,
}

impl<S: Scalar> LinearSolver<S> {
    fn new_with(ctx: S::Context, a: Matrix<S>, need_to_scale: bool) -> Result<Self, LaError> {
        if !a.all_finite() {
            return Self::first_non_finite(&a);
        }
        Ok(Self {
            a,
            ctx,
            need_to_scale,
            lu: None,
            lu_error: false,
            chol: None,
            chol_error: false,
            error_code: ErrorCode::Ok,
            determinant: None,
            norm: None,
            inversion: None,
            last_method: LastMethod::None,
        })
    }

    fn first_non_finite(a: &Matrix<S>) -> Result<Self, LaError> {
        let n = a.dim();
        for r in 0..n {
            for c in 0..n {
                if !a.get(r, c).expect("in bounds").is_finite() {
                    return Err(LaError::NotFinite { row: r, col: c });
                }
            }
        }
        unreachable!("all_finite() returned false but no entry failed is_finite()")
    }

    /// Validates `b`'s shape and finiteness against this solver's dimension.
    fn check_vec(&self, b: &[S]) -> Result<(), LaError> {
        let n = self.a.dim();
        if b.len() != n {
            return Err(LaError::SizeMismatch {
                expected: n,
                found: b.len(),
            });
        }
        for (i, v) in b.iter().enumerate() {
            if !v.is_finite() {
                return Err(LaError::NotFinite { row: i, col: 0 });
            }
        }
        Ok(())
    }

    fn check_matrix(&self, b: &Matrix<S>) -> Result<(), LaError> {
        let n = self.a.dim();
        if b.dim() != n {
            return Err(LaError::SizeMismatch {
                expected: n,
                found: b.dim(),
            });
        }
        if !b.all_finite() {
            for r in 0..n {
                for c in 0..n {
                    if !b.get(r, c).expect("in bounds").is_finite() {
                        return Err(LaError::NotFinite { row: r, col: c });
                    }
                }
            }
        }
        Ok(())
    }

    fn ensure_lu(&mut self) -> Result<(), LaError> {
        if self.lu_error {
            return Err(LaError::NonInvertible { pivot_col: 0 });
        }
        if self.lu.is_none() {
            match Lu::factor(&self.ctx, &self.a, self.need_to_scale) {
                Ok(lu) => self.lu = Some(lu),
                Err(e) => {
                    self.lu_error = true;
                    self.error_code = ErrorCode::NonInvertible;
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    fn ensure_chol(&mut self) -> Result<(), LaError> {
        if self.chol_error {
            return Err(LaError::NonSpd { pivot_col: 0 });
        }
        if self.chol.is_none() {
            match Cholesky::factor(&self.ctx, &self.a) {
                Ok(chol) => self.chol = Some(chol),
                Err(e) => {
                    self.chol_error = true;
                    self.error_code = match e {
                        LaError::Asymmetric { .. } => ErrorCode::Asymmetric,
                        _ => ErrorCode::NonSpd,
                    };
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    /// Solves `A x = b` via LU decomposition (factoring on first use, reusing the cache after).
    ///
    /// # Errors
    /// Returns [`LaError::SizeMismatch`]/[`LaError::NotFinite`] for a malformed `b`, or whatever
    /// [`Lu::factor`]/[`Lu::solve_vec`] reports.
    pub fn solve_lu(&mut self, b: &[S]) -> Result<Vec<S>, LaError> {
        self.error_code = ErrorCode::Ok;
        self.check_vec(b)?;
        self.ensure_lu()?;
        let x = self.lu.as_ref().expect("just ensured").solve_vec(b)?;
        self.last_method = LastMethod::Lu;
        Ok(x)
    }

    /// Solves `A x = b` via LU, then applies iterative refinement.
    ///
    /// # Errors
    /// As [`Self::solve_lu`].
    pub fn solve_lu_accurately(&mut self, b: &[S]) -> Result<Vec<S>, LaError> {
        let x0 = self.solve_lu(b)?;
        let ctx = self.ctx.clone();
        let a = self.a.clone();
        refine::refine_vector(&ctx, &a, b, x0, |r| self.solve_correction_vec(r))
    }

    /// Solves `A delta = r` against whichever factorization [`Self::last_method`] names,
    /// reusing the cache rather than deriving a fresh decomposition. Iterative refinement is the
    /// only caller.
    fn solve_correction_vec(&self, r: &[S]) -> Result<Vec<S>, LaError> {
        match self.last_method {
            LastMethod::Lu => self.lu.as_ref().expect("lu solve latched LastMethod::Lu").solve_vec(r),
            LastMethod::Cholesky => {
                Ok(self.chol.as_ref().expect("cholesky solve latched LastMethod::Cholesky").solve_vec(r))
            }
            LastMethod::None => unreachable!("refinement only runs after a solve latches last_method"),
        }
    }

    /// Matrix-right-hand-side counterpart of [`Self::solve_correction_vec`]. Only LU reaches
    /// this path today (there is no `solve_cholesky_matrix` in §6's operation set), but it still
    /// routes through `last_method` rather than assuming LU directly, so a future Cholesky
    /// matrix solve would compose with refinement for free.
    fn solve_correction_matrix(&self, r: &Matrix<S>) -> Result<Matrix<S>, LaError> {
        match self.last_method {
            LastMethod::Lu => {
                let mut copy = r.clone();
                self.lu
                    .as_ref()
                    .expect("matrix solve latched LastMethod::Lu")
                    .solve_matrix_inplace(&mut copy)?;
                Ok(copy)
            }
            LastMethod::Cholesky | LastMethod::None => {
                unreachable!("solve_matrix is the only entry point and always latches LastMethod::Lu")
            }
        }
    }

    /// Solves `A x = b` via Cholesky decomposition (SPD only).
    ///
    /// # Errors
    /// Returns [`LaError::SizeMismatch`]/[`LaError::NotFinite`] for a malformed `b`, or whatever
    /// [`Cholesky::factor`] reports.
    pub fn solve_cholesky(&mut self, b: &[S]) -> Result<Vec<S>, LaError> {
        self.check_vec(b)?;
        self.ensure_chol()?;
        let x = self.chol.as_ref().expect("just ensured").solve_vec(b);
        self.last_method = LastMethod::Cholesky;
        Ok(x)
    }

    /// Solves `A x = b` via Cholesky, then applies iterative refinement.
    ///
    /// # Errors
    /// As [`Self::solve_cholesky`].
    pub fn solve_cholesky_accurately(&mut self, b: &[S]) -> Result<Vec<S>, LaError> {
        let x0 = self.solve_cholesky(b)?;
        let ctx = self.ctx.clone();
        let a = self.a.clone();
        refine::refine_vector(&ctx, &a, b, x0, |r| self.solve_correction_vec(r))
    }

    /// Solves `A X = B` for a square right-hand side via LU. `b` is not mutated.
    ///
    /// # Errors
    /// As [`Self::solve_lu`].
    pub fn solve_matrix(&mut self, b: &Matrix<S>) -> Result<Matrix<S>, LaError> {
        self.error_code = ErrorCode::Ok;
        self.check_matrix(b)?;
        self.ensure_lu()?;
        let mut copy = b.clone();
        self.lu
            .as_ref()
            .expect("just ensured")
            .solve_matrix_inplace(&mut copy)?;
        self.last_method = LastMethod::Lu;
        Ok(copy)
    }

    /// Solves `A X = B` via LU, then applies iterative refinement.
    ///
    /// # Errors
    /// As [`Self::solve_matrix`].
    pub fn solve_matrix_accurately(&mut self, b: &Matrix<S>) -> Result<Matrix<S>, LaError> {
        let x0 = self.solve_matrix(b)?;
        let ctx = self.ctx.clone();
        let a = self.a.clone();
        refine::refine_matrix(&ctx, &a, b, x0, |r| self.solve_correction_matrix(r))
    }

    /// `A^-1`, computed by solving `A X = I`.
    ///
    /// # Errors
    /// As [`Self::solve_matrix`].
    pub fn inverse(&mut self) -> Result<Matrix<S>, LaError> {
        if let Some(inv) = &self.inversion {
            return Ok(inv.clone());
        }
        let identity = Matrix::<S>::unity(&self.ctx, self.a.dim());
        let inv = self.solve_matrix(&identity)?;
        self.inversion = Some(inv.clone());
        Ok(inv)
    }

    /// `A^-1`, refined via iterative refinement after the initial solve.
    ///
    /// # Errors
    /// As [`Self::solve_matrix_accurately`].
    pub fn inverse_accurately(&mut self) -> Result<Matrix<S>, LaError> {
        let identity = Matrix::<S>::unity(&self.ctx, self.a.dim());
        let inv = self.solve_matrix_accurately(&identity)?;
        self.inversion = Some(inv.clone());
        Ok(inv)
    }

    /// Fresh transpose of `A`.
    #[must_use]
    pub fn transpose(&self) -> Matrix<S> {
        self.a.transpose()
    }

    /// Fresh identity matrix of `A`'s dimension.
    #[must_use]
    pub fn unity(&self) -> Matrix<S> {
        Matrix::<S>::unity(&self.ctx, self.a.dim())
    }

    /// `A * rhs`.
    ///
    /// # Errors
    /// Returns [`LaError::SizeMismatch`] if `rhs`'s dimension disagrees with `A`'s.
    pub fn multiply_matrix(&self, rhs: &Matrix<S>) -> Result<Matrix<S>, LaError> {
        self.a.multiply_matrix(rhs)
    }

    /// `A * v`.
    ///
    /// # Errors
    /// Returns [`LaError::SizeMismatch`] if `v`'s length disagrees with `A`'s dimension.
    pub fn multiply_vector(&self, v: &[S]) -> Result<Vec<S>, LaError> {
        self.a.multiply_vector(v)
    }

    /// `s * A`, elementwise.
    #[must_use]
    pub fn multiply_scalar(&self, s: &S) -> Matrix<S> {
        self.a.multiply_scalar(s)
    }

    /// `A + rhs`, elementwise.
    ///
    /// # Errors
    /// Returns [`LaError::SizeMismatch`] if `rhs`'s dimension disagrees with `A`'s.
    pub fn add(&self, rhs: &Matrix<S>) -> Result<Matrix<S>, LaError> {
        self.a.add(rhs)
    }

    /// `A - rhs`, elementwise.
    ///
    /// # Errors
    /// Returns [`LaError::SizeMismatch`] if `rhs`'s dimension disagrees with `A`'s.
    pub fn subtract(&self, rhs: &Matrix<S>) -> Result<Matrix<S>, LaError> {
        self.a.subtract(rhs)
    }

    /// `det(A)`, memoized. `NonInvertible` converts to `S::zero()` rather than surfacing as an
    /// error: this is the one operation where a failed LU factorization yields a number.
    pub fn determinant(&mut self) -> S {
        if let Some(d) = &self.determinant {
            return d.clone();
        }
        let d = match self.ensure_lu() {
            Ok(()) => self.lu.as_ref().expect("just ensured").det(),
            Err(_) => S::zero(&self.ctx),
        };
        self.determinant = Some(d.clone());
        d
    }

    /// Row-sum (infinity) norm of `A`, memoized.
    pub fn norm(&mut self) -> S {
        if let Some(n) = &self.norm {
            return n.clone();
        }
        let n = self.a.inf_norm();
        self.norm = Some(n.clone());
        n
    }

    /// Condition number `norm(A) * norm(A^-1)`, reported as `f64` regardless of backend.
    /// `+infinity` when `A` is not invertible.
    pub fn cond(&mut self) -> f64 {
        let norm_a = self.norm().to_f64();
        match self.inverse() {
            Ok(inv) => norm_a * inv.inf_norm().to_f64(),
            Err(_) => f64::INFINITY,
        }
    }

    /// The last latched factorization-failure state. Reset to [`ErrorCode::Ok`] at the start of
    /// every LU-family solve but not at the start of a Cholesky-family solve (see the type-level
    /// documentation).
    #[must_use]
    pub fn error_code(&self) -> ErrorCode {
        self.error_code
    }
}

impl LinearSolver<f64> {
    /// Builds a solver over an `f64` matrix.
    ///
    /// # Errors
    /// Returns [`LaError::NotFinite`] if `a` contains a non-finite entry.
    pub fn new(a: Matrix<f64>, need_to_scale: bool) -> Result<Self, LaError> {
        Self::new_with((), a, need_to_scale)
    }
}

impl LinearSolver<crate::scalar::ExtendedFloat> {
    /// Builds a solver over an [`crate::scalar::ExtendedFloat`] matrix.
    ///
    /// # Errors
    /// Returns [`LaError::NotFinite`] if `a` contains a non-finite entry.
    pub fn new(
        a: Matrix<crate::scalar::ExtendedFloat>,
        need_to_scale: bool,
    ) -> Result<Self, LaError> {
        Self::new_with((), a, need_to_scale)
    }
}

impl LinearSolver<crate::scalar::DecimalFloat> {
    /// Builds a solver over a [`crate::scalar::DecimalFloat`] matrix under the given precision
    /// context.
    ///
    /// # Errors
    /// Returns [`LaError::NotFinite`] if `a` contains a non-finite entry.
    pub fn with_context(
        ctx: crate::scalar::DecimalContext,
        a: Matrix<crate::scalar::DecimalFloat>,
        need_to_scale: bool,
    ) -> Result<Self, LaError> {
        Self::new_with(ctx, a, need_to_scale)
    }
}
