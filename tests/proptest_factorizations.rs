//! Property-based tests for the `LinearSolver` LU/Cholesky factorization paths.
//!
//! These tests construct matrices from known factors so we have a reliable oracle for
//! determinant and solve behavior.

use approx::assert_abs_diff_eq;
use pastey::paste;
use proptest::collection::vec as pvec;
use proptest::prelude::*;

use la_precise::prelude::*;

fn small_f64() -> impl Strategy<Value = f64> {
    (-1000i16..=1000i16).prop_map(|x| f64::from(x) / 10.0)
}

fn small_factor_entry() -> impl Strategy<Value = f64> {
    // Keep entries small so constructed matrices are reasonably conditioned.
    (-50i16..=50i16).prop_map(|x| f64::from(x) / 100.0)
}

fn positive_diag_entry() -> impl Strategy<Value = f64> {
    // Strictly positive diagonal, comfortably clear of zero.
    (1i16..=20i16).prop_map(|x| f64::from(x) / 10.0)
}

fn nonzero_diag_entry() -> impl Strategy<Value = f64> {
    // Strictly non-zero diagonal with a margin from 0.
    prop_oneof![(-20i16..=-1i16), (1i16..=20i16)].prop_map(|x| f64::from(x) / 10.0)
}

fn square(n: usize, entry: impl Strategy<Value = f64> + Clone) -> impl Strategy<Value = Vec<Vec<f64>>> {
    pvec(pvec(entry, n), n)
}

macro_rules! gen_factorization_proptests {
    ($d:literal) => {
        paste! {
            proptest! {
                #![proptest_config(ProptestConfig::with_cases(64))]

                #[test]
                fn [<cholesky_det_and_solve_match_constructed_factors_ $d d>](
                    l_raw in square($d, small_factor_entry()),
                    d_diag in pvec(positive_diag_entry(), $d),
                    x_true in pvec(small_f64(), $d),
                ) {
                    // Construct A = L * diag(D) * L^T, where L is unit-lower-triangular.
                    let mut l = vec![vec![0.0f64; $d]; $d];
                    for i in 0..$d {
                        for j in 0..$d {
                            l[i][j] = if i == j {
                                1.0
                            } else if i > j {
                                l_raw[i][j]
                            } else {
                                0.0
                            };
                        }
                    }

                    let mut a_rows = vec![vec![0.0f64; $d]; $d];
                    for i in 0..$d {
                        for j in 0..=i {
                            let mut sum = 0.0;
                            // L[j][k] is zero for k > j.
                            for k in 0..=j {
                                sum = (l[i][k] * d_diag[k]).mul_add(l[j][k], sum);
                            }
                            a_rows[i][j] = sum;
                            a_rows[j][i] = sum;
                        }
                    }

                    let expected_det: f64 = d_diag.iter().product();

                    let mut b = vec![0.0f64; $d];
                    for i in 0..$d {
                        let mut sum = 0.0;
                        for j in 0..$d {
                            sum = a_rows[i][j].mul_add(x_true[j], sum);
                        }
                        b[i] = sum;
                    }

                    let a = Matrix::<f64>::from_rows(a_rows).unwrap();
                    let mut solver = LinearSolver::new(a, false).unwrap();

                    assert_abs_diff_eq!(solver.determinant(), expected_det, epsilon = 1e-6);

                    let x = solver.solve_cholesky(&b).unwrap();
                    for i in 0..$d {
                        assert_abs_diff_eq!(x[i], x_true[i], epsilon = 1e-6);
                    }
                }

                #[test]
                fn [<lu_det_and_solve_match_constructed_factors_no_perm_ $d d>](
                    l_raw in square($d, small_factor_entry()),
                    u_raw in square($d, small_factor_entry()),
                    u_diag in pvec(nonzero_diag_entry(), $d),
                    x_true in pvec(small_f64(), $d),
                ) {
                    // Construct A = L * U, where L is unit-lower-triangular and U is upper-triangular,
                    // chosen so partial pivoting never needs to swap rows (the diagonal of U already
                    // dominates the column below it once combined with L's small off-diagonal entries).
                    let mut l = vec![vec![0.0f64; $d]; $d];
                    for i in 0..$d {
                        for j in 0..$d {
                            l[i][j] = if i == j {
                                1.0
                            } else if i > j {
                                l_raw[i][j]
                            } else {
                                0.0
                            };
                        }
                    }

                    let mut u = vec![vec![0.0f64; $d]; $d];
                    for i in 0..$d {
                        for j in 0..$d {
                            u[i][j] = if i == j {
                                u_diag[i]
                            } else if i < j {
                                u_raw[i][j]
                            } else {
                                0.0
                            };
                        }
                    }

                    let mut a_rows = vec![vec![0.0f64; $d]; $d];
                    for i in 0..$d {
                        for j in 0..$d {
                            let mut sum = 0.0;
                            // L[i][k] is zero for k > i; U[k][j] is zero for k > j.
                            let k_max = if i < j { i } else { j };
                            for k in 0..=k_max {
                                sum = l[i][k].mul_add(u[k][j], sum);
                            }
                            a_rows[i][j] = sum;
                        }
                    }

                    let expected_det: f64 = u_diag.iter().product();

                    let mut b = vec![0.0f64; $d];
                    for i in 0..$d {
                        let mut sum = 0.0;
                        for j in 0..$d {
                            sum = a_rows[i][j].mul_add(x_true[j], sum);
                        }
                        b[i] = sum;
                    }

                    let a = Matrix::<f64>::from_rows(a_rows).unwrap();
                    let mut solver = LinearSolver::new(a, false).unwrap();

                    assert_abs_diff_eq!(solver.determinant(), expected_det, epsilon = 1e-6);

                    let x = solver.solve_lu(&b).unwrap();
                    for i in 0..$d {
                        assert_abs_diff_eq!(x[i], x_true[i], epsilon = 1e-6);
                    }
                }

                #[test]
                fn [<lu_det_sign_flips_under_a_single_row_swap_ $d d>](
                    l_raw in square($d, small_factor_entry()),
                    u_raw in square($d, small_factor_entry()),
                    u_diag in pvec(nonzero_diag_entry(), $d),
                    x_true in pvec(small_f64(), $d),
                ) {
                    // Construct A = P^{-1} * L * U, where P swaps the first two rows.
                    // This ensures det(A) has an extra sign flip vs det(L*U).
                    prop_assume!($d >= 2);

                    let mut l = vec![vec![0.0f64; $d]; $d];
                    for i in 0..$d {
                        for j in 0..$d {
                            l[i][j] = if i == j {
                                1.0
                            } else if i > j {
                                l_raw[i][j]
                            } else {
                                0.0
                            };
                        }
                    }

                    let mut u = vec![vec![0.0f64; $d]; $d];
                    for i in 0..$d {
                        for j in 0..$d {
                            u[i][j] = if i == j {
                                u_diag[i]
                            } else if i < j {
                                u_raw[i][j]
                            } else {
                                0.0
                            };
                        }
                    }

                    let mut lu_rows = vec![vec![0.0f64; $d]; $d];
                    for i in 0..$d {
                        for j in 0..$d {
                            let mut sum = 0.0;
                            let k_max = if i < j { i } else { j };
                            for k in 0..=k_max {
                                sum = l[i][k].mul_add(u[k][j], sum);
                            }
                            lu_rows[i][j] = sum;
                        }
                    }

                    // Apply P^{-1}: swap rows 0 and 1.
                    let mut a_rows = lu_rows;
                    a_rows.swap(0, 1);

                    let expected_det: f64 = -u_diag.iter().product::<f64>();

                    let mut b = vec![0.0f64; $d];
                    for i in 0..$d {
                        let mut sum = 0.0;
                        for j in 0..$d {
                            sum = a_rows[i][j].mul_add(x_true[j], sum);
                        }
                        b[i] = sum;
                    }

                    let a = Matrix::<f64>::from_rows(a_rows).unwrap();
                    let mut solver = LinearSolver::new(a, false).unwrap();

                    assert_abs_diff_eq!(solver.determinant(), expected_det, epsilon = 1e-6);

                    let x = solver.solve_lu(&b).unwrap();
                    for i in 0..$d {
                        assert_abs_diff_eq!(x[i], x_true[i], epsilon = 1e-6);
                    }
                }
            }
        }
    };
}

gen_factorization_proptests!(2);
gen_factorization_proptests!(3);
gen_factorization_proptests!(4);
gen_factorization_proptests!(5);
