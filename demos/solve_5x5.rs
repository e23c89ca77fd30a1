//! Solve a 5x5 linear system via LU factorization (with pivoting).

use la_precise::prelude::*;

fn main() -> Result<(), LaError> {
    // This system requires pivoting (a[0][0] = 0), so it's a good LU demo.
    // A = J - I: zeros on diagonal, ones elsewhere.
    let a = Matrix::from_rows(vec![
        vec![0.0, 1.0, 1.0, 1.0, 1.0],
        vec![1.0, 0.0, 1.0, 1.0, 1.0],
        vec![1.0, 1.0, 0.0, 1.0, 1.0],
        vec![1.0, 1.0, 1.0, 0.0, 1.0],
        vec![1.0, 1.0, 1.0, 1.0, 0.0],
    ])?;

    // Choose x = [1, 2, 3, 4, 5]. Then b = A x = [14, 13, 12, 11, 10].
    let b = [14.0, 13.0, 12.0, 11.0, 10.0];

    let mut solver = LinearSolver::new(a, false)?;
    let x = solver.solve_lu(&b)?;

    println!("x = {x:?}");
    Ok(())
}
