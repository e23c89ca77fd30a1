//! Solve a 3x3 linear system via LU factorization (with pivoting).

use la_precise::prelude::*;

fn main() -> Result<(), LaError> {
    // This system requires pivoting (a[0][0] = 0), so it's a good LU demo.
    let a = Matrix::from_rows(vec![
        vec![0.0, 1.0, 1.0],
        vec![1.0, 0.0, 1.0],
        vec![1.0, 1.0, 0.0],
    ])?;
    let b = [5.0, 4.0, 3.0];

    let mut solver = LinearSolver::new(a, false)?;
    let x = solver.solve_lu(&b)?;

    println!("x = [{:.6}, {:.6}, {:.6}]", x[0], x[1], x[2]);
    Ok(())
}
