//! Compute the determinant of a 3x3 matrix via explicit LU factorization.

use la_precise::prelude::*;

fn main() -> Result<(), LaError> {
    let a = Matrix::from_rows(vec![
        vec![1.0, 2.0, 3.0],
        vec![0.0, 4.0, 5.0],
        vec![1.0, 0.0, 6.0],
    ])?;

    let mut solver = LinearSolver::new(a, false)?;
    println!("det = {}", solver.determinant());
    Ok(())
}
