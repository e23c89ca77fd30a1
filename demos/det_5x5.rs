//! Compute the determinant of a 5x5 matrix via explicit LU factorization.

use la_precise::prelude::*;

fn main() -> Result<(), LaError> {
    // 5x5 matrix with zeros on diagonal and ones elsewhere (J - I).
    // det(J - I) = (D - 1) * (-1)^(D-1) = 4 for D=5.
    let a = Matrix::from_rows(vec![
        vec![0.0, 1.0, 1.0, 1.0, 1.0],
        vec![1.0, 0.0, 1.0, 1.0, 1.0],
        vec![1.0, 1.0, 0.0, 1.0, 1.0],
        vec![1.0, 1.0, 1.0, 0.0, 1.0],
        vec![1.0, 1.0, 1.0, 1.0, 0.0],
    ])?;

    let mut solver = LinearSolver::new(a, false)?;
    println!("det = {}", solver.determinant());
    Ok(())
}
