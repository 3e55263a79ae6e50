//! Small dense linear algebra for the implicit-linear stepper.
//!
//! Matrices are row-major `&[f64]` slices of length `dim * dim`. The 2×2
//! case is solved by the closed-form inverse so the circuit examples
//! reproduce the original arithmetic bit for bit; anything larger goes
//! through nalgebra's LU with partial pivoting.

use crate::error::StepError;
use nalgebra::{DMatrix, DVector};

/// Inverts a `dim × dim` row-major matrix.
///
/// Fails with `SingularSystem` when `|det| <= singular_threshold`; a
/// near-singular step matrix is never regularized or retried.
pub fn invert(a: &[f64], dim: usize, singular_threshold: f64) -> Result<Vec<f64>, StepError> {
    debug_assert_eq!(a.len(), dim * dim);

    if dim == 2 {
        let det = a[0] * a[3] - a[1] * a[2];
        if det.abs() <= singular_threshold {
            return Err(StepError::SingularSystem {
                determinant: det.abs(),
                threshold: singular_threshold,
            });
        }
        return Ok(vec![
            a[3] / det,
            (-1.0 * a[1]) / det,
            (-1.0 * a[2]) / det,
            a[0] / det,
        ]);
    }

    let matrix = DMatrix::from_row_slice(dim, dim, a);
    let det = matrix.determinant();
    if det.abs() <= singular_threshold {
        return Err(StepError::SingularSystem {
            determinant: det.abs(),
            threshold: singular_threshold,
        });
    }
    let inverse = matrix
        .try_inverse()
        .ok_or(StepError::SingularSystem {
            determinant: det.abs(),
            threshold: singular_threshold,
        })?;

    let mut out = vec![0.0; dim * dim];
    for i in 0..dim {
        for j in 0..dim {
            out[i * dim + j] = inverse[(i, j)];
        }
    }
    Ok(out)
}

/// Multiplies a `dim × dim` row-major matrix by a vector.
pub fn multiply(a: &[f64], x: &[f64], dim: usize) -> Vec<f64> {
    debug_assert_eq!(a.len(), dim * dim);
    debug_assert_eq!(x.len(), dim);

    let mut out = vec![0.0; dim];
    for r in 0..dim {
        let mut accum = 0.0;
        for c in 0..dim {
            accum += a[r * dim + c] * x[c];
        }
        out[r] = accum;
    }
    out
}

/// Solves A·x = b for a `dim × dim` row-major A.
///
/// For dim 2 this is invert-then-multiply, matching the circuit examples
/// exactly. For other dimensions it solves directly via LU rather than
/// materializing the inverse.
pub fn solve(a: &[f64], b: &[f64], dim: usize, singular_threshold: f64) -> Result<Vec<f64>, StepError> {
    debug_assert_eq!(b.len(), dim);

    if dim == 2 {
        let inverse = invert(a, 2, singular_threshold)?;
        return Ok(multiply(&inverse, b, 2));
    }

    let matrix = DMatrix::from_row_slice(dim, dim, a);
    let det = matrix.determinant();
    if det.abs() <= singular_threshold {
        return Err(StepError::SingularSystem {
            determinant: det.abs(),
            threshold: singular_threshold,
        });
    }
    let rhs = DVector::from_column_slice(b);
    matrix
        .lu()
        .solve(&rhs)
        .map(|v| v.iter().cloned().collect())
        .ok_or(StepError::SingularSystem {
            determinant: det.abs(),
            threshold: singular_threshold,
        })
}

#[cfg(test)]
mod tests {
    use super::{invert, multiply, solve};
    use crate::error::StepError;

    #[test]
    fn invert_round_trips_through_multiply() {
        let m = [3.0, 1.0, 2.0, 4.0];
        let v = [0.5, -2.0];

        let mv = multiply(&m, &v, 2);
        let inverse = invert(&m, 2, 1e-10).expect("matrix is well-conditioned");
        let back = multiply(&inverse, &mv, 2);

        assert!((back[0] - v[0]).abs() < 1e-12);
        assert!((back[1] - v[1]).abs() < 1e-12);
    }

    #[test]
    fn invert_rejects_singular_matrix() {
        let m = [1.0, 2.0, 2.0, 4.0];
        let err = invert(&m, 2, 1e-10).expect_err("rank-1 matrix must not invert");
        assert!(matches!(err, StepError::SingularSystem { .. }));
    }

    #[test]
    fn invert_rejects_near_singular_matrix_within_threshold() {
        // det = 1e-13, below the 1e-10 threshold.
        let m = [1.0, 1.0, 1.0, 1.0 + 1e-13];
        let err = invert(&m, 2, 1e-10).expect_err("determinant is inside the threshold");
        match err {
            StepError::SingularSystem { determinant, .. } => assert!(determinant <= 1e-10),
            other => panic!("expected SingularSystem, got {other:?}"),
        }
    }

    #[test]
    fn solve_matches_closed_form_for_dim_2() {
        let a = [2.0, 1.0, 1.0, 3.0];
        let b = [5.0, 10.0];

        let x = solve(&a, &b, 2, 1e-10).expect("system is well-conditioned");

        // A·x = b: 2x0 + x1 = 5, x0 + 3x1 = 10 -> x = (1, 3).
        assert!((x[0] - 1.0).abs() < 1e-12);
        assert!((x[1] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn solve_handles_general_dimension_via_lu() {
        let a = [
            2.0, 0.0, 0.0, //
            0.0, 4.0, 0.0, //
            0.0, 0.0, 8.0,
        ];
        let b = [2.0, 8.0, 24.0];

        let x = solve(&a, &b, 3, 1e-10).expect("diagonal system is well-conditioned");

        assert!((x[0] - 1.0).abs() < 1e-12);
        assert!((x[1] - 2.0).abs() < 1e-12);
        assert!((x[2] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn solve_rejects_singular_general_system() {
        let a = [
            1.0, 2.0, 3.0, //
            2.0, 4.0, 6.0, //
            0.0, 0.0, 1.0,
        ];
        let b = [1.0, 2.0, 3.0];

        let err = solve(&a, &b, 3, 1e-10).expect_err("rank-deficient system must not solve");
        assert!(matches!(err, StepError::SingularSystem { .. }));
    }
}
