//! Small dense solvers for the 2×2 and 3×3 systems behind the image geometry.
//!
//! The closed-form inverses are exact-zero determinant checks; the general
//! solver uses Gaussian elimination with row pivoting and rejects any pivot
//! whose magnitude falls below [`PIVOT_EPS`].

use crate::error::{ResampleError, Result};
use nalgebra::{Matrix2, Matrix3, SMatrix, SVector};

/// Smallest pivot magnitude accepted by [`solve_linear`].
pub const PIVOT_EPS: f64 = 1e-9;

/// Inverse of a 2×2 matrix via the adjugate.
pub fn invert2x2(m: &Matrix2<f64>) -> Result<Matrix2<f64>> {
    let (a, b) = (m[(0, 0)], m[(0, 1)]);
    let (c, d) = (m[(1, 0)], m[(1, 1)]);
    let det = a * d - b * c;
    if det == 0.0 {
        return Err(ResampleError::SingularMatrix);
    }
    let inv = 1.0 / det;
    Ok(Matrix2::new(d * inv, -b * inv, -c * inv, a * inv))
}

/// Inverse of a 3×3 matrix via cofactor expansion along the first row.
pub fn invert3x3(m: &Matrix3<f64>) -> Result<Matrix3<f64>> {
    let (a, b, c) = (m[(0, 0)], m[(0, 1)], m[(0, 2)]);
    let (d, e, f) = (m[(1, 0)], m[(1, 1)], m[(1, 2)]);
    let (g, h, i) = (m[(2, 0)], m[(2, 1)], m[(2, 2)]);

    let det = a * (e * i - f * h) - b * (d * i - f * g) + c * (d * h - e * g);
    if det == 0.0 {
        return Err(ResampleError::SingularMatrix);
    }
    let inv = 1.0 / det;
    Ok(Matrix3::new(
        (e * i - f * h) * inv,
        -(b * i - c * h) * inv,
        (b * f - c * e) * inv,
        -(d * i - f * g) * inv,
        (a * i - c * g) * inv,
        -(a * f - c * d) * inv,
        (d * h - e * g) * inv,
        -(a * h - b * g) * inv,
        (a * e - b * d) * inv,
    ))
}

/// Solve `A · x = b` by Gaussian elimination with partial pivoting.
///
/// Fails with [`ResampleError::SingularMatrix`] when the best pivot left in a
/// column is smaller than [`PIVOT_EPS`] in magnitude.
pub fn solve_linear<const D: usize>(
    a: &SMatrix<f64, D, D>,
    b: &SVector<f64, D>,
) -> Result<SVector<f64, D>> {
    let mut m = *a;
    let mut rhs = *b;

    for col in 0..D {
        let mut pivot_row = col;
        let mut pivot_abs = m[(col, col)].abs();
        for row in (col + 1)..D {
            let v = m[(row, col)].abs();
            if v > pivot_abs {
                pivot_row = row;
                pivot_abs = v;
            }
        }
        if pivot_abs.is_nan() || pivot_abs < PIVOT_EPS {
            return Err(ResampleError::SingularMatrix);
        }
        if pivot_row != col {
            m.swap_rows(pivot_row, col);
            rhs.swap_rows(pivot_row, col);
        }

        let pivot = m[(col, col)];
        for row in (col + 1)..D {
            let ratio = m[(row, col)] / pivot;
            if ratio == 0.0 {
                continue;
            }
            for k in col..D {
                m[(row, k)] -= ratio * m[(col, k)];
            }
            rhs[row] -= ratio * rhs[col];
        }
    }

    let mut x = SVector::<f64, D>::zeros();
    for row in (0..D).rev() {
        let mut sum = rhs[row];
        for k in (row + 1)..D {
            // 0 · inf would turn an unrelated row into NaN.
            if m[(row, k)] != 0.0 {
                sum -= m[(row, k)] * x[k];
            }
        }
        x[row] = sum / m[(row, row)];
    }
    Ok(x)
}
