//! Affine mapping between continuous grid indices and physical points.
//!
//! For origin `o`, spacing `s` and row-major direction cosines `D`:
//!
//! ```text
//! point = D · diag(s) · index + o
//! ```
//!
//! The inverse solves the same composed system `D · diag(s)` for `index`, so
//! both directions agree for any non-singular `D`, orthonormal or not.

use crate::error::{ResampleError, Result};
use crate::linalg::{invert2x2, invert3x3, solve_linear};
use nalgebra::{Matrix2, Matrix3, SMatrix, SVector};

/// Physical ↔ index transform for a `D`-dimensional grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineGeometry<const D: usize> {
    origin: SVector<f64, D>,
    spacing: SVector<f64, D>,
    direction: SMatrix<f64, D, D>,
    // D · diag(spacing)
    scaled: SMatrix<f64, D, D>,
}

impl<const D: usize> AffineGeometry<D> {
    /// Build a geometry, rejecting non-positive or non-finite spacing and
    /// non-finite origin/direction entries.
    pub fn new(
        origin: SVector<f64, D>,
        spacing: SVector<f64, D>,
        direction: SMatrix<f64, D, D>,
    ) -> Result<Self> {
        validate_spacing(spacing.as_slice())?;
        validate_finite("origin", origin.as_slice())?;
        validate_finite("direction", direction.as_slice())?;
        let scaled = direction * SMatrix::<f64, D, D>::from_diagonal(&spacing);
        Ok(Self {
            origin,
            spacing,
            direction,
            scaled,
        })
    }

    /// Build from plain slices; `direction` is row-major with `D * D` entries.
    pub fn from_slices(origin: &[f64], spacing: &[f64], direction: &[f64]) -> Result<Self> {
        check_len(D, origin.len())?;
        check_len(D, spacing.len())?;
        check_len(D * D, direction.len())?;
        Self::new(
            SVector::from_column_slice(origin),
            SVector::from_column_slice(spacing),
            SMatrix::from_row_slice(direction),
        )
    }

    /// Unit spacing, zero origin, identity direction.
    pub fn identity() -> Self {
        let spacing = SVector::repeat(1.0);
        Self {
            origin: SVector::zeros(),
            spacing,
            direction: SMatrix::identity(),
            scaled: SMatrix::identity(),
        }
    }

    pub fn origin(&self) -> &SVector<f64, D> {
        &self.origin
    }

    pub fn spacing(&self) -> &SVector<f64, D> {
        &self.spacing
    }

    pub fn direction(&self) -> &SMatrix<f64, D, D> {
        &self.direction
    }

    #[inline]
    pub fn index_to_physical(&self, index: &SVector<f64, D>) -> SVector<f64, D> {
        self.scaled * index + self.origin
    }

    /// Continuous index of a physical point.
    ///
    /// Fails with [`ResampleError::SingularMatrix`] when the composed system
    /// cannot be solved.
    #[inline]
    pub fn physical_to_index(&self, point: &SVector<f64, D>) -> Result<SVector<f64, D>> {
        solve_linear(&self.scaled, &(point - self.origin))
    }
}

/// Invert a row-major `dim × dim` direction matrix using the closed forms.
pub fn invert_direction(direction: &[f64], dim: usize) -> Result<Vec<f64>> {
    check_len(dim * dim, direction.len())?;
    match dim {
        2 => {
            let inv = invert2x2(&Matrix2::from_row_slice(direction))?;
            Ok(inv.transpose().as_slice().to_vec())
        }
        3 => {
            let inv = invert3x3(&Matrix3::from_row_slice(direction))?;
            Ok(inv.transpose().as_slice().to_vec())
        }
        d => Err(ResampleError::UnsupportedDimension { dimension: d }),
    }
}

pub(crate) fn identity_direction(dim: usize) -> Vec<f64> {
    let mut out = vec![0.0; dim * dim];
    for i in 0..dim {
        out[i * dim + i] = 1.0;
    }
    out
}

pub(crate) fn validate_dimension(dim: usize) -> Result<()> {
    if dim == 2 || dim == 3 {
        Ok(())
    } else {
        Err(ResampleError::UnsupportedDimension { dimension: dim })
    }
}

pub(crate) fn check_len(expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(ResampleError::DimensionMismatch { expected, actual })
    }
}

pub(crate) fn validate_size(size: &[usize]) -> Result<()> {
    validate_dimension(size.len())?;
    if let Some(axis) = size.iter().position(|&s| s == 0) {
        return Err(ResampleError::configuration(format!(
            "size along axis {axis} must be at least 1"
        )));
    }
    size.iter()
        .try_fold(1usize, |acc, &s| acc.checked_mul(s))
        .ok_or_else(|| ResampleError::configuration("pixel count overflows usize"))?;
    Ok(())
}

pub(crate) fn validate_spacing(spacing: &[f64]) -> Result<()> {
    for (axis, &s) in spacing.iter().enumerate() {
        if !s.is_finite() || s <= 0.0 {
            return Err(ResampleError::configuration(format!(
                "spacing along axis {axis} must be positive and finite, got {s}"
            )));
        }
    }
    Ok(())
}

pub(crate) fn validate_finite(field: &str, values: &[f64]) -> Result<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(ResampleError::configuration(format!(
            "{field} contains non-finite values"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Vector2, Vector3};

    fn oblique_3d() -> AffineGeometry<3> {
        // Sheared, non-orthonormal direction.
        AffineGeometry::from_slices(
            &[10.0, -4.0, 2.5],
            &[0.5, 1.25, 2.0],
            &[1.0, 0.3, 0.0, 0.2, 0.9, 0.1, 0.0, -0.4, 1.1],
        )
        .unwrap()
    }

    #[test]
    fn forward_map_applies_spacing_then_direction() {
        let geom =
            AffineGeometry::<2>::from_slices(&[2.0, 0.0], &[2.0, 3.0], &[0.0, -1.0, 1.0, 0.0])
                .unwrap();
        let p = geom.index_to_physical(&Vector2::new(1.0, 1.0));
        // D · (2, 3) + (2, 0) = (-3, 2) + (2, 0)
        assert!((p - Vector2::new(-1.0, 2.0)).norm() < 1e-12);
    }

    #[test]
    fn round_trip_non_orthonormal() {
        let geom = oblique_3d();
        for p in [
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(11.3, -2.2, 7.9),
            Vector3::new(-100.0, 42.0, 0.001),
        ] {
            let idx = geom.physical_to_index(&p).unwrap();
            let back = geom.index_to_physical(&idx);
            assert!((back - p).norm() < 1e-9, "{p} -> {idx} -> {back}");
        }
    }

    #[test]
    fn inverse_differs_from_transpose_shortcut_for_sheared_direction() {
        let geom = oblique_3d();
        let p = Vector3::new(12.0, -1.0, 4.0);
        let idx = geom.physical_to_index(&p).unwrap();

        // Only valid for orthonormal directions.
        let naive = (geom.direction().transpose() * (p - geom.origin()))
            .component_div(geom.spacing());
        let naive_back = geom.index_to_physical(&naive);
        assert!((geom.index_to_physical(&idx) - p).norm() < 1e-9);
        assert!((naive_back - p).norm() > 1e-3);
    }

    #[test]
    fn singular_direction_fails_to_solve() {
        let geom =
            AffineGeometry::<2>::from_slices(&[0.0, 0.0], &[1.0, 1.0], &[1.0, 2.0, 2.0, 4.0])
                .unwrap();
        assert_eq!(
            geom.physical_to_index(&Vector2::new(1.0, 1.0)),
            Err(ResampleError::SingularMatrix)
        );
        assert_eq!(
            invert_direction(&[1.0, 2.0, 2.0, 4.0], 2),
            Err(ResampleError::SingularMatrix)
        );
    }

    #[test]
    fn invert_direction_is_row_major() {
        let inv = invert_direction(&[0.0, -1.0, 1.0, 0.0], 2).unwrap();
        assert_eq!(inv, vec![0.0, 1.0, -1.0, 0.0]);
        assert_eq!(identity_direction(3), invert_direction(&identity_direction(3), 3).unwrap());
    }

    #[test]
    fn rejects_bad_spacing_and_lengths() {
        let err = AffineGeometry::<2>::from_slices(&[0.0, 0.0], &[1.0, 0.0], &[1.0, 0.0, 0.0, 1.0])
            .unwrap_err();
        assert!(matches!(err, ResampleError::Configuration { .. }));

        let err = AffineGeometry::<3>::from_slices(&[0.0, 0.0], &[1.0; 3], &[0.0; 9]).unwrap_err();
        assert_eq!(
            err,
            ResampleError::DimensionMismatch {
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn size_validation() {
        assert!(validate_size(&[4, 4]).is_ok());
        assert!(validate_size(&[4, 0, 2]).is_err());
        assert_eq!(
            validate_size(&[4]),
            Err(ResampleError::UnsupportedDimension { dimension: 1 })
        );
    }
}
