//! Output grid description for [`resample`](super::resample).
//!
//! All four fields are required. They are `Option`s so that a grid read from
//! JSON with a key left out is reported as a configuration error instead of
//! being silently defaulted.

use crate::error::{ResampleError, Result};
use crate::geometry::{check_len, validate_finite, validate_size, validate_spacing};
use crate::image::{Image, Pixel};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputGridSpec {
    /// Number of pixels along each axis.
    pub size: Option<Vec<usize>>,
    /// Physical distance between neighbouring pixels along each axis.
    pub spacing: Option<Vec<f64>>,
    /// Physical position of pixel `(0, .., 0)`.
    pub origin: Option<Vec<f64>>,
    /// Row-major `dim × dim` direction cosines.
    pub direction: Option<Vec<f64>>,
}

impl OutputGridSpec {
    pub fn new(size: &[usize], spacing: &[f64], origin: &[f64], direction: &[f64]) -> Self {
        Self {
            size: Some(size.to_vec()),
            spacing: Some(spacing.to_vec()),
            origin: Some(origin.to_vec()),
            direction: Some(direction.to_vec()),
        }
    }

    /// The grid `image` itself lives on.
    pub fn matching<T: Pixel>(image: &Image<T>) -> Self {
        Self::new(
            image.size(),
            image.spacing(),
            image.origin(),
            image.direction(),
        )
    }

    pub fn with_size(mut self, size: &[usize]) -> Self {
        self.size = Some(size.to_vec());
        self
    }

    pub fn with_spacing(mut self, spacing: &[f64]) -> Self {
        self.spacing = Some(spacing.to_vec());
        self
    }

    pub fn with_origin(mut self, origin: &[f64]) -> Self {
        self.origin = Some(origin.to_vec());
        self
    }

    pub fn with_direction(mut self, direction: &[f64]) -> Self {
        self.direction = Some(direction.to_vec());
        self
    }

    /// Check every field against the source dimension.
    pub(crate) fn resolve(&self, dim: usize) -> Result<ResolvedGrid<'_>> {
        let size = required("size", &self.size)?;
        let spacing = required("spacing", &self.spacing)?;
        let origin = required("origin", &self.origin)?;
        let direction = required("direction", &self.direction)?;

        check_len(dim, size.len())?;
        check_len(dim, spacing.len())?;
        check_len(dim, origin.len())?;
        check_len(dim * dim, direction.len())?;
        validate_size(size)?;
        validate_spacing(spacing)?;
        validate_finite("origin", origin)?;
        validate_finite("direction", direction)?;

        Ok(ResolvedGrid {
            size,
            spacing,
            origin,
            direction,
        })
    }
}

/// Validated view of an [`OutputGridSpec`].
#[derive(Clone, Copy, Debug)]
pub(crate) struct ResolvedGrid<'a> {
    pub(crate) size: &'a [usize],
    pub(crate) spacing: &'a [f64],
    pub(crate) origin: &'a [f64],
    pub(crate) direction: &'a [f64],
}

impl ResolvedGrid<'_> {
    pub(crate) fn allocate<T: Pixel>(&self) -> Result<Image<T>> {
        Image::new(self.size)?
            .with_spacing(self.spacing)?
            .with_origin(self.origin)?
            .with_direction(self.direction)
    }
}

fn required<'a, V>(field: &str, value: &'a Option<Vec<V>>) -> Result<&'a [V]> {
    value.as_deref().ok_or_else(|| {
        ResampleError::configuration(format!("output grid is missing `{field}`"))
    })
}
