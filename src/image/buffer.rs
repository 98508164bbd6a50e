//! Owned 2D/3D image with physical geometry, stored row-major.
//!
//! Axis 0 varies slowest and the last axis fastest, so a nested array
//! `rows[i0][i1]` maps directly onto multi-index `(i0, i1)`. Dimension, size
//! and pixel type are fixed at construction; spacing, origin and direction
//! can be updated through validating setters.

use super::pixel::{Pixel, PixelType};
use crate::error::{ResampleError, Result};
use crate::geometry::{
    check_len, identity_direction, invert_direction, validate_finite, validate_size,
    validate_spacing, AffineGeometry,
};
use nalgebra::SVector;

#[derive(Clone, Debug, PartialEq)]
pub struct Image<T> {
    size: Vec<usize>,
    strides: Vec<usize>,
    spacing: Vec<f64>,
    origin: Vec<f64>,
    /// Row-major `dim × dim` direction cosines.
    direction: Vec<f64>,
    data: Vec<T>,
}

impl<T: Pixel> Image<T> {
    /// Zero-filled image with unit spacing, zero origin and identity direction.
    pub fn new(size: &[usize]) -> Result<Self> {
        validate_size(size)?;
        let len = size.iter().product();
        Ok(Self::with_data(size, vec![T::default(); len]))
    }

    /// Wrap an existing row-major buffer.
    pub fn from_vec(size: &[usize], data: Vec<T>) -> Result<Self> {
        validate_size(size)?;
        let expected: usize = size.iter().product();
        if data.len() != expected {
            return Err(ResampleError::configuration(format!(
                "buffer holds {} pixels, size {size:?} needs {expected}",
                data.len()
            )));
        }
        Ok(Self::with_data(size, data))
    }

    /// 2D image from equally long rows; `rows[i0][i1]` is pixel `(i0, i1)`.
    pub fn from_rows_2d(rows: &[Vec<T>]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != width) {
            return Err(ResampleError::configuration("rows have unequal lengths"));
        }
        Self::from_vec(&[height, width], rows.concat())
    }

    /// 3D image from equally shaped slices; `slices[i0][i1][i2]`.
    pub fn from_slices_3d(slices: &[Vec<Vec<T>>]) -> Result<Self> {
        let depth = slices.len();
        let height = slices.first().map_or(0, Vec::len);
        let width = slices
            .first()
            .and_then(|s| s.first())
            .map_or(0, Vec::len);
        let ragged = slices
            .iter()
            .any(|s| s.len() != height || s.iter().any(|r| r.len() != width));
        if ragged {
            return Err(ResampleError::configuration("slices have unequal shapes"));
        }
        let data: Vec<T> = slices.iter().flat_map(|s| s.concat()).collect();
        Self::from_vec(&[depth, height, width], data)
    }

    fn with_data(size: &[usize], data: Vec<T>) -> Self {
        let dim = size.len();
        Self {
            size: size.to_vec(),
            strides: row_major_strides(size),
            spacing: vec![1.0; dim],
            origin: vec![0.0; dim],
            direction: identity_direction(dim),
            data,
        }
    }

    pub fn dimension(&self) -> usize {
        self.size.len()
    }

    pub fn size(&self) -> &[usize] {
        &self.size
    }

    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    pub fn spacing(&self) -> &[f64] {
        &self.spacing
    }

    pub fn origin(&self) -> &[f64] {
        &self.origin
    }

    pub fn direction(&self) -> &[f64] {
        &self.direction
    }

    pub fn pixel_type(&self) -> PixelType {
        T::PIXEL_TYPE
    }

    pub fn num_pixels(&self) -> usize {
        self.data.len()
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub fn set_spacing(&mut self, spacing: &[f64]) -> Result<()> {
        check_len(self.dimension(), spacing.len())?;
        validate_spacing(spacing)?;
        self.spacing = spacing.to_vec();
        Ok(())
    }

    pub fn set_origin(&mut self, origin: &[f64]) -> Result<()> {
        check_len(self.dimension(), origin.len())?;
        validate_finite("origin", origin)?;
        self.origin = origin.to_vec();
        Ok(())
    }

    /// Replace the row-major direction matrix. Singular matrices are accepted
    /// here and rejected when the geometry is used.
    pub fn set_direction(&mut self, direction: &[f64]) -> Result<()> {
        let dim = self.dimension();
        check_len(dim * dim, direction.len())?;
        validate_finite("direction", direction)?;
        self.direction = direction.to_vec();
        Ok(())
    }

    pub fn with_spacing(mut self, spacing: &[f64]) -> Result<Self> {
        self.set_spacing(spacing)?;
        Ok(self)
    }

    pub fn with_origin(mut self, origin: &[f64]) -> Result<Self> {
        self.set_origin(origin)?;
        Ok(self)
    }

    pub fn with_direction(mut self, direction: &[f64]) -> Result<Self> {
        self.set_direction(direction)?;
        Ok(self)
    }

    /// Linear buffer offset of a multi-index.
    pub fn index_of(&self, index: &[usize]) -> Result<usize> {
        check_len(self.dimension(), index.len())?;
        let mut linear = 0usize;
        for ((&i, &len), &stride) in index.iter().zip(&self.size).zip(&self.strides) {
            if i >= len {
                return Err(ResampleError::IndexOutOfRange { index: i, len });
            }
            linear += i * stride;
        }
        Ok(linear)
    }

    /// Multi-index of a linear buffer offset.
    pub fn multi_index(&self, linear: usize) -> Result<Vec<usize>> {
        if linear >= self.data.len() {
            return Err(ResampleError::IndexOutOfRange {
                index: linear,
                len: self.data.len(),
            });
        }
        let mut rest = linear;
        Ok(self
            .strides
            .iter()
            .map(|&stride| {
                let i = rest / stride;
                rest %= stride;
                i
            })
            .collect())
    }

    pub fn get(&self, index: &[usize]) -> Result<T> {
        let linear = self.index_of(index)?;
        Ok(self.data[linear])
    }

    pub fn set(&mut self, index: &[usize], value: T) -> Result<()> {
        let linear = self.index_of(index)?;
        self.data[linear] = value;
        Ok(())
    }

    pub fn get_f64(&self, linear: usize) -> Result<f64> {
        self.data
            .get(linear)
            .map(|p| p.to_f64())
            .ok_or(ResampleError::IndexOutOfRange {
                index: linear,
                len: self.data.len(),
            })
    }

    pub fn set_f64(&mut self, linear: usize, value: f64) -> Result<()> {
        let len = self.data.len();
        let px = self
            .data
            .get_mut(linear)
            .ok_or(ResampleError::IndexOutOfRange { index: linear, len })?;
        *px = T::from_f64(value);
        Ok(())
    }

    /// Convert to another pixel type through `f64`, keeping the geometry.
    pub fn cast<U: Pixel>(&self) -> Image<U> {
        Image {
            size: self.size.clone(),
            strides: self.strides.clone(),
            spacing: self.spacing.clone(),
            origin: self.origin.clone(),
            direction: self.direction.clone(),
            data: self.data.iter().map(|p| U::from_f64(p.to_f64())).collect(),
        }
    }

    /// Inverse of the direction matrix, row-major.
    pub fn direction_inverse(&self) -> Result<Vec<f64>> {
        invert_direction(&self.direction, self.dimension())
    }

    /// Fixed-dimension geometry; fails when `D` differs from the image's.
    pub fn geometry<const D: usize>(&self) -> Result<AffineGeometry<D>> {
        check_len(D, self.dimension())?;
        AffineGeometry::from_slices(&self.origin, &self.spacing, &self.direction)
    }

    pub fn index_to_physical(&self, index: &[f64]) -> Result<Vec<f64>> {
        check_len(self.dimension(), index.len())?;
        match self.dimension() {
            2 => {
                let p = self
                    .geometry::<2>()?
                    .index_to_physical(&SVector::from_column_slice(index));
                Ok(p.as_slice().to_vec())
            }
            _ => {
                let p = self
                    .geometry::<3>()?
                    .index_to_physical(&SVector::from_column_slice(index));
                Ok(p.as_slice().to_vec())
            }
        }
    }

    pub fn physical_to_index(&self, point: &[f64]) -> Result<Vec<f64>> {
        check_len(self.dimension(), point.len())?;
        match self.dimension() {
            2 => {
                let i = self
                    .geometry::<2>()?
                    .physical_to_index(&SVector::from_column_slice(point))?;
                Ok(i.as_slice().to_vec())
            }
            _ => {
                let i = self
                    .geometry::<3>()?
                    .physical_to_index(&SVector::from_column_slice(point))?;
                Ok(i.as_slice().to_vec())
            }
        }
    }
}

pub(crate) fn row_major_strides(size: &[usize]) -> Vec<usize> {
    let mut strides = vec![1usize; size.len()];
    for axis in (0..size.len().saturating_sub(1)).rev() {
        strides[axis] = strides[axis + 1] * size[axis + 1];
    }
    strides
}
