//! Multilinear point sampling in physical space.
//!
//! A physical point is mapped to a continuous index through the image
//! geometry, then blended from the `2^D` surrounding grid corners. Corners
//! outside the grid are handled by the [`FillPolicy`]:
//!
//! - `Zero` drops the corner. Its weight is not redistributed, so values fade
//!   toward zero as more corners leave the grid.
//! - `Nearest` clamps each out-of-range coordinate to the closest edge pixel.
//!
//! Each index component is first clamped to `[-1, size]` and snapped to an
//! integer when it lies within `1e-9` of one. When every fractional offset is then zero the stored
//! pixel is returned directly, without corner enumeration.

use crate::error::{ResampleError, Result};
use crate::geometry::{check_len, AffineGeometry};
use crate::image::{Image, Pixel};
use nalgebra::SVector;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Handling of grid corners that fall outside the image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillPolicy {
    #[default]
    Zero,
    Nearest,
}

impl FillPolicy {
    /// Legacy integer code: `0` for `Zero`, `1` for `Nearest`.
    pub fn code(self) -> i32 {
        match self {
            FillPolicy::Zero => 0,
            FillPolicy::Nearest => 1,
        }
    }
}

impl TryFrom<i32> for FillPolicy {
    type Error = ResampleError;

    fn try_from(code: i32) -> Result<Self> {
        match code {
            0 => Ok(FillPolicy::Zero),
            1 => Ok(FillPolicy::Nearest),
            other => Err(ResampleError::UnsupportedFillPolicy {
                value: other.to_string(),
            }),
        }
    }
}

impl FromStr for FillPolicy {
    type Err = ResampleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zero" => Ok(FillPolicy::Zero),
            "nearest" => Ok(FillPolicy::Nearest),
            _ => Err(ResampleError::UnsupportedFillPolicy {
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for FillPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FillPolicy::Zero => f.write_str("zero"),
            FillPolicy::Nearest => f.write_str("nearest"),
        }
    }
}

/// Interpolated value of `image` at a physical `point`.
///
/// `point` must have one coordinate per image axis.
pub fn sample<T: Pixel>(image: &Image<T>, point: &[f64], policy: FillPolicy) -> Result<f64> {
    check_len(image.dimension(), point.len())?;
    require_finite("sample point", point)?;
    match image.dimension() {
        2 => PointSampler::<T, 2>::new(image)?.sample(&SVector::from_column_slice(point), policy),
        3 => PointSampler::<T, 3>::new(image)?.sample(&SVector::from_column_slice(point), policy),
        d => Err(ResampleError::UnsupportedDimension { dimension: d }),
    }
}

/// Interpolated value at a continuous grid index, bypassing the geometry.
pub fn sample_index<T: Pixel>(image: &Image<T>, index: &[f64], policy: FillPolicy) -> Result<f64> {
    check_len(image.dimension(), index.len())?;
    require_finite("sample index", index)?;
    match image.dimension() {
        2 => Ok(GridExtent::<2>::of(image).interpolate(
            image.data(),
            &SVector::from_column_slice(index),
            policy,
        )),
        3 => Ok(GridExtent::<3>::of(image).interpolate(
            image.data(),
            &SVector::from_column_slice(index),
            policy,
        )),
        d => Err(ResampleError::UnsupportedDimension { dimension: d }),
    }
}

/// Sampler bound to one image with its geometry and extent resolved once.
#[derive(Clone, Copy, Debug)]
pub struct PointSampler<'a, T, const D: usize> {
    data: &'a [T],
    geometry: AffineGeometry<D>,
    extent: GridExtent<D>,
}

impl<'a, T: Pixel, const D: usize> PointSampler<'a, T, D> {
    pub fn new(image: &'a Image<T>) -> Result<Self> {
        Ok(Self {
            data: image.data(),
            geometry: image.geometry::<D>()?,
            extent: GridExtent::of(image),
        })
    }

    #[inline]
    pub fn sample(&self, point: &SVector<f64, D>, policy: FillPolicy) -> Result<f64> {
        let index = self.geometry.physical_to_index(point)?;
        require_finite_index(&index)?;
        Ok(self.extent.interpolate(self.data, &index, policy))
    }
}

/// Size and row-major strides of a `D`-dimensional grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct GridExtent<const D: usize> {
    pub(crate) size: [usize; D],
    pub(crate) strides: [usize; D],
}

impl<const D: usize> GridExtent<D> {
    pub(crate) fn of<T: Pixel>(image: &Image<T>) -> Self {
        debug_assert_eq!(image.dimension(), D);
        let mut size = [0usize; D];
        let mut strides = [0usize; D];
        size.copy_from_slice(image.size());
        strides.copy_from_slice(image.strides());
        Self { size, strides }
    }

    /// Multi-index of a linear offset, as floats.
    #[inline]
    pub(crate) fn continuous_index(&self, linear: usize) -> SVector<f64, D> {
        let mut rest = linear;
        SVector::from_fn(|axis, _| {
            let i = rest / self.strides[axis];
            rest %= self.strides[axis];
            i as f64
        })
    }

    pub(crate) fn interpolate<T: Pixel>(
        &self,
        data: &[T],
        index: &SVector<f64, D>,
        policy: FillPolicy,
    ) -> f64 {
        let mut base = [0isize; D];
        let mut frac = [0.0f64; D];
        let mut exact = true;
        for axis in 0..D {
            let x = snap_to_grid(index[axis].clamp(-1.0, self.size[axis] as f64));
            let floor = x.floor();
            base[axis] = floor as isize;
            frac[axis] = x - floor;
            exact &= frac[axis] == 0.0;
        }

        if exact {
            return self.fetch(data, &base, policy).unwrap_or(0.0);
        }

        let mut acc = 0.0;
        for corner in 0..(1usize << D) {
            let mut coords = base;
            let mut weight = 1.0;
            for axis in 0..D {
                if (corner >> axis) & 1 == 1 {
                    coords[axis] = coords[axis].saturating_add(1);
                    weight *= frac[axis];
                } else {
                    weight *= 1.0 - frac[axis];
                }
            }
            if let Some(value) = self.fetch(data, &coords, policy) {
                acc += weight * value;
            }
        }
        acc
    }

    /// Pixel value at integer `coords`, or `None` when `Zero` drops it.
    #[inline]
    fn fetch<T: Pixel>(&self, data: &[T], coords: &[isize; D], policy: FillPolicy) -> Option<f64> {
        let mut linear = 0usize;
        for axis in 0..D {
            let len = self.size[axis];
            let c = coords[axis];
            let idx = if c >= 0 && (c as usize) < len {
                c as usize
            } else {
                match policy {
                    FillPolicy::Zero => return None,
                    FillPolicy::Nearest => clamp_index(c, len),
                }
            };
            linear += idx * self.strides[axis];
        }
        Some(data[linear].to_f64())
    }
}

/// Distance from an integer below which a continuous index counts as a grid hit.
const SNAP_EPS: f64 = 1e-9;

fn snap_to_grid(x: f64) -> f64 {
    let r = x.round();
    if (x - r).abs() < SNAP_EPS {
        r
    } else {
        x
    }
}

fn require_finite_index<const D: usize>(index: &SVector<f64, D>) -> Result<()> {
    if index.iter().any(|v| v.is_nan()) {
        Err(ResampleError::configuration("continuous index is not a number"))
    } else {
        Ok(())
    }
}

fn require_finite(what: &str, coords: &[f64]) -> Result<()> {
    if coords.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(ResampleError::configuration(format!(
            "{what} {coords:?} is not finite"
        )))
    }
}

fn clamp_index(idx: isize, upper: usize) -> usize {
    if upper == 0 || idx < 0 {
        0
    } else if (idx as usize) >= upper {
        upper - 1
    } else {
        idx as usize
    }
}
