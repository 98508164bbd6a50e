#![doc = include_str!("../README.md")]

// Public modules
pub mod diagnostics;
pub mod error;
pub mod geometry;
pub mod image;
pub mod resample;
pub mod sampler;

// Lower-level pieces, public for tools and tests.
pub mod config;
pub mod linalg;

// --- High-level re-exports -------------------------------------------------

// Main entry points: resampling + point sampling.
pub use crate::resample::{resample, OutputGridSpec, ResampleOptions, Resampler};
pub use crate::sampler::{sample, sample_index, FillPolicy, PointSampler};

// Image container and its geometry.
pub use crate::geometry::{invert_direction, AffineGeometry};
pub use crate::image::{Image, Pixel, PixelType};

pub use crate::diagnostics::ResampleReport;
pub use crate::error::{ResampleError, Result};

// Small linear-algebra helpers that are generally useful.
pub use crate::linalg::{invert2x2, invert3x3, solve_linear};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use affine_resample::prelude::*;
///
/// # fn main() -> Result<(), ResampleError> {
/// let src = Image::from_rows_2d(&[vec![1.0f32, 2.0], vec![3.0, 4.0]])?;
/// let grid = OutputGridSpec::new(&[4, 4], &[0.5, 0.5], &[0.0, 0.0], &[1.0, 0.0, 0.0, 1.0]);
///
/// let out = resample(&src, &grid, FillPolicy::Nearest)?;
/// println!("size={:?} centre={}", out.size(), out.get(&[1, 1])?);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::{
        resample, sample, FillPolicy, Image, OutputGridSpec, ResampleError, ResampleOptions,
        Resampler,
    };
}
