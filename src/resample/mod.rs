//! Resampling of an image onto an explicitly described output grid.
//!
//! Every output pixel is mapped to its physical centre through the output
//! grid's own geometry and sampled from the source with the requested
//! [`FillPolicy`]. The output buffer is split into contiguous chunks, one per
//! worker; each worker writes only its own chunk while reading the shared,
//! immutable source.
//!
//! Error contract: the first per-pixel error from any worker is stored once
//! and returned after all workers have joined. The partially written output
//! is dropped in that case.

pub mod grid;
pub mod options;

pub use grid::OutputGridSpec;
pub use options::ResampleOptions;

use crate::diagnostics::ResampleReport;
use crate::error::{ResampleError, Result};
use crate::geometry::{invert_direction, validate_dimension};
use crate::image::{Image, Pixel};
use crate::sampler::{FillPolicy, GridExtent, PointSampler};
use log::{debug, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Resample `source` onto `grid` with default options.
pub fn resample<T: Pixel>(
    source: &Image<T>,
    grid: &OutputGridSpec,
    policy: FillPolicy,
) -> Result<Image<T>> {
    Resampler::default().resample(source, grid, policy)
}

/// Parallel resampler. Holds no state between calls besides its options.
#[derive(Clone, Debug, Default)]
pub struct Resampler {
    options: ResampleOptions,
}

impl Resampler {
    pub fn new(options: ResampleOptions) -> Self {
        Self { options }
    }

    pub fn resample<T: Pixel>(
        &self,
        source: &Image<T>,
        grid: &OutputGridSpec,
        policy: FillPolicy,
    ) -> Result<Image<T>> {
        self.resample_with_report(source, grid, policy)
            .map(|(image, _)| image)
    }

    /// Resample and report how the work was scheduled.
    pub fn resample_with_report<T: Pixel>(
        &self,
        source: &Image<T>,
        grid: &OutputGridSpec,
        policy: FillPolicy,
    ) -> Result<(Image<T>, ResampleReport)> {
        let start = Instant::now();
        let dim = source.dimension();
        validate_dimension(dim)?;
        let resolved = grid.resolve(dim)?;

        // Both directions must be invertible before any worker starts.
        source.direction_inverse()?;
        invert_direction(resolved.direction, dim)?;

        let mut output = resolved.allocate::<T>()?;
        let pixels = output.num_pixels();
        let chunk_size = pixels.div_ceil(self.options.resolve_workers().min(pixels));
        let workers = pixels.div_ceil(chunk_size);
        debug!(
            "Resampler::resample {:?} -> {:?} ({} pixels, {}) workers={} chunk={} fill={}",
            source.size(),
            output.size(),
            pixels,
            T::PIXEL_TYPE,
            workers,
            chunk_size,
            policy
        );

        match dim {
            2 => fill_output::<T, 2>(source, &mut output, policy, chunk_size)?,
            _ => fill_output::<T, 3>(source, &mut output, policy, chunk_size)?,
        }

        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        debug!("Resampler::resample done in {elapsed_ms:.3} ms");
        let report = ResampleReport {
            size: output.size().to_vec(),
            pixels,
            pixel_type: T::PIXEL_TYPE,
            fill_policy: policy,
            workers,
            chunk_size,
            elapsed_ms,
        };
        Ok((output, report))
    }
}

fn fill_output<T: Pixel, const D: usize>(
    source: &Image<T>,
    output: &mut Image<T>,
    policy: FillPolicy,
    chunk_size: usize,
) -> Result<()> {
    let sampler = PointSampler::<T, D>::new(source)?;
    let out_geometry = output.geometry::<D>()?;
    let out_extent = GridExtent::<D>::of(output);

    let first_error: OnceLock<ResampleError> = OnceLock::new();
    let abort = AtomicBool::new(false);

    let fill_chunk = |chunk_index: usize, dst: &mut [T]| {
        let start = chunk_index * chunk_size;
        for (offset, px) in dst.iter_mut().enumerate() {
            if abort.load(Ordering::Relaxed) {
                return;
            }
            let index = out_extent.continuous_index(start + offset);
            let point = out_geometry.index_to_physical(&index);
            match sampler.sample(&point, policy) {
                Ok(value) => *px = T::from_f64(value),
                Err(err) => {
                    let _ = first_error.set(err);
                    abort.store(true, Ordering::Relaxed);
                    return;
                }
            }
        }
    };

    #[cfg(feature = "parallel")]
    output
        .data_mut()
        .par_chunks_mut(chunk_size)
        .enumerate()
        .for_each(|(chunk_index, dst)| fill_chunk(chunk_index, dst));

    #[cfg(not(feature = "parallel"))]
    output
        .data_mut()
        .chunks_mut(chunk_size)
        .enumerate()
        .for_each(|(chunk_index, dst)| fill_chunk(chunk_index, dst));

    match first_error.into_inner() {
        Some(err) => {
            warn!("Resampler::resample aborted: {err}");
            Err(err)
        }
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_grid_reproduces_source() {
        let src = Image::from_rows_2d(&[vec![1u8, 2, 3], vec![4, 5, 6]])
            .unwrap()
            .with_origin(&[3.0, -2.0])
            .unwrap()
            .with_spacing(&[0.5, 1.5])
            .unwrap();
        let out = resample(&src, &OutputGridSpec::matching(&src), FillPolicy::Zero).unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn identity_grid_survives_decimal_geometry() {
        let mut src = Image::<u8>::new(&[10, 10])
            .unwrap()
            .with_spacing(&[0.1, 0.3])
            .unwrap()
            .with_origin(&[0.7, -1.3])
            .unwrap();
        for (i, px) in src.data_mut().iter_mut().enumerate() {
            *px = (i * 7 % 251) as u8;
        }
        for policy in [FillPolicy::Zero, FillPolicy::Nearest] {
            let out = resample(&src, &OutputGridSpec::matching(&src), policy).unwrap();
            assert_eq!(out.data(), src.data(), "policy={policy}");
        }
    }

    #[test]
    fn report_counts_actual_chunks() {
        let src = Image::<u8>::new(&[3, 3]).unwrap();
        let (_, report) = Resampler::new(ResampleOptions::new().with_workers(4))
            .resample_with_report(&src, &OutputGridSpec::matching(&src), FillPolicy::Zero)
            .unwrap();
        assert_eq!(report.chunk_size, 3);
        assert_eq!(report.workers, 3);
    }

    #[test]
    fn chunk_count_does_not_change_result() {
        let mut src = Image::<f32>::new(&[5, 7]).unwrap();
        for (i, px) in src.data_mut().iter_mut().enumerate() {
            *px = (i * 13 % 17) as f32;
        }
        let grid = OutputGridSpec::new(&[9, 11], &[0.45, 0.6], &[-0.3, 0.1], &[1.0, 0.0, 0.0, 1.0]);
        let reference = Resampler::new(ResampleOptions::new().with_workers(1))
            .resample(&src, &grid, FillPolicy::Nearest)
            .unwrap();
        for workers in [2, 3, 8, 1000] {
            let (out, report) = Resampler::new(ResampleOptions::new().with_workers(workers))
                .resample_with_report(&src, &grid, FillPolicy::Nearest)
                .unwrap();
            assert_eq!(out, reference, "workers={workers}");
            assert_eq!(report.pixels, 99);
            assert!(report.chunk_size * report.workers >= 99);
        }
    }

    #[test]
    fn output_takes_grid_geometry() {
        let src = Image::<i16>::new(&[2, 2, 2]).unwrap();
        let grid = OutputGridSpec::new(
            &[3, 1, 2],
            &[1.0, 2.0, 3.0],
            &[5.0, 6.0, 7.0],
            &[0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0],
        );
        let out = resample(&src, &grid, FillPolicy::Zero).unwrap();
        assert_eq!(out.size(), &[3, 1, 2]);
        assert_eq!(out.spacing(), &[1.0, 2.0, 3.0]);
        assert_eq!(out.origin(), &[5.0, 6.0, 7.0]);
        assert_eq!(out.direction(), grid.direction.as_deref().unwrap());
    }

    #[test]
    fn rejects_singular_directions_up_front() {
        let src = Image::<u8>::new(&[2, 2]).unwrap();
        let grid = OutputGridSpec::matching(&src).with_direction(&[1.0, 2.0, 2.0, 4.0]);
        assert_eq!(
            resample(&src, &grid, FillPolicy::Zero),
            Err(ResampleError::SingularMatrix)
        );

        let singular_src = src.clone().with_direction(&[1.0, 2.0, 2.0, 4.0]).unwrap();
        assert_eq!(
            resample(&singular_src, &OutputGridSpec::matching(&src), FillPolicy::Zero),
            Err(ResampleError::SingularMatrix)
        );
    }
}
