//! Serializable summaries of resample runs, for demos and logs.

use crate::image::PixelType;
use crate::sampler::FillPolicy;
use serde::Serialize;

/// How a resample was scheduled and how long it took.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResampleReport {
    /// Output grid size.
    pub size: Vec<usize>,
    pub pixels: usize,
    pub pixel_type: PixelType,
    pub fill_policy: FillPolicy,
    /// Number of contiguous output chunks.
    pub workers: usize,
    pub chunk_size: usize,
    pub elapsed_ms: f64,
}

impl ResampleReport {
    /// Output pixels produced per millisecond; zero for instantaneous runs.
    pub fn throughput_per_ms(&self) -> f64 {
        if self.elapsed_ms > 0.0 {
            self.pixels as f64 / self.elapsed_ms
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_camel_case() {
        let report = ResampleReport {
            size: vec![8, 8],
            pixels: 64,
            pixel_type: PixelType::F32,
            fill_policy: FillPolicy::Nearest,
            workers: 4,
            chunk_size: 16,
            elapsed_ms: 2.0,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["pixelType"], "f32");
        assert_eq!(json["fillPolicy"], "nearest");
        assert_eq!(json["chunkSize"], 16);
        assert_eq!(report.throughput_per_ms(), 32.0);
    }
}
