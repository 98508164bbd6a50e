use crate::image::{Image, Pixel};
use crate::resample::{OutputGridSpec, ResampleOptions};
use crate::sampler::FillPolicy;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct ResampleDemoConfig {
    #[serde(rename = "input")]
    pub input: PathBuf,
    /// Geometry assigned to the loaded source image.
    #[serde(default)]
    pub source: SourceGeometryConfig,
    pub grid: OutputGridSpec,
    #[serde(default)]
    pub fill_policy: FillPolicy,
    #[serde(default)]
    pub options: ResampleOptions,
    pub output: ResampleOutputConfig,
}

/// Optional overrides for the source geometry; unset fields keep the
/// image defaults (unit spacing, zero origin, identity direction).
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SourceGeometryConfig {
    pub spacing: Option<Vec<f64>>,
    pub origin: Option<Vec<f64>>,
    pub direction: Option<Vec<f64>>,
}

impl SourceGeometryConfig {
    pub fn apply<T: Pixel>(&self, image: &mut Image<T>) -> Result<(), String> {
        if let Some(spacing) = &self.spacing {
            image
                .set_spacing(spacing)
                .map_err(|e| format!("Invalid source spacing: {e}"))?;
        }
        if let Some(origin) = &self.origin {
            image
                .set_origin(origin)
                .map_err(|e| format!("Invalid source origin: {e}"))?;
        }
        if let Some(direction) = &self.direction {
            image
                .set_direction(direction)
                .map_err(|e| format!("Invalid source direction: {e}"))?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct ResampleOutputConfig {
    #[serde(rename = "image")]
    pub image: PathBuf,
    #[serde(rename = "report_json")]
    pub report_json: PathBuf,
}

pub fn load_config(path: &Path) -> Result<ResampleDemoConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    parse_config(&data).map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

fn parse_config(data: &str) -> Result<ResampleDemoConfig, serde_json::Error> {
    serde_json::from_str(data)
}
