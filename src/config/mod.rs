//! JSON configuration for the demo binaries.

pub mod resample_demo;

pub use resample_demo::{load_config, ResampleDemoConfig};
