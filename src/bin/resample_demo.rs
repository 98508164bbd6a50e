use affine_resample::config::load_config;
use affine_resample::image::io::{load_grayscale_image, save_grayscale_f32, write_json_file};
use affine_resample::{ResampleReport, Resampler};
use serde::Serialize;
use std::env;
use std::path::Path;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;

    let mut gray = load_grayscale_image(&config.input)?;
    config.source.apply(&mut gray)?;
    let source = gray.cast::<f32>();

    let resampler = Resampler::new(config.options);
    let (output, report) = resampler
        .resample_with_report(&source, &config.grid, config.fill_policy)
        .map_err(|e| format!("Resampling failed: {e}"))?;

    let summary = ResampleSummary {
        input: config.input.display().to_string(),
        input_size: source.size().to_vec(),
        spacing: output.spacing().to_vec(),
        origin: output.origin().to_vec(),
        direction: output.direction().to_vec(),
        throughput_per_ms: report.throughput_per_ms(),
        report,
    };

    save_grayscale_f32(&output, &config.output.image)?;
    write_json_file(&config.output.report_json, &summary)?;

    println!(
        "Saved resampled image {:?} to {} ({:.3} ms, {} workers)",
        output.size(),
        config.output.image.display(),
        summary.report.elapsed_ms,
        summary.report.workers
    );
    println!("Saved report to {}", config.output.report_json.display());

    Ok(())
}

fn usage() -> String {
    "Usage: resample_demo <config.json>".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResampleSummary {
    input: String,
    input_size: Vec<usize>,
    spacing: Vec<f64>,
    origin: Vec<f64>,
    direction: Vec<f64>,
    throughput_per_ms: f64,
    report: ResampleReport,
}
