//! I/O helpers for grayscale 2D images and JSON.
//!
//! - `load_grayscale_image`: read a PNG into an 8-bit 2D [`Image`].
//! - `save_grayscale_u8`: write an 8-bit 2D [`Image`] to a PNG.
//! - `save_grayscale_f32`: write a float 2D [`Image`] to a PNG, clamping to [0, 255].
//! - `write_json_file`: pretty-print a serializable value to disk.
//!
//! Axis 0 is the image row, axis 1 the column.
use super::{Image, Pixel};
use image::{GrayImage, ImageBuffer, Luma};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk and convert to 8-bit grayscale.
pub fn load_grayscale_image(path: &Path) -> Result<Image<u8>, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_luma8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    Image::from_vec(&[height, width], img.into_raw())
        .map_err(|e| format!("Failed to wrap {}: {e}", path.display()))
}

/// Save an 8-bit 2D image to a PNG.
pub fn save_grayscale_u8(image: &Image<u8>, path: &Path) -> Result<(), String> {
    let (height, width) = planar_dims(image)?;
    ensure_parent_dir(path)?;
    let buffer: ImageBuffer<Luma<u8>, Vec<u8>> =
        ImageBuffer::from_raw(width as u32, height as u32, image.data().to_vec())
            .ok_or_else(|| "Failed to create image buffer".to_string())?;
    buffer
        .save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Save a float 2D image to a grayscale PNG, clamping values in [0, 255].
pub fn save_grayscale_f32(image: &Image<f32>, path: &Path) -> Result<(), String> {
    let (height, width) = planar_dims(image)?;
    ensure_parent_dir(path)?;
    let mut out = GrayImage::new(width as u32, height as u32);
    for (linear, &px) in image.data().iter().enumerate() {
        let v = px.clamp(0.0, 255.0);
        out.put_pixel(
            (linear % width) as u32,
            (linear / width) as u32,
            Luma([v as u8]),
        );
    }
    out.save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn planar_dims<T: Pixel>(image: &Image<T>) -> Result<(usize, usize), String> {
    match image.size() {
        &[height, width] => Ok((height, width)),
        other => Err(format!(
            "PNG output needs a 2D image, got size {other:?}"
        )),
    }
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_round_trip_keeps_row_major_layout() {
        let dir = std::env::temp_dir().join(format!("affine_resample_io_{}", std::process::id()));
        let path = dir.join("gradient.png");
        let img = Image::from_rows_2d(&[vec![0u8, 10, 20], vec![30, 40, 50]]).unwrap();

        save_grayscale_u8(&img, &path).expect("save png");
        let loaded = load_grayscale_image(&path).expect("load png");
        assert_eq!(loaded.size(), &[2, 3]);
        assert_eq!(loaded.data(), img.data());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn volumes_are_rejected_for_png() {
        let vol = Image::<u8>::new(&[2, 2, 2]).unwrap();
        let err = save_grayscale_u8(&vol, Path::new("unused.png")).unwrap_err();
        assert!(err.contains("2D"));
    }
}
