use affine_resample::Image;

/// `height × width` ramp where pixel `(r, c)` holds `r * width + c + 1`.
pub fn ramp_2d(height: usize, width: usize) -> Image<f32> {
    assert!(height > 0 && width > 0, "image dimensions must be positive");
    let data = (0..height * width).map(|i| (i + 1) as f32).collect();
    Image::from_vec(&[height, width], data).unwrap()
}

/// Volume whose value is linear in the index: `100·i0 + 10·i1 + i2`.
pub fn linear_volume(size: [usize; 3]) -> Image<f64> {
    let mut img = Image::<f64>::new(&size).unwrap();
    for i0 in 0..size[0] {
        for i1 in 0..size[1] {
            for i2 in 0..size[2] {
                let v = 100.0 * i0 as f64 + 10.0 * i1 as f64 + i2 as f64;
                img.set(&[i0, i1, i2], v).unwrap();
            }
        }
    }
    img
}

/// Generates a simple high-contrast checkerboard image.
pub fn checkerboard_u8(height: usize, width: usize, cell: usize) -> Image<u8> {
    assert!(cell > 0, "cell size must be positive");
    let mut data = vec![0u8; width * height];
    for y in 0..height {
        for x in 0..width {
            let sum = x / cell + y / cell;
            data[y * width + x] = if sum & 1 == 0 { 32 } else { 220 };
        }
    }
    Image::from_vec(&[height, width], data).unwrap()
}

pub const IDENTITY_2D: [f64; 4] = [1.0, 0.0, 0.0, 1.0];
pub const IDENTITY_3D: [f64; 9] = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];
