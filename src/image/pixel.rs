//! Element types an [`Image`](super::Image) can store.
//!
//! The sampler and resampler only ever see pixels through [`Pixel::to_f64`]
//! and [`Pixel::from_f64`]. Conversions back to integer types use Rust's
//! `as` semantics: truncation toward zero, saturation at the type bounds,
//! and `NaN` mapped to zero.

use serde::Serialize;

/// Runtime tag naming the stored element type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelType {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    F32,
    F64,
}

impl std::fmt::Display for PixelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PixelType::U8 => "u8",
            PixelType::I8 => "i8",
            PixelType::U16 => "u16",
            PixelType::I16 => "i16",
            PixelType::U32 => "u32",
            PixelType::I32 => "i32",
            PixelType::U64 => "u64",
            PixelType::I64 => "i64",
            PixelType::F32 => "f32",
            PixelType::F64 => "f64",
        };
        f.write_str(name)
    }
}

/// Numeric element stored in an image buffer.
pub trait Pixel: Copy + Default + PartialEq + std::fmt::Debug + Send + Sync + 'static {
    const PIXEL_TYPE: PixelType;

    fn to_f64(self) -> f64;

    /// Convert from `f64` with the type's native cast.
    fn from_f64(value: f64) -> Self;
}

macro_rules! impl_pixel {
    ($($ty:ty => $tag:ident),* $(,)?) => {
        $(
            impl Pixel for $ty {
                const PIXEL_TYPE: PixelType = PixelType::$tag;

                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }

                #[inline]
                fn from_f64(value: f64) -> Self {
                    value as $ty
                }
            }
        )*
    };
}

impl_pixel!(
    u8 => U8,
    i8 => I8,
    u16 => U16,
    i16 => I16,
    u32 => U32,
    i32 => I32,
    u64 => U64,
    i64 => I64,
    f32 => F32,
    f64 => F64,
);
