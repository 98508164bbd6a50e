pub mod buffer;
pub mod io;
pub mod pixel;

pub use self::buffer::Image;
pub use self::pixel::{Pixel, PixelType};
