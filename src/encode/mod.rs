pub mod bilevel;

pub use bilevel::{encode, BilevelImage, Pixel, PixelOrder};
