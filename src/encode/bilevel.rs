use serde::{Deserialize, Serialize};

use crate::error::{check_len, Result};
use crate::network::network::Network;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pixel {
    Black,
    White,
}

impl Pixel {
    /// Pure black (0, 0, 0) is `Black`; every other color is `White`.
    pub fn from_rgb(rgb: [u8; 3]) -> Pixel {
        if rgb == [0, 0, 0] { Pixel::Black } else { Pixel::White }
    }

    /// Input activation for this pixel: 0 for black, 1 for white.
    pub fn activation(self) -> f64 {
        match self {
            Pixel::Black => 0.0,
            Pixel::White => 1.0,
        }
    }
}

/// How pixel `(x, y)` maps onto an input neuron index.
///
/// Dataset tooling and the encoder must agree on this; it is part of the
/// training configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelOrder {
    /// `y * width + x`
    #[default]
    RowMajor,
    /// `x * height + y`
    ColumnMajor,
}

impl PixelOrder {
    pub fn index(self, x: u32, y: u32, width: u32, height: u32) -> usize {
        let (x, y, width, height) = (x as usize, y as usize, width as usize, height as usize);
        match self {
            PixelOrder::RowMajor => y * width + x,
            PixelOrder::ColumnMajor => x * height + y,
        }
    }
}

/// A decoded black/white raster. Pixels are stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct BilevelImage {
    width: u32,
    height: u32,
    pixels: Vec<Pixel>,
}

impl BilevelImage {
    pub fn new(width: u32, height: u32, fill: Pixel) -> BilevelImage {
        BilevelImage {
            width,
            height,
            pixels: vec![fill; width as usize * height as usize],
        }
    }

    /// Wraps row-major pixels; their count must be `width * height`.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Pixel>) -> Result<BilevelImage> {
        check_len("bilevel image", width as usize * height as usize, pixels.len())?;
        Ok(BilevelImage { width, height, pixels })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    /// Panics if `(x, y)` is outside the image.
    pub fn get(&self, x: u32, y: u32) -> Pixel {
        self.pixels[PixelOrder::RowMajor.index(x, y, self.width, self.height)]
    }

    /// Panics if `(x, y)` is outside the image.
    pub fn set(&mut self, x: u32, y: u32, pixel: Pixel) {
        let i = PixelOrder::RowMajor.index(x, y, self.width, self.height);
        self.pixels[i] = pixel;
    }

    /// Input activations for this image laid out in `order`.
    pub fn activations(&self, order: PixelOrder) -> Vec<f64> {
        let mut activations = vec![0.0; self.pixels.len()];
        for y in 0..self.height {
            for x in 0..self.width {
                activations[order.index(x, y, self.width, self.height)] = self.get(x, y).activation();
            }
        }
        activations
    }
}

/// Overwrites every input neuron's activation from `image`.
///
/// Fails with `ShapeMismatch` before touching the network if the pixel count
/// differs from the input layer size.
pub fn encode(network: &mut Network, image: &BilevelImage, order: PixelOrder) -> Result<()> {
    check_len("input encoding", network.input_layer().len(), image.pixel_count())?;
    network.set_input(&image.activations(order))
}
