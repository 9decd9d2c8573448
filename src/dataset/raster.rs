//! Image ingestion and preprocessing for glyph datasets.
//!
//! Decodes image files (PNG/JPEG/BMP/GIF) into [`BilevelImage`]s, checks that
//! a dataset is bilevel with a uniform resolution, and converts arbitrary
//! images to pure black/white.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use tracing::{debug, info};

use crate::dataset::layout::{class_dir, Dataset};
use crate::encode::bilevel::{BilevelImage, Pixel};
use crate::error::{Error, Result};
use crate::network::builder::OUTPUT_SIZE;

/// Resolution every dataset image is expected to have unless configured.
pub const DEFAULT_RESOLUTION: (u32, u32) = (64, 64);

/// Mean RGB value below which a pixel becomes black when binarizing.
pub const DEFAULT_THRESHOLD: u8 = 30;

/// Decodes the file at `path` into a bilevel image. Only pure black pixels
/// stay black.
pub fn load_bilevel(path: &Path) -> Result<BilevelImage> {
    let rgb = image::open(path)?.to_rgb8();
    let (width, height) = rgb.dimensions();
    let pixels = rgb.pixels().map(|p| Pixel::from_rgb(p.0)).collect();
    BilevelImage::from_pixels(width, height, pixels)
}

/// Decodes every sample of the dataset, keeping its label.
pub fn load_samples(dataset: &Dataset) -> Result<Vec<(BilevelImage, usize)>> {
    dataset.samples.iter()
        .map(|s| -> Result<(BilevelImage, usize)> { Ok((load_bilevel(&s.path)?, s.label)) })
        .collect()
}

/// Reads the dimensions of the first image of class `0`.
pub fn detect_resolution(dataset: &Dataset) -> Result<(u32, u32)> {
    let first = dataset.samples.iter()
        .find(|s| s.label == 0)
        .ok_or_else(|| Error::EmptyDataset(class_dir(&dataset.root, 0)))?;
    Ok(image::image_dimensions(&first.path)?)
}

const BLACK: [u8; 4] = [0, 0, 0, 255];
const WHITE: [u8; 4] = [255, 255, 255, 255];

/// Checks that every image in the dataset is `expected` (width, height) and
/// contains only opaque pure black and pure white pixels. Returns the number
/// of images checked.
pub fn verify(dataset: &Dataset, expected: (u32, u32)) -> Result<usize> {
    for sample in &dataset.samples {
        let actual = image::image_dimensions(&sample.path)?;
        if actual != expected {
            return Err(Error::Resolution {
                path: sample.path.clone(),
                expected,
                actual,
            });
        }

        let rgba = image::open(&sample.path)?.to_rgba8();
        if let Some((x, y, p)) = rgba.enumerate_pixels().find(|(_, _, p)| p.0 != BLACK && p.0 != WHITE) {
            return Err(Error::UnexpectedColor {
                path: sample.path.clone(),
                x,
                y,
                rgba: p.0,
            });
        }
    }
    info!(count = dataset.len(), width = expected.0, height = expected.1, "all images are bilevel with the same resolution");
    Ok(dataset.len())
}

/// Converts `img` to pure black/white: pixels whose mean RGB value is below
/// `threshold` become black, all others white.
pub fn binarize(img: &DynamicImage, threshold: u8) -> RgbImage {
    let rgb = img.to_rgb8();
    RgbImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let mean = (r as u32 + g as u32 + b as u32) / 3;
        if mean < threshold as u32 {
            Rgb([0, 0, 0])
        } else {
            Rgb([255, 255, 255])
        }
    })
}

/// Binarizes every image of the dataset into `dest`, mirroring the class
/// layout. Output files are PNGs with the source file stem; two sources
/// sharing a stem in one class are rejected before anything is written.
/// Returns the number of images written.
pub fn binarize_dataset(dataset: &Dataset, dest: &Path, threshold: u8) -> Result<usize> {
    for label in 0..OUTPUT_SIZE {
        fs::create_dir_all(class_dir(dest, label))?;
    }

    let outputs = dataset.samples.iter()
        .map(|sample| {
            let stem = sample.path.file_stem().unwrap_or_default().to_string_lossy();
            class_dir(dest, sample.label).join(format!("{stem}.png"))
        })
        .collect::<Vec<_>>();
    let mut seen = HashSet::new();
    for out in &outputs {
        if !seen.insert(out) {
            return Err(Error::DuplicateOutput(out.clone()));
        }
    }

    for (sample, out) in dataset.samples.iter().zip(&outputs) {
        let img = image::open(&sample.path)?;
        binarize(&img, threshold).save_with_format(out, ImageFormat::Png)?;
        debug!(src = %sample.path.display(), dest = %out.display(), "binarized");
    }

    info!(count = dataset.len(), dest = %dest.display(), "binarized dataset");
    Ok(dataset.len())
}
