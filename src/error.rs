use std::path::PathBuf;

use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The input layer must contain at least one neuron.
    #[error("invalid input size: {0}")]
    InvalidInputSize(usize),

    /// Successive halving produced a layer with no neurons.
    #[error("layer {layer} would have {size} neurons")]
    EmptyLayer { layer: usize, size: usize },

    /// He-normal initialization needs at least one incoming connection.
    #[error("invalid fan-in for He-normal initialization: {0}")]
    InvalidFanIn(usize),

    #[error("invalid uniform range [{min}, {max})")]
    InvalidRange { min: f64, max: f64 },

    /// Two shapes that must agree do not.
    #[error("shape mismatch in {context}: expected {expected}, got {actual}")]
    ShapeMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    /// An edge would break the layer i -> layer i + 1 structure.
    #[error("cannot connect neuron {from} to neuron {to}: not in adjacent layers")]
    InvalidConnection { from: usize, to: usize },

    #[error("class label {label} out of range for {classes} classes")]
    InvalidLabel { label: usize, classes: usize },

    #[error("image {path} is {actual:?}, expected {expected:?}")]
    Resolution {
        path: PathBuf,
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// A dataset image holds a color other than pure black or pure white.
    #[error("image {path} has non-bilevel pixel {rgba:?} at ({x}, {y})")]
    UnexpectedColor {
        path: PathBuf,
        x: u32,
        y: u32,
        rgba: [u8; 4],
    },

    /// Two source images would be written to the same output file.
    #[error("output file {0} would be written twice")]
    DuplicateOutput(PathBuf),

    #[error("missing class directory: {0}")]
    MissingClassDir(PathBuf),

    #[error("no images found under {0}")]
    EmptyDataset(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Returns `ShapeMismatch` unless `actual == expected`.
pub(crate) fn check_len(context: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(Error::ShapeMismatch { context, expected, actual });
    }
    Ok(())
}
