pub mod layout;
pub mod raster;

pub use layout::{one_hot, Dataset, Sample};
pub use raster::{binarize, binarize_dataset, detect_resolution, load_bilevel, load_samples, verify};
