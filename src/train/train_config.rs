use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::encode::bilevel::PixelOrder;
use crate::error::Result;
use crate::init::initializer::Initializer;

/// Configuration for a training run.
///
/// # Fields
/// - `dataset_dir`      : directory with one subdirectory per class (`"0"`..`"9"`)
/// - `hidden_layers`    : number of hidden layers; each halves the previous size
/// - `learning_rate`    : SGD step size
/// - `epochs`           : total number of full passes over the training data
/// - `samples_per_class`: optional cap on images read from each class
/// - `initializer`      : how biases and weights are seeded
/// - `seed`             : fixes the RNG for initialization and shuffling
/// - `pixel_order`      : pixel to input-neuron mapping
/// - `shuffle`          : visit samples in a new random order each epoch
/// - `resolution`       : expected (width, height); detected from the dataset if absent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub dataset_dir: PathBuf,
    pub hidden_layers: usize,
    pub learning_rate: f64,
    pub epochs: usize,
    pub samples_per_class: Option<usize>,
    pub initializer: Initializer,
    pub seed: Option<u64>,
    pub pixel_order: PixelOrder,
    pub shuffle: bool,
    pub resolution: Option<(u32, u32)>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            dataset_dir: PathBuf::from("translated_dataset"),
            hidden_layers: 2,
            learning_rate: 0.01,
            epochs: 1,
            samples_per_class: None,
            initializer: Initializer::HeNormal,
            seed: None,
            pixel_order: PixelOrder::RowMajor,
            shuffle: true,
            resolution: None,
        }
    }
}

impl TrainConfig {
    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a config from a JSON file. Missing fields take their
    /// default values.
    pub fn load_json(path: impl AsRef<Path>) -> Result<TrainConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
