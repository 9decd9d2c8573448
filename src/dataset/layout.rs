use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::network::builder::OUTPUT_SIZE;

/// One labelled image file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub path: PathBuf,
    pub label: usize,
}

/// A dataset directory with one subdirectory per class, named `"0"`..`"9"`.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub root: PathBuf,
    pub samples: Vec<Sample>,
}

impl Dataset {
    /// Scans every class directory under `root`. Files inside each class are
    /// sorted by name so sample order is stable across runs.
    pub fn open(root: impl AsRef<Path>) -> Result<Dataset> {
        let root = root.as_ref().to_path_buf();
        let mut samples = Vec::new();

        for label in 0..OUTPUT_SIZE {
            let dir = class_dir(&root, label);
            if !dir.is_dir() {
                return Err(Error::MissingClassDir(dir));
            }

            let mut files = Vec::new();
            for entry in fs::read_dir(&dir)? {
                let entry = entry?;
                if entry.file_type()?.is_file() {
                    files.push(entry.path());
                }
            }
            files.sort();
            debug!(label, count = files.len(), dir = %dir.display(), "scanned class");

            samples.extend(files.into_iter().map(|path| Sample { path, label }));
        }

        if samples.is_empty() {
            return Err(Error::EmptyDataset(root));
        }
        Ok(Dataset { root, samples })
    }

    /// Keeps at most `limit` samples of each class, in file-name order.
    pub fn limit_per_class(&mut self, limit: usize) {
        let mut seen = [0usize; OUTPUT_SIZE];
        self.samples.retain(|s| {
            seen[s.label] += 1;
            seen[s.label] <= limit
        });
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of samples per class label.
    pub fn class_counts(&self) -> [usize; OUTPUT_SIZE] {
        let mut counts = [0usize; OUTPUT_SIZE];
        for s in &self.samples {
            counts[s.label] += 1;
        }
        counts
    }
}

pub fn class_dir(root: &Path, label: usize) -> PathBuf {
    root.join(label.to_string())
}

/// One-hot target of length `classes` with a 1 at `label`.
pub fn one_hot(label: usize, classes: usize) -> Result<Vec<f64>> {
    if label >= classes {
        return Err(Error::InvalidLabel { label, classes });
    }
    let mut target = vec![0.0; classes];
    target[label] = 1.0;
    Ok(target)
}
