use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Strategy used to seed biases and edge weights when a network is built.
///
/// The builder calls [`Initializer::sample`] once per bias and once per edge,
/// passing the size of the preceding layer as `fan_in`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Initializer {
    /// Always returns `value`. Useful for deterministic tests.
    Constant { value: f64 },
    /// Uniform on `[min, max)`.
    Uniform { min: f64, max: f64 },
    /// He initialization: N(0, sqrt(2 / fan_in)).
    ///
    /// Recommended before ReLU layers. The variance 2/fan_in accounts for
    /// ReLU zeroing half of its inputs on average.
    HeNormal,
}

impl Default for Initializer {
    fn default() -> Self {
        Initializer::HeNormal
    }
}

impl Initializer {
    /// Draws one scalar for a connection whose preceding layer has `fan_in` neurons.
    pub fn sample<R: Rng + ?Sized>(&self, fan_in: usize, rng: &mut R) -> Result<f64> {
        match *self {
            Initializer::Constant { value } => Ok(value),
            Initializer::Uniform { min, max } => {
                if !(min < max) || !min.is_finite() || !max.is_finite() {
                    return Err(Error::InvalidRange { min, max });
                }
                Ok(rng.gen_range(min..max))
            }
            Initializer::HeNormal => {
                if fan_in == 0 {
                    return Err(Error::InvalidFanIn(fan_in));
                }
                let std_dev = (2.0 / fan_in as f64).sqrt();
                let normal = Normal::new(0.0, std_dev)
                    .map_err(|_| Error::InvalidFanIn(fan_in))?;
                Ok(normal.sample(rng))
            }
        }
    }
}
