use crate::error::Result;
use crate::network::{backward::Gradients, network::Network};

pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// Applies one SGD update to the whole network given its pre-computed
    /// gradients.
    pub fn step(&self, network: &mut Network, gradients: &Gradients) -> Result<()> {
        network.apply_gradients(gradients, self.learning_rate)
    }

    /// Full backward pass for one sample: computes every gradient against
    /// `target`, then updates all weights and biases at once. Returns the
    /// gradients that were applied.
    pub fn backward(&self, network: &mut Network, target: &[f64]) -> Result<Gradients> {
        let gradients = network.compute_gradients(target)?;
        self.step(network, &gradients)?;
        Ok(gradients)
    }
}
