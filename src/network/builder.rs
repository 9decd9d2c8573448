use rand::Rng;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::init::initializer::Initializer;
use crate::network::network::Network;

/// Number of output classes (digits 0-9).
pub const OUTPUT_SIZE: usize = 10;

/// Builds fully connected networks whose hidden layers halve in size.
pub struct NetworkBuilder;

impl NetworkBuilder {
    /// Layer sizes `[input, input/2, input/4, ..., OUTPUT_SIZE]` with
    /// `hidden_layers` halvings between the input and output layers.
    pub fn layer_sizes(input_size: usize, hidden_layers: usize) -> Result<Vec<usize>> {
        if input_size == 0 {
            return Err(Error::InvalidInputSize(input_size));
        }

        let mut sizes = vec![input_size];
        for k in 1..=hidden_layers {
            let size = u32::try_from(k)
                .ok()
                .and_then(|shift| input_size.checked_shr(shift))
                .unwrap_or(0);
            if size == 0 {
                return Err(Error::EmptyLayer { layer: k, size });
            }
            sizes.push(size);
        }
        sizes.push(OUTPUT_SIZE);
        Ok(sizes)
    }

    /// Builds the network, drawing every non-input bias and every edge weight
    /// from `init` with the preceding layer's size as fan-in. Input biases are
    /// zero since they are never applied.
    pub fn build<R: Rng + ?Sized>(
        input_size: usize,
        hidden_layers: usize,
        init: &Initializer,
        rng: &mut R,
    ) -> Result<Network> {
        let sizes = NetworkBuilder::layer_sizes(input_size, hidden_layers)?;
        info!(?sizes, ?init, "building network");

        let mut network = Network::new();
        let mut previous = network.add_layer(&vec![0.0; input_size]);

        for &size in &sizes[1..] {
            let fan_in = previous.len();
            let biases = (0..size)
                .map(|_| init.sample(fan_in, rng))
                .collect::<Result<Vec<f64>>>()?;
            let current = network.add_layer(&biases);

            for &from in &previous {
                for &to in &current {
                    let weight = init.sample(fan_in, rng)?;
                    network.connect(from, to, weight)?;
                }
            }
            debug!(size, fan_in, edges = fan_in * size, "wired layer");
            previous = current;
        }

        info!(
            neurons = network.neuron_count(),
            edges = network.edge_count(),
            "network ready"
        );
        Ok(network)
    }
}
