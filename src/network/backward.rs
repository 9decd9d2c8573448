use crate::activation::activation::ActivationFunction;
use crate::error::{check_len, Result};
use crate::loss::cross_entropy::CrossEntropyLoss;
use crate::network::network::Network;

/// ∂L/∂w per edge and ∂L/∂b per neuron, indexed like the network arenas.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradients {
    pub weights: Vec<f64>,
    pub biases: Vec<f64>,
}

impl Network {
    /// Backpropagates the softmax cross-entropy loss against `target` through
    /// the activations left by the last forward pass.
    ///
    /// The output delta is `predicted - target`. Moving back one layer, each
    /// hidden neuron's delta is `relu'(z) * sum(w * delta_dest)` over its
    /// outgoing edges. Every edge gets `delta_dest * source.activation` and
    /// every non-input neuron gets its own delta as bias gradient. Nothing is
    /// written to the network; weights are read as they were before any update.
    pub fn compute_gradients(&self, target: &[f64]) -> Result<Gradients> {
        let output = self.output_layer();
        check_len("backward target", output.len(), target.len())?;

        let mut weights = vec![0.0; self.edge_count()];
        let mut biases = vec![0.0; self.neuron_count()];
        let depth = self.layers().len();
        if depth < 2 {
            return Ok(Gradients { weights, biases });
        }

        let predicted = self.output_activations();
        let output_delta = CrossEntropyLoss::softmax_gradient(&predicted, target)?;

        // Deltas are ∂L/∂z, keyed by neuron index.
        let mut delta = vec![0.0; self.neuron_count()];
        for (&id, &d) in output.iter().zip(&output_delta) {
            let z = self.neuron(id).pre_activation;
            delta[id.index()] = d * ActivationFunction::Softmax.derivative(z);
        }

        for k in (1..depth).rev() {
            let propagate = k > 1;
            let mut upstream = vec![0.0; self.neuron_count()];

            for &dst in &self.layers()[k] {
                let d = delta[dst.index()];
                biases[dst.index()] = d;
                for &e in self.neuron(dst).input() {
                    let edge = self.edge(e);
                    weights[e.index()] = d * self.neuron(edge.from).activation;
                    if propagate {
                        upstream[edge.from.index()] += edge.weight * d;
                    }
                }
            }

            if propagate {
                for &src in &self.layers()[k - 1] {
                    let z = self.neuron(src).pre_activation;
                    delta[src.index()] = upstream[src.index()] * ActivationFunction::ReLU.derivative(z);
                }
            }
        }

        Ok(Gradients { weights, biases })
    }

    /// Applies `w -= lr * dw` to every edge and `b -= lr * db` to every
    /// non-input neuron.
    pub fn apply_gradients(&mut self, gradients: &Gradients, lr: f64) -> Result<()> {
        check_len("weight gradients", self.edge_count(), gradients.weights.len())?;
        check_len("bias gradients", self.neuron_count(), gradients.biases.len())?;

        let (neurons, edges) = self.neurons_and_edges_mut();
        for (edge, dw) in edges.iter_mut().zip(&gradients.weights) {
            edge.weight -= lr * dw;
        }
        for (neuron, db) in neurons.iter_mut().zip(&gradients.biases) {
            if neuron.layer() > 0 {
                neuron.bias -= lr * db;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::graph::NeuronId;

    /// 1 input -> 1 hidden -> 2 outputs, all values hand-picked.
    fn tiny() -> (Network, Vec<NeuronId>) {
        let mut net = Network::new();
        let i = net.add_layer(&[0.0]);
        let h = net.add_layer(&[0.1]);
        let o = net.add_layer(&[0.0, 0.2]);
        net.connect(i[0], h[0], 0.5).unwrap();
        net.connect(h[0], o[0], 1.5).unwrap();
        net.connect(h[0], o[1], -0.5).unwrap();
        (net, vec![i[0], h[0], o[0], o[1]])
    }

    #[test]
    fn gradients_follow_the_chain_rule() {
        let (mut net, ids) = tiny();
        net.set_input(&[2.0]).unwrap();
        let p = net.forward();

        let grads = net.compute_gradients(&[1.0, 0.0]).unwrap();
        let h = 0.5 * 2.0 + 0.1;
        let d0 = p[0] - 1.0;
        let d1 = p[1];

        assert!((grads.biases[ids[2].index()] - d0).abs() < 1e-12);
        assert!((grads.biases[ids[3].index()] - d1).abs() < 1e-12);
        assert!((grads.weights[1] - d0 * h).abs() < 1e-12);
        assert!((grads.weights[2] - d1 * h).abs() < 1e-12);

        let d_hidden = 1.5 * d0 + -0.5 * d1;
        assert!((grads.biases[ids[1].index()] - d_hidden).abs() < 1e-12);
        assert!((grads.weights[0] - d_hidden * 2.0).abs() < 1e-12);
        assert_eq!(grads.biases[ids[0].index()], 0.0);
    }

    #[test]
    fn dead_relu_blocks_gradient() {
        let (mut net, ids) = tiny();
        net.set_input(&[-2.0]).unwrap();
        net.forward();
        let grads = net.compute_gradients(&[0.0, 1.0]).unwrap();
        assert_eq!(grads.biases[ids[1].index()], 0.0);
        assert_eq!(grads.weights[0], 0.0);
    }

    #[test]
    fn gradients_match_finite_differences() {
        let (mut net, _) = tiny();
        let target = [0.0, 1.0];
        net.set_input(&[1.3]).unwrap();
        net.forward();
        let grads = net.compute_gradients(&target).unwrap();

        let h = 1e-6;
        for e in 0..net.edge_count() {
            let id = crate::network::graph::EdgeId(e);
            let w = net.weight(id);
            let mut nudged = net.clone();
            nudged.set_weight(id, w + h);
            let up = CrossEntropyLoss::loss(&target, &nudged.forward()).unwrap();
            nudged.set_weight(id, w - h);
            let down = CrossEntropyLoss::loss(&target, &nudged.forward()).unwrap();
            let numeric = (up - down) / (2.0 * h);
            assert!((numeric - grads.weights[e]).abs() < 1e-6, "edge {e}: {numeric} vs {}", grads.weights[e]);
        }
    }

    #[test]
    fn apply_updates_weights_and_non_input_biases() {
        let (mut net, ids) = tiny();
        let grads = Gradients {
            weights: vec![1.0, 2.0, -1.0],
            biases: vec![5.0, 1.0, 1.0, -2.0],
        };
        net.apply_gradients(&grads, 0.1).unwrap();
        let weights: Vec<f64> = net.edges().iter().map(|e| e.weight).collect();
        assert!((weights[0] - 0.4).abs() < 1e-12);
        assert!((weights[1] - 1.3).abs() < 1e-12);
        assert!((weights[2] + 0.4).abs() < 1e-12);
        assert_eq!(net.neuron(ids[0]).bias, 0.0);
        assert!((net.neuron(ids[1]).bias - 0.0).abs() < 1e-12);
        assert!((net.neuron(ids[3]).bias - 0.4).abs() < 1e-12);
    }

    #[test]
    fn rejects_target_of_wrong_length() {
        let (mut net, _) = tiny();
        net.set_input(&[1.0]).unwrap();
        net.forward();
        assert!(net.compute_gradients(&[1.0, 0.0, 0.0]).is_err());
    }
}
