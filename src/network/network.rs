use crate::activation::activation::ActivationFunction;
use crate::error::{check_len, Error, Result};
use crate::loss::softmax::softmax;
use crate::network::graph::{Edge, EdgeId, Neuron, NeuronId};

const HIDDEN_ACTIVATION: ActivationFunction = ActivationFunction::ReLU;

/// A layered graph of neurons.
///
/// Neurons and edges live in two arenas and refer to each other by handle.
/// The ordered layer list is fixed once built: layer 0 is the input layer and
/// the last layer is the output layer, one neuron per class.
#[derive(Debug, Clone, Default)]
pub struct Network {
    neurons: Vec<Neuron>,
    edges: Vec<Edge>,
    layers: Vec<Vec<NeuronId>>,
}

impl Network {
    pub fn new() -> Network {
        Network::default()
    }

    /// Appends a layer with one neuron per bias and returns the new handles.
    pub fn add_layer(&mut self, biases: &[f64]) -> Vec<NeuronId> {
        let layer = self.layers.len();
        let ids: Vec<NeuronId> = biases.iter()
            .map(|&bias| {
                let id = NeuronId(self.neurons.len());
                self.neurons.push(Neuron::new(layer, bias));
                id
            })
            .collect();
        self.layers.push(ids.clone());
        ids
    }

    /// Adds an edge from a neuron in layer `i` to a neuron in layer `i + 1`.
    /// The edge is registered in `from`'s output list and `to`'s input list.
    pub fn connect(&mut self, from: NeuronId, to: NeuronId, weight: f64) -> Result<EdgeId> {
        let invalid = Error::InvalidConnection { from: from.0, to: to.0 };
        let (from_layer, to_layer) = match (self.neurons.get(from.0), self.neurons.get(to.0)) {
            (Some(a), Some(b)) => (a.layer, b.layer),
            _ => return Err(invalid),
        };
        if to_layer != from_layer + 1 {
            return Err(invalid);
        }

        let id = EdgeId(self.edges.len());
        self.edges.push(Edge { from, to, weight });
        self.neurons[from.0].output.push(id);
        self.neurons[to.0].input.push(id);
        Ok(id)
    }

    pub fn layers(&self) -> &[Vec<NeuronId>] {
        &self.layers
    }

    pub fn layer_sizes(&self) -> Vec<usize> {
        self.layers.iter().map(Vec::len).collect()
    }

    pub fn input_layer(&self) -> &[NeuronId] {
        self.layers.first().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn output_layer(&self) -> &[NeuronId] {
        self.layers.last().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Panics if `id` was not issued by this network.
    pub fn neuron(&self, id: NeuronId) -> &Neuron {
        &self.neurons[id.0]
    }

    /// Panics if `id` was not issued by this network.
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.0]
    }

    pub fn neuron_count(&self) -> usize {
        self.neurons.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub(crate) fn neurons_and_edges_mut(&mut self) -> (&mut [Neuron], &mut [Edge]) {
        (&mut self.neurons, &mut self.edges)
    }

    /// Panics if `id` was not issued by this network.
    pub fn weight(&self, id: EdgeId) -> f64 {
        self.edges[id.0].weight
    }

    /// Panics if `id` was not issued by this network.
    pub fn set_weight(&mut self, id: EdgeId, weight: f64) {
        self.edges[id.0].weight = weight;
    }

    /// Panics if `id` was not issued by this network.
    pub fn set_bias(&mut self, id: NeuronId, bias: f64) {
        self.neurons[id.0].bias = bias;
    }

    /// Overwrites the activation of every input neuron.
    pub fn set_input(&mut self, activations: &[f64]) -> Result<()> {
        check_len("input layer", self.input_layer().len(), activations.len())?;
        let Network { neurons, layers, .. } = self;
        let Some(input) = layers.first() else {
            return Ok(());
        };
        for (&id, &a) in input.iter().zip(activations) {
            neurons[id.0].activation = a;
            neurons[id.0].pre_activation = a;
        }
        Ok(())
    }

    /// Current output activations, in class order.
    pub fn output_activations(&self) -> Vec<f64> {
        self.output_layer().iter().map(|id| self.neurons[id.0].activation).collect()
    }

    /// Output logits from the last forward pass, in class order.
    pub fn logits(&self) -> Vec<f64> {
        self.output_layer().iter().map(|id| self.neurons[id.0].pre_activation).collect()
    }

    /// Forward pass over the current input activations. Returns the softmax
    /// probabilities of the output layer, which are also stored as the output
    /// neurons' activations.
    ///
    /// Hidden layers are swept frontier by frontier: every neuron in the
    /// frontier pushes `weight * activation` along its outgoing edges, then
    /// each touched neuron becomes `ReLU(sum + bias)`. The sweep stops before
    /// the output layer, whose logits go through softmax instead.
    pub fn forward(&mut self) -> Vec<f64> {
        let depth = self.layers.len();
        if depth < 2 {
            return self.output_activations();
        }

        let Network { neurons, edges, layers } = self;
        let mut sums = vec![0.0; neurons.len()];

        for k in 1..depth - 1 {
            for &src in &layers[k - 1] {
                let activation = neurons[src.0].activation;
                for &e in &neurons[src.0].output {
                    let edge = &edges[e.0];
                    sums[edge.to.0] += edge.weight * activation;
                }
            }
            for &dst in &layers[k] {
                let neuron = &mut neurons[dst.0];
                neuron.pre_activation = sums[dst.0] + neuron.bias;
                neuron.activation = HIDDEN_ACTIVATION.function(neuron.pre_activation);
            }
        }

        let output = &layers[depth - 1];
        let logits: Vec<f64> = output.iter()
            .map(|&id| {
                let neuron = &neurons[id.0];
                let sum: f64 = neuron.input.iter()
                    .map(|&e| {
                        let edge = &edges[e.0];
                        edge.weight * neurons[edge.from.0].activation
                    })
                    .sum();
                sum + neuron.bias
            })
            .collect();

        let probabilities = softmax(&logits);
        for ((&id, &z), &p) in output.iter().zip(&logits).zip(&probabilities) {
            neurons[id.0].pre_activation = z;
            neurons[id.0].activation = p;
        }
        probabilities
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_rejects_non_adjacent_layers() {
        let mut net = Network::new();
        let a = net.add_layer(&[0.0]);
        let b = net.add_layer(&[0.0]);
        let c = net.add_layer(&[0.0]);
        assert!(net.connect(a[0], b[0], 1.0).is_ok());
        assert!(matches!(net.connect(a[0], c[0], 1.0), Err(Error::InvalidConnection { .. })));
        assert!(matches!(net.connect(b[0], a[0], 1.0), Err(Error::InvalidConnection { .. })));
        assert!(matches!(net.connect(b[0], b[0], 1.0), Err(Error::InvalidConnection { .. })));
    }

    #[test]
    fn edge_is_shared_by_both_endpoints() {
        let mut net = Network::new();
        let a = net.add_layer(&[0.0]);
        let b = net.add_layer(&[0.0]);
        let e = net.connect(a[0], b[0], 0.5).unwrap();
        assert_eq!(net.neuron(a[0]).output(), &[e]);
        assert_eq!(net.neuron(b[0]).input(), &[e]);

        net.set_weight(e, -2.0);
        let via_source = net.neuron(a[0]).output()[0];
        let via_dest = net.neuron(b[0]).input()[0];
        assert_eq!(net.weight(via_source), -2.0);
        assert_eq!(net.weight(via_dest), -2.0);
    }

    #[test]
    #[should_panic]
    fn foreign_edge_handle_panics() {
        let mut other = Network::new();
        let a = other.add_layer(&[0.0]);
        let b = other.add_layer(&[0.0, 0.0]);
        other.connect(a[0], b[0], 1.0).unwrap();
        let e = other.connect(a[0], b[1], 1.0).unwrap();

        let mut net = Network::new();
        let c = net.add_layer(&[0.0]);
        let d = net.add_layer(&[0.0]);
        net.connect(c[0], d[0], 1.0).unwrap();
        net.set_weight(e, 0.0);
    }

    #[test]
    fn set_input_checks_length() {
        let mut net = Network::new();
        net.add_layer(&[0.0, 0.0]);
        let err = net.set_input(&[1.0]).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { expected: 2, actual: 1, .. }));
    }

    #[test]
    fn output_layer_skips_relu() {
        // A strongly negative logit must survive to softmax, not be clamped to 0.
        let mut net = Network::new();
        let input = net.add_layer(&[0.0]);
        let out = net.add_layer(&[-5.0, 0.0]);
        net.connect(input[0], out[0], 1.0).unwrap();
        net.connect(input[0], out[1], 1.0).unwrap();
        net.set_input(&[1.0]).unwrap();

        let p = net.forward();
        assert_eq!(net.logits(), vec![-4.0, 1.0]);
        assert_eq!(p, softmax(&[-4.0, 1.0]));
    }
}
