/// Handle to a neuron in a [`Network`](super::Network) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NeuronId(pub(crate) usize);

/// Handle to an edge in a [`Network`](super::Network) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub(crate) usize);

impl NeuronId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl EdgeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Neuron {
    /// Output of the last forward pass (raw pixel value for input neurons,
    /// softmax probability for output neurons).
    pub activation: f64,
    /// Weighted sum plus bias from the last forward pass; needed for the
    /// ReLU derivative. Holds the logit for output neurons.
    pub pre_activation: f64,
    pub bias: f64,
    pub(crate) layer: usize,
    pub(crate) input: Vec<EdgeId>,
    pub(crate) output: Vec<EdgeId>,
}

impl Neuron {
    pub(crate) fn new(layer: usize, bias: f64) -> Neuron {
        Neuron {
            activation: 0.0,
            pre_activation: 0.0,
            bias,
            layer,
            input: Vec::new(),
            output: Vec::new(),
        }
    }

    pub fn layer(&self) -> usize {
        self.layer
    }

    /// Incoming edges, in connection order.
    pub fn input(&self) -> &[EdgeId] {
        &self.input
    }

    /// Outgoing edges, in connection order.
    pub fn output(&self) -> &[EdgeId] {
        &self.output
    }
}

/// A weighted connection. The weight lives here only; both endpoints refer
/// to it by [`EdgeId`].
#[derive(Debug, Clone)]
pub struct Edge {
    pub from: NeuronId,
    pub to: NeuronId,
    pub weight: f64,
}
