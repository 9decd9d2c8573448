pub mod backward;
pub mod builder;
pub mod graph;
pub mod network;

pub use backward::Gradients;
pub use builder::{NetworkBuilder, OUTPUT_SIZE};
pub use graph::{Edge, EdgeId, Neuron, NeuronId};
pub use network::Network;
