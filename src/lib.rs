pub mod activation;
pub mod dataset;
pub mod encode;
pub mod error;
pub mod init;
pub mod loss;
pub mod network;
pub mod optim;
pub mod train;

// Convenience re-exports
pub use activation::activation::ActivationFunction;
pub use dataset::layout::{one_hot, Dataset};
pub use encode::bilevel::{encode, BilevelImage, Pixel, PixelOrder};
pub use error::{Error, Result};
pub use init::initializer::Initializer;
pub use loss::cross_entropy::CrossEntropyLoss;
pub use loss::softmax::{softmax, softmax_jacobian};
pub use network::backward::Gradients;
pub use network::builder::{NetworkBuilder, OUTPUT_SIZE};
pub use network::network::Network;
pub use optim::sgd::Sgd;
pub use train::{train_loop, train_sample, TrainConfig};
