pub mod cross_entropy;
pub mod softmax;

pub use cross_entropy::CrossEntropyLoss;
pub use softmax::{softmax, softmax_jacobian};
