use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationFunction {
    /// `max(x, 0)`, applied element-wise in hidden layers.
    ReLU,
    /// Softmax is a vector-valued activation; the output layer applies it to
    /// the whole logit vector (see `loss::softmax::softmax`).  The element-wise
    /// `function()` and `derivative()` methods are therefore not used for this
    /// variant.
    Softmax,
}

impl ActivationFunction {
    /// Element-wise activation.  For `Softmax` this is the identity: the logit
    /// is kept as-is and normalized later at the layer level.
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::ReLU => if x > 0.0 { x } else { 0.0 },
            ActivationFunction::Softmax => x,
        }
    }

    /// Element-wise derivative of the activation with respect to its
    /// pre-activation input.
    ///
    /// For `Softmax`, the output layer pairs it with cross-entropy and the
    /// combined gradient is `predicted - expected` (already computed by
    /// `CrossEntropyLoss::softmax_gradient()`).  Returning `1.0` here passes
    /// that delta through unchanged without double-applying the Jacobian.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::ReLU => if x > 0.0 { 1.0 } else { 0.0 },
            ActivationFunction::Softmax => 1.0,
        }
    }
}
