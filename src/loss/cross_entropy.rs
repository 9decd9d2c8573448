use crate::error::{check_len, Result};

/// Categorical cross-entropy loss for use with a softmax output layer.
pub struct CrossEntropyLoss;

/// Small epsilon added to the denominator of the partial derivative to
/// prevent division by zero.
const EPS: f64 = 1e-15;

impl CrossEntropyLoss {
    /// Computes the scalar cross-entropy loss:
    ///   L = -sum(expected[i] * ln(predicted[i]))
    ///
    /// `expected` : one-hot (or soft) target distribution, shape [n_classes]
    /// `predicted`: softmax probabilities, shape [n_classes]
    ///
    /// Classes with a zero target contribute nothing, so `0 * ln(0)` is
    /// treated as 0. A zero prediction for a class with a positive target
    /// yields `+inf`; no clamping is applied.
    pub fn loss(expected: &[f64], predicted: &[f64]) -> Result<f64> {
        check_len("cross-entropy loss", expected.len(), predicted.len())?;
        let sum: f64 = expected.iter().zip(predicted.iter())
            .filter(|(e, _)| **e != 0.0)
            .map(|(e, p)| e * p.ln())
            .sum();
        Ok(-sum)
    }

    /// ∂L/∂p_i of the cross-entropy with respect to each softmax output:
    ///   -target[i] / (softmax_output[i] + eps)
    ///
    /// Entries whose softmax output is exactly zero are 0.
    pub fn partial_derivative(softmax_output: &[f64], target: &[f64]) -> Result<Vec<f64>> {
        check_len("cross-entropy derivative", target.len(), softmax_output.len())?;
        Ok(softmax_output.iter().zip(target.iter())
            .map(|(&p, &t)| if p == 0.0 { 0.0 } else { -t / (p + EPS) })
            .collect())
    }

    /// Gradient of the combined softmax + cross-entropy w.r.t. the pre-softmax
    /// logits.
    ///
    /// When softmax and cross-entropy are composed together the gradient
    /// simplifies to:
    ///   ∂L/∂z_i = predicted[i] - expected[i]   (element-wise)
    ///
    /// This is the initial delta that seeds the backward pass.
    pub fn softmax_gradient(softmax_output: &[f64], target: &[f64]) -> Result<Vec<f64>> {
        check_len("softmax cross-entropy gradient", target.len(), softmax_output.len())?;
        Ok(softmax_output.iter().zip(target.iter())
            .map(|(p, t)| p - t)
            .collect())
    }
}
