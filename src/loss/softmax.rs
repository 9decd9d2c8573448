/// Numerically stable softmax.
///
/// The maximum logit is subtracted before exponentiating so large logits do
/// not overflow. The result is non-negative and sums to 1. An empty slice
/// yields an empty vector.
pub fn softmax(logits: &[f64]) -> Vec<f64> {
    let max_logit = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let exps: Vec<f64> = logits.iter().map(|&z| (z - max_logit).exp()).collect();
    let sum: f64 = exps.iter().sum();

    exps.into_iter().map(|e| e / sum).collect()
}

/// Jacobian of softmax with respect to its logits, given the softmax output `p`:
///   J[i][i] = p_i * (1 - p_i)
///   J[i][j] = -p_i * p_j   (i != j)
pub fn softmax_jacobian(softmax_output: &[f64]) -> Vec<Vec<f64>> {
    softmax_output.iter().enumerate()
        .map(|(i, &p_i)| {
            softmax_output.iter().enumerate()
                .map(|(j, &p_j)| if i == j { p_i * (1.0 - p_i) } else { -p_i * p_j })
                .collect()
        })
        .collect()
}
