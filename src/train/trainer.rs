use tracing::debug;

use crate::dataset::layout::one_hot;
use crate::encode::bilevel::{encode, BilevelImage, PixelOrder};
use crate::error::Result;
use crate::loss::cross_entropy::CrossEntropyLoss;
use crate::network::network::Network;
use crate::optim::sgd::Sgd;

/// Mean loss and accuracy over a set of samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub loss: f64,
    pub accuracy: f64,
}

/// Runs one labelled image through encode → forward → loss → backward and
/// returns the loss measured before the update.
pub fn train_sample(
    network: &mut Network,
    image: &BilevelImage,
    label: usize,
    optimizer: &Sgd,
    order: PixelOrder,
) -> Result<f64> {
    let target = one_hot(label, network.output_layer().len())?;

    encode(network, image, order)?;
    let predicted = network.forward();
    let loss = CrossEntropyLoss::loss(&target, &predicted)?;
    debug!(label, loss, "trained sample");

    optimizer.backward(network, &target)?;
    Ok(loss)
}

/// Class with the highest output probability for `image`.
pub fn predict(network: &mut Network, image: &BilevelImage, order: PixelOrder) -> Result<usize> {
    encode(network, image, order)?;
    Ok(argmax(&network.forward()))
}

/// Mean loss and accuracy without touching weights or biases.
pub fn evaluate(
    network: &mut Network,
    samples: &[(BilevelImage, usize)],
    order: PixelOrder,
) -> Result<Evaluation> {
    if samples.is_empty() {
        return Ok(Evaluation { loss: 0.0, accuracy: 0.0 });
    }

    let classes = network.output_layer().len();
    let mut total_loss = 0.0;
    let mut correct = 0usize;
    for (image, label) in samples {
        let target = one_hot(*label, classes)?;
        encode(network, image, order)?;
        let predicted = network.forward();
        total_loss += CrossEntropyLoss::loss(&target, &predicted)?;
        if argmax(&predicted) == *label {
            correct += 1;
        }
    }

    let n = samples.len() as f64;
    Ok(Evaluation { loss: total_loss / n, accuracy: correct as f64 / n })
}

/// Index of the maximum element in a slice.
pub fn argmax(v: &[f64]) -> usize {
    v.iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0)
}
