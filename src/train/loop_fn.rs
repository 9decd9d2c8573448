use std::time::Instant;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

use crate::encode::bilevel::BilevelImage;
use crate::error::Result;
use crate::network::network::Network;
use crate::optim::sgd::Sgd;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;
use crate::train::trainer::{evaluate, train_sample};

/// Trains `network` for `config.epochs` epochs, one sample at a time, and
/// returns the statistics of every completed epoch.
///
/// Each sample is fully processed (encode, forward, loss, backward) before
/// the next one starts. Sample order is reshuffled every epoch with `rng`
/// when `config.shuffle` is set.
pub fn train_loop<R: Rng + ?Sized>(
    network: &mut Network,
    samples: &[(BilevelImage, usize)],
    config: &TrainConfig,
    rng: &mut R,
) -> Result<Vec<EpochStats>> {
    let optimizer = Sgd::new(config.learning_rate);
    let mut indices: Vec<usize> = (0..samples.len()).collect();
    let mut history = Vec::with_capacity(config.epochs);

    for epoch in 1..=config.epochs {
        let t_start = Instant::now();

        if config.shuffle {
            indices.shuffle(rng);
        }

        let mut total_loss = 0.0;
        for &idx in &indices {
            let (image, label) = &samples[idx];
            total_loss += train_sample(network, image, *label, &optimizer, config.pixel_order)?;
        }
        let train_loss = if samples.is_empty() { 0.0 } else { total_loss / samples.len() as f64 };

        let eval = evaluate(network, samples, config.pixel_order)?;
        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            train_loss,
            train_accuracy: eval.accuracy,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };
        info!(
            epoch,
            total = config.epochs,
            loss = stats.train_loss,
            accuracy = stats.train_accuracy,
            elapsed_ms = stats.elapsed_ms,
            "epoch complete"
        );
        history.push(stats);
    }

    Ok(history)
}
