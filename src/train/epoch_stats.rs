use serde::{Deserialize, Serialize};

/// Per-epoch training statistics returned by `train_loop`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Mean cross-entropy loss over all samples, measured before each
    /// sample's update.
    pub train_loss: f64,
    /// Fraction in [0, 1] of samples classified correctly after the epoch.
    pub train_accuracy: f64,
    /// Wall-clock duration of this single epoch in milliseconds.
    pub elapsed_ms: u64,
}
