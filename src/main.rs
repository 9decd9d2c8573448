//! glyph-nn command-line tool.
//!
//! Trains the glyph classifier on a class-per-directory dataset and provides
//! the dataset checks and preprocessing it depends on.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::{rngs::StdRng, SeedableRng};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use glyph_nn::dataset::raster::{self, DEFAULT_RESOLUTION, DEFAULT_THRESHOLD};
use glyph_nn::{train_loop, Dataset, NetworkBuilder, TrainConfig};

#[derive(Parser)]
#[command(name = "glyph-nn")]
#[command(about = "From-scratch MLP for bilevel glyph images", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level: trace, debug, info, warn or error
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a freshly initialized network on a binarized dataset
    Train {
        /// JSON training configuration; flags below override its fields
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Dataset directory with subdirectories 0..9
        #[arg(short, long)]
        dataset: Option<PathBuf>,

        /// Number of hidden layers
        #[arg(long)]
        hidden_layers: Option<usize>,

        /// SGD learning rate
        #[arg(long)]
        learning_rate: Option<f64>,

        /// Number of epochs
        #[arg(short, long)]
        epochs: Option<usize>,

        /// Use at most this many images per class
        #[arg(long)]
        samples_per_class: Option<usize>,

        /// RNG seed for initialization and shuffling
        #[arg(long)]
        seed: Option<u64>,

        /// Write the effective configuration to this path and continue
        #[arg(long)]
        save_config: Option<PathBuf>,
    },

    /// Check that every dataset image is black/white at one resolution
    Verify {
        #[arg(short, long, default_value = "dataset")]
        dataset: PathBuf,

        #[arg(long, default_value_t = DEFAULT_RESOLUTION.0)]
        width: u32,

        #[arg(long, default_value_t = DEFAULT_RESOLUTION.1)]
        height: u32,
    },

    /// Convert a dataset to pure black/white PNGs
    Binarize {
        #[arg(short, long, default_value = "dataset")]
        source: PathBuf,

        #[arg(short, long, default_value = "translated_dataset")]
        dest: PathBuf,

        /// Mean RGB value below which a pixel becomes black
        #[arg(short, long, default_value_t = DEFAULT_THRESHOLD)]
        threshold: u8,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let subscriber = FmtSubscriber::builder().with_max_level(cli.log_level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Train {
            config,
            dataset,
            hidden_layers,
            learning_rate,
            epochs,
            samples_per_class,
            seed,
            save_config,
        } => {
            let mut cfg = match config {
                Some(path) => TrainConfig::load_json(&path)
                    .with_context(|| format!("could not load config {}", path.display()))?,
                None => TrainConfig::default(),
            };
            if let Some(v) = dataset { cfg.dataset_dir = v; }
            if let Some(v) = hidden_layers { cfg.hidden_layers = v; }
            if let Some(v) = learning_rate { cfg.learning_rate = v; }
            if let Some(v) = epochs { cfg.epochs = v; }
            if let Some(v) = samples_per_class { cfg.samples_per_class = Some(v); }
            if let Some(v) = seed { cfg.seed = Some(v); }

            if let Some(path) = save_config {
                cfg.save_json(&path)
                    .with_context(|| format!("could not write config {}", path.display()))?;
            }

            run_training(&cfg)
        }

        Commands::Verify { dataset, width, height } => {
            info!("checking dataset {}", dataset.display());
            let ds = Dataset::open(&dataset).context("could not read dataset")?;
            let count = raster::verify(&ds, (width, height)).context("dataset verification failed")?;
            println!("all {} images are {}x{} black/white", count, width, height);
            Ok(())
        }

        Commands::Binarize { source, dest, threshold } => {
            let ds = Dataset::open(&source).context("could not read dataset")?;
            let count = raster::binarize_dataset(&ds, &dest, threshold)
                .context("could not binarize dataset")?;
            println!("wrote {} images to {}", count, dest.display());
            Ok(())
        }
    }
}

fn run_training(cfg: &TrainConfig) -> Result<()> {
    let mut ds = Dataset::open(&cfg.dataset_dir)
        .with_context(|| format!("could not read dataset {}", cfg.dataset_dir.display()))?;
    if let Some(limit) = cfg.samples_per_class {
        ds.limit_per_class(limit);
    }

    let resolution = match cfg.resolution {
        Some(r) => r,
        None => raster::detect_resolution(&ds).context("could not determine image resolution")?,
    };
    raster::verify(&ds, resolution).context("dataset verification failed")?;
    let input_size = resolution.0 as usize * resolution.1 as usize;

    let mut rng = match cfg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut network = NetworkBuilder::build(input_size, cfg.hidden_layers, &cfg.initializer, &mut rng)
        .context("could not build network")?;
    info!(layers = ?network.layer_sizes(), "created network");

    let samples = raster::load_samples(&ds).context("could not load images")?;
    info!(count = samples.len(), "loaded images");

    let history = train_loop(&mut network, &samples, cfg, &mut rng).context("training failed")?;

    println!("{:>6} {:>12} {:>10} {:>10}", "epoch", "mean loss", "accuracy", "ms");
    for s in &history {
        println!(
            "{:>6} {:>12.6} {:>9.2}% {:>10}",
            s.epoch, s.train_loss, s.train_accuracy * 100.0, s.elapsed_ms
        );
    }
    info!("done");
    Ok(())
}
