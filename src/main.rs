use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use env_logger::Env;
use log::info;
use vector_cluster::{InitMethod, KMeans, KMeansConfig};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum InitArg {
    /// k distinct samples drawn uniformly at random.
    Random,
    /// Weighted-farthest-point seeding.
    #[value(name = "kmeans++", alias = "k-means++")]
    KmeansPlusPlus,
    /// Experimental k-means|| oversampling.
    KmeansParallel,
}

/// K-means clustering over whitespace-separated vector files.
#[derive(Parser)]
#[command(version, about)]
struct Opts {
    /// Dataset file: one sample per line, coordinates whitespace-separated.
    data: PathBuf,

    /// Number of clusters.
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    num_clusters: u32,

    /// Number of worker threads.
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    num_threads: u32,

    /// Centroid seeding strategy. Defaults to kmeans++, or to random when
    /// the cluster count exceeds 500 (the ++ scan is O(n*k) per seed).
    #[arg(long, value_enum)]
    init: Option<InitArg>,

    /// Iteration cap for the Lloyd loop.
    #[arg(long, default_value_t = 100)]
    max_iter: usize,

    /// Reassignment-ratio convergence threshold.
    #[arg(long, default_value_t = 1e-4)]
    threshold: f32,

    /// Fixed RNG seed for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,

    /// Oversampling factor for kmeans-parallel; defaults to 2k.
    #[arg(long)]
    oversampling: Option<usize>,

    /// Oversampling round count for kmeans-parallel.
    #[arg(long, default_value_t = 5)]
    rounds: usize,

    /// Output path for the fitted centroids.
    #[arg(long, default_value = "kmeans.model")]
    model_out: PathBuf,

    /// Output path for the per-sample labels.
    #[arg(long, default_value = "kmeans.labels")]
    labels_out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(Env::default().filter_or("RUST_LOG", "info"));

    let opts = Opts::parse();
    let k = opts.num_clusters as usize;

    let init_arg = opts.init.unwrap_or(if k > 500 {
        InitArg::Random
    } else {
        InitArg::KmeansPlusPlus
    });
    let init = match init_arg {
        InitArg::Random => InitMethod::Random,
        InitArg::KmeansPlusPlus => InitMethod::KMeansPlusPlus,
        InitArg::KmeansParallel => InitMethod::KMeansParallel {
            oversampling: opts.oversampling.unwrap_or(2 * k),
            rounds: opts.rounds,
        },
    };

    let mut config = KMeansConfig::new(k)
        .with_threads(opts.num_threads as usize)
        .with_max_iter(opts.max_iter)
        .with_threshold(opts.threshold)
        .with_init(init);
    if let Some(seed) = opts.seed {
        config = config.with_seed(seed);
    }

    let mut kmeans: KMeans<f32> = KMeans::new(config);
    let outcome = kmeans
        .fit_file(&opts.data)
        .with_context(|| format!("fitting {}", opts.data.display()))?;
    info!(
        "done: {} iterations, converged={}, final cost={}",
        outcome.iterations, outcome.converged, outcome.cost
    );

    kmeans
        .save_labels(&opts.labels_out)
        .with_context(|| format!("writing labels to {}", opts.labels_out.display()))?;
    kmeans
        .save_model(&opts.model_out)
        .with_context(|| format!("writing model to {}", opts.model_out.display()))?;
    Ok(())
}
