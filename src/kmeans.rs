use std::path::Path;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::assign;
use crate::dataset;
use crate::error::{ClusterError, Result};
use crate::init::{self, InitMethod};
use crate::lloyd;
use crate::model;
use crate::utils::Scalar;

/// Tuning knobs for a k-means run. Immutable while `fit` executes; adjust
/// through the builder methods or the [`KMeans`] setters beforehand.
#[derive(Debug, Clone)]
pub struct KMeansConfig {
    /// Number of centroids to fit.
    pub n_clusters: usize,
    /// Worker threads for the parallel paths; 1 selects the sequential ones.
    pub n_threads: usize,
    /// Iteration cap for the Lloyd loop.
    pub max_iter: usize,
    /// Convergence threshold on the per-iteration reassignment ratio.
    pub threshold: f32,
    /// Centroid seeding strategy.
    pub init: InitMethod,
    /// Fixed RNG seed for reproducible runs; `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            n_clusters: 8,
            n_threads: 1,
            max_iter: 100,
            threshold: 1e-4,
            init: InitMethod::KMeansPlusPlus,
            seed: None,
        }
    }
}

impl KMeansConfig {
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            ..Default::default()
        }
    }

    pub fn with_clusters(mut self, n_clusters: usize) -> Self {
        self.n_clusters = n_clusters;
        self
    }

    pub fn with_threads(mut self, n_threads: usize) -> Self {
        self.n_threads = n_threads;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_init(mut self, init: InitMethod) -> Self {
        self.init = init;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Diagnostics from one [`KMeans::fit`] run.
#[derive(Debug, Clone, Copy)]
pub struct FitOutcome<T> {
    /// Lloyd iterations executed.
    pub iterations: usize,
    /// Reassignment ratio of the final iteration.
    pub reassign_ratio: f32,
    /// Total squared-distance cost of the final iteration.
    pub cost: T,
    /// Whether the run stopped on the ratio threshold rather than the cap.
    pub converged: bool,
}

/// K-means fit controller: owns the configuration and the model state
/// (centroids, per-sample labels, per-cluster membership lists) and drives
/// seeding, Lloyd iteration, prediction and persistence.
pub struct KMeans<T: Scalar> {
    config: KMeansConfig,
    centroids: Vec<Vec<T>>,
    labels: Vec<i32>,
    members: Vec<Vec<usize>>,
}

impl<T: Scalar> Default for KMeans<T> {
    fn default() -> Self {
        Self::new(KMeansConfig::default())
    }
}

impl<T: Scalar> KMeans<T> {
    pub fn new(config: KMeansConfig) -> Self {
        Self {
            config,
            centroids: Vec::new(),
            labels: Vec::new(),
            members: Vec::new(),
        }
    }

    /// Fit the model to `data`.
    ///
    /// Model state is re-initialized from scratch on every call; a second
    /// `fit` never resumes from the previous solution. The loop always runs
    /// at least one iteration (the ratio starts at 1.0) and stops when the
    /// reassignment ratio drops below the threshold or the iteration cap is
    /// reached.
    pub fn fit(&mut self, data: &[Vec<T>]) -> Result<FitOutcome<T>> {
        if data.is_empty() {
            return Err(ClusterError::Config("dataset is empty".into()));
        }
        let dim = dataset::check_dimensions(data)?;
        let k = self.config.n_clusters;
        info!("fitting data with n={} d={dim} k={k}", data.len());

        let pool = self.build_pool()?;

        self.labels = vec![-1; data.len()];
        self.members = vec![Vec::new(); k];

        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        info!("seeding centroids with {}", self.config.init);
        let init_method = self.config.init;
        self.centroids = match &pool {
            Some(pool) => {
                pool.install(|| init::seed_centroids(init_method, data, k, &mut rng, true))?
            }
            None => init::seed_centroids(init_method, data, k, &mut rng, false)?,
        };
        for (i, centroid) in self.centroids.iter().enumerate() {
            debug!(
                "centroid[{i}]: {}",
                centroid
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            );
        }

        info!("start clustering");
        let centroids = &mut self.centroids;
        let labels = &mut self.labels;
        let members = &mut self.members;
        let n_threads = self.config.n_threads;

        let mut iter = 0usize;
        let mut ratio = 1.0f32;
        let mut cost = T::zero();
        while iter < self.config.max_iter && ratio >= self.config.threshold {
            let stats = match &pool {
                Some(pool) => pool.install(|| {
                    lloyd::parallel_step(data, centroids, labels, members, n_threads)
                })?,
                None => lloyd::sequential_step(data, centroids, labels, members)?,
            };
            ratio = stats.reassigned as f32 / data.len() as f32;
            cost = stats.cost;
            iter += 1;
            info!("iter: {iter} reassign_ratio: {ratio} cost: {cost}");
        }
        info!("finished after {iter} iterations");

        Ok(FitOutcome {
            iterations: iter,
            reassign_ratio: ratio,
            cost,
            converged: ratio < self.config.threshold,
        })
    }

    /// Load a dataset file and fit to it; I/O and parse failures from
    /// loading surface unchanged.
    pub fn fit_file(&mut self, path: impl AsRef<Path>) -> Result<FitOutcome<T>> {
        let path = path.as_ref();
        info!("loading data from {}", path.display());
        let data = dataset::load_points(path)?;
        self.fit(&data)
    }

    /// Nearest centroid index and squared distance for a single point.
    pub fn predict_one(&self, point: &[T]) -> Result<(usize, T)> {
        assign::nearest_centroid(point, &self.centroids)
    }

    /// Nearest-centroid labels for a batch of points, in input order.
    ///
    /// All-or-nothing: one bad point fails the whole call and no labels are
    /// returned. Runs on the configured thread pool when `n_threads > 1`;
    /// the output ordering is identical either way.
    pub fn predict(&self, points: &[Vec<T>]) -> Result<Vec<usize>> {
        match self.build_pool()? {
            Some(pool) => {
                debug!(
                    "parallel predicting using {} threads",
                    self.config.n_threads
                );
                pool.install(|| assign::assign_batch(points, &self.centroids, true))
            }
            None => assign::assign_batch(points, &self.centroids, false),
        }
    }

    /// Serialize the fitted centroids; see [`crate::model`] for the format.
    pub fn save_model(&self, path: impl AsRef<Path>) -> Result<()> {
        model::save_centroids(path, &self.centroids)
    }

    /// Replace the centroids with ones loaded from a model file, without
    /// running `fit`. Labels and membership lists are left untouched.
    pub fn load_model(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.centroids = model::load_centroids(path)?;
        Ok(())
    }

    /// Write the per-sample labels of the last fit, one per line.
    pub fn save_labels(&self, path: impl AsRef<Path>) -> Result<()> {
        model::save_labels(path, &self.labels)
    }

    pub fn set_num_clusters(&mut self, n_clusters: usize) {
        info!("set number of clusters to {n_clusters}");
        self.config.n_clusters = n_clusters;
    }

    pub fn set_num_threads(&mut self, n_threads: usize) {
        info!("set number of threads to {n_threads}");
        self.config.n_threads = n_threads;
    }

    pub fn set_init_method(&mut self, init: InitMethod) {
        info!("set init method to {init}");
        self.config.init = init;
    }

    pub fn set_max_iter(&mut self, max_iter: usize) {
        info!("set max iterations to {max_iter}");
        self.config.max_iter = max_iter;
    }

    pub fn set_threshold(&mut self, threshold: f32) {
        info!("set reassignment threshold to {threshold}");
        self.config.threshold = threshold;
    }

    pub fn set_seed(&mut self, seed: Option<u64>) {
        self.config.seed = seed;
    }

    /// Install centroids directly, e.g. before `predict` on a hand-built
    /// model.
    pub fn set_centroids(&mut self, centroids: Vec<Vec<T>>) {
        self.centroids = centroids;
    }

    pub fn centroids(&self) -> &[Vec<T>] {
        &self.centroids
    }

    pub fn labels(&self) -> &[i32] {
        &self.labels
    }

    /// Per-cluster sample indices from the last fit iteration, ascending
    /// within each cluster.
    pub fn cluster_members(&self) -> &[Vec<usize>] {
        &self.members
    }

    pub fn config(&self) -> &KMeansConfig {
        &self.config
    }

    fn build_pool(&self) -> Result<Option<rayon::ThreadPool>> {
        if self.config.n_threads <= 1 {
            return Ok(None);
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.n_threads)
            .build()
            .map_err(|e| ClusterError::Config(format!("failed to build thread pool: {e}")))?;
        Ok(Some(pool))
    }
}
